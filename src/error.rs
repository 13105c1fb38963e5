//! Error types for module parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::SectionFamily;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An argument-list entry without a type/name separator
    #[error("[module {module}] malformed argument '{argument}' in {family}:{key} (line {line}): expected 'type name'")]
    MalformedArgument {
        module: String,
        family: SectionFamily,
        key: String,
        argument: String,
        line: usize,
        span: Span,
    },

    /// The name half of an argument entry is not an identifier
    #[error("[module {module}] invalid parameter name '{name}' in {family}:{key} (line {line})")]
    InvalidParameterName {
        module: String,
        family: SectionFamily,
        key: String,
        name: String,
        line: usize,
        span: Span,
    },

    #[error("[module {module}] duplicate parameter '{name}' in {family}:{key} (line {line})")]
    DuplicateParameter {
        module: String,
        family: SectionFamily,
        key: String,
        name: String,
        line: usize,
        span: Span,
    },

    #[error("[module {module}] {family} section '{key}' declared twice (line {line})")]
    DuplicateSection {
        module: String,
        family: SectionFamily,
        key: String,
        line: usize,
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::MalformedArgument { span, .. }
            | ParseError::InvalidParameterName { span, .. }
            | ParseError::DuplicateParameter { span, .. }
            | ParseError::DuplicateSection { span, .. } => span,
        }
    }

    /// 1-based source line of the error
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedArgument { line, .. }
            | ParseError::InvalidParameterName { line, .. }
            | ParseError::DuplicateParameter { line, .. }
            | ParseError::DuplicateSection { line, .. } => *line,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ParseError::MalformedArgument { .. } => "missing space between type and name",
            ParseError::InvalidParameterName { .. } => "not an identifier",
            ParseError::DuplicateParameter { .. } => "parameter name already used",
            ParseError::DuplicateSection { .. } => "key already declared",
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let span = self.span().clone();
        let message = self.to_string();

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}
