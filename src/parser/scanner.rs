//! Line scanner turning module source text into a [`ParsedModule`]
//!
//! The scan is a fold over source lines. Its only state is the
//! [`ActiveTarget`] that content lines are appended to, which directive lines
//! replace.

use tracing::debug;

use crate::error::{ParseError, Span};

use super::args::{closing_paren, split_arguments};
use super::ast::{KeyedSection, Parameter, ParsedModule, SectionFamily, SimpleBlock};
use super::lexer::{self, Directive};

/// One line of source text with its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the line start in the full source
    pub offset: usize,
    /// Line content without its line terminator
    pub text: &'a str,
}

/// Split source text on LF and CRLF line endings
pub fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut offset = 0;
    source.split('\n').enumerate().map(move |(index, raw)| {
        let line = SourceLine {
            number: index + 1,
            offset,
            text: raw.strip_suffix('\r').unwrap_or(raw),
        };
        offset += raw.len() + 1;
        line
    })
}

/// Where content lines currently go
#[derive(Debug, Clone, PartialEq, Eq)]
enum ActiveTarget {
    None,
    Simple(SimpleBlock),
    Keyed(SectionFamily, String),
}

/// Parse module source text
///
/// Empty text is valid and yields a module with empty blocks and the default
/// vertex and fragment sections.
pub fn parse_module(name: &str, source: &str) -> Result<ParsedModule, ParseError> {
    let mut module = ParsedModule::new(name);

    source_lines(source).try_fold(ActiveTarget::None, |target, line| {
        step(&mut module, target, line)
    })?;

    module.normalize_indentation();
    module.seed_defaults();

    debug!(
        module = name,
        vertex = module.sections(SectionFamily::Vertex).len(),
        fragment = module.sections(SectionFamily::Fragment).len(),
        "parsed module"
    );
    Ok(module)
}

fn step(
    module: &mut ParsedModule,
    target: ActiveTarget,
    line: SourceLine<'_>,
) -> Result<ActiveTarget, ParseError> {
    if !line.text.starts_with('#') || line.text.contains("_IMPL") {
        append(module, &target, line.text);
        return Ok(target);
    }

    let trimmed = line.text.trim();
    let Some((directive, head)) = lexer::directive(trimmed) else {
        debug!(module = %module.name, line = line.number, "ignoring directive '{}'", trimmed);
        return Ok(target);
    };

    let next = match directive {
        Directive::Vertex => open_section(module, SectionFamily::Vertex, trimmed, head, line)?,
        Directive::Fragment | Directive::Lighting => {
            open_section(module, SectionFamily::Fragment, trimmed, head, line)?
        }
        Directive::Features => ActiveTarget::Simple(SimpleBlock::Features),
        Directive::PropertiesNew => ActiveTarget::Simple(SimpleBlock::PropertiesNew),
        Directive::Keywords => ActiveTarget::Simple(SimpleBlock::Keywords),
        Directive::PropertiesBlock => ActiveTarget::Simple(SimpleBlock::PropertiesBlock),
        Directive::ShaderFeaturesBlock => ActiveTarget::Simple(SimpleBlock::ShaderFeaturesBlock),
        Directive::Functions => ActiveTarget::Simple(SimpleBlock::Functions),
        Directive::Variables => ActiveTarget::Simple(SimpleBlock::Variables),
        Directive::Input => ActiveTarget::Simple(SimpleBlock::Input),
        Directive::End => ActiveTarget::None,
    };
    Ok(next)
}

fn append(module: &mut ParsedModule, target: &ActiveTarget, text: &str) {
    match target {
        ActiveTarget::None => {}
        ActiveTarget::Simple(kind) => module.simple_block_mut(*kind).push(text),
        ActiveTarget::Keyed(family, key) => {
            if let Some(section) = module.sections_mut(*family).get_mut(key) {
                section.body.push(text);
            }
        }
    }
}

/// Open a new keyed section from a `#VERTEX` / `#FRAGMENT` / `#LIGHTING` line
fn open_section(
    module: &mut ParsedModule,
    family: SectionFamily,
    trimmed: &str,
    head: Span,
    line: SourceLine<'_>,
) -> Result<ActiveTarget, ParseError> {
    let rest = &trimmed[head.end..];
    let rest_offset = line.offset + head.end;
    let open = rest.find('(');

    let key = match rest.find(':') {
        Some(colon) if open.map_or(true, |open| colon < open) => {
            rest[colon + 1..open.unwrap_or(rest.len())].trim()
        }
        _ => "",
    };

    if module.sections(family).contains_key(key) {
        return Err(ParseError::DuplicateSection {
            module: module.name.clone(),
            family,
            key: key.to_string(),
            line: line.number,
            span: line.offset..line.offset + trimmed.len(),
        });
    }

    let close = open.and_then(|open| closing_paren(rest, open));
    let parameters = match (open, close) {
        (Some(open), Some(close)) => {
            let context = ArgumentContext {
                module: &module.name,
                family,
                key,
                line: line.number,
            };
            Some(context.parse(&rest[open + 1..close], rest_offset + open + 1)?)
        }
        _ => None,
    };

    module
        .sections_mut(family)
        .insert(key.to_string(), KeyedSection::new(key, parameters));
    Ok(ActiveTarget::Keyed(family, key.to_string()))
}

/// Where an argument list was declared, for error reporting
struct ArgumentContext<'a> {
    module: &'a str,
    family: SectionFamily,
    key: &'a str,
    line: usize,
}

impl ArgumentContext<'_> {
    /// Parse the text between the parentheses of a section directive
    ///
    /// Each comma-separated entry is `type name`, split on the first space.
    /// `offset` is the absolute position of `content` in the module source.
    fn parse(&self, content: &str, offset: usize) -> Result<Vec<Parameter>, ParseError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut parameters: Vec<Parameter> = Vec::new();
        for (start, piece) in split_arguments(content) {
            let argument = piece.trim();
            let argument_start = offset + start + (piece.len() - piece.trim_start().len());
            let argument_end = argument_start + argument.len();

            let Some((declared_type, name)) = argument.split_once(' ') else {
                return Err(ParseError::MalformedArgument {
                    module: self.module.to_string(),
                    family: self.family,
                    key: self.key.to_string(),
                    argument: argument.to_string(),
                    line: self.line,
                    span: argument_start..argument_end,
                });
            };

            let name = name.trim_start();
            let name_span = argument_end - name.len()..argument_end;
            if !is_identifier(name) {
                return Err(ParseError::InvalidParameterName {
                    module: self.module.to_string(),
                    family: self.family,
                    key: self.key.to_string(),
                    name: name.to_string(),
                    line: self.line,
                    span: name_span,
                });
            }
            if parameters.iter().any(|p| p.name == name) {
                return Err(ParseError::DuplicateParameter {
                    module: self.module.to_string(),
                    family: self.family,
                    key: self.key.to_string(),
                    name: name.to_string(),
                    line: self.line,
                    span: name_span,
                });
            }

            parameters.push(Parameter::new(declared_type, name));
        }
        Ok(parameters)
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
