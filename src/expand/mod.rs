//! Argument binding for keyed sections
//!
//! Expanding a keyed section replaces every whole-word occurrence of each
//! declared parameter with the caller's argument expression. The stored
//! module is never modified, so a section can be expanded once per shader
//! variant.

mod binder;

use std::borrow::Cow;

use thiserror::Error;
use tracing::warn;

use crate::parser::ast::{ParsedModule, SectionFamily};

pub use binder::Binder;

/// Errors that can occur while expanding a keyed section
#[derive(Debug, Error)]
pub enum ExpandError {
    /// The requested key is not declared in the family
    #[error("can't find {family} for module '{module}{}'", display_key(.key))]
    UnknownSection {
        module: String,
        family: SectionFamily,
        key: String,
    },

    /// Wrong number of arguments supplied for a parameterized section
    #[error(
        "[module {module}] invalid number of arguments provided: got {got}, expected {expected}\nExpected: {}\nSupplied: {}",
        .expected_names.join(", "),
        .supplied.join(", ")
    )]
    ArityMismatch {
        module: String,
        key: String,
        expected: usize,
        got: usize,
        expected_names: Vec<String>,
        supplied: Vec<String>,
    },

    #[error("invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn display_key(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        format!(":{}", key)
    }
}

/// Lines produced by expanding a section, with any arity problem reported
#[derive(Debug)]
pub struct Expansion<'a> {
    /// Borrowed straight from the module when no substitution was needed
    pub lines: Cow<'a, [String]>,
    /// Set when the argument count did not match; `lines` are still best-effort
    pub mismatch: Option<ExpandError>,
}

impl<'a> Expansion<'a> {
    pub fn is_clean(&self) -> bool {
        self.mismatch.is_none()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines.into_owned()
    }

    /// Strict view: an arity mismatch becomes an error
    pub fn into_result(self) -> Result<Vec<String>, ExpandError> {
        match self.mismatch {
            Some(err) => Err(err),
            None => Ok(self.lines.into_owned()),
        }
    }
}

impl ParsedModule {
    /// Vertex lines for `key` with `arguments` bound to the declared parameters
    pub fn expand_vertex<S: AsRef<str>>(
        &self,
        key: &str,
        arguments: &[S],
    ) -> Result<Expansion<'_>, ExpandError> {
        self.expand(SectionFamily::Vertex, key, arguments)
    }

    /// Fragment (`#FRAGMENT` / `#LIGHTING`) lines for `key`
    pub fn expand_fragment<S: AsRef<str>>(
        &self,
        key: &str,
        arguments: &[S],
    ) -> Result<Expansion<'_>, ExpandError> {
        self.expand(SectionFamily::Fragment, key, arguments)
    }

    /// Expand a keyed section of either family
    ///
    /// A missing key is an error. An arity mismatch is logged and returned in
    /// [`Expansion::mismatch`] while parameters are still paired positionally
    /// up to the shorter list.
    pub fn expand<S: AsRef<str>>(
        &self,
        family: SectionFamily,
        key: &str,
        arguments: &[S],
    ) -> Result<Expansion<'_>, ExpandError> {
        let section = self
            .section(family, key)
            .ok_or_else(|| ExpandError::UnknownSection {
                module: self.name.clone(),
                family,
                key: key.to_string(),
            })?;

        let parameters = section.parameters();
        if parameters.is_empty() {
            return Ok(Expansion {
                lines: Cow::Borrowed(section.lines()),
                mismatch: None,
            });
        }

        let mismatch = (arguments.len() != parameters.len()).then(|| ExpandError::ArityMismatch {
            module: self.name.clone(),
            key: key.to_string(),
            expected: parameters.len(),
            got: arguments.len(),
            expected_names: parameters.iter().map(|p| p.to_string()).collect(),
            supplied: arguments.iter().map(|a| a.as_ref().to_string()).collect(),
        });
        if let Some(err) = &mismatch {
            warn!("{}", err);
        }

        let lines = match Binder::new(parameters, arguments)? {
            Some(binder) => Cow::Owned(binder.bind_lines(section.lines())),
            None => Cow::Borrowed(section.lines()),
        };
        Ok(Expansion { lines, mismatch })
    }
}
