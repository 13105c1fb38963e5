//! Template weaving: splices module code into a shader template
//!
//! A template declares the modules it uses in a `#MODULES` block and pulls
//! their code in with tag lines:
//!
//! ```text
//! #MODULES
//! Rim
//! #END
//!     [[MODULE:VARIABLES]]
//!     [[MODULE:VERTEX:Rim:main(v.vertex.xyz)]]
//! ```
//!
//! Each tag line is replaced by the module lines, indented like the tag.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::expand::ExpandError;
use crate::parser::{
    closing_paren, source_lines, split_arguments, ParsedModule, SectionFamily, SimpleBlock,
    SourceLine,
};

use super::registry::{ModuleRegistry, RegistryError};

const TAG_OPEN: &str = "[[MODULE:";
const TAG_CLOSE: &str = "]]";

/// Problems found while weaving; the template is still produced
#[derive(Debug, Error)]
pub enum WeaveWarning {
    /// A module listed in `#MODULES` could not be loaded
    #[error("line {line}: can't load module '{name}': {source}")]
    ModuleLoad {
        line: usize,
        name: String,
        source: RegistryError,
    },

    /// A tag names a module that is not listed in `#MODULES`
    #[error("line {line}: can't find module '{name}' for '{tag}'")]
    UnknownModule { line: usize, name: String, tag: String },

    /// A tag kind that needs a module name has none
    #[error("line {line}: tag '{tag}' needs a module name")]
    MissingModuleName { line: usize, tag: String },

    #[error("line {line}: unknown module tag '{tag}'")]
    UnknownTag { line: usize, tag: String },

    #[error("line {line}: {source}")]
    Expand { line: usize, source: ExpandError },
}

/// Result of weaving a template
#[derive(Debug, Default)]
pub struct WovenTemplate {
    pub lines: Vec<String>,
    /// Modules listed in `#MODULES` that loaded, in declaration order
    pub modules: Vec<String>,
    pub warnings: Vec<WeaveWarning>,
}

impl WovenTemplate {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A parsed `[[MODULE:...]]` tag: `KIND[:module[:key]][(args)]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTag<'a> {
    pub kind: &'a str,
    pub module: Option<&'a str>,
    pub key: &'a str,
    pub arguments: Vec<&'a str>,
}

impl<'a> ModuleTag<'a> {
    /// Parse the text between `[[MODULE:` and `]]`
    pub fn parse(tag: &'a str) -> Self {
        let open = tag.find('(');
        let head = &tag[..open.unwrap_or(tag.len())];

        let (kind, target) = match head.split_once(':') {
            Some((kind, target)) => (kind, target),
            None => (head, ""),
        };
        let (module, key) = match target.split_once(':') {
            Some((module, key)) => (module, key),
            None => (target, ""),
        };

        let arguments = open
            .and_then(|open| Some(&tag[open + 1..closing_paren(tag, open)?]))
            .filter(|inner| !inner.trim().is_empty())
            .map(|inner| {
                split_arguments(inner)
                    .into_iter()
                    .map(|(_, argument)| argument.trim())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            kind,
            module: (!module.is_empty()).then_some(module),
            key,
            arguments,
        }
    }
}

/// Extract the tag text from a tag line
fn tag_text(line: &str) -> Option<&str> {
    let start = line.find(TAG_OPEN)? + TAG_OPEN.len();
    let end = line.rfind(TAG_CLOSE)?;
    line.get(start..end)
}

/// Weave module code into a template
///
/// Modules are loaded through `registry`. Problems are collected as warnings
/// and logged; weaving always completes with best-effort output.
pub fn weave(template: &str, registry: &mut ModuleRegistry) -> WovenTemplate {
    let mut weaver = Weaver {
        registry,
        modules: Vec::new(),
        used: HashSet::new(),
        out: WovenTemplate::default(),
    };

    let mut lines = source_lines(template);
    while let Some(line) = lines.next() {
        if line.text.starts_with("#MODULES") {
            for entry in lines.by_ref() {
                if entry.text == "#END" {
                    break;
                }
                weaver.declare(entry);
            }
        } else if line.text.trim_start().starts_with("[[MODULE") {
            weaver.tag_line(line);
        } else {
            weaver.out.lines.push(line.text.to_string());
        }
    }

    weaver.out
}

struct Weaver<'r> {
    registry: &'r mut ModuleRegistry,
    modules: Vec<Arc<ParsedModule>>,
    /// (block, module) pairs already emitted by a module-specific tag;
    /// keywords are never tracked
    used: HashSet<(SimpleBlock, String)>,
    out: WovenTemplate,
}

impl Weaver<'_> {
    fn report(&mut self, warning: WeaveWarning) {
        warn!("{}", warning);
        self.out.warnings.push(warning);
    }

    fn module(&self, name: &str) -> Option<Arc<ParsedModule>> {
        self.modules.iter().find(|m| m.name == name).cloned()
    }

    /// Handle one line of a `#MODULES` block
    fn declare(&mut self, entry: SourceLine<'_>) {
        let name = entry.text.trim();
        if name.is_empty() || entry.text.starts_with("//") || entry.text.starts_with('#') {
            return;
        }
        if self.module(name).is_some() {
            debug!(module = name, "module listed twice");
            return;
        }

        match self.registry.get_module(name) {
            Ok(module) => {
                self.out.modules.push(module.name.clone());
                self.modules.push(module);
            }
            Err(source) => self.report(WeaveWarning::ModuleLoad {
                line: entry.number,
                name: name.to_string(),
                source,
            }),
        }
    }

    fn tag_line(&mut self, line: SourceLine<'_>) {
        let trimmed = line.text.trim();
        let indent = &line.text[..line.text.len() - line.text.trim_start().len()];

        let Some(text) = tag_text(line.text) else {
            return self.report(WeaveWarning::UnknownTag {
                line: line.number,
                tag: trimmed.to_string(),
            });
        };
        let tag = ModuleTag::parse(text);

        let module = match tag.module {
            Some(name) => match self.module(name) {
                Some(module) => Some(module),
                None => {
                    return self.report(WeaveWarning::UnknownModule {
                        line: line.number,
                        name: name.to_string(),
                        tag: trimmed.to_string(),
                    })
                }
            },
            None => None,
        };

        let family = match tag.kind {
            "VERTEX" => Some(SectionFamily::Vertex),
            "FRAGMENT" | "LIGHTING" => Some(SectionFamily::Fragment),
            _ => None,
        };

        match (SimpleBlock::from_name(tag.kind), family, module) {
            (Some(kind), _, Some(module)) => {
                if kind != SimpleBlock::Keywords {
                    self.used.insert((kind, module.name.clone()));
                }
                self.emit(module.simple_block(kind), indent);
            }
            (
                Some(kind @ (SimpleBlock::Input
                | SimpleBlock::Functions
                | SimpleBlock::Variables
                | SimpleBlock::Keywords)),
                _,
                None,
            ) => {
                let pending: Vec<_> = self
                    .modules
                    .iter()
                    .filter(|m| !self.used.contains(&(kind, m.name.clone())))
                    .cloned()
                    .collect();
                for module in pending {
                    self.emit(module.simple_block(kind), indent);
                }
            }
            (_, Some(family), Some(module)) => {
                match module.expand(family, tag.key, tag.arguments.as_slice()) {
                    Ok(expansion) => {
                        self.emit(&expansion.lines, indent);
                        if let Some(source) = expansion.mismatch {
                            // already logged by the expansion
                            self.out.warnings.push(WeaveWarning::Expand {
                                line: line.number,
                                source,
                            });
                        }
                    }
                    Err(source) => self.report(WeaveWarning::Expand {
                        line: line.number,
                        source,
                    }),
                }
            }
            (Some(_), _, None) | (_, Some(_), None) => self.report(WeaveWarning::MissingModuleName {
                line: line.number,
                tag: trimmed.to_string(),
            }),
            (None, None, _) => self.report(WeaveWarning::UnknownTag {
                line: line.number,
                tag: trimmed.to_string(),
            }),
        }
    }

    /// Append module lines with the tag's indent; `_IMPL` markers stay at column 0
    fn emit(&mut self, lines: &[String], indent: &str) {
        for line in lines {
            if line.starts_with('#') && line.contains("_IMPL") {
                self.out.lines.push(line.clone());
            } else {
                self.out.lines.push(format!("{}{}", indent, line));
            }
        }
    }
}
