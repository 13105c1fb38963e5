//! Data model for parsed modules

use std::collections::BTreeMap;
use std::fmt;

use super::indent::normalize_indentation;

/// A typed parameter of a keyed section
///
/// The declared type is informational only; substitution is purely textual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub declared_type: String,
}

impl Parameter {
    pub fn new(declared_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.declared_type, self.name)
    }
}

/// An ordered sequence of captured source lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    lines: Vec<String>,
}

impl CodeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Strip the block's minimum common tab indentation, leaving sentinel lines intact
    pub fn normalize_indentation(&mut self) {
        normalize_indentation(&mut self.lines);
    }
}

impl<S: Into<String>> FromIterator<S> for CodeBlock {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The eight argument-less blocks a module can contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleBlock {
    Features,
    PropertiesNew,
    Keywords,
    ShaderFeaturesBlock,
    PropertiesBlock,
    Functions,
    Variables,
    Input,
}

impl SimpleBlock {
    pub const ALL: [SimpleBlock; 8] = [
        SimpleBlock::Features,
        SimpleBlock::PropertiesNew,
        SimpleBlock::Keywords,
        SimpleBlock::ShaderFeaturesBlock,
        SimpleBlock::PropertiesBlock,
        SimpleBlock::Functions,
        SimpleBlock::Variables,
        SimpleBlock::Input,
    ];

    /// Directive name without the leading `#`
    pub fn name(self) -> &'static str {
        match self {
            SimpleBlock::Features => "FEATURES",
            SimpleBlock::PropertiesNew => "PROPERTIES_NEW",
            SimpleBlock::Keywords => "KEYWORDS",
            SimpleBlock::ShaderFeaturesBlock => "SHADER_FEATURES_BLOCK",
            SimpleBlock::PropertiesBlock => "PROPERTIES_BLOCK",
            SimpleBlock::Functions => "FUNCTIONS",
            SimpleBlock::Variables => "VARIABLES",
            SimpleBlock::Input => "INPUT",
        }
    }

    /// Look a block kind up by its directive name (without `#`)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SimpleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Family of keyed sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionFamily {
    Vertex,
    /// Populated by both `#FRAGMENT` and `#LIGHTING`
    Fragment,
}

impl fmt::Display for SectionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionFamily::Vertex => write!(f, "#VERTEX"),
            SectionFamily::Fragment => write!(f, "#FRAGMENT/#LIGHTING"),
        }
    }
}

/// One keyed `#VERTEX` / `#FRAGMENT` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedSection {
    /// Empty for the default, unkeyed instance
    pub key: String,
    /// `None` when the directive had no argument list
    pub parameters: Option<Vec<Parameter>>,
    pub body: CodeBlock,
}

impl KeyedSection {
    pub fn new(key: impl Into<String>, parameters: Option<Vec<Parameter>>) -> Self {
        Self {
            key: key.into(),
            parameters,
            body: CodeBlock::new(),
        }
    }

    /// Declared parameters, empty when none were declared
    pub fn parameters(&self) -> &[Parameter] {
        self.parameters.as_deref().unwrap_or(&[])
    }

    pub fn lines(&self) -> &[String] {
        self.body.lines()
    }
}

/// The immutable result of parsing one module source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModule {
    pub name: String,
    simple: [CodeBlock; 8],
    vertex: BTreeMap<String, KeyedSection>,
    fragment: BTreeMap<String, KeyedSection>,
}

impl ParsedModule {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            simple: Default::default(),
            vertex: BTreeMap::new(),
            fragment: BTreeMap::new(),
        }
    }

    /// Lines of one of the eight simple blocks
    pub fn simple_block(&self, kind: SimpleBlock) -> &[String] {
        self.simple[kind.index()].lines()
    }

    pub(crate) fn simple_block_mut(&mut self, kind: SimpleBlock) -> &mut CodeBlock {
        &mut self.simple[kind.index()]
    }

    /// Keyed sections of a family, ordered by key
    pub fn sections(&self, family: SectionFamily) -> &BTreeMap<String, KeyedSection> {
        match family {
            SectionFamily::Vertex => &self.vertex,
            SectionFamily::Fragment => &self.fragment,
        }
    }

    pub(crate) fn sections_mut(&mut self, family: SectionFamily) -> &mut BTreeMap<String, KeyedSection> {
        match family {
            SectionFamily::Vertex => &mut self.vertex,
            SectionFamily::Fragment => &mut self.fragment,
        }
    }

    pub fn section(&self, family: SectionFamily, key: &str) -> Option<&KeyedSection> {
        self.sections(family).get(key)
    }

    pub fn vertex(&self, key: &str) -> Option<&KeyedSection> {
        self.section(SectionFamily::Vertex, key)
    }

    pub fn fragment(&self, key: &str) -> Option<&KeyedSection> {
        self.section(SectionFamily::Fragment, key)
    }

    /// Normalize every retained block
    pub(crate) fn normalize_indentation(&mut self) {
        for block in &mut self.simple {
            block.normalize_indentation();
        }
        for section in self.vertex.values_mut().chain(self.fragment.values_mut()) {
            section.body.normalize_indentation();
        }
    }

    /// Seed an empty default section into each family that has none
    pub(crate) fn seed_defaults(&mut self) {
        for family in [SectionFamily::Vertex, SectionFamily::Fragment] {
            let sections = self.sections_mut(family);
            if sections.is_empty() {
                sections.insert(String::new(), KeyedSection::new("", Some(Vec::new())));
            }
        }
    }
}

impl fmt::Display for ParsedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module: {}", self.name)?;
        for kind in SimpleBlock::ALL {
            let block = &self.simple[kind.index()];
            if !block.is_empty() {
                write!(f, "\n{}: {} line(s)", kind, block.len())?;
            }
        }
        for (label, sections) in [("VERTEX", &self.vertex), ("FRAGMENT", &self.fragment)] {
            for section in sections.values() {
                write!(f, "\n{}", label)?;
                if !section.key.is_empty() {
                    write!(f, ":{}", section.key)?;
                }
                if let Some(params) = section.parameters.as_ref().filter(|p| !p.is_empty()) {
                    let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                    write!(f, "({})", params.join(", "))?;
                }
                write!(f, ": {} line(s)", section.body.len())?;
            }
        }
        Ok(())
    }
}
