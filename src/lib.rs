//! Module Weaver - shader module definitions and parameterized code expansion
//!
//! This library parses module files written in a small tagged markup
//! language, normalizes the indentation of their code blocks, and expands
//! keyed vertex/fragment sections by substituting argument expressions for
//! parameter names. A weaving pass splices module code into shader templates.
//!
//! # Example
//!
//! ```rust
//! use module_weaver::{parse_module, SimpleBlock};
//!
//! let source = "#VARIABLES\n\t\tfloat _MyVar;\n#END\n\
//!               #VERTEX:main(float3 worldPos)\n\t\tfloat3 wp = worldPos;\n#END\n";
//! let module = parse_module("Example", source).unwrap();
//!
//! assert_eq!(module.simple_block(SimpleBlock::Variables), ["float _MyVar;"]);
//!
//! let lines = module.expand_vertex("main", &["i.worldPos"]).unwrap().into_lines();
//! assert_eq!(lines, ["float3 wp = i.worldPos;"]);
//! ```

pub mod config;
pub mod error;
pub mod expand;
pub mod parser;
pub mod template;

pub use config::{ConfigError, WeaverConfig};
pub use error::ParseError;
pub use expand::{ExpandError, Expansion};
pub use parser::{
    parse_module, CodeBlock, KeyedSection, Parameter, ParsedModule, SectionFamily, SimpleBlock,
};
pub use template::{weave, ModuleRegistry, RegistryError, WeaveWarning, WovenTemplate};

/// Weave a template, loading modules as described by `config`
///
/// # Example
///
/// ```rust
/// use module_weaver::{weave_with_config, WeaverConfig};
///
/// let woven = weave_with_config("Shader \"Toon\" {}", WeaverConfig::default());
/// assert_eq!(woven.text(), "Shader \"Toon\" {}");
/// assert!(woven.is_clean());
/// ```
pub fn weave_with_config(template: &str, config: WeaverConfig) -> WovenTemplate {
    let mut registry = ModuleRegistry::with_config(config);
    weave(template, &mut registry)
}
