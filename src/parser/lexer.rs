//! Directive-head tokenizer for module sources using logos
//!
//! Only the head of a directive line is lexed (`#VERTEX`, `#END`, ...). The
//! remainder of the line (key and argument list) is sliced by the scanner.

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    // Keyed families (matched as prefixes)
    #[token("#VERTEX")]
    Vertex,
    #[token("#FRAGMENT")]
    Fragment,
    // Alias of #FRAGMENT, kept apart so templates can read differently
    #[token("#LIGHTING")]
    Lighting,

    // Simple blocks (matched exactly)
    #[token("#FEATURES")]
    Features,
    #[token("#PROPERTIES_NEW")]
    PropertiesNew,
    #[token("#KEYWORDS")]
    Keywords,
    #[token("#PROPERTIES_BLOCK")]
    PropertiesBlock,
    #[token("#SHADER_FEATURES_BLOCK")]
    ShaderFeaturesBlock,
    #[token("#FUNCTIONS")]
    Functions,
    #[token("#VARIABLES")]
    Variables,
    #[token("#INPUT")]
    Input,

    #[token("#END")]
    End,
}

impl Directive {
    /// Keyed directives open a section on a prefix match; all others need the whole line
    pub fn is_keyed(self) -> bool {
        matches!(self, Directive::Vertex | Directive::Fragment | Directive::Lighting)
    }
}

/// Lex the head of a trimmed directive line
///
/// Returns the directive and the span it covers, or `None` when the line does
/// not start with a known directive.
pub fn lex_head(trimmed: &str) -> Option<(Directive, Span)> {
    let (token, span) = Directive::lexer(trimmed).spanned().next()?;
    token.ok().map(|directive| (directive, span))
}

/// Lex a trimmed line into the directive it names, honoring exact-match rules
pub fn directive(trimmed: &str) -> Option<(Directive, Span)> {
    let (directive, span) = lex_head(trimmed)?;
    if directive.is_keyed() || span.end == trimmed.len() {
        Some((directive, span))
    } else {
        None
    }
}
