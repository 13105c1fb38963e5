//! Whole-word parameter substitution

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::parser::ast::Parameter;

/// Substitutes supplied argument expressions for parameter names
///
/// All parameter names are matched by a single alternation, so every match
/// is located on the original line before anything is replaced. Replacement
/// text is never scanned again, even when it contains another parameter's
/// name.
#[derive(Debug)]
pub struct Binder<'a> {
    pattern: Regex,
    bindings: HashMap<&'a str, &'a str>,
}

impl<'a> Binder<'a> {
    /// Pair parameters with arguments positionally, up to the shorter list
    ///
    /// Returns `Ok(None)` when nothing is paired.
    pub fn new<S: AsRef<str>>(
        parameters: &'a [Parameter],
        arguments: &'a [S],
    ) -> Result<Option<Self>, regex::Error> {
        let bindings: HashMap<&str, &str> = parameters
            .iter()
            .zip(arguments)
            .map(|(parameter, argument)| (parameter.name.as_str(), argument.as_ref()))
            .collect();
        if bindings.is_empty() {
            return Ok(None);
        }

        let alternatives: Vec<String> = parameters
            .iter()
            .take(bindings.len())
            .map(|parameter| regex::escape(&parameter.name))
            .collect();
        let pattern = Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|")))?;

        Ok(Some(Self { pattern, bindings }))
    }

    pub fn bind_line(&self, line: &str) -> String {
        self.pattern
            .replace_all(line, |caps: &Captures| {
                let name = &caps[0];
                self.bindings.get(name).copied().unwrap_or(name).to_string()
            })
            .into_owned()
    }

    pub fn bind_lines(&self, lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| self.bind_line(line)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(names: &[&str]) -> Vec<Parameter> {
        names.iter().map(|n| Parameter::new("float", *n)).collect()
    }

    #[test]
    fn test_whole_word_only() {
        let parameters = params(&["a"]);
        let binder = Binder::new(&parameters, &["x"]).unwrap().unwrap();
        assert_eq!(binder.bind_line("result = a + b;"), "result = x + b;");
        assert_eq!(binder.bind_line("abc = xa;"), "abc = xa;");
        assert_eq!(binder.bind_line("a.a(a)"), "x.x(x)");
    }

    #[test]
    fn test_prefix_names_do_not_collide() {
        let parameters = params(&["pos", "position"]);
        let binder = Binder::new(&parameters, &["P", "Q"]).unwrap().unwrap();
        assert_eq!(binder.bind_line("position + pos"), "Q + P");
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let parameters = params(&["a", "b"]);
        let binder = Binder::new(&parameters, &["b * 2", "a"]).unwrap().unwrap();
        assert_eq!(binder.bind_line("c = a + b;"), "c = b * 2 + a;");
    }

    #[test]
    fn test_dollar_signs_are_literal() {
        let parameters = params(&["v"]);
        let binder = Binder::new(&parameters, &["$1"]).unwrap().unwrap();
        assert_eq!(binder.bind_line("o = v;"), "o = $1;");
    }

    #[test]
    fn test_short_argument_list_binds_prefix() {
        let parameters = params(&["a", "b"]);
        let binder = Binder::new(&parameters, &["x"]).unwrap().unwrap();
        assert_eq!(binder.bind_line("a + b"), "x + b");
    }

    #[test]
    fn test_nothing_paired() {
        let parameters = params(&["a"]);
        let none: [&str; 0] = [];
        assert!(Binder::new(&parameters, &none).unwrap().is_none());
    }
}
