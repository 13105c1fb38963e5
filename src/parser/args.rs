//! Argument-list helpers shared by section declarations and template tags

/// Position of the `)` closing the `(` at `open`
///
/// Nested parentheses are skipped. An unbalanced list falls back to the last
/// `)` after `open`.
pub fn closing_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    text.rfind(')').filter(|&close| close > open)
}

/// Split an argument list on commas outside `(...)`, `<...>` and `[...]`
///
/// Yields each piece with its byte offset inside `content`.
pub fn split_arguments(content: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in content.char_indices() {
        match c {
            '(' | '<' | '[' => depth += 1,
            ')' | '>' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push((start, &content[start..index]));
                start = index + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &content[start..]));
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pieces(content: &str) -> Vec<&str> {
        split_arguments(content).into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn test_closing_paren_skips_nested_calls() {
        let text = "k(dot(u,v), c) tail";
        assert_eq!(closing_paren(text, 1), Some(13));
        assert_eq!(closing_paren("k(a, b", 1), None);
        assert_eq!(closing_paren("k(a(b)", 1), Some(5));
    }

    #[test]
    fn test_split_respects_nesting() {
        assert_eq!(pieces("dot(u,v), c"), vec!["dot(u,v)", " c"]);
        assert_eq!(pieces("float3(0,0,0), n"), vec!["float3(0,0,0)", " n"]);
        assert_eq!(
            pieces("Texture2D<float4,2> tex, float3x3[2] m"),
            vec!["Texture2D<float4,2> tex", " float3x3[2] m"]
        );
    }

    #[test]
    fn test_split_offsets() {
        assert_eq!(split_arguments("a,bc"), vec![(0, "a"), (2, "bc")]);
    }
}
