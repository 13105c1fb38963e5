//! Indentation normalization for captured blocks
//!
//! Module files nest their code at arbitrary depth. Each block has its
//! minimum leading-tab count removed so that templates can re-indent it at the
//! point of insertion. Doc comments (`///`), `_IMPL` markers and `not_empty`
//! guards are never part of the generated code and pass through untouched.

/// True when the line carries structure rather than code and must not be stripped
fn is_sentinel(trimmed: &str) -> bool {
    trimmed.starts_with("///")
        || (trimmed.starts_with('#') && (trimmed.contains("_IMPL") || trimmed.contains("not_empty")))
}

/// True when the line takes part in measuring the block's minimum indent
fn is_measured(line: &str) -> bool {
    let trimmed = line.trim();
    !(trimmed.is_empty()
        || trimmed.starts_with("///")
        || line.starts_with('#')
        || (trimmed.starts_with('#') && trimmed.contains("not_empty")))
}

fn leading_tabs(line: &str) -> usize {
    line.chars().take_while(|&c| c == '\t').count()
}

/// Minimum leading-tab count over measured lines, `None` if no line is measured
pub fn minimum_indent(lines: &[String]) -> Option<usize> {
    lines
        .iter()
        .filter(|line| is_measured(line))
        .map(|line| leading_tabs(line))
        .min()
}

/// Remove the minimum indentation from every non-sentinel line
///
/// The strip is a plain prefix cut of `min` characters, applied only to lines
/// longer than `min`.
pub fn normalize_indentation(lines: &mut [String]) {
    let min = match minimum_indent(lines) {
        Some(0) | None => return,
        Some(min) => min,
    };

    for line in lines.iter_mut() {
        if is_sentinel(line.trim()) {
            continue;
        }
        if let Some((cut, _)) = line.char_indices().nth(min) {
            line.drain(..cut);
        }
    }
}
