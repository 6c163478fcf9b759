//! Stage 7: strip internal trace markers before anything reaches a user.
//!
//! `unverified_by_trace(<code>): <tail>` is rewritten to `<tail>` in prose
//! fields and to `<code>` in id-like fields — the marker itself is
//! plumbing the verifier uses internally and must never leak.

const MARKER_PREFIX: &str = "unverified_by_trace(";

fn split_marker(text: &str) -> Option<(&str, &str)> {
    let start = text.find(MARKER_PREFIX)?;
    let after_prefix = start + MARKER_PREFIX.len();
    let close = text[after_prefix..].find(')')?;
    let code_end = after_prefix + close;
    let code = &text[after_prefix..code_end];
    let rest = &text[code_end + 1..];
    let tail = rest.strip_prefix(": ").unwrap_or(rest);
    Some((code, tail))
}

/// Prose rewrite: the marker becomes just its tail.
pub fn sanitize_prose(text: &str) -> String {
    match split_marker(text) {
        Some((_, tail)) => {
            let start = text.find(MARKER_PREFIX).unwrap();
            format!("{}{}", &text[..start], tail)
        }
        None => text.to_string(),
    }
}

/// Id-like field rewrite: the marker becomes just its code.
pub fn sanitize_id(text: &str) -> String {
    match split_marker(text) {
        Some((code, _)) => code.to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker_to_tail_in_prose() {
        let input = "The handler unverified_by_trace(E42): calls validate() before saving.";
        assert_eq!(sanitize_prose(input), "The handler calls validate() before saving.");
    }

    #[test]
    fn strips_marker_to_code_in_id_fields() {
        let input = "unverified_by_trace(E42): trace-9f3";
        assert_eq!(sanitize_id(input), "E42");
    }

    #[test]
    fn leaves_unmarked_text_untouched() {
        let input = "plain summary with no markers";
        assert_eq!(sanitize_prose(input), input);
        assert_eq!(sanitize_id(input), input);
    }
}
