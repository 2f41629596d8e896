//! Stale annotation cleanup
//!
//! Earlier persisted-format versions tagged each checkbox with two
//! brace-wrapped integers (`[x]{4}{11}`) identifying its position. The
//! current format keeps documents unannotated, so any leftover pairs are
//! stripped when a file is opened. Checkbox tokens themselves are never
//! touched.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static ANNOTATION_RE: OnceLock<Regex> = OnceLock::new();

/// Two brace-wrapped integers back to back, e.g. `{4}{11}`.
fn annotation_regex() -> &'static Regex {
    ANNOTATION_RE
        .get_or_init(|| Regex::new(r"\{\d+\}\{\d+\}").expect("annotation pattern is valid"))
}

/// Remove all stale annotation pairs from document text.
///
/// Returns `Cow::Borrowed` when the text contains no annotations, so callers
/// can skip the write-back on the common unannotated path.
pub fn strip_stale_annotations(text: &str) -> Cow<'_, str> {
    annotation_regex().replace_all(text, "")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_annotation_pair_after_checkbox() {
        let text = "[x]{4}{11} done";
        assert_eq!(strip_stale_annotations(text), "[x] done");
    }

    #[test]
    fn test_checkbox_token_untouched() {
        let text = "| Tasks | [x]{0}{7} Milk [ ]{0}{16} Bread |";
        let cleaned = strip_stale_annotations(text);
        assert_eq!(cleaned, "| Tasks | [x] Milk [ ] Bread |");
    }

    #[test]
    fn test_clean_text_is_borrowed() {
        let text = "| Tasks | [x] Milk |";
        assert!(matches!(strip_stale_annotations(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_single_brace_group_kept() {
        // One brace-wrapped integer is not an annotation pair
        let text = "regex quantifier a{3} stays";
        assert_eq!(strip_stale_annotations(text), text);
    }

    #[test]
    fn test_non_numeric_braces_kept() {
        let text = "{a}{b} and {1}{b} stay";
        assert_eq!(strip_stale_annotations(text), text);
    }

    #[test]
    fn test_multiline_document() {
        let text = "# Notes\n| A | [ ]{1}{2} task |\nplain {5}{6} line\n";
        assert_eq!(
            strip_stale_annotations(text),
            "# Notes\n| A | [ ] task |\nplain  line\n"
        );
    }
}
