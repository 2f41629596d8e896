//! Fuzzy re-localization and the toggle dispatcher
//!
//! The rendered view is stale the instant the document changes, so a click
//! on a rendered checkbox cannot trust any offset it was rendered with.
//! Instead the document text is re-read and the control's fingerprint is
//! matched against every structurally plausible line: candidate lines are
//! scored by shared key words with the fingerprint's row text, the best
//! scorer is patched in the fingerprinted cell, and a whole-document
//! substring replace is the deliberately low-confidence last resort.

use log::debug;
use std::path::Path;

use crate::config::Settings;
use crate::error::Result;
use crate::files::DocumentStore;
use crate::markdown::{rebuild_row, scan_tokens, split_cells, CheckboxToken, TokenMatch};
use crate::preview::fingerprint::{Fingerprint, TogglePayload};
use crate::string_utils::byte_index_to_char_index;

/// Key words and line tokens shorter than this are too generic to score.
const MIN_MATCH_TOKEN_LEN: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Key Word Extraction and Scoring
// ─────────────────────────────────────────────────────────────────────────────

/// Extract the distinguishing key words from a fingerprint's row text.
///
/// Tokens of length > 2 from the whitespace-normalized row text, lowercased,
/// excluding checkbox token literals and purely numeric tokens (both carry
/// no identity — every row of a task table tends to contain them).
fn keywords(row_text: &str) -> Vec<String> {
    row_text
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= MIN_MATCH_TOKEN_LEN)
        .filter(|t| t != "[x]" && t != "[ ]")
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Tokenize a candidate document line for scoring.
///
/// Splits on whitespace and `|`, keeps tokens of length > 2, lowercased.
fn line_tokens(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == '|')
        .filter(|t| t.chars().count() >= MIN_MATCH_TOKEN_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Count the key words a line matches.
///
/// A key word matches when some line token contains it or it contains some
/// line token — substring containment in either direction, so minor edits
/// ("Milk" vs "Milks") do not break re-localization.
fn score_line(keywords: &[String], line: &str) -> usize {
    let tokens = line_tokens(line);
    keywords
        .iter()
        .filter(|kw| {
            tokens
                .iter()
                .any(|t| t.contains(kw.as_str()) || kw.contains(t.as_str()))
        })
        .count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Target Line Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Find the single best line of `doc` to patch for `fingerprint`.
///
/// Candidates must contain a pipe and the original token literal, score at
/// least one key word, and literally carry the token in the fingerprinted
/// cell. Among survivors the highest score wins, ties broken by ascending
/// line index. `None` means no confident target exists.
fn find_target_line(doc: &str, fingerprint: &Fingerprint) -> Option<usize> {
    let token = fingerprint.token.as_str();
    let kws = keywords(&fingerprint.row_text);
    let mut best: Option<(usize, usize)> = None;

    for (idx, line) in doc.split('\n').enumerate() {
        if !line.contains('|') || !line.contains(token) {
            continue;
        }

        let score = score_line(&kws, line);
        if score == 0 {
            continue;
        }

        // The fingerprinted cell must literally contain the token; a high
        // word score on the wrong column is still the wrong checkbox.
        let cells = split_cells(line);
        let cell_has_token = cells
            .get(fingerprint.cell_index)
            .map_or(false, |cell| cell.contains(token));
        if !cell_has_token {
            continue;
        }

        // Strictly-greater keeps the earliest line on ties
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((idx, score));
        }
    }

    best.map(|(idx, score)| {
        debug!("re-localized to line {} (score {})", idx, score);
        idx
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Cell Disambiguation
// ─────────────────────────────────────────────────────────────────────────────

/// Patch one checkbox on an already-located line.
///
/// With a single token match in the target cell, a first-occurrence
/// substring replace on the full line is safe. With several, the match
/// within the configured tolerance of the fingerprint's in-cell offset whose
/// literal equals the original token is replaced by exact offset, and the
/// line is rebuilt from pipe-joined trimmed cells (which may normalize
/// incidental whitespace around pipes). When no match qualifies, the first
/// occurrence on the line is replaced as a fallback.
fn patch_line(
    line: &str,
    fingerprint: &Fingerprint,
    new_token: CheckboxToken,
    tolerance: usize,
) -> String {
    let token = fingerprint.token;
    let replace_first = || line.replacen(token.as_str(), new_token.as_str(), 1);

    let cells = split_cells(line);
    let cell = match cells.get(fingerprint.cell_index) {
        Some(cell) => *cell,
        None => return replace_first(),
    };

    let matches: Vec<TokenMatch> = scan_tokens(cell).collect();
    if matches.len() <= 1 {
        // Uniqueness guarantees a plain substring replace hits the right one
        return replace_first();
    }

    let target = matches.iter().find(|m| {
        let offset = byte_index_to_char_index(cell, m.start);
        m.token == token && offset.abs_diff(fingerprint.in_cell_offset) <= tolerance
    });

    match target {
        Some(m) => {
            // Reconstruct by exact offset so an earlier identical token in
            // the same cell is never hit by accident
            let patched_cell = format!(
                "{}{}{}",
                &cell[..m.start],
                new_token.as_str(),
                &cell[m.end..]
            );
            let rebuilt: Vec<&str> = cells
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    if i == fingerprint.cell_index {
                        patched_cell.as_str()
                    } else {
                        *c
                    }
                })
                .collect();
            rebuild_row(&rebuilt)
        }
        None => replace_first(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Application
// ─────────────────────────────────────────────────────────────────────────────

/// Apply a toggle payload to document text.
///
/// Returns the updated document, or `None` when nothing changed (no
/// confident target line, no token occurrence anywhere, or the replacement
/// was textually identical). Absence is a normal result, never an error.
pub fn apply_toggle(doc: &str, payload: &TogglePayload, settings: &Settings) -> Option<String> {
    let token = payload.token;
    let new_token = payload.new_token();

    if let Some(idx) = find_target_line(doc, &payload.fingerprint) {
        let mut lines: Vec<&str> = doc.split('\n').collect();
        let patched = patch_line(
            lines[idx],
            &payload.fingerprint,
            new_token,
            settings.in_cell_tolerance,
        );
        if patched == lines[idx] {
            return None;
        }
        lines[idx] = &patched;
        return Some(lines.join("\n"));
    }

    // Last resort: first occurrence anywhere in the document. May mis-target
    // in degenerate documents (duplicate rows without distinguishing words)
    // but always yields a valid document.
    if !doc.contains(token.as_str()) {
        return None;
    }
    debug!("no confident target line; falling back to whole-document replace");
    let updated = doc.replacen(token.as_str(), new_token.as_str(), 1);
    if updated == doc {
        None
    } else {
        Some(updated)
    }
}

/// The toggle dispatcher: re-read, re-localize, patch, write back.
///
/// Returns `Ok(true)` when a write happened. The read-patch-write sequence
/// is not atomic: the store holds a single shared mutable document and every
/// write is a full-content replace, so two dispatches whose reads interleave
/// follow last-writer-wins. That matches the host's guarantees; do not add
/// locking here.
pub fn handle_toggle(
    store: &dyn DocumentStore,
    path: &Path,
    payload: &TogglePayload,
    settings: &Settings,
) -> Result<bool> {
    let text = store.read(path)?;
    match apply_toggle(&text, payload, settings) {
        Some(updated) => {
            store.write(path, &updated)?;
            Ok(true)
        }
        None => {
            debug!("toggle for {} was a no-op", path.display());
            Ok(false)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::CheckboxToken;

    fn payload(row_text: &str, cell_index: usize, in_cell_offset: usize, token: &str, checked: bool) -> TogglePayload {
        let token = CheckboxToken::parse(token).unwrap();
        TogglePayload::from_click(
            Fingerprint::new(row_text, cell_index, in_cell_offset, token),
            checked,
        )
    }

    fn settings() -> Settings {
        Settings::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key Word Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_keywords_exclude_tokens_and_numbers() {
        let kws = keywords("Shopping | [x] Milk 2026 [ ] Bread");
        assert_eq!(kws, vec!["shopping", "milk", "bread"]);
    }

    #[test]
    fn test_keywords_drop_short_tokens() {
        let kws = keywords("do it | [x] ok go now");
        assert_eq!(kws, vec!["now"]);
    }

    #[test]
    fn test_score_substring_both_directions() {
        let kws = vec!["milk".to_string(), "documentation".to_string()];
        // Line token "milks" contains key word "milk"; key word
        // "documentation" contains line token "document"
        assert_eq!(score_line(&kws, "| Milks | document |"), 2);
        assert_eq!(score_line(&kws, "| Eggs | tests |"), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Target Line Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_relocalizes_after_line_reorder() {
        // Fingerprint built from the first row, document re-read with the
        // rows reversed: distinguishing key words must still win.
        let fp = Fingerprint::new(
            "Write documentation | [x] | High",
            1,
            0,
            CheckboxToken::CHECKED,
        );
        let doc = "| Write tests | [x] | High |\n| Write documentation | [x] | High |";
        assert_eq!(find_target_line(doc, &fp), Some(1));
    }

    #[test]
    fn test_tie_broken_by_earlier_line() {
        let fp = Fingerprint::new("Chores | [ ] sweep", 1, 0, CheckboxToken::UNCHECKED);
        let doc = "| Chores | [ ] sweep |\n| Chores | [ ] sweep |";
        assert_eq!(find_target_line(doc, &fp), Some(0));
    }

    #[test]
    fn test_candidate_needs_token_in_fingerprinted_cell() {
        let fp = Fingerprint::new("Chores | [ ] sweep | notes", 2, 0, CheckboxToken::UNCHECKED);
        // The token is in cell 1, not cell 2; the line scores but is discarded
        let doc = "| Chores | [ ] sweep | notes |";
        assert_eq!(find_target_line(doc, &fp), None);
    }

    #[test]
    fn test_no_candidates_when_token_absent() {
        let fp = Fingerprint::new("Chores | [ ] sweep", 1, 0, CheckboxToken::UNCHECKED);
        let doc = "| Chores | [x] sweep |"; // Already toggled elsewhere
        assert_eq!(find_target_line(doc, &fp), None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // In-Cell Disambiguation Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_second_of_three_checkboxes_toggled() {
        let doc = "| Shopping | [x] Milk [x] Bread [ ] Eggs |";
        // In-cell char offset of the Bread token is 9
        let payload = payload("Shopping | [x] Milk [x] Bread [ ] Eggs", 1, 9, "[x]", false);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "| Shopping | [x] Milk [ ] Bread [ ] Eggs |");
    }

    #[test]
    fn test_single_checkbox_replaced_on_line() {
        let doc = "# Todo\n| Chores | [ ] sweep |\n";
        let payload = payload("Chores | [ ] sweep", 1, 0, "[ ]", true);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "# Todo\n| Chores | [x] sweep |\n");
    }

    #[test]
    fn test_offset_drift_within_tolerance_still_matches() {
        let doc = "| Shopping | [x] Milk [x] Bread |";
        // Fingerprinted offset is off by two (render-time trim discrepancy)
        let payload = payload("Shopping | [x] Milk [x] Bread", 1, 11, "[x]", false);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "| Shopping | [x] Milk [ ] Bread |");
    }

    #[test]
    fn test_offset_outside_tolerance_falls_back_to_first() {
        let doc = "| Shopping | [x] Milk [x] Bread |";
        let payload = payload("Shopping | [x] Milk [x] Bread", 1, 20, "[x]", false);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        // No qualifying match: plain first-occurrence replace on the line
        assert_eq!(updated, "| Shopping | [ ] Milk [x] Bread |");
    }

    #[test]
    fn test_multi_match_requires_literal_equality() {
        // Both tokens sit near the fingerprinted offset but only the
        // uppercase one equals the original token
        let doc = "| A | [x] [X] go now |";
        let payload = payload("A | [x] [X] go now", 1, 4, "[X]", false);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "| A | [x] [ ] go now |");
    }

    #[test]
    fn test_rebuild_normalizes_whitespace_around_pipes() {
        // Taking the exact-offset repair path rebuilds the line in canonical
        // pipe-joined form; this is the documented side effect.
        let doc = "|Shopping|[x] Milk [x] Bread|";
        let payload = payload("Shopping | [x] Milk [x] Bread", 1, 9, "[x]", false);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "| Shopping | [x] Milk [ ] Bread |");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fallback and No-Op Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_global_fallback_when_no_line_survives() {
        // Row text shares no key words with the document, so no candidate
        // survives scoring; the first occurrence anywhere is patched.
        let doc = "notes\n| X | [ ] alpha |\n| Y | [ ] beta |";
        let payload = payload("completely different words", 1, 0, "[ ]", true);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "notes\n| X | [x] alpha |\n| Y | [ ] beta |");
    }

    #[test]
    fn test_noop_when_token_absent_everywhere() {
        let doc = "nothing to toggle here";
        let payload = payload("Chores | [ ] sweep", 1, 0, "[ ]", true);
        assert_eq!(apply_toggle(doc, &payload, &settings()), None);
    }

    #[test]
    fn test_noop_when_replacement_is_identical() {
        // Desired state equals the rendered state: the patch would not
        // change a byte, so no write should happen.
        let doc = "| Chores | [x] sweep |";
        let payload = payload("Chores | [x] sweep", 1, 0, "[x]", true);
        assert_eq!(apply_toggle(doc, &payload, &settings()), None);
    }

    #[test]
    fn test_round_trip_restores_document() {
        let original = "| Chores | [ ] sweep the floor |";
        let check = payload("Chores | [ ] sweep the floor", 1, 0, "[ ]", true);
        let checked_doc = apply_toggle(original, &check, &settings()).unwrap();

        let uncheck = payload("Chores | [x] sweep the floor", 1, 0, "[x]", false);
        let restored = apply_toggle(&checked_doc, &uncheck, &settings()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_unrelated_lines_untouched() {
        let doc = "# Header\n\n| A | [ ] one |\ntrailing prose [ ] not a table\n";
        let payload = payload("A | [ ] one", 1, 0, "[ ]", true);
        let updated = apply_toggle(doc, &payload, &settings()).unwrap();
        assert_eq!(updated, "# Header\n\n| A | [x] one |\ntrailing prose [ ] not a table\n");
    }
}
