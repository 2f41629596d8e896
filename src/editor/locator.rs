//! Live-structure locator
//!
//! Runs inside a position-addressable text buffer and computes, for the
//! visible region, the set of checkbox controls to overlay. Each control is
//! bound to the absolute byte range of its token, so toggling is a direct
//! single-character buffer mutation — no re-scan, no fingerprinting. The
//! host's change and viewport notifications drive full rebuilds; the control
//! set is never patched incrementally.

use log::debug;

use crate::editor::buffer::{StructureQuery, TextBuffer};
use crate::markdown::{scan_tokens, CheckboxToken};
use crate::string_utils::{floor_char_boundary, safe_slice};

// ─────────────────────────────────────────────────────────────────────────────
// Scan Mode
// ─────────────────────────────────────────────────────────────────────────────

/// How the buffer content should be scanned.
///
/// The live editing surface can present either a whole document or a
/// synthetically isolated cell fragment (the host surfaces a single cell for
/// focused editing). A plain text scan over a full document would match
/// checkbox-shaped text outside any table, so full documents are scanned per
/// structural table-row span instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// The buffer holds only a cell's content; scan the visible text directly.
    CellFragment,
    /// The buffer holds a document; scan only structural table-row spans.
    Document,
}

/// Decide the scan mode by cheap content inspection of the full buffer text.
///
/// Returns `None` when the buffer can contain no table checkbox at all.
pub fn detect_mode(text: &str) -> Option<ScanMode> {
    if text.contains('|') {
        Some(ScanMode::Document)
    } else if text.contains('[') {
        Some(ScanMode::CellFragment)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Checkbox Controls
// ─────────────────────────────────────────────────────────────────────────────

/// A replaceable inline control bound to one checkbox token.
///
/// Offsets are absolute byte offsets in the buffer; `end = start + 3` and
/// the state character lives at `start + 1`. Controls are ephemeral: any
/// document or viewport change invalidates the whole set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxControl {
    /// Absolute byte offset of the opening `[`
    pub start: usize,
    /// Absolute byte offset one past the closing `]`
    pub end: usize,
    /// Current checked state of the underlying token
    pub checked: bool,
}

/// Compute the control set for the buffer's current state.
///
/// Scans either the visible text (isolated-cell fragments) or each visible
/// table-row span (full documents) for checkbox tokens, skipping any token
/// the cursor is currently inside. The result is sorted by ascending start
/// offset; hosts register replaceable ranges in that order and treat a
/// violation as a hard error, so the ordering is an invariant here.
pub fn build_controls<B, S>(buffer: &B, structure: &S) -> Vec<CheckboxControl>
where
    B: TextBuffer,
    S: StructureQuery,
{
    let text = buffer.text();
    let mode = match detect_mode(text) {
        Some(mode) => mode,
        None => return Vec::new(),
    };

    let cursor = buffer.cursor();
    let mut controls = Vec::new();

    for range in buffer.visible_ranges() {
        match mode {
            ScanMode::CellFragment => {
                scan_region(text, range.from, range.to, cursor, &mut controls);
            }
            ScanMode::Document => {
                for row in structure.table_row_spans(range.from, range.to) {
                    scan_region(text, row.from, row.to, cursor, &mut controls);
                }
            }
        }
    }

    // Rows are visited per visible range, so overlapping viewports can yield
    // duplicates; sort globally and collapse them before registration.
    controls.sort_by_key(|c| c.start);
    controls.dedup();

    debug!("built {} checkbox controls ({:?})", controls.len(), mode);
    controls
}

/// Scan one region of the buffer, pushing a control per token match.
fn scan_region(
    text: &str,
    from: usize,
    to: usize,
    cursor: Option<usize>,
    controls: &mut Vec<CheckboxControl>,
) {
    // Viewport offsets come from the host's rendering geometry and can land
    // inside a multi-byte character; clamp to boundaries before slicing.
    let from = floor_char_boundary(text, from);
    let region = safe_slice(text, from, to);
    for m in scan_tokens(region) {
        let start = from + m.start;
        let end = from + m.end;

        // Never replace the token the user is typing inside. The exclusion
        // is strict on both ends: a cursor sitting on the brackets still
        // produces a control.
        if let Some(pos) = cursor {
            if pos > start && pos < end {
                continue;
            }
        }

        controls.push(CheckboxControl {
            start,
            end,
            checked: m.token.checked(),
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Side Effect
// ─────────────────────────────────────────────────────────────────────────────

/// Flip the token behind a control with a single-character replacement.
///
/// Replaces `[start+1, start+2)` with the opposite state character. The
/// buffer's change notification then triggers the next control-set rebuild;
/// this function never re-scans.
pub fn toggle_control<B: TextBuffer>(buffer: &mut B, control: &CheckboxControl) {
    let replacement = if control.checked {
        CheckboxToken::UNCHECKED
    } else {
        CheckboxToken::CHECKED
    };
    let state = replacement.state_char().to_string();
    buffer.replace_range(control.start + 1, control.start + 2, &state);
    debug!(
        "toggled checkbox at {} to {}",
        control.start,
        replacement.as_str()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
