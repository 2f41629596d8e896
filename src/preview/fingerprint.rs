//! Context fingerprints for rendered checkboxes
//!
//! The static render has no offset mapping back to source text, so each
//! rendered control carries a fingerprint of its context instead: the owning
//! row's full text, the owning cell's index, the token's character offset
//! within that cell, and the token literal itself. Fingerprints are rebuilt
//! fresh on every render pass, embedded verbatim in the control markup, and
//! consumed exactly once at click time — they have no independent lifecycle.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markdown::CheckboxToken;

// ─────────────────────────────────────────────────────────────────────────────
// Fingerprint
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to re-find one checkbox in re-read document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    /// Whitespace-normalized full text of the owning table row
    pub row_text: String,
    /// Zero-based index of the owning cell among the row's non-empty cells
    pub cell_index: usize,
    /// Character offset of the token within the owning cell's text
    pub in_cell_offset: usize,
    /// The token as rendered
    pub token: CheckboxToken,
}

impl Fingerprint {
    /// Build a fingerprint, normalizing the row text's whitespace.
    pub fn new(
        row_text: &str,
        cell_index: usize,
        in_cell_offset: usize,
        token: CheckboxToken,
    ) -> Self {
        Fingerprint {
            row_text: normalize_whitespace(row_text),
            cell_index,
            in_cell_offset,
            token,
        }
    }

    /// Serialize for embedding in a rendered control's payload attribute.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a payload string back into a fingerprint.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Payload
// ─────────────────────────────────────────────────────────────────────────────

/// The typed message a control activation delivers to the toggle dispatcher.
///
/// `checked` is the state the control shows after the click, i.e. the state
/// the document should be patched to. The original token and fingerprint
/// identify which occurrence to patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglePayload {
    /// Desired state after the toggle
    pub checked: bool,
    /// The token exactly as it was rendered
    pub token: CheckboxToken,
    /// Render-time context of the clicked checkbox
    pub fingerprint: Fingerprint,
}

impl TogglePayload {
    /// Build the payload for a click on a control carrying `fingerprint`.
    ///
    /// The fingerprint already holds the original token; `checked` is the
    /// control's post-click state.
    pub fn from_click(fingerprint: Fingerprint, checked: bool) -> Self {
        TogglePayload {
            checked,
            token: fingerprint.token,
            fingerprint,
        }
    }

    /// The replacement token text implied by the desired state.
    pub fn new_token(&self) -> CheckboxToken {
        if self.checked {
            CheckboxToken::CHECKED
        } else {
            CheckboxToken::UNCHECKED
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
