//! Rendered-preview pipeline
//!
//! This side of the crate serves the static render, where source offsets no
//! longer exist. Rendering instruments table-cell checkboxes with context
//! fingerprints; a click delivers the fingerprint back as a typed payload,
//! and relocation re-finds the token in freshly re-read document text.

mod fingerprint;
mod relocate;
mod render;

pub use fingerprint::{normalize_whitespace, Fingerprint, TogglePayload};
pub use relocate::{apply_toggle, handle_toggle};
pub use render::{
    decode_entities, instrument_tables, render_document, render_instrumented, CONTROL_CLASS,
    PAYLOAD_ATTR,
};
