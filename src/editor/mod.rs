//! Live structured-editing pipeline
//!
//! This side of the crate operates inside the host's live text buffer, where
//! exact byte offsets are available. It turns visible checkbox tokens into
//! replaceable controls and toggles them with single-character mutations.
//! The host is abstracted behind the `TextBuffer` and `StructureQuery`
//! capability traits.

mod buffer;
mod locator;

pub use buffer::{LineStructure, MemoryBuffer, Span, StructureQuery, TextBuffer};
pub use locator::{build_controls, detect_mode, toggle_control, CheckboxControl, ScanMode};
