//! Markdown domain model
//!
//! The plain-text conventions this crate reconciles against: the 3-character
//! checkbox token, pipe-delimited table rows, and the legacy annotation
//! format stripped on file open. Nothing here touches a host editor; these
//! are pure functions over text.

mod cleanup;
mod table;
mod token;

pub use cleanup::strip_stale_annotations;
pub use table::{is_delimiter_row, is_table_row, rebuild_row, split_cells};
pub use token::{scan_tokens, CheckboxToken, TokenMatch, TOKEN_LEN};
