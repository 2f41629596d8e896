//! tickcell - Clickable checkboxes inside Markdown table cells
//!
//! Markdown task checkboxes stop working once they live inside a table cell,
//! so this crate makes the raw `[ ]` / `[x]` tokens themselves interactive.
//! It runs two independent pipelines matched to the two ways a note host
//! presents a document:
//!
//! - **Live editing** ([`editor`]): the host exposes a position-addressable
//!   text buffer, so visible tokens become controls bound to exact byte
//!   ranges and a toggle is a single-character mutation.
//! - **Static render** ([`preview`]): the render tree has no offsets back
//!   into source text, so each rendered control carries a context
//!   fingerprint and a click re-finds its token in freshly re-read document
//!   text by fuzzy matching.
//!
//! The [`markdown`] module holds the token and table primitives both
//! pipelines share; [`files`] and [`config`] cover document storage and
//! user settings.

pub mod config;
pub mod editor;
pub mod error;
pub mod files;
pub mod markdown;
pub mod preview;
pub mod string_utils;

pub use error::{Error, Result};
