//! File operations module for tickcell
//!
//! This module provides whole-file document storage access and the
//! open-time annotation cleanup hook.

mod store;

pub use store::{on_file_opened, DocumentStore, FsStore};
