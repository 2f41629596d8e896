//! Document storage access
//!
//! The host owns the documents; this module abstracts whole-file read and
//! write behind the `DocumentStore` trait and supplies the filesystem-backed
//! implementation plus the open-time cleanup hook.

use log::{debug, info};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::markdown::strip_stale_annotations;

// ─────────────────────────────────────────────────────────────────────────────
// Document Store
// ─────────────────────────────────────────────────────────────────────────────

/// Whole-file read and write access to documents.
///
/// Offers no compare-and-swap or locking: callers that read, patch, and
/// write back can lose a concurrent writer's changes in between. Toggle
/// dispatch accepts that window deliberately (see `preview::handle_toggle`).
pub trait DocumentStore {
    /// Read a document's full contents.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace a document's full contents.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Filesystem-backed document store.
#[derive(Debug, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        FsStore
    }
}

impl DocumentStore for FsStore {
    fn read(&self, path: &Path) -> Result<String> {
        debug!("Reading document: {}", path.display());
        fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        debug!("Writing document: {}", path.display());
        fs::write(path, contents).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Open-Time Cleanup
// ─────────────────────────────────────────────────────────────────────────────

/// Strip stale position annotations from a document when it is opened.
///
/// Earlier releases tracked checkbox positions by writing `{line}{offset}`
/// pairs into the document text itself; those leak into files edited by
/// other tools. Clean documents are left untouched (no write, no mtime
/// change). Returns whether the document was rewritten.
pub fn on_file_opened(store: &dyn DocumentStore, path: &Path) -> Result<bool> {
    let contents = store.read(path)?;

    match strip_stale_annotations(&contents) {
        Cow::Borrowed(_) => Ok(false),
        Cow::Owned(cleaned) => {
            info!("Removing stale annotations from {}", path.display());
            store.write(path, &cleaned)?;
            Ok(true)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
