//! Persistence adapter
//!
//! The minimal byte-store surface the engine requires from its host.
//! Paths follow the workspace grammar: segments separated by `/`, the
//! root being the empty string, and no segment containing a separator.
//! Adapters may be backed by an origin-private browser store, a local
//! disk, or the in-memory fake used in tests; the engine works against
//! any of them.

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed error taxonomy at the storage boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("operation not supported by this store")]
    NotSupported,
    #[error("permission denied")]
    PermissionDenied,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("storage failure: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Wrap an arbitrary cause as an unknown storage failure
    pub fn unknown(cause: impl std::fmt::Display) -> Self {
        Self::Unknown(cause.to_string())
    }
}

/// One entry in a folder listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingEntry {
    File {
        name: String,
        path: String,
        size: u64,
    },
    Folder {
        name: String,
        path: String,
        entries: Vec<ListingEntry>,
    },
}

impl ListingEntry {
    pub fn name(&self) -> &str {
        match self {
            ListingEntry::File { name, .. } | ListingEntry::Folder { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ListingEntry::File { path, .. } | ListingEntry::Folder { path, .. } => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ListingEntry::Folder { .. })
    }
}

/// Snapshot of the store's root folder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderListing {
    pub entries: Vec<ListingEntry>,
}

/// Hidden/system entries filtered from listings: dotfiles plus the
/// database artefacts some hosts keep alongside user files
pub fn is_hidden_entry(name: &str) -> bool {
    name.starts_with('.')
        || name.starts_with("duckdb")
        || name.ends_with(".db")
        || name.ends_with(".db-journal")
        || name.ends_with(".db-wal")
}

/// Whether a name is usable as a single path segment
pub fn is_valid_entry_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/')
}

/// The byte-store surface the engine requires from the host
pub trait FileStore {
    /// Snapshot the whole tree, hidden entries filtered out
    fn list_root(&self) -> Result<FolderListing, StoreError>;

    fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    fn write_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Create an empty file under `parent`; returns the new path
    fn create_file(&mut self, parent: &str, name: &str) -> Result<String, StoreError>;

    /// Create a folder under `parent`; returns the new path
    fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, StoreError>;

    fn rename(
        &mut self,
        parent: &str,
        old_name: &str,
        new_name: &str,
        is_dir: bool,
    ) -> Result<(), StoreError>;

    /// Move an entry into another folder, keeping its name
    fn move_entry(
        &mut self,
        source_path: &str,
        target_folder: &str,
        is_dir: bool,
    ) -> Result<(), StoreError>;

    fn delete(&mut self, parent: &str, name: &str, is_dir: bool) -> Result<(), StoreError>;
}
