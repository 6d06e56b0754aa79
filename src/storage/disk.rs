//! Disk-backed file store
//!
//! Maps workspace paths onto a root directory on the local filesystem.
//! I/O errors are folded into the closed [`StoreError`] taxonomy; the
//! listing applies the same hidden-entry filter as every other store.
//!
//! [`StoreError`]: super::StoreError

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tree::join_path;

use super::{
    is_hidden_entry, is_valid_entry_name, FileStore, FolderListing, ListingEntry, StoreError,
};

/// Store rooted at a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Open a store over `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| map_io_error(e, &root.display().to_string()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a workspace path under the root, rejecting traversal
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        if path.split('/').any(|segment| segment == "..") {
            return Err(StoreError::PermissionDenied);
        }
        if path.is_empty() {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(path))
    }

    fn list_dir(&self, dir: &Path, prefix: &str) -> Result<Vec<ListingEntry>, StoreError> {
        let mut entries = Vec::new();
        let read = fs::read_dir(dir).map_err(|e| map_io_error(e, prefix))?;
        for entry in read {
            let entry = entry.map_err(|e| map_io_error(e, prefix))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if is_hidden_entry(&name) {
                continue;
            }
            let path = join_path(prefix, &name);
            let file_type = entry.file_type().map_err(|e| map_io_error(e, &path))?;
            if file_type.is_dir() {
                entries.push(ListingEntry::Folder {
                    name,
                    entries: self.list_dir(&entry.path(), &path)?,
                    path,
                });
            } else if file_type.is_file() {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                entries.push(ListingEntry::File { name, path, size });
            }
        }
        entries.sort_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()));
        Ok(entries)
    }
}

fn map_io_error(error: io::Error, path: &str) -> StoreError {
    match error.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => StoreError::PermissionDenied,
        io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
        _ => StoreError::unknown(error),
    }
}

impl FileStore for DiskStore {
    fn list_root(&self) -> Result<FolderListing, StoreError> {
        Ok(FolderListing {
            entries: self.list_dir(&self.root, "")?,
        })
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let full = self.resolve(path)?;
        fs::read(&full).map_err(|e| map_io_error(e, path))
    }

    fn write_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        fs::write(&full, bytes).map_err(|e| map_io_error(e, path))
    }

    fn create_file(&mut self, parent: &str, name: &str) -> Result<String, StoreError> {
        if !is_valid_entry_name(name) {
            return Err(StoreError::unknown(format!("invalid name {:?}", name)));
        }
        let path = join_path(parent, name);
        let full = self.resolve(&path)?;
        if full.exists() {
            return Err(StoreError::AlreadyExists(path));
        }
        fs::write(&full, []).map_err(|e| map_io_error(e, &path))?;
        Ok(path)
    }

    fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, StoreError> {
        if !is_valid_entry_name(name) {
            return Err(StoreError::unknown(format!("invalid name {:?}", name)));
        }
        let path = join_path(parent, name);
        let full = self.resolve(&path)?;
        if full.exists() {
            return Err(StoreError::AlreadyExists(path));
        }
        fs::create_dir(&full).map_err(|e| map_io_error(e, &path))?;
        Ok(path)
    }

    fn rename(
        &mut self,
        parent: &str,
        old_name: &str,
        new_name: &str,
        _is_dir: bool,
    ) -> Result<(), StoreError> {
        if !is_valid_entry_name(new_name) {
            return Err(StoreError::unknown(format!("invalid name {:?}", new_name)));
        }
        let old_path = join_path(parent, old_name);
        let new_path = join_path(parent, new_name);
        let old_full = self.resolve(&old_path)?;
        let new_full = self.resolve(&new_path)?;
        if !old_full.exists() {
            return Err(StoreError::NotFound(old_path));
        }
        if new_full.exists() {
            return Err(StoreError::AlreadyExists(new_path));
        }
        fs::rename(&old_full, &new_full).map_err(|e| map_io_error(e, &old_path))
    }

    fn move_entry(
        &mut self,
        source_path: &str,
        target_folder: &str,
        _is_dir: bool,
    ) -> Result<(), StoreError> {
        let source_full = self.resolve(source_path)?;
        if !source_full.exists() {
            return Err(StoreError::NotFound(source_path.to_string()));
        }
        let name = source_full
            .file_name()
            .ok_or(StoreError::PermissionDenied)?
            .to_string_lossy()
            .to_string();
        let new_path = join_path(target_folder, &name);
        let new_full = self.resolve(&new_path)?;
        if new_full.exists() {
            return Err(StoreError::AlreadyExists(new_path));
        }
        fs::rename(&source_full, &new_full).map_err(|e| map_io_error(e, source_path))
    }

    fn delete(&mut self, parent: &str, name: &str, is_dir: bool) -> Result<(), StoreError> {
        let path = join_path(parent, name);
        let full = self.resolve(&path)?;
        let result = if is_dir {
            fs::remove_dir_all(&full)
        } else {
            fs::remove_file(&full)
        };
        result.map_err(|e| map_io_error(e, &path))
    }
}
