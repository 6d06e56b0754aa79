//! In-memory file store for tests and headless hosts
//!
//! A flat map of paths to bytes plus a set of folder paths. Nothing
//! persists; the store exists so the engine can be exercised without a
//! real filesystem.

use std::collections::{BTreeMap, BTreeSet};

use crate::tree::{is_descendant_path, join_path, parent_path};

use super::{
    is_hidden_entry, is_valid_entry_name, FileStore, FolderListing, ListingEntry, StoreError,
};

/// HashMap-backed store with no persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Vec<u8>>,
    folders: BTreeSet<String>,
}

impl MemoryStore {
    /// Create an empty store holding only the root folder
    pub fn new() -> Self {
        let mut folders = BTreeSet::new();
        folders.insert(String::new());
        Self {
            files: BTreeMap::new(),
            folders,
        }
    }

    fn require_folder(&self, path: &str) -> Result<(), StoreError> {
        if self.folders.contains(path) {
            Ok(())
        } else {
            Err(StoreError::NotFound(path.to_string()))
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.folders.contains(path)
    }

    fn children_of(&self, folder: &str) -> Vec<String> {
        let mut out = Vec::new();
        for path in self.folders.iter().map(String::as_str).chain(self.files.keys().map(String::as_str)) {
            if !path.is_empty() && parent_path(path) == Some(folder) {
                out.push(path.to_string());
            }
        }
        out
    }

    fn entry_name(path: &str) -> &str {
        match path.rfind('/') {
            Some(idx) => &path[idx + 1..],
            None => path,
        }
    }

    fn build_listing(&self, folder: &str) -> Vec<ListingEntry> {
        let mut entries = Vec::new();
        for child in self.children_of(folder) {
            let name = Self::entry_name(&child).to_string();
            if is_hidden_entry(&name) {
                continue;
            }
            if self.folders.contains(&child) {
                entries.push(ListingEntry::Folder {
                    name,
                    entries: self.build_listing(&child),
                    path: child,
                });
            } else if let Some(bytes) = self.files.get(&child) {
                entries.push(ListingEntry::File {
                    name,
                    size: bytes.len() as u64,
                    path: child,
                });
            }
        }
        entries
    }

    /// Move a single path key between prefixes, folders and files alike
    fn rekey(&mut self, old: &str, new: &str, is_dir: bool) {
        if is_dir {
            let moved_folders: Vec<String> = self
                .folders
                .iter()
                .filter(|p| p.as_str() == old || is_descendant_path(p, old))
                .cloned()
                .collect();
            for path in moved_folders {
                self.folders.remove(&path);
                self.folders
                    .insert(format!("{}{}", new, &path[old.len()..]));
            }
            let moved_files: Vec<String> = self
                .files
                .keys()
                .filter(|p| is_descendant_path(p, old))
                .cloned()
                .collect();
            for path in moved_files {
                if let Some(bytes) = self.files.remove(&path) {
                    self.files
                        .insert(format!("{}{}", new, &path[old.len()..]), bytes);
                }
            }
        } else if let Some(bytes) = self.files.remove(old) {
            self.files.insert(new.to_string(), bytes);
        }
    }
}

impl FileStore for MemoryStore {
    fn list_root(&self) -> Result<FolderListing, StoreError> {
        Ok(FolderListing {
            entries: self.build_listing(""),
        })
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn write_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if !self.files.contains_key(path) {
            // Writes create the file, but only under an existing folder
            let parent = parent_path(path).unwrap_or("");
            self.require_folder(parent)?;
        }
        self.files.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn create_file(&mut self, parent: &str, name: &str) -> Result<String, StoreError> {
        if !is_valid_entry_name(name) {
            return Err(StoreError::unknown(format!("invalid name {:?}", name)));
        }
        self.require_folder(parent)?;
        let path = join_path(parent, name);
        if self.exists(&path) {
            return Err(StoreError::AlreadyExists(path));
        }
        self.files.insert(path.clone(), Vec::new());
        Ok(path)
    }

    fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, StoreError> {
        if !is_valid_entry_name(name) {
            return Err(StoreError::unknown(format!("invalid name {:?}", name)));
        }
        self.require_folder(parent)?;
        let path = join_path(parent, name);
        if self.exists(&path) {
            return Err(StoreError::AlreadyExists(path));
        }
        self.folders.insert(path.clone());
        Ok(path)
    }

    fn rename(
        &mut self,
        parent: &str,
        old_name: &str,
        new_name: &str,
        is_dir: bool,
    ) -> Result<(), StoreError> {
        if !is_valid_entry_name(new_name) {
            return Err(StoreError::unknown(format!("invalid name {:?}", new_name)));
        }
        self.require_folder(parent)?;
        let old = join_path(parent, old_name);
        let new = join_path(parent, new_name);
        if !self.exists(&old) {
            return Err(StoreError::NotFound(old));
        }
        if self.exists(&new) {
            return Err(StoreError::AlreadyExists(new));
        }
        self.rekey(&old, &new, is_dir);
        Ok(())
    }

    fn move_entry(
        &mut self,
        source_path: &str,
        target_folder: &str,
        is_dir: bool,
    ) -> Result<(), StoreError> {
        self.require_folder(target_folder)?;
        if !self.exists(source_path) {
            return Err(StoreError::NotFound(source_path.to_string()));
        }
        if is_dir
            && (source_path == target_folder || is_descendant_path(target_folder, source_path))
        {
            return Err(StoreError::unknown("cannot move a folder into itself"));
        }
        let new_path = join_path(target_folder, Self::entry_name(source_path));
        if new_path == source_path {
            return Ok(());
        }
        if self.exists(&new_path) {
            return Err(StoreError::AlreadyExists(new_path));
        }
        self.rekey(source_path, &new_path, is_dir);
        Ok(())
    }

    fn delete(&mut self, parent: &str, name: &str, is_dir: bool) -> Result<(), StoreError> {
        self.require_folder(parent)?;
        let path = join_path(parent, name);
        if is_dir {
            if !self.folders.remove(&path) {
                return Err(StoreError::NotFound(path));
            }
            self.folders.retain(|p| !is_descendant_path(p, &path));
            self.files.retain(|p, _| !is_descendant_path(p, &path));
        } else if self.files.remove(&path).is_none() {
            return Err(StoreError::NotFound(path));
        }
        Ok(())
    }
}
