//! File-tree node types and path arithmetic
//!
//! Paths use `/` as separator; the root folder's path is the empty
//! string. A node's depth equals the number of separators in its path
//! plus one, with the root at depth zero.

use serde::{Deserialize, Serialize};

/// Path separator for tree paths
pub const PATH_SEPARATOR: char = '/';

/// Join a parent path and a child name
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, name)
    }
}

/// Parent of a path: `a/b/c` -> `a/b`, `a` -> `` (root). The root
/// itself has no parent.
pub fn parent_path(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(match path.rfind(PATH_SEPARATOR) {
        Some(idx) => &path[..idx],
        None => "",
    })
}

/// Depth of a path: separators plus one for non-root, zero for the root
pub fn path_depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches(PATH_SEPARATOR).count() + 1
    }
}

/// Whether `candidate` lives inside the subtree rooted at `ancestor`
pub fn is_descendant_path(candidate: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return !candidate.is_empty();
    }
    candidate.len() > ancestor.len()
        && candidate.starts_with(ancestor)
        && candidate.as_bytes()[ancestor.len()] == PATH_SEPARATOR as u8
}

/// A file leaf in the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub path: String,
    pub depth: usize,
    /// Opaque host metadata (size, handle info, ...); the manager never
    /// inspects it
    pub data: serde_json::Value,
}

/// A folder in the tree. Children are stored by path, in insertion
/// order; display ordering is applied at visibility time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub children: Vec<String>,
}

/// Borrowed view of either node variant
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    File(&'a FileNode),
    Folder(&'a FolderNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &str {
        match self {
            NodeRef::File(f) => &f.id,
            NodeRef::Folder(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeRef::File(f) => &f.name,
            NodeRef::Folder(f) => &f.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            NodeRef::File(f) => &f.path,
            NodeRef::Folder(f) => &f.path,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            NodeRef::File(f) => f.depth,
            NodeRef::Folder(f) => f.depth,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeRef::Folder(_))
    }
}

/// One row of the rendered tree, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRow {
    pub id: String,
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_folder: bool,
}
