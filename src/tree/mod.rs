//! File-tree manager: folder/file hierarchy with O(1) path lookup,
//! multi-selection, expansion, focus, and cycle-safe moves

mod manager;
mod node;

pub use manager::FileTree;
pub use node::{
    is_descendant_path, join_path, parent_path, path_depth, FileNode, FolderNode, NodeRef,
    VisibleRow, PATH_SEPARATOR,
};
