//! File-tree manager: hierarchy, indices, selection, expansion, move
//!
//! The tree is stored as two path-keyed indices (`files`, `folders`)
//! plus per-folder child lists, so `file`/`folder`/`node` lookups are
//! O(1). Children keep insertion order; display ordering (folders
//! before files, case-insensitive by name) is applied when the visible
//! rows are produced.
//!
//! Every operation either fully succeeds or leaves the tree untouched
//! and returns `false`/`None`; nothing here panics on bad input.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::geometry::TreeDropPosition;
use crate::ident;

use super::node::{
    is_descendant_path, join_path, parent_path, path_depth, FileNode, FolderNode, NodeRef,
    VisibleRow,
};

/// Derive a reproducible node id from a path
fn node_id(path: &str) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    ident::seeded(hasher.finish(), ident::DEFAULT_ID_LEN)
}

/// The complete file tree with selection and expansion state
#[derive(Debug, Clone)]
pub struct FileTree {
    folders: HashMap<String, FolderNode>,
    files: HashMap<String, FileNode>,

    selected: HashSet<String>,
    anchor: Option<String>,
    last_selected: Option<String>,
    /// Whether the last selection change was additive
    is_add_mode: bool,

    expanded: HashSet<String>,
    focused: Option<String>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    /// Create a tree holding only the (expanded) root folder
    pub fn new() -> Self {
        let root = FolderNode {
            id: node_id(""),
            name: String::new(),
            path: String::new(),
            depth: 0,
            children: Vec::new(),
        };

        let mut folders = HashMap::new();
        folders.insert(String::new(), root);

        let mut expanded = HashSet::new();
        expanded.insert(String::new());

        Self {
            folders,
            files: HashMap::new(),
            selected: HashSet::new(),
            anchor: None,
            last_selected: None,
            is_add_mode: false,
            expanded,
            focused: None,
        }
    }

    /// Build a tree from a store listing, keeping the listing's order
    /// as insertion order. File metadata records the listed size.
    pub fn from_listing(listing: &crate::storage::FolderListing) -> Self {
        let mut tree = Self::new();
        for entry in &listing.entries {
            tree.insert_listing_entry("", entry);
        }
        tree
    }

    fn insert_listing_entry(&mut self, parent: &str, entry: &crate::storage::ListingEntry) {
        use crate::storage::ListingEntry;
        match entry {
            ListingEntry::File { name, size, .. } => {
                self.add_file(parent, name, serde_json::json!({ "size": size }));
            }
            ListingEntry::Folder { name, entries, .. } => {
                if let Some(path) = self.add_folder(parent, name) {
                    for child in entries {
                        self.insert_listing_entry(&path, child);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// The root folder
    pub fn root(&self) -> &FolderNode {
        self.folders.get("").expect("root folder always exists")
    }

    /// O(1) file lookup by path
    pub fn file(&self, path: &str) -> Option<&FileNode> {
        self.files.get(path)
    }

    /// O(1) folder lookup by path
    pub fn folder(&self, path: &str) -> Option<&FolderNode> {
        self.folders.get(path)
    }

    /// O(1) lookup of either variant
    pub fn node(&self, path: &str) -> Option<NodeRef<'_>> {
        if let Some(folder) = self.folders.get(path) {
            return Some(NodeRef::Folder(folder));
        }
        self.files.get(path).map(NodeRef::File)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.folders.contains_key(path) || self.files.contains_key(path)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    // ========================================================================
    // Add / Remove
    // ========================================================================

    /// Whether `name` collides with a sibling under `parent`, ignoring
    /// the node at `except` (used when renaming/moving a node onto its
    /// own position). Returns a displayable error string on collision.
    pub fn check_duplicate_name(
        &self,
        parent: &str,
        name: &str,
        except: Option<&str>,
    ) -> Option<String> {
        let folder = self.folders.get(parent)?;
        let lowered = name.to_lowercase();
        for child_path in &folder.children {
            if Some(child_path.as_str()) == except {
                continue;
            }
            if let Some(node) = self.node(child_path) {
                if node.name().to_lowercase() == lowered {
                    return Some(format!(
                        "A file or folder named \"{}\" already exists here",
                        name
                    ));
                }
            }
        }
        None
    }

    fn valid_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(super::node::PATH_SEPARATOR)
    }

    /// Add a file under `parent`. Returns the new path, or `None` when
    /// the parent is missing, the name is invalid, or a sibling already
    /// carries it.
    pub fn add_file(
        &mut self,
        parent: &str,
        name: &str,
        data: serde_json::Value,
    ) -> Option<String> {
        if !Self::valid_name(name)
            || !self.folders.contains_key(parent)
            || self.check_duplicate_name(parent, name, None).is_some()
        {
            return None;
        }

        let path = join_path(parent, name);
        let node = FileNode {
            id: node_id(&path),
            name: name.to_string(),
            path: path.clone(),
            depth: path_depth(&path),
            data,
        };
        self.files.insert(path.clone(), node);
        self.folders
            .get_mut(parent)
            .expect("parent checked above")
            .children
            .push(path.clone());
        Some(path)
    }

    /// Add a folder under `parent`. Same failure modes as [`add_file`].
    ///
    /// [`add_file`]: FileTree::add_file
    pub fn add_folder(&mut self, parent: &str, name: &str) -> Option<String> {
        if !Self::valid_name(name)
            || !self.folders.contains_key(parent)
            || self.check_duplicate_name(parent, name, None).is_some()
        {
            return None;
        }

        let path = join_path(parent, name);
        let node = FolderNode {
            id: node_id(&path),
            name: name.to_string(),
            path: path.clone(),
            depth: path_depth(&path),
            children: Vec::new(),
        };
        self.folders.insert(path.clone(), node);
        self.folders
            .get_mut(parent)
            .expect("parent checked above")
            .children
            .push(path.clone());
        Some(path)
    }

    /// Collect `path` and every descendant path, depth-first
    fn subtree_paths(&self, path: &str) -> Vec<String> {
        let mut out = vec![path.to_string()];
        let mut stack = vec![path.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(folder) = self.folders.get(&current) {
                for child in &folder.children {
                    out.push(child.clone());
                    stack.push(child.clone());
                }
            }
        }
        out
    }

    /// Remove a node and its descendants. The root cannot be removed.
    pub fn remove(&mut self, path: &str) -> bool {
        if path.is_empty() || !self.contains(path) {
            return false;
        }

        let parent = parent_path(path)
            .map(str::to_string)
            .expect("non-root path has a parent");
        let removed = self.subtree_paths(path);

        if let Some(folder) = self.folders.get_mut(&parent) {
            folder.children.retain(|c| c != path);
        }
        for p in &removed {
            self.folders.remove(p);
            self.files.remove(p);
            self.selected.remove(p);
            self.expanded.remove(p);
        }
        self.evict_cursor_refs(&removed);

        debug!(path, count = removed.len(), "removed file-tree subtree");
        true
    }

    fn evict_cursor_refs(&mut self, removed: &[String]) {
        let gone = |p: &Option<String>| p.as_deref().map_or(false, |p| removed.iter().any(|r| r == p));
        if gone(&self.anchor) {
            self.anchor = None;
        }
        if gone(&self.last_selected) {
            self.last_selected = None;
        }
        if gone(&self.focused) {
            self.focused = None;
        }
    }

    // ========================================================================
    // Move
    // ========================================================================

    /// Move `source` relative to `target`.
    ///
    /// Fails (leaving the tree untouched) when either node is missing,
    /// source and target coincide, the target descends from the source,
    /// `Inside` is requested on a file, or the destination already has a
    /// sibling with the source's name.
    pub fn move_node(&mut self, source: &str, target: &str, position: TreeDropPosition) -> bool {
        if source.is_empty() || source == target {
            return false;
        }
        let Some(source_node) = self.node(source) else {
            return false;
        };
        let source_name = source_node.name().to_string();
        if self.node(target).is_none() {
            return false;
        }
        if is_descendant_path(target, source) {
            debug!(source, target, "rejected file-tree move: cycle");
            return false;
        }

        // Resolve the destination parent
        let new_parent = match position {
            TreeDropPosition::Inside => {
                if !self.folders.contains_key(target) {
                    return false;
                }
                target.to_string()
            }
            TreeDropPosition::Before | TreeDropPosition::After => {
                match parent_path(target) {
                    Some(parent) => parent.to_string(),
                    // The root cannot have siblings
                    None => return false,
                }
            }
        };

        if self
            .check_duplicate_name(&new_parent, &source_name, Some(source))
            .is_some()
        {
            debug!(source, target, "rejected file-tree move: duplicate name");
            return false;
        }

        let old_parent = parent_path(source)
            .map(str::to_string)
            .expect("non-root path has a parent");

        // Detach from the old parent, then find where to splice in
        if let Some(folder) = self.folders.get_mut(&old_parent) {
            folder.children.retain(|c| c != source);
        }

        let new_path = join_path(&new_parent, &source_name);
        {
            let parent_folder = self
                .folders
                .get_mut(&new_parent)
                .expect("destination parent checked above");
            let index = match position {
                TreeDropPosition::Inside => parent_folder.children.len(),
                TreeDropPosition::Before | TreeDropPosition::After => {
                    let target_index = parent_folder
                        .children
                        .iter()
                        .position(|c| c == target)
                        .unwrap_or(parent_folder.children.len());
                    match position {
                        TreeDropPosition::Before => target_index,
                        _ => (target_index + 1).min(parent_folder.children.len()),
                    }
                }
            };
            parent_folder.children.insert(index, new_path.clone());
        }

        self.rekey_subtree(source, &new_path);
        debug!(source, %new_path, "moved file-tree node");
        true
    }

    /// Rewrite the path and depth of a subtree after a move, rebuilding
    /// index entries and remapping selection/expansion/focus state.
    fn rekey_subtree(&mut self, old_base: &str, new_base: &str) {
        if old_base == new_base {
            return;
        }

        let rewrite = |path: &str| -> String {
            if path == old_base {
                new_base.to_string()
            } else {
                debug_assert!(is_descendant_path(path, old_base));
                format!("{}{}", new_base, &path[old_base.len()..])
            }
        };

        for old in self.subtree_paths(old_base) {
            let new = rewrite(&old);
            if let Some(mut folder) = self.folders.remove(&old) {
                folder.path = new.clone();
                folder.depth = path_depth(&new);
                folder.children = folder.children.iter().map(|c| rewrite(c)).collect();
                self.folders.insert(new.clone(), folder);
            } else if let Some(mut file) = self.files.remove(&old) {
                file.path = new.clone();
                file.depth = path_depth(&new);
                self.files.insert(new.clone(), file);
            }

            if self.selected.remove(&old) {
                self.selected.insert(new.clone());
            }
            if self.expanded.remove(&old) {
                self.expanded.insert(new.clone());
            }
            let remap = |slot: &mut Option<String>| {
                if slot.as_deref() == Some(old.as_str()) {
                    *slot = Some(new.clone());
                }
            };
            remap(&mut self.anchor);
            remap(&mut self.last_selected);
            remap(&mut self.focused);
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Paths currently selected
    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    /// Whether the last selection change was additive
    pub fn is_add_mode(&self) -> bool {
        self.is_add_mode
    }

    /// Replace the selection with a single path and anchor there
    pub fn select(&mut self, path: &str) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(path.to_string());
        self.anchor = Some(path.to_string());
        self.last_selected = Some(path.to_string());
        self.is_add_mode = false;
        true
    }

    /// Flip a path's membership in the selection and anchor there
    pub fn toggle_selection(&mut self, path: &str) -> bool {
        if !self.contains(path) {
            return false;
        }
        if !self.selected.remove(path) {
            self.selected.insert(path.to_string());
        }
        self.anchor = Some(path.to_string());
        self.last_selected = Some(path.to_string());
        self.is_add_mode = true;
        true
    }

    /// Select the contiguous run of visible rows between the anchor and
    /// `path`, inclusive. Without a usable anchor this degrades to a
    /// plain [`select`].
    ///
    /// [`select`]: FileTree::select
    pub fn select_range(&mut self, path: &str, add_to_existing: bool) -> bool {
        if !self.contains(path) {
            return false;
        }
        let rows = self.visible_nodes();
        let target_index = rows.iter().position(|r| r.path == path);
        let anchor_index = self
            .anchor
            .as_deref()
            .and_then(|anchor| rows.iter().position(|r| r.path == anchor));

        let (Some(target_index), Some(anchor_index)) = (target_index, anchor_index) else {
            return self.select(path);
        };

        if !add_to_existing {
            self.selected.clear();
        }
        let (lo, hi) = if anchor_index <= target_index {
            (anchor_index, target_index)
        } else {
            (target_index, anchor_index)
        };
        for row in &rows[lo..=hi] {
            self.selected.insert(row.path.clone());
        }
        self.last_selected = Some(path.to_string());
        self.is_add_mode = add_to_existing;
        true
    }

    /// Drop the whole selection and its anchors
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.last_selected = None;
        self.is_add_mode = false;
    }

    // ========================================================================
    // Expansion & Focus
    // ========================================================================

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn toggle_expanded(&mut self, path: &str) -> bool {
        if !self.folders.contains_key(path) {
            return false;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
        true
    }

    pub fn expand(&mut self, path: &str) -> bool {
        if !self.folders.contains_key(path) {
            return false;
        }
        self.expanded.insert(path.to_string());
        true
    }

    pub fn collapse(&mut self, path: &str) -> bool {
        if !self.folders.contains_key(path) {
            return false;
        }
        self.expanded.remove(path);
        true
    }

    /// Expand every folder in the tree
    pub fn expand_all(&mut self) {
        self.expanded = self.folders.keys().cloned().collect();
    }

    /// Collapse everything except the root
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.expanded.insert(String::new());
    }

    /// Expand every folder that is a sibling of `path` (the node itself
    /// included when it is a folder)
    pub fn expand_siblings(&mut self, path: &str) -> bool {
        let Some(parent) = parent_path(path).map(str::to_string) else {
            return false;
        };
        if !self.contains(path) {
            return false;
        }
        let siblings: Vec<String> = self
            .folders
            .get(&parent)
            .map(|f| f.children.clone())
            .unwrap_or_default();
        for sibling in siblings {
            if self.folders.contains_key(&sibling) {
                self.expanded.insert(sibling);
            }
        }
        true
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn focus(&mut self, path: &str) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.focused = Some(path.to_string());
        true
    }

    // ========================================================================
    // Visible rows
    // ========================================================================

    /// The ordered sequence of rows the UI displays: a depth-first walk
    /// from the root that descends into expanded folders only. Folders
    /// sort before files, both case-insensitively by name.
    pub fn visible_nodes(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let root = self.root();
        rows.push(VisibleRow {
            id: root.id.clone(),
            path: root.path.clone(),
            name: root.name.clone(),
            depth: root.depth,
            is_folder: true,
        });
        if self.is_expanded("") {
            self.push_visible_children(root, &mut rows);
        }
        rows
    }

    fn push_visible_children(&self, folder: &FolderNode, rows: &mut Vec<VisibleRow>) {
        let mut ordered: Vec<NodeRef<'_>> = folder
            .children
            .iter()
            .filter_map(|path| self.node(path))
            .collect();
        ordered.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        });

        for node in ordered {
            rows.push(VisibleRow {
                id: node.id().to_string(),
                path: node.path().to_string(),
                name: node.name().to_string(),
                depth: node.depth(),
                is_folder: node.is_folder(),
            });
            if let NodeRef::Folder(child) = node {
                if self.is_expanded(&child.path) {
                    self.push_visible_children(child, rows);
                }
            }
        }
    }

    // ========================================================================
    // Consistency checking (used by tests)
    // ========================================================================

    /// Walk the tree and verify that the indices exactly cover it and
    /// all auxiliary state references existing nodes. Returns a list of
    /// violations; empty means consistent.
    pub fn check_consistency(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut reachable = HashSet::new();

        let mut stack = vec![String::new()];
        while let Some(path) = stack.pop() {
            if !reachable.insert(path.clone()) {
                problems.push(format!("path {:?} reachable twice", path));
                continue;
            }
            match self.node(&path) {
                None => problems.push(format!("child {:?} missing from indices", path)),
                Some(node) => {
                    if node.path() != path {
                        problems.push(format!(
                            "node at key {:?} carries path {:?}",
                            path,
                            node.path()
                        ));
                    }
                    if node.depth() != path_depth(&path) {
                        problems.push(format!("node {:?} has wrong depth {}", path, node.depth()));
                    }
                    if let NodeRef::Folder(folder) = node {
                        for child in &folder.children {
                            if parent_path(child) != Some(path.as_str()) {
                                problems
                                    .push(format!("child {:?} not under parent {:?}", child, path));
                            }
                            stack.push(child.clone());
                        }
                    }
                }
            }
        }

        for path in self.folders.keys().chain(self.files.keys()) {
            if !reachable.contains(path) {
                problems.push(format!("index entry {:?} unreachable from root", path));
            }
        }
        for path in &self.selected {
            if !self.contains(path) {
                problems.push(format!("selected path {:?} does not exist", path));
            }
        }
        for slot in [&self.anchor, &self.last_selected, &self.focused] {
            if let Some(path) = slot {
                if !self.contains(path) {
                    problems.push(format!("cursor ref {:?} does not exist", path));
                }
            }
        }
        problems
    }
}
