//! Dock-tree manager
//!
//! Owns the dock state and applies every mutation: add, remove, move,
//! resize, activate, maximize, edit. All operations are total: a failed
//! precondition returns `false`/`None` and leaves the state untouched;
//! successful mutations publish events through the bus, granular events
//! first and `layoutChanged` last.
//!
//! Structural operations rebuild the affected subtree functionally and
//! commit only on success, so observers never see a partially
//! normalised tree.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::WorkspaceConfig;
use crate::geometry::DropPosition;
use crate::ident;

use super::events::{DockEvent, EventBus, Subscription};
use super::node::{DockNode, DockState, Panel, Split, SplitDirection, TabGroup};

// ============================================================================
// Tree surgery helpers
// ============================================================================

/// Remove the panel with `id` from the tree, collapsing whatever its
/// absence degenerates: a split loses a side, a two-tab group becomes a
/// bare panel. Returns the remaining tree (None when it vanished
/// entirely) and the detached panel (None when `id` names no panel).
fn detach_panel(node: DockNode, id: &str) -> (Option<DockNode>, Option<Panel>) {
    match node {
        DockNode::Panel(panel) => {
            if panel.id == id {
                (None, Some(panel))
            } else {
                (Some(DockNode::Panel(panel)), None)
            }
        }
        DockNode::Split(split) => {
            let Split {
                id: split_id,
                direction,
                first,
                second,
                size,
            } = split;

            let (first, taken) = detach_panel(*first, id);
            if taken.is_some() {
                return match first {
                    Some(first) => (
                        Some(DockNode::Split(Split {
                            id: split_id,
                            direction,
                            first: Box::new(first),
                            second,
                            size,
                        })),
                        taken,
                    ),
                    None => (Some(*second), taken),
                };
            }
            let first = first.expect("child is intact when nothing was detached");

            let (second, taken) = detach_panel(*second, id);
            match second {
                Some(second) => (
                    Some(DockNode::Split(Split {
                        id: split_id,
                        direction,
                        first: Box::new(first),
                        second: Box::new(second),
                        size,
                    })),
                    taken,
                ),
                None => (Some(first), taken),
            }
        }
        DockNode::Tabs(mut group) => {
            let Some(index) = group.index_of(id) else {
                return (Some(DockNode::Tabs(group)), None);
            };
            let panel = group.panels.remove(index);
            let node = match group.panels.len() {
                0 => None,
                1 => Some(DockNode::Panel(group.panels.pop().expect("len is 1"))),
                _ => {
                    if group.active_id == id {
                        let fallback = index.min(group.panels.len() - 1);
                        group.active_id = group.panels[fallback].id.clone();
                    }
                    Some(DockNode::Tabs(group))
                }
            };
            (node, Some(panel))
        }
    }
}

/// Wrap `existing` and `source` in a new split according to an edge
/// position: horizontal for left/right, vertical for top/bottom, with
/// the source first for top/left and second for bottom/right.
fn split_around(existing: DockNode, source: Panel, position: DropPosition) -> DockNode {
    let direction = match position {
        DropPosition::Left | DropPosition::Right => SplitDirection::Horizontal,
        _ => SplitDirection::Vertical,
    };
    let (first, second) = match position {
        DropPosition::Top | DropPosition::Left => (DockNode::Panel(source), existing),
        _ => (existing, DockNode::Panel(source)),
    };
    DockNode::Split(Split {
        id: ident::fresh_id(),
        direction,
        first: Box::new(first),
        second: Box::new(second),
        size: 0.5,
    })
}

/// Insert the pending panel relative to the target node. The panel is
/// taken out of `pending` exactly when an insertion point is found;
/// callers treat a still-occupied slot as "target not found".
fn insert_at(
    node: DockNode,
    target_id: &str,
    position: DropPosition,
    pending: &mut Option<Panel>,
) -> DockNode {
    if pending.is_none() {
        return node;
    }
    match node {
        DockNode::Panel(panel) => {
            if panel.id != target_id {
                return DockNode::Panel(panel);
            }
            let source = pending.take().expect("pending checked above");
            match position {
                DropPosition::TabInto | DropPosition::TabAfter => DockNode::Tabs(TabGroup {
                    id: ident::fresh_id(),
                    active_id: source.id.clone(),
                    panels: vec![panel, source],
                }),
                DropPosition::TabBefore => DockNode::Tabs(TabGroup {
                    id: ident::fresh_id(),
                    active_id: source.id.clone(),
                    panels: vec![source, panel],
                }),
                _ => split_around(DockNode::Panel(panel), source, position),
            }
        }
        DockNode::Tabs(mut group) => {
            // The group itself as target
            if group.id == target_id {
                let source = pending.take().expect("pending checked above");
                if position.is_edge() {
                    return split_around(DockNode::Tabs(group), source, position);
                }
                group.active_id = source.id.clone();
                group.panels.push(source);
                return DockNode::Tabs(group);
            }
            // A member tab as target
            if let Some(index) = group.index_of(target_id) {
                let source = pending.take().expect("pending checked above");
                if position.is_edge() {
                    // Edge drops on a tab split around the whole group
                    return split_around(DockNode::Tabs(group), source, position);
                }
                let insert_index = match position {
                    DropPosition::TabBefore => index,
                    _ => index + 1,
                };
                group.active_id = source.id.clone();
                group.panels.insert(insert_index, source);
                return DockNode::Tabs(group);
            }
            DockNode::Tabs(group)
        }
        DockNode::Split(mut split) => {
            if split.id == target_id {
                if position.is_edge() {
                    let source = pending.take().expect("pending checked above");
                    return split_around(DockNode::Split(split), source, position);
                }
                // Tab intents have no meaning on a split
                return DockNode::Split(split);
            }
            split.first = Box::new(insert_at(*split.first, target_id, position, pending));
            if pending.is_some() {
                split.second = Box::new(insert_at(*split.second, target_id, position, pending));
            }
            DockNode::Split(split)
        }
    }
}

/// Restore the structural invariants bottom-up: empty tab groups
/// disappear, single-tab groups collapse to their panel, splits with a
/// vanished side collapse to the survivor, and every surviving group's
/// `active_id` references a member. Same-direction nested splits are
/// left nested; the engine does not re-associate splits.
fn normalize(node: DockNode) -> Option<DockNode> {
    match node {
        DockNode::Panel(panel) => Some(DockNode::Panel(panel)),
        DockNode::Tabs(mut group) => match group.panels.len() {
            0 => None,
            1 => Some(DockNode::Panel(group.panels.pop().expect("len is 1"))),
            _ => {
                let active_valid = group.contains(&group.active_id);
                if !active_valid {
                    group.active_id = group.panels[0].id.clone();
                }
                Some(DockNode::Tabs(group))
            }
        },
        DockNode::Split(split) => {
            let Split {
                id,
                direction,
                first,
                second,
                size,
            } = split;
            match (normalize(*first), normalize(*second)) {
                (Some(first), Some(second)) => Some(DockNode::Split(Split {
                    id,
                    direction,
                    first: Box::new(first),
                    second: Box::new(second),
                    size,
                })),
                (Some(only), None) | (None, Some(only)) => Some(only),
                (None, None) => None,
            }
        }
    }
}

/// Clamp every split fraction into the configured range. Snapshots from
/// hosts may carry sizes the engine would never produce itself.
fn clamp_split_sizes(node: &mut DockNode, config: &WorkspaceConfig) {
    if let DockNode::Split(split) = node {
        split.size = config.clamp_split(split.size);
        clamp_split_sizes(&mut split.first, config);
        clamp_split_sizes(&mut split.second, config);
    }
}

// ============================================================================
// Manager
// ============================================================================

/// Owns a dock tree and mutates it in response to workspace operations
pub struct DockManager {
    state: DockState,
    bus: EventBus,
    config: WorkspaceConfig,
}

impl Default for DockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DockManager {
    /// Manager over the default single-panel layout
    pub fn new() -> Self {
        Self::with_config(WorkspaceConfig::default())
    }

    /// Manager over the default single-panel layout, with custom tunables
    pub fn with_config(config: WorkspaceConfig) -> Self {
        let panel = Panel::new(ident::fresh_id(), config.default_content_key.clone())
            .with_title(config.panel_name.clone());
        let state = DockState {
            root: DockNode::Panel(panel),
            active_panels: HashMap::new(),
            instance_id: ident::fresh_id(),
            maximized_panel_id: None,
        };
        Self {
            state,
            bus: EventBus::new(),
            config,
        }
    }

    /// Restore a manager from a caller-supplied layout snapshot.
    ///
    /// The tree is normalised, the activation map reconciled, and stale
    /// maximization cleared. Returns `None` when the snapshot is
    /// unusable (duplicate ids, or a tree that normalises to nothing).
    pub fn from_state(mut state: DockState, config: WorkspaceConfig) -> Option<Self> {
        state.root = normalize(state.root)?;
        clamp_split_sizes(&mut state.root, &config);

        let ids = state.root.all_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return None;
        }

        if let Some(max_id) = &state.maximized_panel_id {
            if state.root.find_panel(max_id).is_none() {
                state.maximized_panel_id = None;
            }
        }

        let mut manager = Self {
            state,
            bus: EventBus::new(),
            config,
        };
        manager.recalculate_active_panels();
        Some(manager)
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn root(&self) -> &DockNode {
        &self.state.root
    }

    /// A copy of the full state for observers; mutating it never
    /// affects the manager
    pub fn snapshot(&self) -> DockState {
        self.state.clone()
    }

    pub fn instance_id(&self) -> &str {
        &self.state.instance_id
    }

    pub fn maximized_panel(&self) -> Option<&str> {
        self.state.maximized_panel_id.as_deref()
    }

    /// Active panel of a tab group, from the activation map
    pub fn active_panel_of(&self, group_id: &str) -> Option<&str> {
        self.state.active_panels.get(group_id).map(String::as_str)
    }

    pub fn panel_count(&self) -> usize {
        self.state.root.panels().len()
    }

    /// Display names of every panel in the tree
    pub fn panel_titles(&self) -> HashSet<String> {
        self.state
            .root
            .panels()
            .iter()
            .map(|p| p.display_title().to_string())
            .collect()
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn subscribe(&self, handler: impl FnMut(&DockEvent) + 'static) -> Subscription {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&self, token: Subscription) -> bool {
        self.bus.unsubscribe(token)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a panel to the layout and return its id.
    ///
    /// A panel root splits horizontally; a split root gains a vertical
    /// split in its second slot; a tab-group root gains a tab. Untitled
    /// panels get a collision-free display name.
    pub fn add_panel(&mut self, content_key: Option<&str>, title: Option<&str>) -> String {
        let panel = self.build_panel(content_key, title);
        let panel_id = panel.id.clone();

        let new_root = match self.state.root.clone() {
            DockNode::Panel(existing) => DockNode::Split(Split {
                id: ident::fresh_id(),
                direction: SplitDirection::Horizontal,
                first: Box::new(DockNode::Panel(existing)),
                second: Box::new(DockNode::Panel(panel)),
                size: 0.5,
            }),
            DockNode::Split(split) => {
                let Split {
                    id,
                    direction,
                    first,
                    second,
                    size,
                } = split;
                DockNode::Split(Split {
                    id,
                    direction,
                    first,
                    second: Box::new(DockNode::Split(Split {
                        id: ident::fresh_id(),
                        direction: SplitDirection::Vertical,
                        first: second,
                        second: Box::new(DockNode::Panel(panel)),
                        size: 0.5,
                    })),
                    size,
                })
            }
            DockNode::Tabs(mut group) => {
                group.active_id = panel.id.clone();
                group.panels.push(panel);
                DockNode::Tabs(group)
            }
        };

        self.state.root = normalize(new_root).expect("adding a panel never empties the tree");
        self.recalculate_active_panels();
        debug!(%panel_id, "panel added");
        self.bus.emit(DockEvent::PanelAdded {
            panel_id: panel_id.clone(),
        });
        self.bus.emit(DockEvent::LayoutChanged);
        panel_id
    }

    /// Stack a new panel as a tab on the target: a panel target becomes
    /// a two-tab group, a tab-group target gains a tab. Returns the new
    /// panel's id, or `None` when the target is missing or a split.
    pub fn add_tab(
        &mut self,
        target_id: &str,
        content_key: Option<&str>,
        title: Option<&str>,
    ) -> Option<String> {
        // The target must be a panel (leaf or tab member) or a tab group
        let target_is_panel = self.state.root.find_panel(target_id).is_some();
        let target_is_group = matches!(self.state.root.find(target_id), Some(DockNode::Tabs(_)));
        if !target_is_panel && !target_is_group {
            return None;
        }

        let panel = self.build_panel(content_key, title);
        let panel_id = panel.id.clone();

        let mut pending = Some(panel);
        let new_root = insert_at(
            self.state.root.clone(),
            target_id,
            DropPosition::TabInto,
            &mut pending,
        );
        if pending.is_some() {
            return None;
        }

        self.state.root = normalize(new_root).expect("adding a tab never empties the tree");
        self.recalculate_active_panels();
        debug!(%panel_id, target_id, "tab added");
        self.bus.emit(DockEvent::PanelAdded {
            panel_id: panel_id.clone(),
        });
        self.bus.emit(DockEvent::LayoutChanged);
        Some(panel_id)
    }

    /// Remove a panel. The last remaining panel cannot be removed; a
    /// workspace always shows at least one.
    pub fn remove_panel(&mut self, panel_id: &str) -> bool {
        if self.state.root.find_panel(panel_id).is_none() {
            return false;
        }
        if self.panel_count() == 1 {
            debug!(panel_id, "rejected removal of the last panel");
            return false;
        }

        let (remaining, detached) = detach_panel(self.state.root.clone(), panel_id);
        debug_assert!(detached.is_some());
        let Some(remaining) = remaining else {
            return false;
        };
        let Some(new_root) = normalize(remaining) else {
            return false;
        };

        self.state.root = new_root;
        if self.state.maximized_panel_id.as_deref() == Some(panel_id) {
            self.state.maximized_panel_id = None;
        }
        self.recalculate_active_panels();
        debug!(panel_id, "panel removed");
        self.bus.emit(DockEvent::PanelRemoved {
            panel_id: panel_id.to_string(),
        });
        self.bus.emit(DockEvent::LayoutChanged);
        true
    }

    /// Move a panel relative to a target node.
    ///
    /// Tab intents between members of the same tab group reorder in
    /// place (single `panelMoved`, no detach). Everything else detaches
    /// the source and re-inserts it, committing only when the whole
    /// operation succeeds.
    pub fn move_panel(&mut self, source_id: &str, target_id: &str, position: DropPosition) -> bool {
        if self.state.maximized_panel_id.is_some() {
            debug!(source_id, "rejected move while a panel is maximized");
            return false;
        }
        if source_id == target_id {
            return false;
        }
        if self.state.root.find_panel(source_id).is_none() {
            // Missing, or names a split/tab-group rather than a panel
            return false;
        }
        if !self.state.root.contains_id(target_id) {
            return false;
        }

        if position.is_tab() && self.reorder_within_group(source_id, target_id, position) {
            self.bus.emit(DockEvent::PanelMoved {
                panel_id: source_id.to_string(),
                target_id: target_id.to_string(),
                position,
            });
            return true;
        }

        let (remaining, detached) = detach_panel(self.state.root.clone(), source_id);
        let Some(panel) = detached else {
            return false;
        };
        let Some(remaining) = remaining else {
            // The source was the entire tree; there is nowhere to drop it
            return false;
        };
        if !remaining.contains_id(target_id) {
            // Detaching collapsed the target away (e.g. tab-into the
            // source's own two-tab group)
            return false;
        }

        let mut pending = Some(panel);
        let new_root = insert_at(remaining, target_id, position, &mut pending);
        if pending.is_some() {
            return false;
        }
        let Some(new_root) = normalize(new_root) else {
            return false;
        };

        self.state.root = new_root;
        self.recalculate_active_panels();
        debug!(source_id, target_id, position = position.as_str(), "panel moved");
        self.bus.emit(DockEvent::PanelMoved {
            panel_id: source_id.to_string(),
            target_id: target_id.to_string(),
            position,
        });
        self.bus.emit(DockEvent::LayoutChanged);
        true
    }

    /// In-place tab reorder when source and target share a tab group.
    /// Preserves activation without a detach/re-insert cycle.
    fn reorder_within_group(
        &mut self,
        source_id: &str,
        target_id: &str,
        position: DropPosition,
    ) -> bool {
        let same_group = {
            let source_group = self.state.root.find_tabs_of_panel(source_id).map(|g| &g.id);
            let target_group = self.state.root.find_tabs_of_panel(target_id).map(|g| &g.id);
            matches!((source_group, target_group), (Some(a), Some(b)) if a == b)
        };
        if !same_group {
            return false;
        }

        let group = self
            .state
            .root
            .find_tabs_of_panel_mut(source_id)
            .expect("group located above");
        let from = group.index_of(source_id).expect("source is a member");
        let panel = group.panels.remove(from);
        let insert_index = match position {
            DropPosition::TabBefore => group
                .index_of(target_id)
                .unwrap_or(group.panels.len()),
            DropPosition::TabAfter => group
                .index_of(target_id)
                .map(|i| i + 1)
                .unwrap_or(group.panels.len()),
            // tab-into a sibling tab: append at the end of the strip
            _ => group.panels.len(),
        };
        group.active_id = panel.id.clone();
        group.panels.insert(insert_index, panel);

        let group_id = group.id.clone();
        self.state
            .active_panels
            .insert(group_id, source_id.to_string());
        debug!(source_id, target_id, "tabs reordered in place");
        true
    }

    /// Resize a split. Rejected while a panel is maximized; the size is
    /// clamped into the configured range.
    pub fn resize(&mut self, node_id: &str, new_size: f64) -> bool {
        if self.state.maximized_panel_id.is_some() {
            debug!(node_id, "rejected resize while a panel is maximized");
            return false;
        }
        let clamped = self.config.clamp_split(new_size);
        let Some(split) = self.state.root.find_split_mut(node_id) else {
            return false;
        };
        split.size = clamped;
        self.bus.emit(DockEvent::Resize {
            node_id: node_id.to_string(),
            size: clamped,
        });
        true
    }

    /// Make a panel the active tab of its group. Panels outside any
    /// tab group are left alone.
    pub fn activate_panel(&mut self, panel_id: &str) -> bool {
        let Some(group) = self.state.root.find_tabs_of_panel_mut(panel_id) else {
            return false;
        };
        if group.active_id == panel_id {
            return true;
        }
        group.active_id = panel_id.to_string();
        let group_id = group.id.clone();
        self.state
            .active_panels
            .insert(group_id.clone(), panel_id.to_string());
        self.bus.emit(DockEvent::ActivePanelChanged {
            group_id,
            panel_id: panel_id.to_string(),
        });
        true
    }

    /// Maximize a panel; the host renders only that panel until it is
    /// restored. Move and resize are rejected in the meantime.
    pub fn maximize_panel(&mut self, panel_id: &str) -> bool {
        if self.state.root.find_panel(panel_id).is_none() {
            return false;
        }
        if self.state.maximized_panel_id.as_deref() == Some(panel_id) {
            return true;
        }
        self.state.maximized_panel_id = Some(panel_id.to_string());
        self.bus.emit(DockEvent::PanelMaximized {
            panel_id: panel_id.to_string(),
        });
        true
    }

    /// Clear maximization. Returns false when nothing was maximized.
    pub fn restore_panel(&mut self) -> bool {
        let Some(panel_id) = self.state.maximized_panel_id.take() else {
            return false;
        };
        self.bus.emit(DockEvent::PanelRestored { panel_id });
        true
    }

    /// Update a panel's metadata in place. A title change also counts
    /// as a layout change for re-rendering purposes.
    pub fn edit_panel(
        &mut self,
        panel_id: &str,
        title: Option<&str>,
        content_key: Option<&str>,
    ) -> bool {
        let Some(panel) = self.state.root.find_panel_mut(panel_id) else {
            return false;
        };

        let mut title_changed = false;
        if let Some(title) = title {
            if panel.title.as_deref() != Some(title) {
                panel.title = Some(title.to_string());
                title_changed = true;
            }
        }
        if let Some(key) = content_key {
            panel.content_key = key.to_string();
        }

        self.bus.emit(DockEvent::PanelEdited {
            panel_id: panel_id.to_string(),
        });
        if title_changed {
            self.bus.emit(DockEvent::LayoutChanged);
        }
        true
    }

    pub fn update_panel_title(&mut self, panel_id: &str, title: &str) -> bool {
        self.edit_panel(panel_id, Some(title), None)
    }

    pub fn update_panel_content_key(&mut self, panel_id: &str, content_key: &str) -> bool {
        self.edit_panel(panel_id, None, Some(content_key))
    }

    // ========================================================================
    // Normalisation support
    // ========================================================================

    fn build_panel(&self, content_key: Option<&str>, title: Option<&str>) -> Panel {
        let key = content_key.unwrap_or(self.config.default_content_key.as_str());
        let title = match title {
            Some(title) => title.to_string(),
            None => ident::unique_name(&self.config.panel_name, &self.panel_titles()),
        };
        Panel::new(ident::fresh_id(), key).with_title(title)
    }

    /// Reconcile the activation map with the current tree: a valid
    /// stored `active_id` is kept, a remembered one is preferred next,
    /// and the first panel is the fallback. Entries for vanished groups
    /// are dropped.
    fn recalculate_active_panels(&mut self) {
        let remembered = std::mem::take(&mut self.state.active_panels);
        let mut rebuilt = HashMap::new();
        Self::recalculate_groups(&mut self.state.root, &remembered, &mut rebuilt);
        self.state.active_panels = rebuilt;
    }

    fn recalculate_groups(
        node: &mut DockNode,
        remembered: &HashMap<String, String>,
        out: &mut HashMap<String, String>,
    ) {
        match node {
            DockNode::Panel(_) => {}
            DockNode::Split(split) => {
                Self::recalculate_groups(&mut split.first, remembered, out);
                Self::recalculate_groups(&mut split.second, remembered, out);
            }
            DockNode::Tabs(group) => {
                let current_valid = group.contains(&group.active_id);
                if !current_valid {
                    let from_memory = remembered
                        .get(&group.id)
                        .filter(|prev| group.contains(prev))
                        .cloned();
                    group.active_id =
                        from_memory.unwrap_or_else(|| group.panels[0].id.clone());
                }
                out.insert(group.id.clone(), group.active_id.clone());
            }
        }
    }

    // ========================================================================
    // Invariant checking
    // ========================================================================

    /// Walk the tree and report structural invariant violations; empty
    /// means consistent. Exercised by tests after operation sequences.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let ids = self.state.root.all_ids();
        let mut seen = HashSet::new();
        for id in &ids {
            if !seen.insert(*id) {
                problems.push(format!("duplicate id {:?}", id));
            }
        }

        Self::check_node(&self.state.root, &self.config, &mut problems);

        if let Some(max_id) = &self.state.maximized_panel_id {
            if self.state.root.find_panel(max_id).is_none() {
                problems.push(format!("maximized panel {:?} does not exist", max_id));
            }
        }

        for group in self.state.root.tab_groups() {
            match self.state.active_panels.get(&group.id) {
                Some(active) if group.contains(active) => {}
                Some(active) => problems.push(format!(
                    "activation map entry {:?} not a member of group {:?}",
                    active, group.id
                )),
                None => problems.push(format!("group {:?} missing from activation map", group.id)),
            }
        }
        for group_id in self.state.active_panels.keys() {
            if !self
                .state
                .root
                .tab_groups()
                .iter()
                .any(|g| &g.id == group_id)
            {
                problems.push(format!("activation map entry for vanished group {:?}", group_id));
            }
        }

        problems
    }

    fn check_node(node: &DockNode, config: &WorkspaceConfig, problems: &mut Vec<String>) {
        match node {
            DockNode::Panel(_) => {}
            DockNode::Split(split) => {
                if split.size < config.min_split_size || split.size > config.max_split_size {
                    problems.push(format!(
                        "split {:?} size {} outside [{}, {}]",
                        split.id, split.size, config.min_split_size, config.max_split_size
                    ));
                }
                Self::check_node(&split.first, config, problems);
                Self::check_node(&split.second, config, problems);
            }
            DockNode::Tabs(group) => {
                if group.panels.len() < 2 {
                    problems.push(format!(
                        "tab group {:?} has {} panels",
                        group.id,
                        group.panels.len()
                    ));
                }
                if !group.contains(&group.active_id) {
                    problems.push(format!(
                        "tab group {:?} active id {:?} not a member",
                        group.id, group.active_id
                    ));
                }
            }
        }
    }

    /// Debug-build invariant assertion, for use after test sequences
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let problems = self.check_invariants();
        assert!(problems.is_empty(), "dock invariants violated: {:?}", problems);
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Manager whose root is a single panel "a"
    fn single_panel() -> (DockManager, String) {
        let mut manager = DockManager::new();
        let id = manager.root().id().to_string();
        manager.update_panel_title(&id, "A");
        (manager, id)
    }

    fn record_events(manager: &DockManager) -> Rc<RefCell<Vec<&'static str>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.subscribe(move |event| sink.borrow_mut().push(event.name()));
        seen
    }

    #[test]
    fn test_add_panel_to_panel_root_splits_horizontally() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));

        match manager.root() {
            DockNode::Split(split) => {
                assert_eq!(split.direction, SplitDirection::Horizontal);
                assert_eq!(split.size, 0.5);
                assert_eq!(split.first.id(), a);
                assert_eq!(split.second.id(), b);
            }
            other => panic!("expected split root, got {:?}", other),
        }
        manager.assert_invariants();
    }

    #[test]
    fn test_add_panel_to_split_root_nests_vertically() {
        let (mut manager, _a) = single_panel();
        let b = manager.add_panel(None, Some("B"));
        let c = manager.add_panel(None, Some("C"));

        match manager.root() {
            DockNode::Split(outer) => match outer.second.as_ref() {
                DockNode::Split(inner) => {
                    assert_eq!(inner.direction, SplitDirection::Vertical);
                    assert_eq!(inner.first.id(), b);
                    assert_eq!(inner.second.id(), c);
                }
                other => panic!("expected nested split, got {:?}", other),
            },
            other => panic!("expected split root, got {:?}", other),
        }
        manager.assert_invariants();
    }

    #[test]
    fn test_add_panel_generates_unique_titles() {
        let mut manager = DockManager::new();
        let first = manager.add_panel(None, None);
        let second = manager.add_panel(None, None);

        let titles = manager.panel_titles();
        // Default root panel is "Panel"; the two additions must differ
        assert_eq!(titles.len(), 3);
        assert!(titles.contains("Panel"));
        let _ = (first, second);
    }

    #[test]
    fn test_add_tab_wraps_panel_into_group() {
        let (mut manager, a) = single_panel();
        let b = manager.add_tab(&a, None, Some("B")).unwrap();

        match manager.root() {
            DockNode::Tabs(group) => {
                assert_eq!(group.panels.len(), 2);
                assert_eq!(group.panels[0].id, a);
                assert_eq!(group.panels[1].id, b);
                assert_eq!(group.active_id, b);
            }
            other => panic!("expected tab group root, got {:?}", other),
        }
        manager.assert_invariants();
    }

    #[test]
    fn test_add_tab_appends_to_group() {
        let (mut manager, a) = single_panel();
        manager.add_tab(&a, None, Some("B")).unwrap();
        let group_id = manager.root().id().to_string();
        let c = manager.add_tab(&group_id, None, Some("C")).unwrap();

        match manager.root() {
            DockNode::Tabs(group) => {
                assert_eq!(group.panels.len(), 3);
                assert_eq!(group.active_id, c);
            }
            other => panic!("expected tab group root, got {:?}", other),
        }
    }

    #[test]
    fn test_add_tab_rejects_missing_target() {
        let mut manager = DockManager::new();
        assert!(manager.add_tab("nope", None, None).is_none());
    }

    #[test]
    fn test_remove_last_panel_rejected() {
        let (mut manager, a) = single_panel();
        assert!(!manager.remove_panel(&a));
        assert_eq!(manager.panel_count(), 1);
    }

    #[test]
    fn test_remove_collapses_tab_group_and_split() {
        // Split root with a two-tab group on the right
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));
        manager.move_panel(&b, &a, DropPosition::Right);
        let c = manager.add_tab(&b, None, Some("C")).unwrap();

        // Removing one tab collapses the group to a bare panel, and the
        // split's child becomes that panel directly
        assert!(manager.remove_panel(&c));
        match manager.root() {
            DockNode::Split(split) => {
                assert_eq!(split.second.id(), b);
                assert!(matches!(split.second.as_ref(), DockNode::Panel(_)));
            }
            other => panic!("expected split root, got {:?}", other),
        }
        manager.assert_invariants();
    }

    #[test]
    fn test_remove_collapses_split_to_survivor() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));
        assert!(manager.remove_panel(&a));
        assert_eq!(manager.root().id(), b);
        manager.assert_invariants();
    }

    #[test]
    fn test_move_edge_changes_split_direction() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));

        // Already side by side; a rightward move rebuilds the same shape
        assert!(manager.move_panel(&b, &a, DropPosition::Right));
        match manager.root() {
            DockNode::Split(split) => {
                assert_eq!(split.direction, SplitDirection::Horizontal);
                assert_eq!(split.first.id(), a);
                assert_eq!(split.second.id(), b);
                assert_eq!(split.size, 0.5);
            }
            other => panic!("expected split root, got {:?}", other),
        }

        assert!(manager.move_panel(&b, &a, DropPosition::Bottom));
        match manager.root() {
            DockNode::Split(split) => {
                assert_eq!(split.direction, SplitDirection::Vertical);
                assert_eq!(split.first.id(), a);
                assert_eq!(split.second.id(), b);
            }
            other => panic!("expected split root, got {:?}", other),
        }
        manager.assert_invariants();
    }

    #[test]
    fn test_move_top_and_left_put_source_first() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));

        assert!(manager.move_panel(&b, &a, DropPosition::Top));
        match manager.root() {
            DockNode::Split(split) => {
                assert_eq!(split.direction, SplitDirection::Vertical);
                assert_eq!(split.first.id(), b);
                assert_eq!(split.second.id(), a);
            }
            other => panic!("expected split root, got {:?}", other),
        }
    }

    #[test]
    fn test_move_tab_into_tabifies() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));

        assert!(manager.move_panel(&b, &a, DropPosition::TabInto));
        match manager.root() {
            DockNode::Tabs(group) => {
                let ids: Vec<&str> = group.panels.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids, vec![a.as_str(), b.as_str()]);
                assert_eq!(group.active_id, b);
            }
            other => panic!("expected tab group root, got {:?}", other),
        }
        manager.assert_invariants();
    }

    #[test]
    fn test_move_reorders_in_place_with_single_event() {
        let (mut manager, a) = single_panel();
        let b = manager.add_tab(&a, None, Some("B")).unwrap();
        let c = manager.add_tab(&b, None, Some("C")).unwrap();
        manager.activate_panel(&a);

        let group_id = manager.root().id().to_string();
        let events = record_events(&manager);
        assert!(manager.move_panel(&c, &a, DropPosition::TabBefore));

        match manager.root() {
            DockNode::Tabs(group) => {
                // Group identity survives: no detach/re-insert happened
                assert_eq!(group.id, group_id);
                let ids: Vec<&str> = group.panels.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids, vec![c.as_str(), a.as_str(), b.as_str()]);
                assert_eq!(group.active_id, c);
            }
            other => panic!("expected tab group root, got {:?}", other),
        }
        assert_eq!(*events.borrow(), vec!["panelMoved"]);
        manager.assert_invariants();
    }

    #[test]
    fn test_move_rejected_cases_leave_state_unchanged() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));
        let before = manager.snapshot();

        // Self-move
        assert!(!manager.move_panel(&a, &a, DropPosition::Right));
        // Missing source / target
        assert!(!manager.move_panel("nope", &a, DropPosition::Right));
        assert!(!manager.move_panel(&a, "nope", DropPosition::Right));
        // Source naming a split, not a panel
        let split_id = manager.root().id().to_string();
        assert!(!manager.move_panel(&split_id, &a, DropPosition::Right));

        assert_eq!(manager.snapshot(), before);
        let _ = b;
    }

    #[test]
    fn test_move_rejected_while_maximized() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));
        assert!(manager.maximize_panel(&a));

        let before = manager.snapshot();
        assert!(!manager.move_panel(&b, &a, DropPosition::TabInto));
        assert_eq!(manager.snapshot(), before);

        assert!(manager.restore_panel());
        assert!(manager.move_panel(&b, &a, DropPosition::TabInto));
    }

    #[test]
    fn test_resize_clamps_and_rejects_while_maximized() {
        let (mut manager, a) = single_panel();
        manager.add_panel(None, Some("B"));
        let split_id = manager.root().id().to_string();

        assert!(manager.resize(&split_id, 0.95));
        match manager.root() {
            DockNode::Split(split) => assert_eq!(split.size, 0.9),
            other => panic!("expected split root, got {:?}", other),
        }
        assert!(manager.resize(&split_id, 0.02));
        match manager.root() {
            DockNode::Split(split) => assert_eq!(split.size, 0.1),
            other => panic!("expected split root, got {:?}", other),
        }

        manager.maximize_panel(&a);
        assert!(!manager.resize(&split_id, 0.5));
    }

    #[test]
    fn test_resize_rejects_non_split() {
        let (mut manager, a) = single_panel();
        assert!(!manager.resize(&a, 0.5));
    }

    #[test]
    fn test_activate_panel_updates_group_and_map() {
        let (mut manager, a) = single_panel();
        let b = manager.add_tab(&a, None, Some("B")).unwrap();
        let group_id = manager.root().id().to_string();
        assert_eq!(manager.active_panel_of(&group_id), Some(b.as_str()));

        assert!(manager.activate_panel(&a));
        assert_eq!(manager.active_panel_of(&group_id), Some(a.as_str()));
        match manager.root() {
            DockNode::Tabs(group) => assert_eq!(group.active_id, a),
            other => panic!("expected tab group root, got {:?}", other),
        }
    }

    #[test]
    fn test_activate_panel_outside_group_is_noop() {
        let (mut manager, a) = single_panel();
        assert!(!manager.activate_panel(&a));
    }

    #[test]
    fn test_maximize_restore_cycle() {
        let (mut manager, a) = single_panel();
        assert!(!manager.restore_panel());
        assert!(manager.maximize_panel(&a));
        assert_eq!(manager.maximized_panel(), Some(a.as_str()));
        assert!(manager.restore_panel());
        assert_eq!(manager.maximized_panel(), None);
    }

    #[test]
    fn test_remove_maximized_panel_clears_maximization() {
        let (mut manager, a) = single_panel();
        manager.add_panel(None, Some("B"));
        manager.maximize_panel(&a);

        assert!(manager.remove_panel(&a));
        assert_eq!(manager.maximized_panel(), None);
        manager.assert_invariants();
    }

    #[test]
    fn test_edit_panel_events() {
        let (mut manager, a) = single_panel();
        let events = record_events(&manager);

        assert!(manager.update_panel_content_key(&a, "notes"));
        assert_eq!(*events.borrow(), vec!["panelEdited"]);

        events.borrow_mut().clear();
        assert!(manager.update_panel_title(&a, "Sketches"));
        assert_eq!(*events.borrow(), vec!["panelEdited", "layoutChanged"]);

        let panel = manager.root().find_panel(&a).unwrap();
        assert_eq!(panel.content_key, "notes");
        assert_eq!(panel.display_title(), "Sketches");
    }

    #[test]
    fn test_granular_events_precede_layout_changed() {
        let (mut manager, _a) = single_panel();
        let events = record_events(&manager);
        manager.add_panel(None, Some("B"));
        assert_eq!(*events.borrow(), vec!["panelAdded", "layoutChanged"]);
    }

    #[test]
    fn test_activation_memory_prefers_previous_active() {
        let (mut manager, a) = single_panel();
        let b = manager.add_tab(&a, None, Some("B")).unwrap();
        let c = manager.add_tab(&a, None, Some("C")).unwrap();
        manager.activate_panel(&b);

        // Moving b away and back: when b leaves, the fallback applies;
        // the map keeps tracking the current active of the group
        let group_id = manager.root().id().to_string();
        assert!(manager.move_panel(&b, &group_id, DropPosition::Top));
        let remaining_active = manager.active_panel_of(
            manager
                .root()
                .find_tabs_of_panel(&a)
                .map(|g| g.id.as_str())
                .unwrap(),
        );
        assert!(remaining_active == Some(a.as_str()) || remaining_active == Some(c.as_str()));
        manager.assert_invariants();
    }

    #[test]
    fn test_from_state_normalises_and_validates() {
        // A snapshot with a one-tab group collapses to a panel
        let state = DockState {
            root: DockNode::Tabs(TabGroup {
                id: "g".to_string(),
                panels: vec![Panel::new("p", "drawing")],
                active_id: "zzz".to_string(),
            }),
            active_panels: HashMap::new(),
            instance_id: "i".to_string(),
            maximized_panel_id: Some("gone".to_string()),
        };
        let manager = DockManager::from_state(state, WorkspaceConfig::default()).unwrap();
        assert!(matches!(manager.root(), DockNode::Panel(_)));
        assert_eq!(manager.maximized_panel(), None);
        manager.assert_invariants();
    }

    #[test]
    fn test_from_state_rejects_duplicate_ids() {
        let state = DockState {
            root: DockNode::Split(Split {
                id: "dup".to_string(),
                direction: SplitDirection::Horizontal,
                first: Box::new(DockNode::Panel(Panel::new("dup", "drawing"))),
                second: Box::new(DockNode::Panel(Panel::new("p2", "drawing"))),
                size: 0.5,
            }),
            active_panels: HashMap::new(),
            instance_id: "i".to_string(),
            maximized_panel_id: None,
        };
        assert!(DockManager::from_state(state, WorkspaceConfig::default()).is_none());
    }

    #[test]
    fn test_invariants_hold_across_operation_sequence() {
        let (mut manager, a) = single_panel();
        let b = manager.add_panel(None, Some("B"));
        let c = manager.add_tab(&b, None, Some("C")).unwrap();
        let d = manager.add_panel(None, None);

        manager.move_panel(&d, &a, DropPosition::Left);
        manager.assert_invariants();
        manager.move_panel(&a, &c, DropPosition::TabAfter);
        manager.assert_invariants();
        manager.remove_panel(&b);
        manager.assert_invariants();
        manager.move_panel(&c, &d, DropPosition::Bottom);
        manager.assert_invariants();
        manager.remove_panel(&d);
        manager.assert_invariants();
    }
}
