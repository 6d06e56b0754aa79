//! Dock-tree node types
//!
//! The workspace layout is a recursive tree of three variants: leaf
//! panels, binary splits, and tab groups. The serialized form keeps an
//! explicit `type` discriminator so snapshots survive round-trips to
//! host storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Direction of a binary split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Children arranged left-to-right
    Horizontal,
    /// Children arranged top-to-bottom
    Vertical,
}

/// A leaf of the dock tree, rendering one content binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Stable across moves
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Selects which content descriptor to render
    pub content_key: String,
    /// Embedded fallback content, used when no descriptor matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl Panel {
    pub fn new(id: impl Into<String>, content_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            content_key: content_key.into(),
            content: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title if set, content key otherwise
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.content_key)
    }
}

/// A binary split. `size` is the fractional extent of `first`; `second`
/// occupies the remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub id: String,
    pub direction: SplitDirection,
    pub first: Box<DockNode>,
    pub second: Box<DockNode>,
    pub size: f64,
}

/// A stack of panels sharing one viewport, one active at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: String,
    pub panels: Vec<Panel>,
    pub active_id: String,
}

impl TabGroup {
    /// Index of a member panel
    pub fn index_of(&self, panel_id: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.id == panel_id)
    }

    pub fn contains(&self, panel_id: &str) -> bool {
        self.index_of(panel_id).is_some()
    }

    /// The currently active member, if `active_id` is valid
    pub fn active_panel(&self) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == self.active_id)
    }
}

/// A node in the dock tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DockNode {
    Panel(Panel),
    Split(Split),
    Tabs(TabGroup),
}

impl DockNode {
    pub fn id(&self) -> &str {
        match self {
            DockNode::Panel(p) => &p.id,
            DockNode::Split(s) => &s.id,
            DockNode::Tabs(t) => &t.id,
        }
    }

    /// Find any node (panel, split, or tab group) by id. Panels inside
    /// tab groups are not themselves `DockNode`s and are found via
    /// [`find_panel`].
    ///
    /// [`find_panel`]: DockNode::find_panel
    pub fn find(&self, id: &str) -> Option<&DockNode> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            DockNode::Panel(_) | DockNode::Tabs(_) => None,
            DockNode::Split(s) => s.first.find(id).or_else(|| s.second.find(id)),
        }
    }

    /// Find a panel by id, whether it is a leaf or a tab-group member
    pub fn find_panel(&self, id: &str) -> Option<&Panel> {
        match self {
            DockNode::Panel(p) => (p.id == id).then_some(p),
            DockNode::Split(s) => s.first.find_panel(id).or_else(|| s.second.find_panel(id)),
            DockNode::Tabs(t) => t.panels.iter().find(|p| p.id == id),
        }
    }

    /// Mutable variant of [`find_panel`]
    ///
    /// [`find_panel`]: DockNode::find_panel
    pub fn find_panel_mut(&mut self, id: &str) -> Option<&mut Panel> {
        match self {
            DockNode::Panel(p) => (p.id == id).then_some(p),
            DockNode::Split(s) => {
                if s.first.find_panel(id).is_some() {
                    s.first.find_panel_mut(id)
                } else {
                    s.second.find_panel_mut(id)
                }
            }
            DockNode::Tabs(t) => t.panels.iter_mut().find(|p| p.id == id),
        }
    }

    /// Find a split by id
    pub fn find_split_mut(&mut self, id: &str) -> Option<&mut Split> {
        match self {
            DockNode::Panel(_) | DockNode::Tabs(_) => None,
            DockNode::Split(s) => {
                if s.id == id {
                    Some(s)
                } else if matches!(s.first.find(id), Some(DockNode::Split(_))) {
                    s.first.find_split_mut(id)
                } else {
                    s.second.find_split_mut(id)
                }
            }
        }
    }

    /// The tab group holding a given panel, if any
    pub fn find_tabs_of_panel(&self, panel_id: &str) -> Option<&TabGroup> {
        match self {
            DockNode::Panel(_) => None,
            DockNode::Split(s) => s
                .first
                .find_tabs_of_panel(panel_id)
                .or_else(|| s.second.find_tabs_of_panel(panel_id)),
            DockNode::Tabs(t) => t.contains(panel_id).then_some(t),
        }
    }

    /// Mutable variant of [`find_tabs_of_panel`]
    ///
    /// [`find_tabs_of_panel`]: DockNode::find_tabs_of_panel
    pub fn find_tabs_of_panel_mut(&mut self, panel_id: &str) -> Option<&mut TabGroup> {
        match self {
            DockNode::Panel(_) => None,
            DockNode::Split(s) => {
                if s.first.find_tabs_of_panel(panel_id).is_some() {
                    s.first.find_tabs_of_panel_mut(panel_id)
                } else {
                    s.second.find_tabs_of_panel_mut(panel_id)
                }
            }
            DockNode::Tabs(t) => {
                if t.contains(panel_id) {
                    Some(t)
                } else {
                    None
                }
            }
        }
    }

    /// All panels in the tree, leaves and tab members alike, in
    /// depth-first order
    pub fn panels(&self) -> Vec<&Panel> {
        let mut out = Vec::new();
        self.collect_panels(&mut out);
        out
    }

    fn collect_panels<'a>(&'a self, out: &mut Vec<&'a Panel>) {
        match self {
            DockNode::Panel(p) => out.push(p),
            DockNode::Split(s) => {
                s.first.collect_panels(out);
                s.second.collect_panels(out);
            }
            DockNode::Tabs(t) => out.extend(t.panels.iter()),
        }
    }

    /// All tab groups in the tree, depth-first
    pub fn tab_groups(&self) -> Vec<&TabGroup> {
        let mut out = Vec::new();
        self.collect_tab_groups(&mut out);
        out
    }

    fn collect_tab_groups<'a>(&'a self, out: &mut Vec<&'a TabGroup>) {
        match self {
            DockNode::Panel(_) => {}
            DockNode::Split(s) => {
                s.first.collect_tab_groups(out);
                s.second.collect_tab_groups(out);
            }
            DockNode::Tabs(t) => out.push(t),
        }
    }

    /// Every id in the tree: node ids plus tab-member panel ids
    pub fn all_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.id());
        match self {
            DockNode::Panel(_) => {}
            DockNode::Split(s) => {
                s.first.collect_ids(out);
                s.second.collect_ids(out);
            }
            DockNode::Tabs(t) => out.extend(t.panels.iter().map(|p| p.id.as_str())),
        }
    }

    /// Whether any node or tab member carries this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.all_ids().iter().any(|i| *i == id)
    }
}

/// Complete dock state: the tree plus cross-cutting bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockState {
    pub root: DockNode,
    /// Remembered active panel per tab group, keyed by group id. Also
    /// serves as the activation memory when groups are rebuilt.
    pub active_panels: HashMap<String, String>,
    /// Opaque token distinguishing manager instances
    pub instance_id: String,
    pub maximized_panel_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DockNode {
        DockNode::Split(Split {
            id: "s1".to_string(),
            direction: SplitDirection::Horizontal,
            first: Box::new(DockNode::Panel(Panel::new("a", "drawing"))),
            second: Box::new(DockNode::Tabs(TabGroup {
                id: "g1".to_string(),
                panels: vec![Panel::new("b", "drawing"), Panel::new("c", "notes")],
                active_id: "b".to_string(),
            })),
            size: 0.5,
        })
    }

    #[test]
    fn test_find_nodes_and_panels() {
        let tree = sample_tree();
        assert_eq!(tree.find("s1").unwrap().id(), "s1");
        assert_eq!(tree.find("g1").unwrap().id(), "g1");
        assert_eq!(tree.find("a").unwrap().id(), "a");
        // Tab members are panels, not nodes
        assert!(tree.find("b").is_none());
        assert_eq!(tree.find_panel("b").unwrap().id, "b");
        assert_eq!(tree.find_panel("a").unwrap().id, "a");
        assert!(tree.find_panel("g1").is_none());
    }

    #[test]
    fn test_find_tabs_of_panel() {
        let tree = sample_tree();
        assert_eq!(tree.find_tabs_of_panel("c").unwrap().id, "g1");
        assert!(tree.find_tabs_of_panel("a").is_none());
    }

    #[test]
    fn test_panels_and_ids() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.panels().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let all = tree.all_ids();
        for id in ["s1", "g1", "a", "b", "c"] {
            assert!(all.contains(&id), "missing {}", id);
        }
    }

    #[test]
    fn test_display_title_fallback() {
        let panel = Panel::new("x", "drawing");
        assert_eq!(panel.display_title(), "drawing");
        let panel = panel.with_title("Sketch");
        assert_eq!(panel.display_title(), "Sketch");
    }

    #[test]
    fn test_serde_round_trip_with_type_tags() {
        let tree = sample_tree();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], "split");
        assert_eq!(json["first"]["type"], "panel");
        assert_eq!(json["second"]["type"], "tabs");

        let back: DockNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
