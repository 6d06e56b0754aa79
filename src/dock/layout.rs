//! Layout computation for the dock tree
//!
//! Walks the tree and assigns a rectangle to every visible panel, plus
//! divider bars for resize hit-testing and tab-header rectangles for
//! the drop classifier. Pure with respect to the tree: callers pass a
//! state snapshot and the available rectangle.

use std::collections::HashMap;

use crate::geometry::Rect;

use super::node::{DockNode, DockState, SplitDirection};

/// Width of divider bars between split children
pub const DIVIDER_WIDTH: f64 = 6.0;

/// Height of the tab header strip at the top of panels and tab groups
pub const TAB_HEADER_HEIGHT: f64 = 28.0;

/// A draggable divider between the two children of a split
#[derive(Debug, Clone, PartialEq)]
pub struct DividerBar {
    /// Id of the split this divider resizes
    pub split_id: String,
    pub direction: SplitDirection,
    pub rect: Rect,
}

/// The result of one layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DockLayout {
    /// Content rectangle per visible panel id. Inactive tabs have no
    /// rectangle; while a panel is maximized only it appears here.
    pub panel_rects: HashMap<String, Rect>,
    /// Header rectangle per leaf panel and tab group, keyed by the
    /// panel/group id; feeds the drop classifier
    pub header_rects: HashMap<String, Rect>,
    /// Divider bars for resize hit-testing
    pub dividers: Vec<DividerBar>,
}

impl DockLayout {
    /// Panel whose content rectangle contains the point, if any
    pub fn panel_at(&self, x: f64, y: f64) -> Option<&str> {
        self.panel_rects
            .iter()
            .find(|(_, rect)| rect.contains(crate::geometry::Point::new(x, y)))
            .map(|(id, _)| id.as_str())
    }

    /// Divider whose bar contains the point, if any
    pub fn divider_at(&self, x: f64, y: f64) -> Option<&DividerBar> {
        self.dividers
            .iter()
            .find(|d| d.rect.contains(crate::geometry::Point::new(x, y)))
    }
}

/// Compute the layout of a dock state within `available`.
///
/// A maximized panel takes the whole rectangle and suppresses
/// everything else, matching what the host renders.
pub fn compute_layout(state: &DockState, available: Rect) -> DockLayout {
    let mut layout = DockLayout::default();

    if let Some(max_id) = &state.maximized_panel_id {
        if state.root.find_panel(max_id).is_some() {
            let header = header_slice(available);
            layout.header_rects.insert(max_id.clone(), header);
            layout
                .panel_rects
                .insert(max_id.clone(), content_slice(available));
            return layout;
        }
    }

    layout_node(&state.root, available, &mut layout);
    layout
}

fn header_slice(rect: Rect) -> Rect {
    Rect::new(rect.x, rect.y, rect.width, TAB_HEADER_HEIGHT.min(rect.height))
}

fn content_slice(rect: Rect) -> Rect {
    let header = TAB_HEADER_HEIGHT.min(rect.height);
    Rect::new(rect.x, rect.y + header, rect.width, rect.height - header)
}

fn layout_node(node: &DockNode, rect: Rect, out: &mut DockLayout) {
    match node {
        DockNode::Panel(panel) => {
            out.header_rects.insert(panel.id.clone(), header_slice(rect));
            out.panel_rects.insert(panel.id.clone(), content_slice(rect));
        }
        DockNode::Tabs(group) => {
            out.header_rects.insert(group.id.clone(), header_slice(rect));
            if let Some(active) = group.active_panel() {
                out.panel_rects
                    .insert(active.id.clone(), content_slice(rect));
            }
        }
        DockNode::Split(split) => {
            let (first_rect, second_rect, divider_rect) = match split.direction {
                SplitDirection::Horizontal => {
                    let first_width = rect.width * split.size;
                    (
                        Rect::new(rect.x, rect.y, first_width, rect.height),
                        Rect::new(
                            rect.x + first_width,
                            rect.y,
                            rect.width - first_width,
                            rect.height,
                        ),
                        Rect::new(
                            rect.x + first_width - DIVIDER_WIDTH / 2.0,
                            rect.y,
                            DIVIDER_WIDTH,
                            rect.height,
                        ),
                    )
                }
                SplitDirection::Vertical => {
                    let first_height = rect.height * split.size;
                    (
                        Rect::new(rect.x, rect.y, rect.width, first_height),
                        Rect::new(
                            rect.x,
                            rect.y + first_height,
                            rect.width,
                            rect.height - first_height,
                        ),
                        Rect::new(
                            rect.x,
                            rect.y + first_height - DIVIDER_WIDTH / 2.0,
                            rect.width,
                            DIVIDER_WIDTH,
                        ),
                    )
                }
            };

            out.dividers.push(DividerBar {
                split_id: split.id.clone(),
                direction: split.direction,
                rect: divider_rect,
            });
            layout_node(&split.first, first_rect, out);
            layout_node(&split.second, second_rect, out);
        }
    }
}
