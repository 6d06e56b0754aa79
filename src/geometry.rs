//! Centralized geometry helpers for drop-intent classification
//!
//! This module provides a single source of truth for converting pointer
//! coordinates and target geometry into discrete drop intents, shared by
//! the dock tree and the file tree.
//!
//! All functions here are pure (no I/O, no side effects) and can be
//! tested independently of any rendering infrastructure.

use serde::{Deserialize, Serialize};

// ============================================================================
// Layout Primitives
// ============================================================================

/// A point in workspace coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle for layout calculations and hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Centre point
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment test: left/top edges inclusive
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

// ============================================================================
// Drop Intents
// ============================================================================

/// Discrete classification of a drag gesture's effect on the dock tree.
///
/// The serialized names (`top`, `tab-before`, ...) are stable at the
/// public edge and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropPosition {
    Top,
    Right,
    Bottom,
    Left,
    TabBefore,
    TabAfter,
    TabInto,
}

impl DropPosition {
    /// Stable wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DropPosition::Top => "top",
            DropPosition::Right => "right",
            DropPosition::Bottom => "bottom",
            DropPosition::Left => "left",
            DropPosition::TabBefore => "tab-before",
            DropPosition::TabAfter => "tab-after",
            DropPosition::TabInto => "tab-into",
        }
    }

    /// True for the four edge-split intents
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            DropPosition::Top | DropPosition::Right | DropPosition::Bottom | DropPosition::Left
        )
    }

    /// True for the three tab intents
    pub fn is_tab(&self) -> bool {
        matches!(
            self,
            DropPosition::TabBefore | DropPosition::TabAfter | DropPosition::TabInto
        )
    }
}

/// Drop intent for file-tree rows (hierarchical reorder)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeDropPosition {
    Before,
    Inside,
    After,
}

/// Result of classifying a pointer against an ordered tab strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStripHit {
    /// Index of the tab the intent targets
    pub index: usize,
    /// Either `TabBefore` or `TabAfter`, relative to that tab
    pub position: DropPosition,
}

// ============================================================================
// Classifier Thresholds
// ============================================================================

/// Distance from a tab's centre beyond which the pointer has "escaped"
/// the tab and container-edge intents are considered
pub const TAB_ESCAPE_DISTANCE: f64 = 30.0;

/// Width of the container-edge zone that turns an escaped tab drag into
/// an edge split
pub const CONTAINER_EDGE_ZONE: f64 = 20.0;

// ============================================================================
// Panel Drop
// ============================================================================

/// Classify a pointer over a panel.
///
/// A hit inside the header rectangle (when present) stacks the dragged
/// panel as a tab. Otherwise the nearest edge of the panel wins, ties
/// broken in the order top, bottom, left, right.
pub fn classify_panel_drop(pointer: Point, rect: Rect, header: Option<Rect>) -> DropPosition {
    if let Some(header) = header {
        if header.contains(pointer) {
            return DropPosition::TabInto;
        }
    }

    // Distances to each edge; tie order is top, bottom, left, right
    let candidates = [
        (DropPosition::Top, pointer.y - rect.y),
        (DropPosition::Bottom, rect.bottom() - pointer.y),
        (DropPosition::Left, pointer.x - rect.x),
        (DropPosition::Right, rect.right() - pointer.x),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

// ============================================================================
// Single-Tab Drop
// ============================================================================

/// Classify a pointer over a single tab element.
///
/// When the pointer has moved well away from the tab centre and sits
/// near an edge of the enclosing container, the intent becomes an edge
/// split on that container. Otherwise the tab is partitioned into
/// horizontal thirds: before / into / after.
pub fn classify_tab_drop(pointer: Point, tab: Rect, container: Option<Rect>) -> DropPosition {
    if let Some(container) = container {
        let center = tab.center();
        let escaped = (pointer.x - center.x).abs() > TAB_ESCAPE_DISTANCE
            || (pointer.y - center.y).abs() > TAB_ESCAPE_DISTANCE;

        if escaped {
            // Nearest container edge within the zone wins; tie order
            // follows the left, right, top, bottom listing.
            let edges = [
                (DropPosition::Left, pointer.x - container.x),
                (DropPosition::Right, container.right() - pointer.x),
                (DropPosition::Top, pointer.y - container.y),
                (DropPosition::Bottom, container.bottom() - pointer.y),
            ];
            let mut best: Option<(DropPosition, f64)> = None;
            for (edge, dist) in edges {
                if dist <= CONTAINER_EDGE_ZONE && best.map_or(true, |(_, d)| dist < d) {
                    best = Some((edge, dist));
                }
            }
            if let Some((edge, _)) = best {
                return edge;
            }
        }
    }

    let third = tab.width / 3.0;
    if pointer.x < tab.x + third {
        DropPosition::TabBefore
    } else if pointer.x >= tab.x + 2.0 * third {
        DropPosition::TabAfter
    } else {
        DropPosition::TabInto
    }
}

// ============================================================================
// Tab-Header Drop
// ============================================================================

/// Classify a pointer's x position against a left-to-right ordered tab strip.
///
/// Returns `None` for an empty strip. Inside a tab the thirds rule
/// applies, except that a right-third hit on the last tab yields
/// `TabAfter` on that tab rather than `TabBefore` on a non-existent
/// next one. In the gap between two tabs the midpoint decides between
/// `TabAfter` on the previous tab and `TabBefore` on the next.
pub fn classify_tab_header_drop(x: f64, tabs: &[Rect]) -> Option<TabStripHit> {
    if tabs.is_empty() {
        return None;
    }
    let last = tabs.len() - 1;

    if x < tabs[0].x {
        return Some(TabStripHit {
            index: 0,
            position: DropPosition::TabBefore,
        });
    }
    if x >= tabs[last].right() {
        return Some(TabStripHit {
            index: last,
            position: DropPosition::TabAfter,
        });
    }

    for (i, tab) in tabs.iter().enumerate() {
        if x >= tab.x && x < tab.right() {
            let third = tab.width / 3.0;
            if x < tab.x + third {
                return Some(TabStripHit {
                    index: i,
                    position: DropPosition::TabBefore,
                });
            }
            if x >= tab.x + 2.0 * third {
                // Right third: insertion point after this tab. Expressed
                // as before-the-next except on the last tab.
                return Some(if i == last {
                    TabStripHit {
                        index: i,
                        position: DropPosition::TabAfter,
                    }
                } else {
                    TabStripHit {
                        index: i + 1,
                        position: DropPosition::TabBefore,
                    }
                });
            }
            return Some(TabStripHit {
                index: i,
                position: DropPosition::TabInto,
            });
        }

        // Gap between tab i and tab i+1
        if i < last {
            let next = &tabs[i + 1];
            if x >= tab.right() && x < next.x {
                let midpoint = (tab.right() + next.x) / 2.0;
                return Some(if x < midpoint {
                    TabStripHit {
                        index: i,
                        position: DropPosition::TabAfter,
                    }
                } else {
                    TabStripHit {
                        index: i + 1,
                        position: DropPosition::TabBefore,
                    }
                });
            }
        }
    }

    None
}

// ============================================================================
// File-Tree Row Drop
// ============================================================================

/// Classify a pointer's y position against a file-tree row.
///
/// Files have no "inside" zone and split 50/50. Folders split 30/40/30
/// so the middle band drops into the folder.
pub fn classify_row_drop(y: f64, row: Rect, is_folder: bool) -> TreeDropPosition {
    let rel = (y - row.y) / row.height;
    if is_folder {
        if rel < 0.3 {
            TreeDropPosition::Before
        } else if rel < 0.7 {
            TreeDropPosition::Inside
        } else {
            TreeDropPosition::After
        }
    } else if rel < 0.5 {
        TreeDropPosition::Before
    } else {
        TreeDropPosition::After
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_panel_drop_header_wins() {
        let header = Rect::new(0.0, 0.0, 100.0, 20.0);
        let pos = classify_panel_drop(Point::new(50.0, 50.0), panel(), Some(header));
        // Pointer is outside the header, centre is equidistant -> top by tie order
        assert_eq!(pos, DropPosition::Top);

        let pos = classify_panel_drop(Point::new(50.0, 10.0), panel(), Some(header));
        assert_eq!(pos, DropPosition::TabInto);
    }

    #[test]
    fn test_panel_drop_nearest_edge() {
        assert_eq!(
            classify_panel_drop(Point::new(50.0, 5.0), panel(), None),
            DropPosition::Top
        );
        assert_eq!(
            classify_panel_drop(Point::new(95.0, 50.0), panel(), None),
            DropPosition::Right
        );
        assert_eq!(
            classify_panel_drop(Point::new(50.0, 95.0), panel(), None),
            DropPosition::Bottom
        );
        assert_eq!(
            classify_panel_drop(Point::new(5.0, 50.0), panel(), None),
            DropPosition::Left
        );
    }

    #[test]
    fn test_panel_drop_tie_order() {
        // Exact centre: all four distances equal, top wins
        assert_eq!(
            classify_panel_drop(Point::new(50.0, 50.0), panel(), None),
            DropPosition::Top
        );
    }

    #[test]
    fn test_tab_drop_thirds() {
        let tab = Rect::new(100.0, 0.0, 90.0, 30.0);
        assert_eq!(
            classify_tab_drop(Point::new(110.0, 15.0), tab, None),
            DropPosition::TabBefore
        );
        assert_eq!(
            classify_tab_drop(Point::new(145.0, 15.0), tab, None),
            DropPosition::TabInto
        );
        assert_eq!(
            classify_tab_drop(Point::new(180.0, 15.0), tab, None),
            DropPosition::TabAfter
        );
    }

    #[test]
    fn test_tab_drop_container_edge_escape() {
        let tab = Rect::new(200.0, 0.0, 90.0, 30.0);
        let container = Rect::new(0.0, 0.0, 600.0, 400.0);

        // Far below the tab centre, near the container's bottom edge
        let pos = classify_tab_drop(Point::new(245.0, 390.0), tab, Some(container));
        assert_eq!(pos, DropPosition::Bottom);

        // Far from the tab but nowhere near a container edge: thirds rule
        let pos = classify_tab_drop(Point::new(245.0, 200.0), tab, Some(container));
        assert_eq!(pos, DropPosition::TabInto);
    }

    #[test]
    fn test_tab_drop_escape_requires_distance() {
        let tab = Rect::new(0.0, 0.0, 90.0, 30.0);
        let container = Rect::new(0.0, 0.0, 600.0, 400.0);

        // Within 30px of the tab centre: container edges are ignored even
        // though the pointer is inside the edge zone
        let pos = classify_tab_drop(Point::new(45.0, 10.0), tab, Some(container));
        assert_eq!(pos, DropPosition::TabInto);
    }

    #[test]
    fn test_tab_header_before_first_and_after_last() {
        let tabs = [
            Rect::new(10.0, 0.0, 60.0, 30.0),
            Rect::new(72.0, 0.0, 60.0, 30.0),
        ];
        assert_eq!(
            classify_tab_header_drop(2.0, &tabs),
            Some(TabStripHit {
                index: 0,
                position: DropPosition::TabBefore
            })
        );
        assert_eq!(
            classify_tab_header_drop(140.0, &tabs),
            Some(TabStripHit {
                index: 1,
                position: DropPosition::TabAfter
            })
        );
    }

    #[test]
    fn test_tab_header_right_third_maps_to_next() {
        let tabs = [
            Rect::new(0.0, 0.0, 60.0, 30.0),
            Rect::new(60.0, 0.0, 60.0, 30.0),
        ];
        // Right third of the first tab inserts before the second
        assert_eq!(
            classify_tab_header_drop(55.0, &tabs),
            Some(TabStripHit {
                index: 1,
                position: DropPosition::TabBefore
            })
        );
        // Right third of the last tab stays after the last tab
        assert_eq!(
            classify_tab_header_drop(115.0, &tabs),
            Some(TabStripHit {
                index: 1,
                position: DropPosition::TabAfter
            })
        );
    }

    #[test]
    fn test_tab_header_gap_midpoint() {
        let tabs = [
            Rect::new(0.0, 0.0, 50.0, 30.0),
            Rect::new(70.0, 0.0, 50.0, 30.0),
        ];
        assert_eq!(
            classify_tab_header_drop(55.0, &tabs),
            Some(TabStripHit {
                index: 0,
                position: DropPosition::TabAfter
            })
        );
        assert_eq!(
            classify_tab_header_drop(65.0, &tabs),
            Some(TabStripHit {
                index: 1,
                position: DropPosition::TabBefore
            })
        );
    }

    #[test]
    fn test_tab_header_empty() {
        assert_eq!(classify_tab_header_drop(10.0, &[]), None);
    }

    #[test]
    fn test_row_drop_file_halves() {
        let row = Rect::new(0.0, 100.0, 200.0, 20.0);
        assert_eq!(
            classify_row_drop(104.0, row, false),
            TreeDropPosition::Before
        );
        assert_eq!(
            classify_row_drop(116.0, row, false),
            TreeDropPosition::After
        );
    }

    #[test]
    fn test_row_drop_folder_bands() {
        let row = Rect::new(0.0, 100.0, 200.0, 20.0);
        assert_eq!(
            classify_row_drop(102.0, row, true),
            TreeDropPosition::Before
        );
        assert_eq!(
            classify_row_drop(110.0, row, true),
            TreeDropPosition::Inside
        );
        assert_eq!(classify_row_drop(118.0, row, true), TreeDropPosition::After);
    }

    #[test]
    fn test_drop_position_wire_names() {
        assert_eq!(DropPosition::Top.as_str(), "top");
        assert_eq!(DropPosition::TabBefore.as_str(), "tab-before");
        assert_eq!(DropPosition::TabInto.as_str(), "tab-into");
        // serde names match as_str
        let json = serde_json::to_string(&DropPosition::TabAfter).unwrap();
        assert_eq!(json, "\"tab-after\"");
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(5.0, 10.0)));
    }
}
