//! Integration tests for the drop-position classifier
//!
//! The classifier is a pure function of pointer coordinates for fixed
//! geometry; these tests pin the documented scenarios and determinism.

use easel::geometry::{
    classify_panel_drop, classify_row_drop, classify_tab_drop, classify_tab_header_drop,
    DropPosition, Point, Rect, TreeDropPosition,
};

// ============================================================================
// Scenario: 100x100 panel with a 20px header
// ============================================================================

#[test]
fn panel_drop_scenario() {
    let panel = Rect::new(0.0, 0.0, 100.0, 100.0);
    let header = Rect::new(0.0, 0.0, 100.0, 20.0);

    // Pointer in the header stacks as a tab
    assert_eq!(
        classify_panel_drop(Point::new(50.0, 10.0), panel, Some(header)),
        DropPosition::TabInto
    );
    // Near the top edge but below the header: top
    assert_eq!(
        classify_panel_drop(Point::new(50.0, 5.0), panel, None),
        DropPosition::Top
    );
    // Near the right edge: right
    assert_eq!(
        classify_panel_drop(Point::new(95.0, 50.0), panel, Some(header)),
        DropPosition::Right
    );
}

#[test]
fn panel_drop_is_deterministic() {
    let panel = Rect::new(10.0, 20.0, 300.0, 200.0);
    for (x, y) in [(15.0, 100.0), (300.0, 100.0), (150.0, 25.0), (150.0, 210.0)] {
        let first = classify_panel_drop(Point::new(x, y), panel, None);
        for _ in 0..10 {
            assert_eq!(classify_panel_drop(Point::new(x, y), panel, None), first);
        }
    }
}

#[test]
fn panel_drop_covers_all_edges() {
    let panel = Rect::new(0.0, 0.0, 200.0, 100.0);
    assert_eq!(
        classify_panel_drop(Point::new(100.0, 10.0), panel, None),
        DropPosition::Top
    );
    assert_eq!(
        classify_panel_drop(Point::new(100.0, 90.0), panel, None),
        DropPosition::Bottom
    );
    assert_eq!(
        classify_panel_drop(Point::new(10.0, 50.0), panel, None),
        DropPosition::Left
    );
    assert_eq!(
        classify_panel_drop(Point::new(190.0, 50.0), panel, None),
        DropPosition::Right
    );
}

// ============================================================================
// Single-tab classification
// ============================================================================

#[test]
fn tab_drop_thirds_and_escape() {
    let tab = Rect::new(100.0, 10.0, 90.0, 30.0);
    let container = Rect::new(0.0, 0.0, 800.0, 600.0);

    // Thirds while near the tab
    assert_eq!(
        classify_tab_drop(Point::new(105.0, 25.0), tab, Some(container)),
        DropPosition::TabBefore
    );
    assert_eq!(
        classify_tab_drop(Point::new(145.0, 25.0), tab, Some(container)),
        DropPosition::TabInto
    );
    assert_eq!(
        classify_tab_drop(Point::new(185.0, 25.0), tab, Some(container)),
        DropPosition::TabAfter
    );

    // Escaped to a container edge
    assert_eq!(
        classify_tab_drop(Point::new(145.0, 590.0), tab, Some(container)),
        DropPosition::Bottom
    );
    assert_eq!(
        classify_tab_drop(Point::new(10.0, 300.0), tab, Some(container)),
        DropPosition::Left
    );
}

// ============================================================================
// Tab-header strip classification
// ============================================================================

#[test]
fn tab_header_strip_full_sweep() {
    let tabs = [
        Rect::new(0.0, 0.0, 60.0, 30.0),
        Rect::new(60.0, 0.0, 60.0, 30.0),
        Rect::new(120.0, 0.0, 60.0, 30.0),
    ];

    // Left of everything
    let hit = classify_tab_header_drop(-5.0, &tabs).unwrap();
    assert_eq!((hit.index, hit.position), (0, DropPosition::TabBefore));

    // Middle third of the second tab
    let hit = classify_tab_header_drop(90.0, &tabs).unwrap();
    assert_eq!((hit.index, hit.position), (1, DropPosition::TabInto));

    // Right third of the second tab resolves to before-the-third
    let hit = classify_tab_header_drop(115.0, &tabs).unwrap();
    assert_eq!((hit.index, hit.position), (2, DropPosition::TabBefore));

    // Right third of the last tab stays after-the-last
    let hit = classify_tab_header_drop(175.0, &tabs).unwrap();
    assert_eq!((hit.index, hit.position), (2, DropPosition::TabAfter));

    // Right of everything
    let hit = classify_tab_header_drop(500.0, &tabs).unwrap();
    assert_eq!((hit.index, hit.position), (2, DropPosition::TabAfter));
}

// ============================================================================
// File-tree rows
// ============================================================================

#[test]
fn file_rows_have_no_inside_zone() {
    let row = Rect::new(0.0, 0.0, 200.0, 20.0);
    assert_eq!(classify_row_drop(9.9, row, false), TreeDropPosition::Before);
    assert_eq!(classify_row_drop(10.0, row, false), TreeDropPosition::After);
}

#[test]
fn folder_rows_split_30_40_30() {
    let row = Rect::new(0.0, 0.0, 200.0, 100.0);
    assert_eq!(classify_row_drop(29.0, row, true), TreeDropPosition::Before);
    assert_eq!(classify_row_drop(30.0, row, true), TreeDropPosition::Inside);
    assert_eq!(classify_row_drop(69.0, row, true), TreeDropPosition::Inside);
    assert_eq!(classify_row_drop(70.0, row, true), TreeDropPosition::After);
}

// ============================================================================
// Wire names
// ============================================================================

#[test]
fn drop_intent_vocabulary_is_stable() {
    let expected = [
        (DropPosition::Top, "top"),
        (DropPosition::Right, "right"),
        (DropPosition::Bottom, "bottom"),
        (DropPosition::Left, "left"),
        (DropPosition::TabBefore, "tab-before"),
        (DropPosition::TabAfter, "tab-after"),
        (DropPosition::TabInto, "tab-into"),
    ];
    for (position, name) in expected {
        assert_eq!(position.as_str(), name);
        assert_eq!(
            serde_json::to_string(&position).unwrap(),
            format!("\"{}\"", name)
        );
    }
}
