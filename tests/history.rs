//! Integration tests for the drawing history engine

use easel::drawing::{Stroke, StrokePoint};
use easel::history::DrawingHistory;

fn strokes(ids: &[&str]) -> Vec<Stroke> {
    ids.iter()
        .map(|id| {
            Stroke::new(
                *id,
                vec![StrokePoint { x: 0.0, y: 0.0 }],
                "#112233",
                2.0,
            )
        })
        .collect()
}

fn stroke_ids(history: &DrawingHistory) -> Vec<String> {
    history
        .current()
        .unwrap_or(&[])
        .iter()
        .map(|s| s.id.clone())
        .collect()
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn push_undo_redo_round_trip() {
    let mut history = DrawingHistory::new();
    history.push(strokes(&["s1"]));
    history.push(strokes(&["s1", "s2"]));

    assert_eq!(stroke_ids(&history), vec!["s1", "s2"]);
    history.undo();
    assert_eq!(stroke_ids(&history), vec!["s1"]);
    history.redo();
    assert_eq!(stroke_ids(&history), vec!["s1", "s2"]);
}

// ============================================================================
// Scenario: dirtiness lifecycle
// ============================================================================

#[test]
fn dirtiness_scenario() {
    let mut history = DrawingHistory::new();

    // Loading marks the state clean
    history.initialize(strokes(&["s1"]));
    assert!(!history.is_dirty());
    assert!(!history.can_undo());

    // A new stroke dirties the drawing
    history.push(strokes(&["s1", "s2"]));
    assert!(history.is_dirty());
    assert!(history.can_undo());

    // Undoing back to the saved snapshot is clean again, by identity
    history.undo();
    assert_eq!(stroke_ids(&history), vec!["s1"]);
    assert!(!history.is_dirty());
    assert!(history.can_redo());

    // mark_saved on an already-clean state changes nothing
    history.mark_saved();
    assert!(!history.is_dirty());
    assert!(history.can_redo());
}

#[test]
fn save_mid_stack_then_redo_is_dirty() {
    let mut history = DrawingHistory::new();
    history.initialize(strokes(&["s1"]));
    history.push(strokes(&["s1", "s2"]));
    history.mark_saved();

    history.undo();
    assert!(history.is_dirty(), "behind the saved snapshot is dirty");
    history.redo();
    assert!(!history.is_dirty(), "back on the saved snapshot");
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn undo_stack_is_bounded() {
    let mut history = DrawingHistory::with_max_size(10);
    for i in 0..25 {
        history.push(strokes(&[&format!("s{}", i)]));
    }
    assert_eq!(history.len(), 10);
    assert_eq!(stroke_ids(&history), vec!["s24"]);

    // Undo bottoms out after max_size - 1 steps
    let mut undos = 0;
    while history.undo().is_some() {
        undos += 1;
    }
    assert_eq!(undos, 9);
    assert_eq!(stroke_ids(&history), vec!["s15"]);
}

#[test]
fn clear_resets_everything() {
    let mut history = DrawingHistory::new();
    history.initialize(strokes(&["s1"]));
    history.push(strokes(&["s1", "s2"]));
    history.undo();

    history.clear();
    assert!(history.is_empty());
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(!history.is_dirty());
}
