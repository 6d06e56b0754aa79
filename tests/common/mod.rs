//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use easel::dock::{DockEvent, DockManager};
use easel::tree::FileTree;

/// A manager holding a single panel titled "A"; returns (manager, panel id)
pub fn single_panel() -> (DockManager, String) {
    let mut manager = DockManager::new();
    let id = manager.root().id().to_string();
    manager.update_panel_title(&id, "A");
    (manager, id)
}

/// A manager holding Split{horizontal, A, B, 0.5}; returns ids of A and B
pub fn two_panel_split() -> (DockManager, String, String) {
    let (mut manager, a) = single_panel();
    let b = manager.add_panel(None, Some("B"));
    (manager, a, b)
}

/// A manager whose root is a three-tab group [A, B, C], active A
pub fn three_tab_group() -> (DockManager, String, String, String) {
    let (mut manager, a) = single_panel();
    let b = manager.add_tab(&a, None, Some("B")).unwrap();
    let c = manager.add_tab(&b, None, Some("C")).unwrap();
    manager.activate_panel(&a);
    (manager, a, b, c)
}

/// Subscribe a recorder that collects event names in order
pub fn record_events(manager: &DockManager) -> Rc<RefCell<Vec<&'static str>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    manager.subscribe(move |event: &DockEvent| sink.borrow_mut().push(event.name()));
    seen
}

/// The fixture file tree used across tests:
/// ```text
/// (root)
///   src/
///     util/
///       helpers.draw
///     main.draw
///   readme.draw
/// ```
pub fn fixture_tree() -> FileTree {
    let mut tree = FileTree::new();
    tree.add_folder("", "src").unwrap();
    tree.add_folder("src", "util").unwrap();
    tree.add_file("src/util", "helpers.draw", serde_json::Value::Null)
        .unwrap();
    tree.add_file("src", "main.draw", serde_json::Value::Null)
        .unwrap();
    tree.add_file("", "readme.draw", serde_json::Value::Null)
        .unwrap();
    tree
}
