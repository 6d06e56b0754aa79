//! easel - core layout and docking engine for a drawing workspace
//!
//! This crate provides the state management behind an in-browser
//! drawing workspace: a recursive dock tree of panels, splits, and tab
//! groups; a file tree with O(1) path lookup and range selection; the
//! drop-position classifier shared by both; per-panel stroke history;
//! a hotkey dispatcher; and a pluggable byte store for persistence.
//!
//! The engine is deliberately headless: input interpretation and state
//! live here, rendering and real I/O live with the host.

pub mod config;
pub mod content;
pub mod dock;
pub mod drag;
pub mod drawing;
pub mod geometry;
pub mod history;
pub mod ident;
pub mod keymap;
pub mod storage;
pub mod trace;
pub mod tree;

// Re-export commonly used types
pub use config::WorkspaceConfig;
pub use content::{ContentDescriptor, ContentKind, ContentRegistry, WorkspaceBinding};
pub use dock::{DockEvent, DockManager, DockNode, DockState, Panel, SplitDirection};
pub use drag::{DragGesture, DropIntent};
pub use drawing::{DrawingFile, Stroke, StrokePoint};
pub use geometry::{DropPosition, Point, Rect, TreeDropPosition};
pub use history::DrawingHistory;
pub use keymap::{Command, Keymap, Keystroke};
pub use storage::{FileStore, StoreError};
pub use tree::FileTree;
