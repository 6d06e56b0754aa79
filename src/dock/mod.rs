//! Dock-tree manager: recursive panel/split/tab layout with an event bus
//!
//! # Architecture
//!
//! - `node` - the tree variants and the serializable state snapshot
//! - `events` - typed event bus with subscribe/unsubscribe tokens
//! - `manager` - mutations, normalisation, and invariant checking
//! - `layout` - rectangle assignment and divider bars for hit-testing

mod events;
mod layout;
mod manager;
mod node;

pub use events::{DockEvent, EventBus, Subscription};
pub use layout::{compute_layout, DividerBar, DockLayout, DIVIDER_WIDTH, TAB_HEADER_HEIGHT};
pub use manager::DockManager;
pub use node::{DockNode, DockState, Panel, Split, SplitDirection, TabGroup};
