//! Hotkey system: keystroke types, bindings, defaults, and dispatch
//!
//! # Architecture
//!
//! - `types` - Keystroke, Modifiers, KeyCode, Platform
//! - `command` - commands a hotkey can trigger
//! - `binding` - a keystroke mapped to a command
//! - `keymap` - lookup, scoping, and dispatch
//! - `defaults` - the bindings that ship with the workspace

mod binding;
mod command;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod types;

pub use binding::HotkeyBinding;
pub use command::Command;
pub use defaults::default_bindings;
pub use keymap::{Dispatch, DispatchTarget, Keymap};
pub use types::{KeyCode, Keystroke, Modifiers, Platform};
