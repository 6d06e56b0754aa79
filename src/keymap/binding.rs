//! Hotkey binding: a keystroke mapped to a command

use super::command::Command;
use super::types::{Keystroke, Platform};

/// A single hotkey binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub keystroke: Keystroke,
    pub command: Command,
    /// Shown in hotkey listings next to the formatted keystroke
    pub description: String,
}

impl HotkeyBinding {
    pub fn new(keystroke: Keystroke, command: Command) -> Self {
        let description = command.description();
        Self {
            keystroke,
            command,
            description,
        }
    }

    /// Formatted keystroke for display, e.g. `Ctrl+Shift+Z` or `⌘⇧Z`
    pub fn display_string(&self, platform: Platform) -> String {
        self.keystroke.display_string(platform)
    }
}
