//! Keymap: stores hotkey bindings and dispatches key events
//!
//! Dispatch is scoped: when the event target is a text-entry control the
//! keymap stays out of the way (everything except Escape passes through
//! to the control). A matching event is reported as consumed so the host
//! can prevent default handling and stop propagation.

use tracing::debug;

use super::binding::HotkeyBinding;
use super::command::Command;
use super::types::{KeyCode, Keystroke, Platform};

/// Where a key event originated, as far as dispatch scoping cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchTarget {
    /// True when the event target is a text input, text area, or
    /// content-editable element
    pub is_text_entry: bool,
}

impl DispatchTarget {
    pub const TEXT_ENTRY: DispatchTarget = DispatchTarget {
        is_text_entry: true,
    };
}

/// Outcome of dispatching one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A binding matched; the event is consumed (default prevented,
    /// propagation stopped)
    Handled(Command),
    /// No binding matched; the host handles the event normally
    Unhandled,
}

impl Dispatch {
    pub fn command(&self) -> Option<Command> {
        match self {
            Dispatch::Handled(command) => Some(*command),
            Dispatch::Unhandled => None,
        }
    }
}

/// The keymap stores all bindings and handles lookup
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<HotkeyBinding>,
    platform: Platform,
    enabled: bool,
}

impl Keymap {
    /// Create an empty keymap for the current platform
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Create an empty keymap for an explicit platform (tests, hosts
    /// that know better)
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            bindings: Vec::new(),
            platform,
            enabled: true,
        }
    }

    /// Create a keymap pre-populated with bindings
    pub fn with_bindings(platform: Platform, bindings: Vec<HotkeyBinding>) -> Self {
        let mut keymap = Self::for_platform(platform);
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Registered bindings, in registration order
    pub fn bindings(&self) -> &[HotkeyBinding] {
        &self.bindings
    }

    /// Add a binding. Returns false (and keeps the keymap unchanged)
    /// when another binding would match the same keystroke; at most one
    /// binding may match any event.
    pub fn add_binding(&mut self, binding: HotkeyBinding) -> bool {
        let collision = self
            .bindings
            .iter()
            .any(|b| binding.keystroke.matches(&b.keystroke, self.platform));
        if collision {
            debug!(
                keystroke = %binding.keystroke.display_string(self.platform),
                "rejected conflicting hotkey binding"
            );
            return false;
        }
        self.bindings.push(binding);
        true
    }

    /// Remove every binding for a command. Returns how many were removed.
    pub fn remove_command(&mut self, command: Command) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.command != command);
        before - self.bindings.len()
    }

    /// Enable or disable dispatch wholesale (scoped installs use this
    /// when their element loses focus)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Dispatch one key event.
    ///
    /// Suppressed while disabled, and for text-entry targets unless the
    /// key is Escape. Otherwise the first (and by construction only)
    /// matching binding wins.
    pub fn dispatch(&self, keystroke: Keystroke, target: DispatchTarget) -> Dispatch {
        if !self.enabled {
            return Dispatch::Unhandled;
        }
        if target.is_text_entry && keystroke.key != KeyCode::Escape {
            return Dispatch::Unhandled;
        }

        for binding in &self.bindings {
            if keystroke.matches(&binding.keystroke, self.platform) {
                debug!(command = %binding.command, "hotkey dispatched");
                return Dispatch::Handled(binding.command);
            }
        }
        Dispatch::Unhandled
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::with_bindings(Platform::current(), super::defaults::default_bindings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::Modifiers;

    fn keymap() -> Keymap {
        Keymap::with_bindings(
            Platform::Other,
            vec![
                HotkeyBinding::new(
                    Keystroke::char_with_mods('z', Modifiers::CTRL),
                    Command::Undo,
                ),
                HotkeyBinding::new(Keystroke::new(KeyCode::Escape, Modifiers::NONE), Command::EraserTool),
            ],
        )
    }

    #[test]
    fn test_dispatch_matches() {
        let km = keymap();
        let stroke = Keystroke::char_with_mods('z', Modifiers::CTRL);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::default()),
            Dispatch::Handled(Command::Undo)
        );
    }

    #[test]
    fn test_dispatch_requires_exact_modifiers() {
        let km = keymap();
        let stroke = Keystroke::char_with_mods('z', Modifiers::CTRL | Modifiers::ALT);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::default()),
            Dispatch::Unhandled
        );
    }

    #[test]
    fn test_text_entry_suppression() {
        let km = keymap();
        let stroke = Keystroke::char_with_mods('z', Modifiers::CTRL);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::TEXT_ENTRY),
            Dispatch::Unhandled
        );
    }

    #[test]
    fn test_escape_pierces_text_entry() {
        let km = keymap();
        let escape = Keystroke::new(KeyCode::Escape, Modifiers::NONE);
        assert_eq!(
            km.dispatch(escape, DispatchTarget::TEXT_ENTRY),
            Dispatch::Handled(Command::EraserTool)
        );
    }

    #[test]
    fn test_disabled_keymap_ignores_everything() {
        let mut km = keymap();
        km.set_enabled(false);
        let stroke = Keystroke::char_with_mods('z', Modifiers::CTRL);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::default()),
            Dispatch::Unhandled
        );
    }

    #[test]
    fn test_conflicting_binding_rejected() {
        let mut km = keymap();
        let dup = HotkeyBinding::new(
            Keystroke::char_with_mods('z', Modifiers::CTRL),
            Command::Redo,
        );
        assert!(!km.add_binding(dup));
        // Original binding still wins
        let stroke = Keystroke::char_with_mods('z', Modifiers::CTRL);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::default()),
            Dispatch::Handled(Command::Undo)
        );
    }

    #[test]
    fn test_macos_meta_triggers_ctrl_binding() {
        let km = Keymap::with_bindings(
            Platform::MacOs,
            vec![HotkeyBinding::new(
                Keystroke::char_with_mods('s', Modifiers::CTRL),
                Command::Save,
            )],
        );
        let stroke = Keystroke::char_with_mods('s', Modifiers::META);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::default()),
            Dispatch::Handled(Command::Save)
        );
    }

    #[test]
    fn test_remove_command() {
        let mut km = keymap();
        assert_eq!(km.remove_command(Command::Undo), 1);
        let stroke = Keystroke::char_with_mods('z', Modifiers::CTRL);
        assert_eq!(
            km.dispatch(stroke, DispatchTarget::default()),
            Dispatch::Unhandled
        );
    }
}
