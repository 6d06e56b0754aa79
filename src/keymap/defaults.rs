//! Default hotkey bindings for the drawing workspace

use super::binding::HotkeyBinding;
use super::command::Command;
use super::types::{KeyCode, Keystroke, Modifiers};

/// The standard bindings that ship with the workspace.
///
/// `ctrl` requirements are satisfied by cmd on macOS via the keymap's
/// platform handling; the bindings themselves are platform-neutral.
pub fn default_bindings() -> Vec<HotkeyBinding> {
    let ctrl = Modifiers::CTRL;
    let ctrl_shift = Modifiers::CTRL | Modifiers::SHIFT;
    let shift = Modifiers::SHIFT;
    let none = Modifiers::NONE;

    let mut bindings = vec![
        // ====================================================================
        // Tools
        // ====================================================================
        bind_char('p', none, Command::PencilTool),
        bind_char('e', none, Command::EraserTool),
        // ====================================================================
        // Undo/Redo
        // ====================================================================
        bind_char('z', ctrl, Command::Undo),
        bind_char('z', ctrl_shift, Command::Redo),
        bind_char('y', ctrl, Command::Redo), // Alternative
        // ====================================================================
        // File
        // ====================================================================
        bind_char('s', ctrl, Command::Save),
        HotkeyBinding::new(
            Keystroke::new(KeyCode::Delete, ctrl),
            Command::ClearCanvas,
        ),
    ];

    // Brush sizes on the plain digit row
    for n in 1..=5u8 {
        bindings.push(bind_char(digit(n), none, Command::BrushSize(n)));
    }

    // Colour slots on shift+digit
    for n in 1..=8u8 {
        bindings.push(bind_char(digit(n), shift, Command::ColorSlot(n)));
    }

    bindings
}

fn bind_char(c: char, mods: Modifiers, command: Command) -> HotkeyBinding {
    HotkeyBinding::new(Keystroke::char_with_mods(c, mods), command)
}

fn digit(n: u8) -> char {
    (b'0' + n) as char
}
