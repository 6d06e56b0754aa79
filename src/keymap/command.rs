//! Commands that hotkeys can trigger

use std::fmt;

/// A workspace command bound to a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch to the pencil tool
    PencilTool,
    /// Switch to the eraser tool
    EraserTool,
    Undo,
    Redo,
    /// Save the active drawing
    Save,
    /// Clear the active canvas
    ClearCanvas,
    /// Select brush size 1-5
    BrushSize(u8),
    /// Select colour slot 1-8
    ColorSlot(u8),
}

impl Command {
    /// Human-readable description for hotkey listings
    pub fn description(&self) -> String {
        match self {
            Command::PencilTool => "Pencil tool".to_string(),
            Command::EraserTool => "Eraser tool".to_string(),
            Command::Undo => "Undo".to_string(),
            Command::Redo => "Redo".to_string(),
            Command::Save => "Save drawing".to_string(),
            Command::ClearCanvas => "Clear canvas".to_string(),
            Command::BrushSize(n) => format!("Brush size {}", n),
            Command::ColorSlot(n) => format!("Colour slot {}", n),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
