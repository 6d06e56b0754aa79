//! Core types for the hotkey system: Keystroke, Modifiers, KeyCode

use std::fmt;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win elsewhere

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Fold meta into ctrl, used on macOS where either side of the
    /// ctrl/cmd pair satisfies a `ctrl` requirement
    pub(crate) const fn fold_meta_into_ctrl(self) -> Modifiers {
        if self.meta() {
            Modifiers((self.0 & 0b0111) | 0b0001)
        } else {
            self
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Host platform, which decides modifier equivalence and display style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// A key code representing a logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,
}

impl KeyCode {
    /// Parse a key name, case-insensitively. Single characters map to
    /// `Char`; everything else must be a known named key.
    pub fn parse(name: &str) -> Option<KeyCode> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c.to_ascii_lowercase()));
        }
        match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Some(KeyCode::Enter),
            "escape" | "esc" => Some(KeyCode::Escape),
            "tab" => Some(KeyCode::Tab),
            "backspace" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "space" => Some(KeyCode::Space),
            "up" | "arrowup" => Some(KeyCode::Up),
            "down" | "arrowdown" => Some(KeyCode::Down),
            "left" | "arrowleft" => Some(KeyCode::Left),
            "right" | "arrowright" => Some(KeyCode::Right),
            _ => None,
        }
    }

    /// Short display label: `Delete` becomes `Del`, `Backspace` the
    /// erase symbol, characters are upper-cased
    pub fn display_label(&self) -> String {
        match self {
            KeyCode::Char(c) => c.to_uppercase().to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Escape => "Escape".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "⌫".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::Space => "Space".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// A character keystroke; the character is normalized to lowercase
    /// so matching is case-insensitive
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            mods,
        }
    }

    /// Whether this keystroke satisfies `required` on the given platform.
    ///
    /// Key names compare case-insensitively (characters are stored
    /// lowercased); modifiers must match exactly, except that on macOS
    /// ctrl and meta are interchangeable.
    pub fn matches(&self, required: &Keystroke, platform: Platform) -> bool {
        if self.key != required.key {
            return false;
        }
        match platform {
            Platform::MacOs => {
                self.mods.fold_meta_into_ctrl() == required.mods.fold_meta_into_ctrl()
            }
            Platform::Other => self.mods == required.mods,
        }
    }

    /// Platform-sensitive display string: `⌘⌥⇧` with no separator on
    /// macOS, `Ctrl`/`Alt`/`Shift` joined with `+` elsewhere
    pub fn display_string(&self, platform: Platform) -> String {
        let key = self.key.display_label();
        match platform {
            Platform::MacOs => {
                let mut out = String::new();
                if self.mods.ctrl() || self.mods.meta() {
                    out.push('⌘');
                }
                if self.mods.alt() {
                    out.push('⌥');
                }
                if self.mods.shift() {
                    out.push('⇧');
                }
                out.push_str(&key);
                out
            }
            Platform::Other => {
                let mut parts = Vec::new();
                if self.mods.ctrl() {
                    parts.push("Ctrl".to_string());
                }
                if self.mods.alt() {
                    parts.push("Alt".to_string());
                }
                if self.mods.shift() {
                    parts.push("Shift".to_string());
                }
                parts.push(key);
                parts.join("+")
            }
        }
    }
}
