//! Keyboard surface: shortcut mapping and the shortcut registry.

use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS; treated as equivalent to Ctrl for shortcuts.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editor-level actions triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    DeleteSelection,
    Undo,
    Redo,
}

/// Map a key press to an editor action. Keys arrive as host key names
/// ("Delete", "Backspace", "z", "y", ...); letters match case-insensitively.
pub fn action_for(key: &str, modifiers: Modifiers) -> Option<EditorAction> {
    match key {
        "Delete" | "Backspace" if !modifiers.command() => Some(EditorAction::DeleteSelection),
        "z" | "Z" if modifiers.command() && modifiers.shift => Some(EditorAction::Redo),
        "z" | "Z" if modifiers.command() => Some(EditorAction::Undo),
        "y" | "Y" if modifiers.command() && !modifiers.shift => Some(EditorAction::Redo),
        _ => None,
    }
}

/// A keyboard shortcut definition, for host help panels.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of the studio's global shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, "Delete selected element"),
            Shortcut::new("Backspace", false, false, "Delete selected element"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(ctrl: bool, shift: bool, meta: bool) -> Modifiers {
        Modifiers {
            ctrl,
            shift,
            meta,
            alt: false,
        }
    }

    #[test]
    fn test_delete_keys() {
        assert_eq!(
            action_for("Delete", Modifiers::default()),
            Some(EditorAction::DeleteSelection)
        );
        assert_eq!(
            action_for("Backspace", Modifiers::default()),
            Some(EditorAction::DeleteSelection)
        );
        // Ctrl+Backspace is not a studio shortcut.
        assert_eq!(action_for("Backspace", mods(true, false, false)), None);
    }

    #[test]
    fn test_undo_redo_combos() {
        assert_eq!(
            action_for("z", mods(true, false, false)),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            action_for("Z", mods(false, false, true)),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            action_for("z", mods(true, true, false)),
            Some(EditorAction::Redo)
        );
        assert_eq!(
            action_for("y", mods(true, false, false)),
            Some(EditorAction::Redo)
        );
        assert_eq!(action_for("z", Modifiers::default()), None);
        assert_eq!(action_for("y", mods(true, true, false)), None);
    }

    #[test]
    fn test_shortcut_formatting() {
        let s = Shortcut::new("Z", true, true, "Redo");
        assert_eq!(s.format(), "Ctrl+Shift+Z");
    }
}
