//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, so every host
//! shares one binding table.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    /// Delete the selected component.
    Delete,
    /// Cancel a pending wire, otherwise clear the selection.
    Cancel,

    // ── Mode ──
    ToggleSimulation,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: on macOS `meta` is ⌘, elsewhere `ctrl` plays that role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, _alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            "F5" => Some(ShortcutAction::ToggleSimulation),
            _ => None,
        }
    }
}
