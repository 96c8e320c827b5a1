//! Input classification: modifiers, click/double-click detection and
//! keyboard shortcuts.

use crate::shapes::ElementId;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const COMMAND: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, Cmd on macOS. Either counts.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// The drill-down modifier.
    pub fn drill_down(&self) -> bool {
        self.alt
    }
}

/// Result of registering a click on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

/// Distinguishes single from double clicks. Two clicks count as a double
/// click when they land on the same target within the window.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(ElementId, Instant)>,
}

impl ClickTracker {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Register a click on `target` at `now`.
    pub fn register(&mut self, target: &str, now: Instant) -> ClickKind {
        let is_double = self.last.as_ref().is_some_and(|(id, at)| {
            id == target && now.saturating_duration_since(*at) <= self.window
        });
        if is_double {
            // A third click starts a fresh sequence.
            self.last = None;
            ClickKind::Double
        } else {
            self.last = Some((target.to_string(), now));
            ClickKind::Single
        }
    }

    /// Forget the previous click (e.g. after a click on empty canvas).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCommand {
    Copy,
    Cut,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    Group,
    Ungroup,
    BringToFront,
    SendToBack,
    ClearSelection,
}

impl KeyCommand {
    /// Map a key press to a command. Letter keys are case-insensitive.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        let command = modifiers.command();
        let lower = key.to_ascii_lowercase();
        match (lower.as_str(), command) {
            ("c", true) => Some(KeyCommand::Copy),
            ("x", true) => Some(KeyCommand::Cut),
            ("v", true) => Some(KeyCommand::Paste),
            ("d", true) => Some(KeyCommand::Duplicate),
            ("a", true) => Some(KeyCommand::SelectAll),
            ("g", true) if modifiers.shift => Some(KeyCommand::Ungroup),
            ("g", true) => Some(KeyCommand::Group),
            ("delete" | "backspace", _) => Some(KeyCommand::Delete),
            ("]", false) => Some(KeyCommand::BringToFront),
            ("[", false) => Some(KeyCommand::SendToBack),
            ("escape", _) => Some(KeyCommand::ClearSelection),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_same_target() {
        let mut tracker = ClickTracker::default();
        let t0 = Instant::now();
        assert_eq!(tracker.register("a", t0), ClickKind::Single);
        assert_eq!(tracker.register("a", t0 + Duration::from_millis(200)), ClickKind::Double);
        // Third click is a new sequence.
        assert_eq!(tracker.register("a", t0 + Duration::from_millis(250)), ClickKind::Single);
    }

    #[test]
    fn test_double_click_too_slow_or_other_target() {
        let mut tracker = ClickTracker::default();
        let t0 = Instant::now();
        tracker.register("a", t0);
        assert_eq!(tracker.register("a", t0 + Duration::from_millis(400)), ClickKind::Single);
        assert_eq!(tracker.register("b", t0 + Duration::from_millis(450)), ClickKind::Single);
    }

    #[test]
    fn test_shortcut_table() {
        assert_eq!(KeyCommand::from_key("c", Modifiers::COMMAND), Some(KeyCommand::Copy));
        assert_eq!(KeyCommand::from_key("C", Modifiers::COMMAND), Some(KeyCommand::Copy));
        assert_eq!(KeyCommand::from_key("c", Modifiers::NONE), None);

        let cmd_shift = Modifiers {
            shift: true,
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(KeyCommand::from_key("G", cmd_shift), Some(KeyCommand::Ungroup));
        assert_eq!(KeyCommand::from_key("g", Modifiers::COMMAND), Some(KeyCommand::Group));
        assert_eq!(KeyCommand::from_key("Backspace", Modifiers::NONE), Some(KeyCommand::Delete));
        assert_eq!(KeyCommand::from_key("]", Modifiers::NONE), Some(KeyCommand::BringToFront));
        assert_eq!(KeyCommand::from_key("[", Modifiers::NONE), Some(KeyCommand::SendToBack));
        assert_eq!(KeyCommand::from_key("Escape", Modifiers::NONE), Some(KeyCommand::ClearSelection));
    }
}
