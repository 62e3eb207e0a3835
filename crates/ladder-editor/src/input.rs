//! Input abstraction layer.
//!
//! Normalizes host pointer, wheel, and keyboard events into a unified
//! `InputEvent` enum. Positions are in screen space; the editor maps them
//! into canvas space before anything else looks at them.

use ladder_core::Point;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A normalized input event from the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer moved (pressed or not).
    PointerMove { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer released.
    PointerUp { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer left the drawing surface.
    PointerLeave,

    /// Wheel / pinch: pan by `(dx, dy)` screen units, zoom by `zoom` about `(x, y)`.
    Scroll {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        /// Zoom factor (1.0 = no change; >1 = zoom in).
        zoom: f64,
    },

    /// Keyboard shortcut.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Screen position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. } | Self::PointerMove { x, y, .. } | Self::PointerUp { x, y, .. } => {
                Some(Point::new(*x, *y))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_only_for_pointer_events() {
        assert_eq!(InputEvent::pointer_up(3.0, 4.0).position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(InputEvent::PointerLeave.position(), None);
        assert_eq!(InputEvent::key("Escape").position(), None);
    }
}
