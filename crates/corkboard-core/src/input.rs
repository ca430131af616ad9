//! Pointer input types for gesture routing.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Touch input maps to `Left`; a touch-cancel arrives as `Cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Gesture aborted by the platform (touch cancel, pointer leaving
    /// the surface).
    Cancel,
    Scroll {
        position: Point,
        delta: Vec2,
    },
}
