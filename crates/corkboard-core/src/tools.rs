//! Tool selection and draw settings.

use crate::element::SerializableColor;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Select/drag hosted components.
    #[default]
    Select,
    /// Freehand drawing.
    Draw,
    /// Pan the viewport.
    Pan,
}

/// Active color/width applied to newly drawn strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    pub color: SerializableColor,
    /// Stroke width in world units.
    pub width: f64,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 2.0,
        }
    }
}
