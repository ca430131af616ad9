//! Board element data model.
//!
//! An element is either a committed freehand stroke or a hosted
//! component widget. Both share an id, a world-space position, a
//! z-order hint, and a variant-specific data payload, matching the
//! document shape exchanged with the external store.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements, generated client-side.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

/// Payload of a committed stroke: absolute world points plus style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeData {
    /// Points in world space, in draw order (length >= 2 once committed).
    pub points: Vec<Point>,
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width in world units (scaled by zoom at render time).
    pub width: f64,
}

/// Variant tag for filtering elements by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Drawing,
    Component,
}

/// The variant-specific part of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ElementBody {
    /// An immutable freehand stroke. No further points are appended
    /// once the element is in the store.
    Drawing { data: StrokeData },
    /// A hosted widget instance, keyed into the template registry.
    Component {
        component_type: String,
        /// Explicit world-space size; falls back to the template
        /// default when absent.
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        /// Opaque payload owned entirely by the template.
        data: serde_json::Value,
    },
}

/// An element placed on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// World-space position. Strokes carry their own absolute points,
    /// so committed strokes sit at the origin.
    pub x: f64,
    pub y: f64,
    /// Z-order hint; refines insertion order at render time only.
    pub z_index: i64,
    #[serde(flatten)]
    pub body: ElementBody,
}

impl Element {
    /// Create a committed stroke element at the nominal origin.
    pub fn stroke(points: Vec<Point>, color: SerializableColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: 0.0,
            y: 0.0,
            z_index: 0,
            body: ElementBody::Drawing {
                data: StrokeData {
                    points,
                    color,
                    width,
                },
            },
        }
    }

    /// Create a component element at the given world position.
    pub fn component(
        component_type: impl Into<String>,
        position: Point,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            z_index: 0,
            body: ElementBody::Component {
                component_type: component_type.into(),
                width: None,
                height: None,
                data,
            },
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self.body {
            ElementBody::Drawing { .. } => ElementKind::Drawing,
            ElementBody::Component { .. } => ElementKind::Component,
        }
    }

    /// World-space position of the element's anchor (top-left).
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The component type key, if this is a component.
    pub fn component_type(&self) -> Option<&str> {
        match &self.body {
            ElementBody::Component { component_type, .. } => Some(component_type),
            ElementBody::Drawing { .. } => None,
        }
    }

    /// Stroke payload, if this is a drawing.
    pub fn stroke_data(&self) -> Option<&StrokeData> {
        match &self.body {
            ElementBody::Drawing { data } => Some(data),
            ElementBody::Component { .. } => None,
        }
    }

    /// World bounds of a component given its effective size.
    ///
    /// The caller resolves the size against the template default; an
    /// element with no size and no known template has no bounds.
    pub fn component_bounds(&self, effective: kurbo::Size) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + effective.width,
            self.y + effective.height,
        )
    }

    /// Merge patch fields into this element.
    ///
    /// Stroke payloads are immutable after commit, so `width`,
    /// `height`, and `data` only apply to components.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }
        if let ElementBody::Component {
            width,
            height,
            data,
            ..
        } = &mut self.body
        {
            if patch.width.is_some() {
                *width = patch.width;
            }
            if patch.height.is_some() {
                *height = patch.height;
            }
            if let Some(new_data) = &patch.data {
                *data = new_data.clone();
            }
        }
    }
}

/// A partial update to an element. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ElementPatch {
    /// Patch that moves an element to a new world position.
    pub fn move_to(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    /// Patch that replaces a component's data payload.
    pub fn set_data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}
