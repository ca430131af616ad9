//! Freehand drawing engine.
//!
//! Turns a stream of pointer samples into a committed stroke element.
//! The gesture is an explicit state machine: `Idle` until a
//! pointer-down seeds the in-progress stroke, `Accumulating` while
//! points are appended, and back to `Idle` on commit or discard. A tap
//! that never moves (fewer than two samples) is discarded rather than
//! committed.

use crate::camera::Viewport;
use crate::element::{Element, SerializableColor};
use crate::tools::DrawSettings;
use kurbo::{Point, Vec2};

/// Multiplicative zoom step per wheel tick.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// State of the in-progress stroke. Never persisted.
#[derive(Debug, Clone, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Accumulating {
        /// Points converted to world space as they arrive. No
        /// simplification or decimation is performed; fidelity wins
        /// over storage economy.
        points: Vec<Point>,
        color: SerializableColor,
        width: f64,
    },
}

/// The drawing gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct DrawController {
    state: DrawState,
}

impl DrawController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down while the draw tool is active: seed the stroke
    /// with one world-space point at the active color/width.
    pub fn begin(&mut self, screen: Point, viewport: &Viewport, settings: &DrawSettings) {
        self.state = DrawState::Accumulating {
            points: vec![viewport.screen_to_world(screen)],
            color: settings.color,
            width: settings.width,
        };
    }

    /// Pointer-move: append the converted point.
    pub fn update(&mut self, screen: Point, viewport: &Viewport) {
        if let DrawState::Accumulating { points, .. } = &mut self.state {
            points.push(viewport.screen_to_world(screen));
        }
    }

    /// Pointer-up or pointer leaving the surface: commit if at least
    /// two points accumulated, otherwise discard.
    ///
    /// Committed strokes sit at the nominal origin; the points carry
    /// their own absolute world coordinates.
    pub fn end(&mut self) -> Option<Element> {
        match std::mem::take(&mut self.state) {
            DrawState::Accumulating {
                points,
                color,
                width,
            } if points.len() >= 2 => Some(Element::stroke(points, color, width)),
            DrawState::Accumulating { .. } => {
                log::debug!("discarding single-point tap");
                None
            }
            DrawState::Idle => None,
        }
    }

    /// Abort without committing.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DrawState::Accumulating { .. })
    }

    /// The accumulating stroke, for per-frame preview rendering.
    pub fn in_progress(&self) -> Option<(&[Point], SerializableColor, f64)> {
        match &self.state {
            DrawState::Accumulating {
                points,
                color,
                width,
            } => Some((points, *color, *width)),
            DrawState::Idle => None,
        }
    }
}

/// Viewport panning gesture, mutually exclusive with drawing.
///
/// Pan operates directly in pixel space: each move adds the screen
/// delta to the viewport offset, independent of zoom.
#[derive(Debug, Clone, Default)]
pub struct PanGesture {
    last: Option<Point>,
}

impl PanGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, screen: Point) {
        self.last = Some(screen);
    }

    pub fn update(&mut self, screen: Point, viewport: &mut Viewport) {
        if let Some(last) = self.last {
            viewport.pan(Vec2::new(screen.x - last.x, screen.y - last.y));
            self.last = Some(screen);
        }
    }

    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

/// Apply one wheel tick to the viewport, anchored at the pointer so
/// the content under the cursor stays fixed.
pub fn wheel_zoom(viewport: &mut Viewport, anchor: Point, scroll_delta_y: f64) {
    let factor = if scroll_delta_y > 0.0 {
        WHEEL_ZOOM_IN
    } else {
        WHEEL_ZOOM_OUT
    };
    viewport.zoom_at(anchor, factor);
}
