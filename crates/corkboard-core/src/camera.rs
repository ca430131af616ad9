//! Viewport module for pan/zoom transforms.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;

/// Viewport manages the view transform for a board.
///
/// `x`/`y` are the on-screen pixel offset of world origin (0, 0);
/// `zoom` scales world units to pixels. The viewport is snapshotted
/// into the board document and restored with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space x of world origin.
    pub x: f64,
    /// Screen-space y of world origin.
    pub y: f64,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport at the origin with 100% zoom.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.x) / self.zoom,
            (screen_point.y - self.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.x,
            world_point.y * self.zoom + self.y,
        )
    }

    /// Pan the viewport by a delta in screen pixels.
    ///
    /// Pan is a pixel-space operation, independent of zoom.
    pub fn pan(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Zoom the viewport, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Scale the offset around the anchor so the world point under
        // it stays put.
        let scale = new_zoom / self.zoom;
        self.x = screen_point.x - (screen_point.x - self.x) * scale;
        self.y = screen_point.y - (screen_point.y - self.y) * scale;
        self.zoom = new_zoom;
    }

    /// World point under the center of a screen area of the given size.
    pub fn visible_center(&self, screen_size: Size) -> Point {
        self.screen_to_world(Point::new(screen_size.width / 2.0, screen_size.height / 2.0))
    }

    /// Reset to origin and 100% zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
