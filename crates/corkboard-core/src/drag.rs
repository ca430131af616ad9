//! Component drag controller.
//!
//! Active only while the select tool is current. A pointer-down on a
//! hosted component's bounding box captures the gesture, unless the
//! down target is an interactive control inside the widget's own
//! content, which must pass through so the widget stays operable.
//! While dragging, the grip point under the cursor stays visually
//! fixed on the widget regardless of intervening pan/zoom, because
//! the pixel offset captured at drag start is fixed for the gesture.

use crate::board::Board;
use crate::camera::Viewport;
use crate::element::ElementId;
use crate::templates::TemplateRegistry;
use kurbo::{Point, Vec2};

/// Transient state of an active drag. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub element_id: ElementId,
    /// World position of the element at drag start.
    pub start_world: Point,
    /// Fixed pixel offset between the pointer and the element's
    /// rendered screen anchor at drag start.
    pub grip_offset: Vec2,
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// The drag gesture state machine. Only one component may be dragged
/// at a time; the state guard enforces the capture.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer-down under the select tool. Hit-tests hosted
    /// components front-to-back and captures the topmost hit.
    ///
    /// `on_widget_control` is set by the host when the down target is
    /// an input/button/checkbox belonging to the widget's content;
    /// those events pass through untouched.
    pub fn begin(
        &mut self,
        screen: Point,
        viewport: &Viewport,
        board: &Board,
        registry: &TemplateRegistry,
        on_widget_control: bool,
    ) -> Option<ElementId> {
        if on_widget_control || matches!(self.state, DragState::Dragging(_)) {
            return None;
        }

        let world = viewport.screen_to_world(screen);
        let hit = registry
            .hosted(board)
            .into_iter()
            .rev()
            .find(|hosted| hosted.element.component_bounds(hosted.size).contains(world))?;

        let anchor = viewport.world_to_screen(hit.element.position());
        let session = DragSession {
            element_id: hit.element.id,
            start_world: hit.element.position(),
            grip_offset: Vec2::new(screen.x - anchor.x, screen.y - anchor.y),
        };
        self.state = DragState::Dragging(session);
        Some(session.element_id)
    }

    /// Pointer-move: the element's new world position, to be applied
    /// through the store's `update_element`.
    pub fn update(&self, screen: Point, viewport: &Viewport) -> Option<(ElementId, Point)> {
        let DragState::Dragging(session) = &self.state else {
            return None;
        };
        let world = Point::new(
            (screen.x - session.grip_offset.x - viewport.x) / viewport.zoom,
            (screen.y - session.grip_offset.y - viewport.y) / viewport.zoom,
        );
        Some((session.element_id, world))
    }

    /// Pointer-up or touch-cancel. No commit step: every intermediate
    /// move was already persisted by the debounced pipeline.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }
}
