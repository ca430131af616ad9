//! Board session controller.
//!
//! Owns the currently open board, the active tool and draw settings,
//! and the gesture controllers, and routes pointer input to whichever
//! of them the active tool selects. Every mutation funnels through
//! the debounced saver so the board survives reloads without an
//! explicit save action.
//!
//! All mutation happens on the caller's event thread; the only
//! suspension points are store round-trips and the debounce wait.
//! Pointer capture means at most one gesture controller is active at
//! a time, enforced here by checking the others before starting one.

use crate::board::{Board, BoardSummary};
use crate::camera::Viewport;
use crate::drag::DragController;
use crate::drawing::{self, DrawController, PanGesture};
use crate::element::{ElementId, ElementPatch};
use crate::input::{MouseButton, PointerEvent};
use crate::storage::{BoardPatch, BoardStore, DebouncedSaver, StoreResult};
use crate::templates::{ComponentAction, TemplateRegistry};
use crate::tools::{DrawSettings, ToolKind};
use kurbo::{Point, Size, Vec2};
use std::sync::Arc;
use std::time::Instant;

/// Top-level session state for one user editing one board at a time.
pub struct BoardSession<S: BoardStore> {
    store: Arc<S>,
    registry: TemplateRegistry,
    /// The loaded board, if any. `None` is the "no board selected"
    /// state, also reached when a load fails.
    board: Option<Board>,
    /// The board id the session currently wants loaded; responses for
    /// any other id are stale and discarded.
    current_id: Option<String>,
    tool: ToolKind,
    pub draw_settings: DrawSettings,
    draw: DrawController,
    pan: PanGesture,
    drag: DragController,
    saver: DebouncedSaver,
    summaries: Vec<BoardSummary>,
    screen_size: Size,
    needs_repaint: bool,
}

impl<S: BoardStore> BoardSession<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            registry: TemplateRegistry::builtin(),
            board: None,
            current_id: None,
            tool: ToolKind::default(),
            draw_settings: DrawSettings::default(),
            draw: DrawController::new(),
            pan: PanGesture::new(),
            drag: DragController::new(),
            saver: DebouncedSaver::new(),
            summaries: Vec::new(),
            screen_size: Size::new(800.0, 600.0),
            needs_repaint: false,
        }
    }

    #[cfg(test)]
    fn with_saver(store: Arc<S>, saver: DebouncedSaver) -> Self {
        let mut session = Self::new(store);
        session.saver = saver;
        session
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board.as_ref().map(|b| b.id.as_str())
    }

    pub fn board_list(&self) -> &[BoardSummary] {
        &self.summaries
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.board.as_ref().map(|b| b.view_state)
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools, aborting whatever gesture was in flight.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel_gestures();
        self.tool = tool;
    }

    pub fn set_screen_size(&mut self, size: Size) {
        self.screen_size = size;
    }

    /// Whether a repaint is owed since the last call. Redundant
    /// triggers within a frame coalesce into this single flag; the
    /// render loop reads it once per display frame.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    fn cancel_gestures(&mut self) {
        self.draw.cancel();
        self.pan.end();
        self.drag.end();
    }

    /// Queue the whole element list for the debounced save. The
    /// external store is document-oriented, so mutations ship the
    /// full list, never a diff.
    fn queue_elements(&mut self) {
        if let Some(board) = &self.board {
            self.saver.queue(BoardPatch::elements(board.elements.clone()));
            self.needs_repaint = true;
        }
    }

    fn queue_viewport(&mut self) {
        if let Some(board) = &self.board {
            self.saver.queue(BoardPatch::view_state(board.view_state));
            self.needs_repaint = true;
        }
    }

    // ---- pointer routing ----

    /// Route a pointer event, assuming it did not land on a widget's
    /// own interactive control.
    pub fn route(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button, false),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Cancel => self.pointer_cancel(),
            PointerEvent::Scroll { position, delta } => self.wheel(position, delta),
        }
    }

    /// Pointer-down. `on_widget_control` is set by the hosting
    /// overlay when the target is an input/button/checkbox inside a
    /// widget; such events never start a drag.
    pub fn pointer_down(&mut self, position: Point, button: MouseButton, on_widget_control: bool) {
        if self.draw.is_active() || self.pan.is_active() || self.drag.is_active() {
            return;
        }
        let Some(board) = &self.board else {
            return;
        };

        // Middle-button drag pans regardless of the active tool.
        if button == MouseButton::Middle {
            self.pan.begin(position);
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        match self.tool {
            ToolKind::Pan => self.pan.begin(position),
            ToolKind::Draw => {
                self.draw
                    .begin(position, &board.view_state, &self.draw_settings);
                self.needs_repaint = true;
            }
            ToolKind::Select => {
                self.drag
                    .begin(position, &board.view_state, board, &self.registry, on_widget_control);
            }
        }
    }

    pub fn pointer_move(&mut self, position: Point) {
        if self.pan.is_active() {
            if let Some(board) = &mut self.board {
                self.pan.update(position, &mut board.view_state);
            }
            self.queue_viewport();
            return;
        }
        if self.draw.is_active() {
            if let Some(board) = &self.board {
                self.draw.update(position, &board.view_state);
                self.needs_repaint = true;
            }
            return;
        }
        if self.drag.is_active() {
            let Some(board) = &mut self.board else {
                return;
            };
            if let Some((id, world)) = self.drag.update(position, &board.view_state) {
                board.update_element(id, &ElementPatch::move_to(world));
                self.queue_elements();
            }
        }
    }

    /// Pointer-up is purely a commit/discard transition; the stroke's
    /// samples are the down sample plus the moves, never the release
    /// position.
    pub fn pointer_up(&mut self, _position: Point, _button: MouseButton) {
        if self.draw.is_active() {
            self.finish_stroke();
            return;
        }
        self.pan.end();
        self.drag.end();
    }

    /// Gesture aborted by the platform. The pointer leaving the
    /// surface still commits an in-progress stroke; a drag simply
    /// stops where its last persisted move left the element.
    pub fn pointer_cancel(&mut self) {
        if self.draw.is_active() {
            self.finish_stroke();
            return;
        }
        self.pan.end();
        self.drag.end();
    }

    fn finish_stroke(&mut self) {
        let committed = self.draw.end();
        if let (Some(board), Some(stroke)) = (&mut self.board, committed) {
            board.add_element(stroke);
            self.queue_elements();
        }
        self.needs_repaint = true;
    }

    pub fn wheel(&mut self, position: Point, delta: Vec2) {
        if let Some(board) = &mut self.board {
            drawing::wheel_zoom(&mut board.view_state, position, delta.y);
        }
        self.queue_viewport();
    }

    /// The in-progress stroke for preview rendering. Committed
    /// strokes are re-derived from the board each frame; this is the
    /// only transient addition.
    pub fn stroke_in_progress(&self) -> Option<(&[Point], crate::SerializableColor, f64)> {
        self.draw.in_progress()
    }

    // ---- element operations ----

    /// Place a new component of a known type centered on the visible
    /// viewport. Returns the stored element id.
    pub fn add_component(&mut self, key: &str) -> Option<ElementId> {
        let board = self.board.as_mut()?;
        let element = self
            .registry
            .spawn_centered(key, &board.view_state, self.screen_size)?;
        let id = board.add_element(element);
        self.queue_elements();
        Some(id)
    }

    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) {
        if let Some(board) = &mut self.board {
            board.update_element(id, patch);
            self.queue_elements();
        }
    }

    pub fn delete_element(&mut self, id: ElementId) {
        if let Some(board) = &mut self.board {
            board.remove_element(id);
            self.queue_elements();
        }
    }

    /// Raise an element above everything currently on the board.
    pub fn bring_to_front(&mut self, id: ElementId) {
        if let Some(board) = &mut self.board {
            let top = board.max_z_index() + 1;
            board.update_element(
                id,
                &ElementPatch {
                    z_index: Some(top),
                    ..ElementPatch::default()
                },
            );
            self.queue_elements();
        }
    }

    /// Clear all elements, marking the board for the daily-reset
    /// collaborator.
    pub fn clear_board(&mut self) {
        if let Some(board) = &mut self.board {
            board.clear();
            self.saver.queue(BoardPatch {
                elements: Some(Vec::new()),
                has_been_cleared: Some(true),
                ..BoardPatch::default()
            });
            self.needs_repaint = true;
        }
    }

    /// Run the hosted widgets' behaviors and apply whatever payload
    /// replacements or deletions they requested.
    pub fn run_components(&mut self) {
        let Some(board) = &mut self.board else {
            return;
        };
        let actions = self.registry.present(board);
        if actions.is_empty() {
            return;
        }
        for action in actions {
            match action {
                ComponentAction::SetData { id, data } => {
                    board.update_element(id, &ElementPatch::set_data(data));
                }
                ComponentAction::Delete { id } => {
                    board.remove_element(id);
                }
            }
        }
        self.queue_elements();
    }

    // ---- board lifecycle ----

    /// Record intent to open a board. Any in-flight load for another
    /// board becomes stale and will be rejected on arrival; pending
    /// unsaved edits for the previous board are dropped.
    pub fn begin_open(&mut self, id: &str) {
        self.cancel_gestures();
        self.current_id = Some(id.to_string());
        self.board = None;
        self.saver.set_board(None);
        self.needs_repaint = true;
    }

    /// Apply a load response. Returns false (and changes nothing) if
    /// the response is for a board the session no longer wants.
    pub fn apply_loaded(&mut self, board: Board) -> bool {
        if self.current_id.as_deref() != Some(board.id.as_str()) {
            log::debug!("discarding stale load response for board {}", board.id);
            return false;
        }
        self.saver.set_board(Some(board.id.clone()));
        self.board = Some(board);
        self.needs_repaint = true;
        true
    }

    /// Load a board and make it current. A full replace of in-memory
    /// state, never a merge; on failure the session stays in the
    /// "no board selected" state.
    pub async fn open_board(&mut self, id: &str) -> StoreResult<bool> {
        self.begin_open(id);
        match self.store.load_board(id).await {
            Ok(board) => Ok(self.apply_loaded(board)),
            Err(e) => {
                log::warn!("failed to load board {id}: {e}");
                Err(e)
            }
        }
    }

    pub async fn refresh_board_list(&mut self) -> StoreResult<()> {
        self.summaries = self.store.list_boards().await?;
        Ok(())
    }

    /// Create a board, make it current, and refresh the list.
    /// Immediate, never debounced.
    pub async fn create_board(&mut self, name: &str) -> StoreResult<String> {
        let board = self.store.create_board(name).await?;
        let id = board.id.clone();
        self.current_id = Some(id.clone());
        self.saver.set_board(Some(id.clone()));
        self.board = Some(board);
        self.needs_repaint = true;
        self.refresh_board_list().await?;
        Ok(id)
    }

    pub async fn rename_board(&mut self, id: &str, name: &str) -> StoreResult<()> {
        self.store.rename_board(id, name).await?;
        if let Some(board) = &mut self.board {
            if board.id == id {
                board.name = name.to_string();
            }
        }
        self.refresh_board_list().await
    }

    pub async fn delete_board(&mut self, id: &str) -> StoreResult<()> {
        self.store.delete_board(id).await?;
        if self.board_id() == Some(id) {
            self.board = None;
            self.current_id = None;
            self.saver.set_board(None);
            self.cancel_gestures();
            self.needs_repaint = true;
        }
        self.refresh_board_list().await
    }

    // ---- persistence ----

    /// Flush the pending patch if its quiet period has elapsed.
    /// Returns whether a save was performed. A failed save is logged
    /// and requeued; it rides along with the next edit's flush.
    pub async fn maybe_flush(&mut self, now: Instant) -> bool {
        let Some((board_id, patch)) = self.saver.take_due(now) else {
            return false;
        };
        match self.store.save_board(&board_id, &patch).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("save for board {board_id} failed, retrying on next edit: {e}");
                self.saver.requeue_failed(&board_id, patch);
                false
            }
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.saver.has_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::storage::{block_on, BoxFuture, MemoryStore, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Store wrapper that counts outbound save calls.
    struct CountingStore {
        inner: MemoryStore,
        saves: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                saves: AtomicUsize::new(0),
            }
        }

        fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl BoardStore for CountingStore {
        fn list_boards(&self) -> BoxFuture<'_, StoreResult<Vec<BoardSummary>>> {
            self.inner.list_boards()
        }
        fn load_board(&self, id: &str) -> BoxFuture<'_, StoreResult<Board>> {
            self.inner.load_board(id)
        }
        fn save_board(&self, id: &str, patch: &BoardPatch) -> BoxFuture<'_, StoreResult<()>> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_board(id, patch)
        }
        fn create_board(&self, name: &str) -> BoxFuture<'_, StoreResult<Board>> {
            self.inner.create_board(name)
        }
        fn rename_board(&self, id: &str, name: &str) -> BoxFuture<'_, StoreResult<()>> {
            self.inner.rename_board(id, name)
        }
        fn delete_board(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
            self.inner.delete_board(id)
        }
    }

    /// Store whose saves always fail.
    struct FailingStore {
        inner: MemoryStore,
    }

    impl BoardStore for FailingStore {
        fn list_boards(&self) -> BoxFuture<'_, StoreResult<Vec<BoardSummary>>> {
            self.inner.list_boards()
        }
        fn load_board(&self, id: &str) -> BoxFuture<'_, StoreResult<Board>> {
            self.inner.load_board(id)
        }
        fn save_board(&self, _id: &str, _patch: &BoardPatch) -> BoxFuture<'_, StoreResult<()>> {
            Box::pin(async { Err(StoreError::Transport("connection reset".into())) })
        }
        fn create_board(&self, name: &str) -> BoxFuture<'_, StoreResult<Board>> {
            self.inner.create_board(name)
        }
        fn rename_board(&self, id: &str, name: &str) -> BoxFuture<'_, StoreResult<()>> {
            self.inner.rename_board(id, name)
        }
        fn delete_board(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
            self.inner.delete_board(id)
        }
    }

    fn session_with_board<S: BoardStore>(store: Arc<S>) -> BoardSession<S> {
        let mut session = BoardSession::with_saver(
            store,
            DebouncedSaver::with_quiet_period(Duration::from_millis(10)),
        );
        let id = block_on(session.create_board("Notes")).unwrap();
        assert_eq!(session.board_id(), Some(id.as_str()));
        session
    }

    fn flush_deadline() -> Instant {
        Instant::now() + Duration::from_secs(1)
    }

    #[test]
    fn test_draw_gesture_commits_and_persists() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store.clone());
        session.set_tool(ToolKind::Draw);

        session.route(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        session.route(PointerEvent::Move {
            position: Point::new(20.0, 10.0),
        });
        session.route(PointerEvent::Move {
            position: Point::new(20.0, 20.0),
        });
        session.route(PointerEvent::Up {
            position: Point::new(20.0, 20.0),
            button: MouseButton::Left,
        });

        let board = session.board().unwrap();
        let strokes = board.elements_of_type(ElementKind::Drawing);
        assert_eq!(strokes.len(), 1);
        // The down sample plus the two moves; the release at (20, 20)
        // adds nothing.
        assert_eq!(
            strokes[0].stroke_data().unwrap().points,
            vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 20.0)
            ]
        );

        assert!(block_on(session.maybe_flush(flush_deadline())));
        let saved = block_on(store.load_board(session.board_id().unwrap())).unwrap();
        assert_eq!(saved.elements.len(), 1);
    }

    #[test]
    fn test_tap_produces_no_element() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        session.set_tool(ToolKind::Draw);

        session.route(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        session.route(PointerEvent::Up {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        });

        assert!(session.board().unwrap().elements.is_empty());
    }

    #[test]
    fn test_debounce_coalesces_saves() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store.clone());
        session.set_tool(ToolKind::Draw);

        // Three strokes drawn back to back, all inside the quiet period.
        for i in 0..3 {
            let y = i as f64 * 10.0;
            session.route(PointerEvent::Down {
                position: Point::new(0.0, y),
                button: MouseButton::Left,
            });
            session.route(PointerEvent::Move {
                position: Point::new(10.0, y),
            });
            session.route(PointerEvent::Up {
                position: Point::new(10.0, y),
                button: MouseButton::Left,
            });
        }
        session.wheel(Point::ZERO, Vec2::new(0.0, 1.0));

        assert!(block_on(session.maybe_flush(flush_deadline())));
        assert!(!block_on(session.maybe_flush(flush_deadline())));
        assert_eq!(store.save_count(), 1);

        let saved = block_on(store.load_board(session.board_id().unwrap())).unwrap();
        assert_eq!(saved.elements.len(), 3);
        assert!(saved.view_state.zoom > 1.0);
    }

    #[test]
    fn test_failed_save_retries_with_next_edit() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
        });
        let mut session = session_with_board(store);
        session.set_tool(ToolKind::Draw);

        session.wheel(Point::ZERO, Vec2::new(0.0, 1.0));
        assert!(!block_on(session.maybe_flush(flush_deadline())));
        // The patch survives the failure and waits for the next edit.
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_stale_load_rejected() {
        let store = Arc::new(MemoryStore::new());
        let a = block_on(store.create_board("A")).unwrap();
        let b = block_on(store.create_board("B")).unwrap();

        let mut session = BoardSession::new(store.clone());
        // A's load goes out, then the user switches to B before it
        // resolves.
        session.begin_open(&a.id);
        session.begin_open(&b.id);

        let stale = block_on(store.load_board(&a.id)).unwrap();
        assert!(!session.apply_loaded(stale));
        assert!(session.board().is_none());

        let fresh = block_on(store.load_board(&b.id)).unwrap();
        assert!(session.apply_loaded(fresh));
        assert_eq!(session.board_id(), Some(b.id.as_str()));
    }

    #[test]
    fn test_failed_load_leaves_no_board_selected() {
        let store = Arc::new(MemoryStore::new());
        let mut session = BoardSession::new(store);
        assert!(block_on(session.open_board("missing")).is_err());
        assert!(session.board().is_none());
    }

    #[test]
    fn test_board_switch_drops_pending_edits() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store.clone());
        let other = block_on(store.create_board("Other")).unwrap();

        session.wheel(Point::ZERO, Vec2::new(0.0, 1.0));
        assert!(session.has_unsaved_changes());

        assert!(block_on(session.open_board(&other.id)).unwrap());
        assert!(!session.has_unsaved_changes());
        assert!(!block_on(session.maybe_flush(flush_deadline())));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_middle_button_pans_any_tool() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        session.set_tool(ToolKind::Select);

        session.route(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Middle,
        });
        session.route(PointerEvent::Move {
            position: Point::new(130.0, 90.0),
        });
        session.route(PointerEvent::Up {
            position: Point::new(130.0, 90.0),
            button: MouseButton::Middle,
        });

        let vp = session.viewport().unwrap();
        assert!((vp.x - 30.0).abs() < f64::EPSILON);
        assert!((vp.y + 10.0).abs() < f64::EPSILON);
        // No stroke was drawn.
        assert!(session.board().unwrap().elements.is_empty());
    }

    #[test]
    fn test_select_tool_drags_component() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        let id = session.add_component("stickyNote").unwrap();
        let before = session.board().unwrap().element(id).unwrap().position();

        session.set_tool(ToolKind::Select);
        let grip = session
            .viewport()
            .unwrap()
            .world_to_screen(Point::new(before.x + 10.0, before.y + 10.0));
        session.route(PointerEvent::Down {
            position: grip,
            button: MouseButton::Left,
        });
        session.route(PointerEvent::Move {
            position: Point::new(grip.x + 50.0, grip.y + 25.0),
        });
        session.route(PointerEvent::Up {
            position: Point::new(grip.x + 50.0, grip.y + 25.0),
            button: MouseButton::Left,
        });

        let after = session.board().unwrap().element(id).unwrap().position();
        assert!((after.x - (before.x + 50.0)).abs() < 1e-10);
        assert!((after.y - (before.y + 25.0)).abs() < 1e-10);
    }

    #[test]
    fn test_widget_control_down_does_not_drag() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        let id = session.add_component("stickyNote").unwrap();
        let before = session.board().unwrap().element(id).unwrap().position();

        session.set_tool(ToolKind::Select);
        let grip = session.viewport().unwrap().world_to_screen(before);
        session.pointer_down(
            Point::new(grip.x + 5.0, grip.y + 5.0),
            MouseButton::Left,
            true,
        );
        session.pointer_move(Point::new(grip.x + 80.0, grip.y + 80.0));

        let after = session.board().unwrap().element(id).unwrap().position();
        assert_eq!(after, before);
    }

    #[test]
    fn test_add_component_centered() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        session.set_screen_size(Size::new(800.0, 600.0));

        let id = session.add_component("todoList").unwrap();
        let element = session.board().unwrap().element(id).unwrap();
        assert_eq!(element.position(), Point::new(270.0, 190.0));

        assert!(session.add_component("ganttChart").is_none());
    }

    #[test]
    fn test_run_components_applies_requested_mutations() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        let id = session.add_component("todoList").unwrap();

        // Corrupt the payload; the behavior normalizes it.
        session.update_element(id, &ElementPatch::set_data(serde_json::json!("garbage")));
        session.run_components();

        let element = session.board().unwrap().element(id).unwrap();
        assert_eq!(
            element.body,
            crate::ElementBody::Component {
                component_type: "todoList".into(),
                width: None,
                height: None,
                data: serde_json::json!({ "items": [] }),
            }
        );
    }

    #[test]
    fn test_clear_board_sets_reset_flag() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store.clone());
        session.add_component("stickyNote").unwrap();

        session.clear_board();
        assert!(session.board().unwrap().elements.is_empty());
        assert!(session.board().unwrap().has_been_cleared);

        assert!(block_on(session.maybe_flush(flush_deadline())));
        let saved = block_on(store.load_board(session.board_id().unwrap())).unwrap();
        assert!(saved.has_been_cleared);
        assert!(saved.elements.is_empty());
    }

    #[test]
    fn test_delete_current_board_clears_session() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        let id = session.board_id().unwrap().to_string();

        block_on(session.delete_board(&id)).unwrap();
        assert!(session.board().is_none());
        assert!(session.board_list().is_empty());
    }

    #[test]
    fn test_rename_updates_current_board_and_list() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        let id = session.board_id().unwrap().to_string();

        block_on(session.rename_board(&id, "Planning")).unwrap();
        assert_eq!(session.board().unwrap().name, "Planning");
        assert_eq!(session.board_list()[0].name, "Planning");
    }

    #[test]
    fn test_repaint_coalesces() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        session.set_tool(ToolKind::Draw);

        session.route(PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Left,
        });
        for i in 1..10 {
            session.route(PointerEvent::Move {
                position: Point::new(i as f64, 0.0),
            });
        }

        assert!(session.take_repaint());
        assert!(!session.take_repaint());
    }

    #[test]
    fn test_tool_switch_cancels_gesture() {
        let store = Arc::new(CountingStore::new());
        let mut session = session_with_board(store);
        session.set_tool(ToolKind::Draw);

        session.route(PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Left,
        });
        session.route(PointerEvent::Move {
            position: Point::new(10.0, 0.0),
        });
        session.set_tool(ToolKind::Pan);

        // The aborted stroke never reached the board.
        assert!(session.board().unwrap().elements.is_empty());
        assert!(session.stroke_in_progress().is_none());
    }

    #[test]
    fn test_pointer_events_ignored_without_board() {
        let store = Arc::new(MemoryStore::new());
        let mut session = BoardSession::new(store);
        session.set_tool(ToolKind::Draw);

        session.route(PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Left,
        });
        session.route(PointerEvent::Up {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        assert!(session.board().is_none());
        assert!(!session.has_unsaved_changes());
    }
}
