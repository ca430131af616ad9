//! Debounced save coordinator.
//!
//! Every element-list or viewport mutation is merged into a pending
//! patch and (re)arms a single-shot quiet-period timer. On expiry the
//! pending patch flushes as one save call. Merging is an explicit
//! field-wise step — a later viewport update overwrites an earlier
//! one rather than stacking — so N mutations inside the quiet period
//! produce exactly one outbound save carrying the union of fields.

use crate::camera::Viewport;
use crate::element::Element;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Quiet period after the last mutation before a batched save.
pub const SAVE_DEBOUNCE: Duration = Duration::from_secs(2);

/// Pending document fields keyed by name; later updates win per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_state: Option<Viewport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_been_cleared: Option<bool>,
}

impl BoardPatch {
    pub fn elements(elements: Vec<Element>) -> Self {
        Self {
            elements: Some(elements),
            ..Self::default()
        }
    }

    pub fn view_state(view_state: Viewport) -> Self {
        Self {
            view_state: Some(view_state),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.elements.is_none()
            && self.view_state.is_none()
            && self.has_been_cleared.is_none()
    }

    /// Merge `later` over this patch, field by field.
    pub fn merge(&mut self, later: BoardPatch) {
        if later.name.is_some() {
            self.name = later.name;
        }
        if later.elements.is_some() {
            self.elements = later.elements;
        }
        if later.view_state.is_some() {
            self.view_state = later.view_state;
        }
        if later.has_been_cleared.is_some() {
            self.has_been_cleared = later.has_been_cleared;
        }
    }
}

/// Owns the pending patch and the single-shot debounce timer.
///
/// The timer is cooperative: the session polls `take_due` from its
/// frame/timer callback. Switching boards discards the pending patch
/// silently; edits to a board the user navigated away from are not
/// guaranteed to flush.
#[derive(Debug)]
pub struct DebouncedSaver {
    board_id: Option<String>,
    pending: BoardPatch,
    deadline: Option<Instant>,
    quiet: Duration,
}

impl Default for DebouncedSaver {
    fn default() -> Self {
        Self::new()
    }
}

impl DebouncedSaver {
    pub fn new() -> Self {
        Self::with_quiet_period(SAVE_DEBOUNCE)
    }

    pub fn with_quiet_period(quiet: Duration) -> Self {
        Self {
            board_id: None,
            pending: BoardPatch::default(),
            deadline: None,
            quiet,
        }
    }

    /// Point the saver at a (possibly different) board. A change of
    /// board drops whatever was pending for the previous one.
    pub fn set_board(&mut self, board_id: Option<String>) {
        if self.board_id != board_id {
            if !self.pending.is_empty() {
                log::debug!(
                    "dropping pending save for board {:?} on switch",
                    self.board_id
                );
            }
            self.pending = BoardPatch::default();
            self.deadline = None;
            self.board_id = board_id;
        }
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    /// Merge a mutation into the pending patch and re-arm the timer.
    pub fn queue(&mut self, patch: BoardPatch) {
        if self.board_id.is_none() {
            return;
        }
        self.pending.merge(patch);
        self.deadline = Some(Instant::now() + self.quiet);
    }

    /// Whether the quiet period has elapsed with a patch pending.
    pub fn due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline) && !self.pending.is_empty()
    }

    /// Take the pending patch if its quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<(String, BoardPatch)> {
        if !self.due(now) {
            return None;
        }
        self.deadline = None;
        let board_id = self.board_id.clone()?;
        Some((board_id, std::mem::take(&mut self.pending)))
    }

    /// Put a failed flush back. The fields merge under anything queued
    /// since, and no timer is re-armed: the next mutation re-arms the
    /// debounce and the merged patch is retried with it.
    pub fn requeue_failed(&mut self, board_id: &str, mut failed: BoardPatch) {
        if self.board_id.as_deref() != Some(board_id) {
            // The user has moved on; the failed patch dies with its board.
            return;
        }
        failed.merge(std::mem::take(&mut self.pending));
        self.pending = failed;
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SerializableColor;
    use kurbo::Point;

    fn stroke() -> Element {
        Element::stroke(
            vec![Point::ZERO, Point::new(1.0, 1.0)],
            SerializableColor::black(),
            2.0,
        )
    }

    fn saver() -> DebouncedSaver {
        let mut saver = DebouncedSaver::with_quiet_period(Duration::from_millis(20));
        saver.set_board(Some("b1".into()));
        saver
    }

    #[test]
    fn test_nothing_due_before_quiet_period() {
        let mut saver = saver();
        saver.queue(BoardPatch::view_state(Viewport::default()));
        assert!(saver.take_due(Instant::now()).is_none());
    }

    #[test]
    fn test_coalesces_mutations_into_one_flush() {
        let mut saver = saver();
        saver.queue(BoardPatch::view_state(Viewport {
            x: 1.0,
            y: 0.0,
            zoom: 1.0,
        }));
        saver.queue(BoardPatch::elements(vec![stroke()]));
        saver.queue(BoardPatch::view_state(Viewport {
            x: 9.0,
            y: 9.0,
            zoom: 2.0,
        }));

        let later = Instant::now() + Duration::from_millis(100);
        let (board_id, patch) = saver.take_due(later).expect("one flush due");
        assert_eq!(board_id, "b1");
        // Union of fields, later viewport wins.
        assert_eq!(patch.elements.as_ref().unwrap().len(), 1);
        assert_eq!(patch.view_state.unwrap().x, 9.0);

        // Exactly one: nothing further is due.
        assert!(saver.take_due(later + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_each_queue_rearms_timer() {
        let mut saver = saver();
        saver.queue(BoardPatch::view_state(Viewport::default()));
        let first_deadline = Instant::now() + Duration::from_millis(10);
        saver.queue(BoardPatch::view_state(Viewport::default()));
        // The re-armed deadline is beyond the first one.
        assert!(!saver.due(first_deadline));
    }

    #[test]
    fn test_board_switch_drops_pending() {
        let mut saver = saver();
        saver.queue(BoardPatch::elements(vec![stroke()]));
        saver.set_board(Some("b2".into()));

        assert!(!saver.has_pending());
        let later = Instant::now() + Duration::from_secs(1);
        assert!(saver.take_due(later).is_none());
    }

    #[test]
    fn test_requeue_failed_retries_on_next_edit() {
        let mut saver = saver();
        saver.queue(BoardPatch::elements(vec![stroke()]));
        let later = Instant::now() + Duration::from_millis(100);
        let (board_id, failed) = saver.take_due(later).unwrap();

        saver.requeue_failed(&board_id, failed);
        // No timer armed: the failed patch waits for the next edit.
        assert!(saver.has_pending());
        assert!(saver.take_due(later + Duration::from_secs(1)).is_none());

        saver.queue(BoardPatch::view_state(Viewport::default()));
        let (_, patch) = saver.take_due(later + Duration::from_secs(2)).unwrap();
        assert!(patch.elements.is_some());
        assert!(patch.view_state.is_some());
    }

    #[test]
    fn test_requeue_keeps_newer_pending_fields() {
        let mut saver = saver();
        saver.queue(BoardPatch::elements(vec![stroke()]));
        let later = Instant::now() + Duration::from_millis(100);
        let (board_id, failed) = saver.take_due(later).unwrap();

        // A newer edit lands before the failure is requeued.
        let newer = vec![stroke(), stroke()];
        saver.queue(BoardPatch::elements(newer.clone()));
        saver.requeue_failed(&board_id, failed);

        let (_, patch) = saver.take_due(later + Duration::from_secs(1)).unwrap();
        assert_eq!(patch.elements.unwrap().len(), 2);
    }

    #[test]
    fn test_requeue_after_switch_is_dropped() {
        let mut saver = saver();
        saver.queue(BoardPatch::elements(vec![stroke()]));
        let later = Instant::now() + Duration::from_millis(100);
        let (board_id, failed) = saver.take_due(later).unwrap();

        saver.set_board(Some("b2".into()));
        saver.requeue_failed(&board_id, failed);
        assert!(!saver.has_pending());
    }

    #[test]
    fn test_queue_without_board_is_ignored() {
        let mut saver = DebouncedSaver::new();
        saver.queue(BoardPatch::view_state(Viewport::default()));
        assert!(!saver.has_pending());
    }
}
