//! In-memory board store for tests and ephemeral use.

use super::{BoardPatch, BoardStore, BoxFuture, StoreError, StoreResult};
use crate::board::{Board, BoardSummary, TODAY_BOARD_NAME};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory implementation of the external document store.
#[derive(Default)]
pub struct MemoryStore {
    boards: RwLock<HashMap<String, Board>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a board directly, bypassing `create_board` (used to
    /// seed the reserved "Today" board).
    pub fn insert(&self, board: Board) {
        self.boards
            .write()
            .expect("store lock poisoned")
            .insert(board.id.clone(), board);
    }

    fn next_order(boards: &HashMap<String, Board>) -> i64 {
        boards.values().map(|b| b.order).max().unwrap_or(-1) + 1
    }
}

impl BoardStore for MemoryStore {
    fn list_boards(&self) -> BoxFuture<'_, StoreResult<Vec<BoardSummary>>> {
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
            let mut summaries: Vec<BoardSummary> = boards
                .values()
                .filter(|b| b.name != TODAY_BOARD_NAME)
                .map(Board::summary)
                .collect();
            summaries.sort_by_key(|s| s.order);
            Ok(summaries)
        })
    }

    fn load_board(&self, id: &str) -> BoxFuture<'_, StoreResult<Board>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
            boards
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound(id))
        })
    }

    fn save_board(&self, id: &str, patch: &BoardPatch) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
            let board = boards.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            board.apply_patch(&patch);
            Ok(())
        })
    }

    fn create_board(&self, name: &str) -> BoxFuture<'_, StoreResult<Board>> {
        let name = name.to_string();
        Box::pin(async move {
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
            let board = Board::new(name, Self::next_order(&boards));
            boards.insert(board.id.clone(), board.clone());
            Ok(board)
        })
    }

    fn rename_board(&self, id: &str, name: &str) -> BoxFuture<'_, StoreResult<()>> {
        let patch = BoardPatch {
            name: Some(name.to_string()),
            ..BoardPatch::default()
        };
        let id = id.to_string();
        Box::pin(async move { self.save_board(&id, &patch).await })
    }

    fn delete_board(&self, id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
            boards.remove(&id);
            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
