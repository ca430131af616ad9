//! Persistence abstraction over the external board store.
//!
//! The store is document-oriented: saves carry whole field values
//! (the entire element list, the full viewport snapshot), never
//! operation diffs.

mod debounce;
mod memory;

pub use debounce::{BoardPatch, DebouncedSaver, SAVE_DEBOUNCE};
pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use memory::block_on;

use crate::board::{Board, BoardSummary};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Interface to the external board document store.
///
/// Board-list results carry metadata only, keeping navigation cheap;
/// load and save exchange full documents. Create, rename, and delete
/// are immediate calls, never debounced.
pub trait BoardStore: Send + Sync {
    /// List board summaries, excluding the reserved "Today" board.
    fn list_boards(&self) -> BoxFuture<'_, StoreResult<Vec<BoardSummary>>>;

    /// Load a full board document.
    fn load_board(&self, id: &str) -> BoxFuture<'_, StoreResult<Board>>;

    /// Apply a patch to a stored board.
    fn save_board(&self, id: &str, patch: &BoardPatch) -> BoxFuture<'_, StoreResult<()>>;

    /// Create a new empty board.
    fn create_board(&self, name: &str) -> BoxFuture<'_, StoreResult<Board>>;

    /// Rename a board.
    fn rename_board(&self, id: &str, name: &str) -> BoxFuture<'_, StoreResult<()>>;

    /// Delete a board.
    fn delete_board(&self, id: &str) -> BoxFuture<'_, StoreResult<()>>;
}
