//! Corkboard Board Document Store
//!
//! A small HTTP service holding board documents for the editor. The
//! list endpoint returns metadata only; loads and saves exchange
//! whole documents, with saves expressed as field patches.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /health
//! GET    /boards            -> [{ "id", "name", "order" }]   (excludes "Today")
//! POST   /boards            <- { "name": "Planning" }        -> full board
//! GET    /boards/{id}       -> full board document
//! PATCH  /boards/{id}       <- { "elements": [...], "viewState": {...}, ... }
//! DELETE /boards/{id}
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use corkboard_core::board::TODAY_BOARD_NAME;
use corkboard_core::{Board, BoardPatch, BoardSummary};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Debug, Deserialize)]
struct CreateBoardRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn not_found(id: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("Board not found: {id}"),
        }),
    )
}

/// Shared application state
struct AppState {
    /// Board documents keyed by id
    boards: DashMap<String, Board>,
}

impl AppState {
    fn new() -> Self {
        let state = Self {
            boards: DashMap::new(),
        };
        // The reserved daily board always exists, under a fixed id so
        // clients can address it without listing.
        let mut today = Board::new(TODAY_BOARD_NAME, 0);
        today.id = "today".to_string();
        state.boards.insert(today.id.clone(), today);
        state
    }

    /// Summaries of all regular boards, sorted by order. "Today" is
    /// reserved and never listed, though it stays loadable by id.
    fn list(&self) -> Vec<BoardSummary> {
        let mut summaries: Vec<BoardSummary> = self
            .boards
            .iter()
            .filter(|entry| entry.name != TODAY_BOARD_NAME)
            .map(|entry| entry.summary())
            .collect();
        summaries.sort_by_key(|s| s.order);
        summaries
    }

    fn create(&self, name: &str) -> Board {
        let order = self
            .boards
            .iter()
            .map(|entry| entry.order)
            .max()
            .map_or(0, |max| max + 1);
        let board = Board::new(name, order);
        self.boards.insert(board.id.clone(), board.clone());
        board
    }

    fn load(&self, id: &str) -> Option<Board> {
        self.boards.get(id).map(|entry| entry.clone())
    }

    /// Apply a patch to a stored board. Patched fields replace the
    /// stored values wholesale; absent fields are untouched.
    fn patch(&self, id: &str, patch: &BoardPatch) -> bool {
        match self.boards.get_mut(id) {
            Some(mut board) => {
                board.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    fn delete(&self, id: &str) -> bool {
        self.boards.remove(id).is_some()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corkboard_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/health", get(health))
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/boards/{id}",
            get(get_board).patch(patch_board).delete(delete_board),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3040));
    info!("Corkboard document store listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn list_boards(State(state): State<Arc<AppState>>) -> Json<Vec<BoardSummary>> {
    Json(state.list())
}

async fn create_board(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBoardRequest>,
) -> impl IntoResponse {
    let board = state.create(&req.name);
    info!("Created board {} ({})", board.name, board.id);
    (StatusCode::CREATED, Json(board))
}

async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Board>, (StatusCode, Json<ErrorBody>)> {
    state.load(&id).map(Json).ok_or_else(|| not_found(&id))
}

async fn patch_board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<BoardPatch>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    if state.patch(&id, &patch) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

async fn delete_board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    if state.delete(&id) {
        info!("Deleted board {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}
