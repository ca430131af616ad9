//! Corkboard Core Library
//!
//! Platform-agnostic engine for the Corkboard multi-page whiteboard:
//! viewport transforms, the element document, freehand drawing and
//! component-drag gestures, the component template catalog, and the
//! debounced persistence pipeline.

pub mod board;
pub mod camera;
pub mod drag;
pub mod drawing;
pub mod element;
pub mod input;
pub mod session;
pub mod storage;
pub mod templates;
pub mod tools;

pub use board::{Board, BoardSummary};
pub use camera::Viewport;
pub use drag::DragController;
pub use drawing::{DrawController, PanGesture};
pub use element::{Element, ElementBody, ElementId, ElementKind, ElementPatch, SerializableColor};
pub use input::{MouseButton, PointerEvent};
pub use session::BoardSession;
pub use storage::{BoardPatch, BoardStore, DebouncedSaver, MemoryStore, StoreError, StoreResult};
pub use templates::{ComponentAction, ComponentBehavior, ComponentCtx, TemplateRegistry};
pub use tools::{DrawSettings, ToolKind};
