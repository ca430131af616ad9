//! Board document and element store.

use crate::camera::Viewport;
use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::storage::BoardPatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the reserved board managed by the external daily-reset
/// collaborator. Excluded from user-facing board lists, addressable
/// like any other board.
pub const TODAY_BOARD_NAME: &str = "Today";

/// One whiteboard document: elements, viewport snapshot, and metadata.
///
/// This is the full document exchanged with the external store. The
/// element list is the paint-order baseline; an element's z-index hint
/// refines ordering at render time but never reorders storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    /// Display order for board tabs.
    pub order: i64,
    pub elements: Vec<Element>,
    pub view_state: Viewport,
    /// Set when the user explicitly clears the board; consumed by the
    /// external daily-reset collaborator.
    pub has_been_cleared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board metadata for the cheap list endpoint (no element payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Create a new empty board.
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            order,
            elements: Vec::new(),
            view_state: Viewport::default(),
            has_been_cleared: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            order: self.order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Append an element, assigning a fresh id. Returns the stored id.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        element.id = Uuid::new_v4();
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Merge patch fields into the element with the given id.
    ///
    /// A missing id is a silent no-op to tolerate races with a
    /// concurrent delete.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) {
        if let Some(element) = self.elements.iter_mut().find(|e| e.id == id) {
            element.apply(patch);
        }
    }

    /// Remove the element with the given id, if present.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements in render order: insertion order refined by a stable
    /// sort on the z-index hint.
    pub fn render_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Render-order elements filtered by variant tag.
    pub fn elements_of_type(&self, kind: ElementKind) -> Vec<&Element> {
        self.render_order()
            .into_iter()
            .filter(|e| e.kind() == kind)
            .collect()
    }

    /// The largest z-index among elements, or 0 on an empty board.
    pub fn max_z_index(&self) -> i64 {
        self.elements.iter().map(|e| e.z_index).max().unwrap_or(0)
    }

    /// Remove all elements and record the manual clear for the
    /// daily-reset collaborator.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.has_been_cleared = true;
    }

    /// Apply a document patch, touching the updated timestamp.
    pub fn apply_patch(&mut self, patch: &BoardPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(elements) = &patch.elements {
            self.elements = elements.clone();
        }
        if let Some(view_state) = patch.view_state {
            self.view_state = view_state;
        }
        if let Some(cleared) = patch.has_been_cleared {
            self.has_been_cleared = cleared;
        }
        self.updated_at = Utc::now();
    }
}
