//! Component template catalog and hosting contract.
//!
//! The registry is a static catalog mapping a component-type key to
//! its default size/data and a behavior handle. The host owns
//! positioning; widgets never move themselves. Elements whose type
//! key is unknown (a template removed in a later deployment) fail
//! soft: they are skipped by the hosting pass but left in storage so
//! a future registry addition can resurrect them.

use crate::board::Board;
use crate::camera::Viewport;
use crate::element::{Element, ElementBody, ElementId, ElementKind};
use kurbo::{Point, Size};
use serde_json::{Value, json};
use std::collections::HashMap;

/// A mutation requested by a hosted widget; applied by the session
/// after the hosting pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentAction {
    SetData { id: ElementId, data: Value },
    Delete { id: ElementId },
}

/// What a hosted widget gets from the host each pass: its identity,
/// current payload, effective size, and callbacks to replace the
/// payload or request deletion.
pub struct ComponentCtx<'a> {
    pub id: ElementId,
    pub data: &'a Value,
    pub width: f64,
    pub height: f64,
    actions: &'a mut Vec<ComponentAction>,
}

impl ComponentCtx<'_> {
    /// Replace the widget's data payload.
    pub fn set_data(&mut self, data: Value) {
        self.actions.push(ComponentAction::SetData { id: self.id, data });
    }

    /// Ask the host to delete this widget's element.
    pub fn request_delete(&mut self) {
        self.actions.push(ComponentAction::Delete { id: self.id });
    }
}

/// Behavior contract for a component type.
pub trait ComponentBehavior: Send + Sync {
    /// Present the widget for this frame. The payload shape is owned
    /// entirely by the implementation; malformed payloads should be
    /// normalized via `ctx.set_data`, never panicked on.
    fn present(&self, ctx: &mut ComponentCtx<'_>);
}

/// One entry in the catalog.
pub struct ComponentTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// World-space size used when an element carries none.
    pub default_size: Size,
    default_data: fn() -> Value,
    behavior: Box<dyn ComponentBehavior>,
}

impl ComponentTemplate {
    pub fn default_data(&self) -> Value {
        (self.default_data)()
    }
}

/// A component element resolved against the registry for one pass.
pub struct HostedComponent<'a> {
    pub element: &'a Element,
    pub template: &'a ComponentTemplate,
    /// Explicit element size, or the template default.
    pub size: Size,
}

/// Static, read-only catalog of known component types.
pub struct TemplateRegistry {
    templates: HashMap<&'static str, ComponentTemplate>,
}

impl TemplateRegistry {
    /// The built-in component set.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for template in [
            ComponentTemplate {
                key: "todoList",
                label: "Checklist",
                icon: "checklist",
                default_size: Size::new(260.0, 220.0),
                default_data: || json!({ "items": [] }),
                behavior: Box::new(TodoListBehavior),
            },
            ComponentTemplate {
                key: "stickyNote",
                label: "Sticky note",
                icon: "note",
                default_size: Size::new(200.0, 200.0),
                default_data: || json!({ "text": "" }),
                behavior: Box::new(StickyNoteBehavior),
            },
            ComponentTemplate {
                key: "linkList",
                label: "Links",
                icon: "link",
                default_size: Size::new(260.0, 180.0),
                default_data: || json!({ "links": [] }),
                behavior: Box::new(LinkListBehavior),
            },
        ] {
            templates.insert(template.key, template);
        }
        Self { templates }
    }

    pub fn get(&self, key: &str) -> Option<&ComponentTemplate> {
        self.templates.get(key)
    }

    pub fn templates(&self) -> impl Iterator<Item = &ComponentTemplate> {
        self.templates.values()
    }

    /// Effective world-space size for a component element, falling
    /// back to the template default. `None` for strokes and for
    /// unknown component types.
    pub fn effective_size(&self, element: &Element) -> Option<Size> {
        match &element.body {
            ElementBody::Component {
                component_type,
                width,
                height,
                ..
            } => {
                let template = self.get(component_type)?;
                Some(Size::new(
                    width.unwrap_or(template.default_size.width),
                    height.unwrap_or(template.default_size.height),
                ))
            }
            ElementBody::Drawing { .. } => None,
        }
    }

    /// Create a new element of a known type, centered on the
    /// viewport's visible center.
    pub fn spawn_centered(
        &self,
        key: &str,
        viewport: &Viewport,
        screen_size: Size,
    ) -> Option<Element> {
        let template = self.get(key)?;
        let center = viewport.visible_center(screen_size);
        let position = Point::new(
            center.x - template.default_size.width / 2.0,
            center.y - template.default_size.height / 2.0,
        );
        Some(Element::component(key, position, template.default_data()))
    }

    /// Resolve a board's components for one hosting pass, in render
    /// order. Unknown types are skipped, never removed.
    pub fn hosted<'a>(&'a self, board: &'a Board) -> Vec<HostedComponent<'a>> {
        board
            .elements_of_type(ElementKind::Component)
            .into_iter()
            .filter_map(|element| {
                let key = element.component_type().unwrap_or_default();
                match self.get(key) {
                    Some(template) => Some(HostedComponent {
                        element,
                        template,
                        size: self.effective_size(element).unwrap_or(template.default_size),
                    }),
                    None => {
                        log::debug!("skipping element {} with unknown type {key:?}", element.id);
                        None
                    }
                }
            })
            .collect()
    }

    /// Run every hosted widget's behavior, collecting the mutations
    /// they request.
    pub fn present(&self, board: &Board) -> Vec<ComponentAction> {
        let mut actions = Vec::new();
        for hosted in self.hosted(board) {
            if let ElementBody::Component { data, .. } = &hosted.element.body {
                let mut ctx = ComponentCtx {
                    id: hosted.element.id,
                    data,
                    width: hosted.size.width,
                    height: hosted.size.height,
                    actions: &mut actions,
                };
                hosted.template.behavior.present(&mut ctx);
            }
        }
        actions
    }
}

/// Checklist widget: payload is `{ "items": [{ "text", "done" }] }`.
struct TodoListBehavior;

impl ComponentBehavior for TodoListBehavior {
    fn present(&self, ctx: &mut ComponentCtx<'_>) {
        if !ctx.data.get("items").is_some_and(Value::is_array) {
            ctx.set_data(json!({ "items": [] }));
        }
    }
}

/// Sticky note widget: payload is `{ "text": "..." }`.
struct StickyNoteBehavior;

impl ComponentBehavior for StickyNoteBehavior {
    fn present(&self, ctx: &mut ComponentCtx<'_>) {
        if !ctx.data.get("text").is_some_and(Value::is_string) {
            ctx.set_data(json!({ "text": "" }));
        }
    }
}

/// Link list widget: payload is `{ "links": [{ "label", "url" }] }`.
struct LinkListBehavior;

impl ComponentBehavior for LinkListBehavior {
    fn present(&self, ctx: &mut ComponentCtx<'_>) {
        if !ctx.data.get("links").is_some_and(Value::is_array) {
            ctx.set_data(json!({ "links": [] }));
        }
    }
}
