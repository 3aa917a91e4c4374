//! Canvas state: the canonical element list and its mutation primitives.

use crate::element::{CanvasElement, ElementId, ElementKind, ImageRef, SerializableColor, Shadow};
use crate::geometry::{MIN_ELEMENT_SIZE, clamp_to_bounds};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The active pointer interaction, tracked for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging,
    Resizing,
    Rotating,
}

/// A partial update merged into an element by [`CanvasState::update_element`].
///
/// Unset fields leave the element untouched. Geometry fields are re-clamped
/// against the print area after the merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    pub position: Option<Point>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub corner_radius: Option<f64>,
    pub border_width: Option<f64>,
    pub border_color: Option<Option<SerializableColor>>,
    pub shadow: Option<Option<Shadow>>,
    pub visible: Option<bool>,
    pub kind: Option<ElementKind>,
}

impl ElementPatch {
    /// Patch that moves an element.
    pub fn move_to(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch that replaces the full geometry rectangle.
    pub fn rect(rect: Rect) -> Self {
        Self {
            position: Some(Point::new(rect.x0, rect.y0)),
            width: Some(rect.width()),
            height: Some(rect.height()),
            ..Self::default()
        }
    }

    /// Patch that sets the rotation angle (degrees).
    pub fn rotate_to(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }
}

/// A deep copy of the element list at one committed gesture boundary.
pub type Snapshot = HashMap<ElementId, CanvasElement>;

/// The live canvas for one editing session.
///
/// Every geometry mutation routes through [`clamp_to_bounds`], so after any
/// call all elements lie inside the print area and respect the minimum size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasState {
    /// The printable region, fixed for the session by the product template.
    print_area: Rect,
    /// Optional product background supplied by the template.
    background: Option<ImageRef>,
    /// All elements, keyed by ID. Paint order comes from `layer`.
    elements: HashMap<ElementId, CanvasElement>,
    /// Currently selected element.
    pub selected: Option<ElementId>,
    /// Active interaction mode. Transient, not part of a saved design.
    #[serde(skip)]
    pub mode: InteractionMode,
}

impl CanvasState {
    /// Create an empty canvas for a print area.
    pub fn new(print_area: Rect, background: Option<ImageRef>) -> Self {
        Self {
            print_area,
            background,
            elements: HashMap::new(),
            selected: None,
            mode: InteractionMode::Idle,
        }
    }

    pub fn print_area(&self) -> Rect {
        self.print_area
    }

    pub fn background(&self) -> Option<&ImageRef> {
        self.background.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.get(&id)
    }

    /// Append a new element of `kind` with default geometry, centered in the
    /// print area, on top of everything else. Returns its ID.
    pub fn add_element(&mut self, kind: ElementKind) -> ElementId {
        let (width, height) = CanvasElement::default_size(&kind);
        let position = Point::new(
            self.print_area.x0 + (self.print_area.width() - width) / 2.0,
            self.print_area.y0 + (self.print_area.height() - height) / 2.0,
        );
        let mut element = CanvasElement::new(kind, position, width, height);
        element.layer = self.top_layer() + 1;
        element.set_rect(clamp_to_bounds(
            element.as_rect(),
            self.print_area,
            MIN_ELEMENT_SIZE,
        ));

        let id = element.id();
        self.elements.insert(id, element);
        id
    }

    /// Insert an already-built element (deserialized or duplicated),
    /// clamping its geometry. The caller keeps the element's layer.
    pub fn insert(&mut self, mut element: CanvasElement) -> ElementId {
        element.set_rect(clamp_to_bounds(
            element.as_rect(),
            self.print_area,
            MIN_ELEMENT_SIZE,
        ));
        let id = element.id();
        self.elements.insert(id, element);
        id
    }

    /// Merge a patch into an element, then re-clamp its geometry.
    ///
    /// Unknown IDs and locked elements are silent no-ops: both can race
    /// legitimately with user input.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) {
        let Some(element) = self.elements.get_mut(&id) else {
            log::debug!("update for unknown element {id}, ignoring");
            return;
        };
        if element.locked {
            log::debug!("update for locked element {id}, ignoring");
            return;
        }

        if let Some(position) = patch.position {
            element.position = position;
        }
        if let Some(width) = patch.width {
            element.width = width;
        }
        if let Some(height) = patch.height {
            element.height = height;
        }
        if let Some(rotation) = patch.rotation {
            element.rotation = rotation;
        }
        if let Some(opacity) = patch.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(corner_radius) = patch.corner_radius {
            element.corner_radius = corner_radius.max(0.0);
        }
        if let Some(border_width) = patch.border_width {
            element.border_width = border_width.max(0.0);
        }
        if let Some(border_color) = patch.border_color {
            element.border_color = border_color;
        }
        if let Some(shadow) = patch.shadow {
            element.shadow = shadow;
        }
        if let Some(visible) = patch.visible {
            element.visible = visible;
        }
        if let Some(kind) = patch.kind {
            element.kind = kind;
        }

        element.set_rect(clamp_to_bounds(
            element.as_rect(),
            self.print_area,
            MIN_ELEMENT_SIZE,
        ));
    }

    /// Set or clear the locked flag. Separate from [`Self::update_element`]
    /// because that primitive refuses to touch locked elements.
    pub fn set_locked(&mut self, id: ElementId, locked: bool) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.locked = locked;
        }
    }

    /// Remove an element by ID, clearing the selection if it pointed at it.
    /// Unknown IDs are a silent no-op.
    pub fn remove_element(&mut self, id: ElementId) -> Option<CanvasElement> {
        let removed = self.elements.remove(&id);
        if removed.is_some() && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Change paint order without touching geometry.
    pub fn reorder(&mut self, id: ElementId, new_layer: i32) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.layer = new_layer;
        }
    }

    /// Bring an element above everything else.
    pub fn bring_to_front(&mut self, id: ElementId) {
        let top = self.top_layer();
        if let Some(element) = self.elements.get_mut(&id) {
            if element.layer < top {
                element.layer = top + 1;
            }
        }
    }

    /// Send an element below everything else.
    pub fn send_to_back(&mut self, id: ElementId) {
        let bottom = self.bottom_layer();
        if let Some(element) = self.elements.get_mut(&id) {
            if element.layer > bottom {
                element.layer = bottom - 1;
            }
        }
    }

    /// Swap paint order with the next element above. Returns false when the
    /// element is already frontmost (or unknown).
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        let order = self.ordered_ids();
        let Some(pos) = order.iter().position(|&oid| oid == id) else {
            return false;
        };
        if pos + 1 >= order.len() {
            return false;
        }
        self.swap_layers(id, order[pos + 1]);
        true
    }

    /// Swap paint order with the next element below. Returns false when the
    /// element is already backmost (or unknown).
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        let order = self.ordered_ids();
        let Some(pos) = order.iter().position(|&oid| oid == id) else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        self.swap_layers(id, order[pos - 1]);
        true
    }

    fn swap_layers(&mut self, a: ElementId, b: ElementId) {
        let (Some(la), Some(lb)) = (
            self.elements.get(&a).map(|e| e.layer),
            self.elements.get(&b).map(|e| e.layer),
        ) else {
            return;
        };
        // Equal layers would make the swap a no-op; nudge instead.
        if la == lb {
            if let Some(e) = self.elements.get_mut(&b) {
                e.layer = lb + 1;
            }
            return;
        }
        if let Some(e) = self.elements.get_mut(&a) {
            e.layer = lb;
        }
        if let Some(e) = self.elements.get_mut(&b) {
            e.layer = la;
        }
    }

    /// Elements in paint order (back to front). Ties break on ID so the
    /// order is deterministic.
    pub fn elements_ordered(&self) -> Vec<&CanvasElement> {
        let mut ordered: Vec<&CanvasElement> = self.elements.values().collect();
        ordered.sort_by_key(|e| (e.layer, e.id()));
        ordered
    }

    fn ordered_ids(&self) -> Vec<ElementId> {
        self.elements_ordered().iter().map(|e| e.id()).collect()
    }

    /// Topmost element under the pointer, front to back. Locked elements are
    /// transparent to the pointer; they cannot start a gesture.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.elements_ordered()
            .iter()
            .rev()
            .find(|e| !e.locked && e.hit_test(point, tolerance))
            .map(|e| e.id())
    }

    /// Highest layer in use, or 0 for an empty canvas.
    pub fn top_layer(&self) -> i32 {
        self.elements.values().map(|e| e.layer).max().unwrap_or(0)
    }

    fn bottom_layer(&self) -> i32 {
        self.elements.values().map(|e| e.layer).min().unwrap_or(0)
    }

    /// Deep copy of the element list, the unit stored by history.
    pub fn snapshot(&self) -> Snapshot {
        self.elements.clone()
    }

    /// Replace the live element list with a history snapshot. Drops the
    /// selection if the selected element does not exist in the snapshot.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.elements = snapshot;
        if let Some(id) = self.selected {
            if !self.elements.contains_key(&id) {
                self.selected = None;
            }
        }
    }

    /// Serialize the design to JSON. Round-trips every element attribute.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a design from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
