//! The design session: pointer/keyboard input driving canvas mutations,
//! with gesture boundaries committed to history.

use crate::canvas::{CanvasState, ElementPatch, InteractionMode};
use crate::element::{CanvasElement, ElementId, ElementKind, ImageRef};
use crate::geometry::{GRID_SIZE, MIN_ELEMENT_SIZE, clamp_to_bounds, snap, snap_point};
use crate::handles::{self, HANDLE_HIT_TOLERANCE, Handle, HandleKind};
use crate::history::History;
use crate::input::{EditorAction, Modifiers, action_for};
use kurbo::{Point, Rect, Vec2};

/// Rotation snap increment in degrees, applied while grid snapping is on.
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// Offset applied when duplicating an element.
const DUPLICATE_OFFSET: f64 = 16.0;

/// Transient state of the gesture in progress. Owned exclusively by the
/// session; dropped on pointer-up.
#[derive(Debug, Clone)]
enum Gesture {
    Drag {
        id: ElementId,
        /// Pointer offset from the element origin at grab time.
        grab_offset: Vec2,
    },
    Resize {
        id: ElementId,
        handle: HandleKind,
        start_pointer: Point,
        /// Pre-gesture geometry; every move is computed from this, not from
        /// the previous frame, so the gesture cannot drift.
        initial: Rect,
    },
    Rotate {
        id: ElementId,
    },
}

/// Read-only view of the session for the host renderer.
///
/// The renderer paints the background, grid, print-area guide, elements in
/// the given order, and the handle set; it must never mutate what it sees.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Elements in paint order (back to front).
    pub elements: Vec<&'a CanvasElement>,
    pub selected: Option<ElementId>,
    /// Handles for the selected element, empty when nothing is selected.
    pub handles: Vec<Handle>,
    pub print_area: Rect,
    pub background: Option<&'a ImageRef>,
    pub mode: InteractionMode,
    pub grid_size: f64,
    pub snap_to_grid: bool,
}

/// One editing session over a product template.
///
/// All mutation is synchronous inside the input handler that triggered it;
/// there is no background work. Gestures are optimistic: moves are clamped,
/// never rejected, and releasing the pointer anywhere (even outside the
/// canvas) commits the gesture. Discarding a bad gesture is what undo is
/// for.
#[derive(Debug, Clone)]
pub struct DesignSession {
    canvas: CanvasState,
    history: History,
    gesture: Option<Gesture>,
    pub snap_to_grid: bool,
    pub grid_size: f64,
}

impl DesignSession {
    /// Start a session for a print area and optional product background.
    pub fn new(print_area: Rect, background: Option<ImageRef>) -> Self {
        let canvas = CanvasState::new(print_area, background);
        let history = History::new(canvas.snapshot());
        Self {
            canvas,
            history,
            gesture: None,
            snap_to_grid: false,
            grid_size: GRID_SIZE,
        }
    }

    /// Read access for renderers and the export pipeline.
    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.canvas.selected
    }

    pub fn mode(&self) -> InteractionMode {
        self.canvas.mode
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Add a new element on top, select it, and commit.
    pub fn add_element(&mut self, kind: ElementKind) -> ElementId {
        let id = self.canvas.add_element(kind);
        self.canvas.selected = Some(id);
        self.commit();
        id
    }

    /// Insert a pre-built element (e.g. template seed), select it, commit.
    pub fn insert_element(&mut self, mut element: CanvasElement) -> ElementId {
        if element.layer == 0 {
            element.layer = self.canvas.top_layer() + 1;
        }
        let id = self.canvas.insert(element);
        self.canvas.selected = Some(id);
        self.commit();
        id
    }

    /// Duplicate the selected element with a small offset.
    pub fn duplicate_selection(&mut self) -> Option<ElementId> {
        let source = self.canvas.get(self.canvas.selected?)?.clone();
        let mut copy = source;
        copy.regenerate_id();
        copy.position = Point::new(
            copy.position.x + DUPLICATE_OFFSET,
            copy.position.y + DUPLICATE_OFFSET,
        );
        copy.layer = self.canvas.top_layer() + 1;
        copy.locked = false;
        let id = self.canvas.insert(copy);
        self.canvas.selected = Some(id);
        self.commit();
        Some(id)
    }

    /// Merge a property patch into an element and commit if anything
    /// changed. Unknown or locked targets are silent no-ops.
    pub fn apply_patch(&mut self, id: ElementId, patch: ElementPatch) {
        let before = self.canvas.get(id).cloned();
        self.canvas.update_element(id, patch);
        if self.canvas.get(id) != before.as_ref() {
            self.commit();
        }
    }

    /// Set or clear an element's locked flag and commit if it changed.
    /// Unknown IDs are a silent no-op.
    pub fn set_locked(&mut self, id: ElementId, locked: bool) {
        let before = self.canvas.get(id).map(|e| e.locked);
        self.canvas.set_locked(id, locked);
        if self.canvas.get(id).map(|e| e.locked) != before {
            self.commit();
        }
    }

    /// Delete the selected element, if any, and commit.
    pub fn delete_selection(&mut self) -> Option<ElementId> {
        let id = self.canvas.selected?;
        let removed = self.canvas.remove_element(id)?;
        self.commit();
        Some(removed.id())
    }

    /// Change the selected element's paint order and commit if effective.
    pub fn bring_forward(&mut self, id: ElementId) {
        if self.canvas.bring_forward(id) {
            self.commit();
        }
    }

    pub fn send_backward(&mut self, id: ElementId) {
        if self.canvas.send_backward(id) {
            self.commit();
        }
    }

    pub fn bring_to_front(&mut self, id: ElementId) {
        let before = self.canvas.get(id).map(|e| e.layer);
        self.canvas.bring_to_front(id);
        if self.canvas.get(id).map(|e| e.layer) != before {
            self.commit();
        }
    }

    pub fn send_to_back(&mut self, id: ElementId) {
        let before = self.canvas.get(id).map(|e| e.layer);
        self.canvas.send_to_back(id);
        if self.canvas.get(id).map(|e| e.layer) != before {
            self.commit();
        }
    }

    /// Pointer pressed at a canvas-local point.
    ///
    /// Handle grips on the selected element win over element bodies; an
    /// element body starts a drag; empty canvas clears the selection.
    pub fn pointer_down(&mut self, point: Point) {
        if self.gesture.is_some() {
            return;
        }

        // Grips first: they can sit outside the element's own rect.
        if let Some(id) = self.canvas.selected {
            if let Some(element) = self.canvas.get(id) {
                if !element.locked {
                    let hit = handles::hit_test_handles(
                        element.as_rect(),
                        element.rotation,
                        point,
                        HANDLE_HIT_TOLERANCE,
                    );
                    match hit {
                        Some(HandleKind::Rotate) => {
                            self.gesture = Some(Gesture::Rotate { id });
                            self.canvas.mode = InteractionMode::Rotating;
                            return;
                        }
                        Some(handle) => {
                            self.gesture = Some(Gesture::Resize {
                                id,
                                handle,
                                start_pointer: point,
                                initial: element.as_rect(),
                            });
                            self.canvas.mode = InteractionMode::Resizing;
                            return;
                        }
                        None => {}
                    }
                }
            }
        }

        match self.canvas.element_at(point, 0.0) {
            Some(id) => {
                let element = self.canvas.get(id).cloned();
                if let Some(element) = element {
                    self.canvas.selected = Some(id);
                    self.gesture = Some(Gesture::Drag {
                        id,
                        grab_offset: Vec2::new(
                            point.x - element.position.x,
                            point.y - element.position.y,
                        ),
                    });
                    self.canvas.mode = InteractionMode::Dragging;
                }
            }
            None => {
                self.canvas.selected = None;
            }
        }
    }

    /// Pointer moved. Updates the element under gesture in place; nothing
    /// is recorded until pointer-up.
    pub fn pointer_move(&mut self, point: Point) {
        let Some(gesture) = self.gesture.clone() else {
            return;
        };

        match gesture {
            Gesture::Drag { id, grab_offset } => {
                let Some(size) = self.canvas.get(id).map(|e| (e.width, e.height)) else {
                    return;
                };
                let raw = Point::new(point.x - grab_offset.x, point.y - grab_offset.y);
                let snapped = snap_point(raw, self.grid_size, self.snap_to_grid);
                let candidate =
                    Rect::new(snapped.x, snapped.y, snapped.x + size.0, snapped.y + size.1);
                let clamped =
                    clamp_to_bounds(candidate, self.canvas.print_area(), MIN_ELEMENT_SIZE);
                self.canvas
                    .update_element(id, ElementPatch::move_to(Point::new(clamped.x0, clamped.y0)));
            }
            Gesture::Resize {
                id,
                handle,
                start_pointer,
                initial,
            } => {
                let delta = Vec2::new(point.x - start_pointer.x, point.y - start_pointer.y);
                let resized = handles::resize(initial, handle, delta, MIN_ELEMENT_SIZE);
                let snapped = self.snap_moving_edges(resized, handle);
                let clamped =
                    clamp_to_bounds(snapped, self.canvas.print_area(), MIN_ELEMENT_SIZE);
                self.canvas.update_element(id, ElementPatch::rect(clamped));
            }
            Gesture::Rotate { id } => {
                let Some(center) = self.canvas.get(id).map(|e| e.center()) else {
                    return;
                };
                // 0 degrees points up, matching the handle's rest position.
                let mut angle = (point.y - center.y)
                    .atan2(point.x - center.x)
                    .to_degrees()
                    + 90.0;
                if self.snap_to_grid {
                    angle = (angle / ROTATION_SNAP_DEGREES).round() * ROTATION_SNAP_DEGREES;
                }
                self.canvas.update_element(id, ElementPatch::rotate_to(angle));
            }
        }
    }

    /// Pointer released, anywhere. Ends the gesture and commits exactly one
    /// history entry. There is no abort: a regretted gesture is undone.
    pub fn pointer_up(&mut self, _point: Point) {
        if self.gesture.take().is_some() {
            self.canvas.mode = InteractionMode::Idle;
            self.commit();
        }
    }

    /// Feed a key press. Returns true when the key mapped to an action.
    /// Ignored while a pointer gesture is in progress.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        match action_for(key, modifiers) {
            Some(EditorAction::DeleteSelection) => {
                self.delete_selection();
                true
            }
            Some(EditorAction::Undo) => {
                self.undo();
                true
            }
            Some(EditorAction::Redo) => {
                self.redo();
                true
            }
            None => false,
        }
    }

    /// Step the canvas back one committed gesture. No-op at the bottom.
    pub fn undo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        match self.history.undo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                self.canvas.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Step the canvas forward one undone gesture. No-op at the top.
    pub fn redo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        match self.history.redo() {
            Some(snapshot) => {
                let snapshot = snapshot.clone();
                self.canvas.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Build the read-only frame for the renderer.
    pub fn frame(&self) -> Frame<'_> {
        let handles = self
            .canvas
            .selected
            .and_then(|id| self.canvas.get(id))
            .map(|e| handles::handles_for(e.as_rect(), e.rotation))
            .unwrap_or_default();

        Frame {
            elements: self.canvas.elements_ordered(),
            selected: self.canvas.selected,
            handles,
            print_area: self.canvas.print_area(),
            background: self.canvas.background(),
            mode: self.canvas.mode,
            grid_size: self.grid_size,
            snap_to_grid: self.snap_to_grid,
        }
    }

    /// Snap only the edges a handle moves, so the opposite edge stays
    /// exactly where the resize math put it.
    fn snap_moving_edges(&self, rect: Rect, handle: HandleKind) -> Rect {
        if !self.snap_to_grid || handle == HandleKind::Rotate {
            return rect;
        }
        let mut r = rect;
        match handle {
            HandleKind::E | HandleKind::Ne | HandleKind::Se => {
                r.x1 = snap(r.x1, self.grid_size, true);
            }
            HandleKind::W | HandleKind::Nw | HandleKind::Sw => {
                r.x0 = snap(r.x0, self.grid_size, true);
            }
            _ => {}
        }
        match handle {
            HandleKind::S | HandleKind::Se | HandleKind::Sw => {
                r.y1 = snap(r.y1, self.grid_size, true);
            }
            HandleKind::N | HandleKind::Ne | HandleKind::Nw => {
                r.y0 = snap(r.y0, self.grid_size, true);
            }
            _ => {}
        }
        // Snapping can collapse a small rect; re-apply the floor on the
        // moving edge.
        if r.width() < MIN_ELEMENT_SIZE {
            if matches!(handle, HandleKind::W | HandleKind::Nw | HandleKind::Sw) {
                r.x0 = r.x1 - MIN_ELEMENT_SIZE;
            } else {
                r.x1 = r.x0 + MIN_ELEMENT_SIZE;
            }
        }
        if r.height() < MIN_ELEMENT_SIZE {
            if matches!(handle, HandleKind::N | HandleKind::Ne | HandleKind::Nw) {
                r.y0 = r.y1 - MIN_ELEMENT_SIZE;
            } else {
                r.y1 = r.y0 + MIN_ELEMENT_SIZE;
            }
        }
        r
    }

    /// Record the live element list as one history entry.
    fn commit(&mut self) {
        self.history.record(self.canvas.snapshot());
        log::debug!(
            "committed gesture: {} elements, history depth {}",
            self.canvas.len(),
            self.history.len()
        );
    }
}
