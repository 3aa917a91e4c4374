//! Tapfolio Core Library
//!
//! Platform-agnostic state and interaction logic for the Tapfolio product
//! designer: a canvas of typed elements (QR code, text, image, shape) laid
//! out inside a product's print area.

pub mod canvas;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;

pub use canvas::{CanvasState, ElementPatch, InteractionMode, Snapshot};
pub use editor::{DesignSession, Frame, ROTATION_SNAP_DEGREES};
pub use element::{
    CanvasElement, ElementId, ElementKind, FontFamily, FontWeight, ImageFormat, ImageRef,
    SerializableColor, Shadow, TextAlign,
};
pub use geometry::{GRID_SIZE, MIN_ELEMENT_SIZE, clamp_to_bounds, snap, snap_point};
pub use handles::{HANDLE_HIT_TOLERANCE, Handle, HandleKind, ROTATE_HANDLE_OFFSET};
pub use history::{History, MAX_HISTORY};
pub use input::{EditorAction, Modifiers, Shortcut, ShortcutRegistry};
