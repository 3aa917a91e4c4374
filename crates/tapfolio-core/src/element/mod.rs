//! Element definitions for the design canvas.

mod image;
mod text;

pub use image::{ImageFormat, ImageRef};
pub use text::{FontFamily, FontWeight, TextAlign};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Drop shadow attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: SerializableColor,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 2.0,
            blur: 6.0,
            color: SerializableColor::new(0, 0, 0, 96),
        }
    }
}

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Kind-specific payload of a placeable element.
///
/// The QR payload is an opaque string supplied by the host; the core never
/// parses or validates it. Image references are resolved by the host's
/// upload pipeline before they reach the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// A scannable QR glyph rendered from an opaque payload string.
    Qr { payload: String },
    /// A block of styled text.
    Text {
        content: String,
        font_size: f64,
        font_family: FontFamily,
        font_weight: FontWeight,
        color: SerializableColor,
        align: TextAlign,
    },
    /// A raster image supplied by the upload collaborator.
    Image { source: ImageRef },
    /// A flat decorative shape.
    Shape { fill: SerializableColor },
}

/// One placeable object on the design canvas.
///
/// Geometry is axis-aligned: `position` is the top-left corner and
/// `rotation` (degrees, unnormalized) applies visually around the center.
/// Containment and minimum-size invariants are maintained by
/// [`crate::canvas::CanvasState`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub(crate) id: ElementId,
    /// Kind-specific payload.
    pub kind: ElementKind,
    /// Top-left corner in canvas units.
    pub position: Point,
    /// Width in canvas units.
    pub width: f64,
    /// Height in canvas units.
    pub height: f64,
    /// Rotation in degrees around the element center.
    #[serde(default)]
    pub rotation: f64,
    /// Paint order; higher paints later (on top). Not necessarily contiguous.
    pub layer: i32,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    /// Border stroke width (0 = no border).
    #[serde(default)]
    pub border_width: f64,
    /// Border stroke color.
    #[serde(default)]
    pub border_color: Option<SerializableColor>,
    /// Optional drop shadow.
    #[serde(default)]
    pub shadow: Option<Shadow>,
    /// Locked elements are rendered but excluded from pointer mutation.
    #[serde(default)]
    pub locked: bool,
    /// Hidden elements render at reduced opacity; they are never dropped.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl CanvasElement {
    /// Default edge length for new QR elements.
    pub const DEFAULT_QR_SIZE: f64 = 120.0;
    /// Default size for new text elements.
    pub const DEFAULT_TEXT_SIZE: (f64, f64) = (160.0, 40.0);
    /// Default size for new image elements.
    pub const DEFAULT_IMAGE_SIZE: (f64, f64) = (160.0, 160.0);
    /// Default size for new shape elements.
    pub const DEFAULT_SHAPE_SIZE: (f64, f64) = (120.0, 80.0);

    /// Create a new element with explicit geometry. Layer is assigned by
    /// the canvas on insertion.
    pub fn new(kind: ElementKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width,
            height,
            rotation: 0.0,
            layer: 0,
            opacity: 1.0,
            corner_radius: 0.0,
            border_width: 0.0,
            border_color: None,
            shadow: None,
            locked: false,
            visible: true,
        }
    }

    /// Default size for a kind, used when placing new elements.
    pub fn default_size(kind: &ElementKind) -> (f64, f64) {
        match kind {
            ElementKind::Qr { .. } => (Self::DEFAULT_QR_SIZE, Self::DEFAULT_QR_SIZE),
            ElementKind::Text { .. } => Self::DEFAULT_TEXT_SIZE,
            ElementKind::Image { .. } => Self::DEFAULT_IMAGE_SIZE,
            ElementKind::Shape { .. } => Self::DEFAULT_SHAPE_SIZE,
        }
    }

    /// A text element with house defaults.
    pub fn text(content: impl Into<String>) -> ElementKind {
        ElementKind::Text {
            content: content.into(),
            font_size: 20.0,
            font_family: FontFamily::default(),
            font_weight: FontWeight::default(),
            color: SerializableColor::black(),
            align: TextAlign::default(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Give the element a fresh identity (used when duplicating).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Get the axis-aligned bounding rectangle (ignores rotation).
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Write back a rectangle produced by clamping or resizing.
    pub fn set_rect(&mut self, rect: Rect) {
        self.position = Point::new(rect.x0, rect.y0);
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Center of the element, the pivot for rotation.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Check if a point hits this element, honoring rotation.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Un-rotate the point around the center, then test the plain rect.
        let center = self.center();
        let theta = -self.rotation.to_radians();
        let (sin, cos) = theta.sin_cos();
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        let local = Point::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        );
        self.as_rect().inflate(tolerance, tolerance).contains(local)
    }
}
