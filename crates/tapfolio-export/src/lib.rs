//! Tapfolio Export Pipeline
//!
//! Flattens a finished design to pixels: a CPU rasterizer over the element
//! model plus PNG encoding. QR encoding, image fetching, and text shaping
//! stay behind traits the host implements.

pub mod error;
pub mod pixmap;
pub mod render;
pub mod sources;

pub use error::ExportError;
pub use pixmap::Pixmap;
pub use render::{Collaborators, RenderOptions, encode_png, render};
pub use sources::{
    AlphaMask, ImageResolver, PngDataResolver, QrMatrix, QrRenderer, TextRasterizer, TextRequest,
};
