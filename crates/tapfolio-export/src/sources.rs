//! Collaborator traits feeding the rasterizer.
//!
//! QR encoding, image fetching, and font shaping are host concerns. The
//! pipeline only needs their pixel-level results, so each is a small trait
//! the host implements; a reference resolver for inline PNG data ships
//! here because the `png` crate is already on hand for encoding.

use crate::error::ExportError;
use crate::pixmap::Pixmap;
use std::io::Cursor;
use tapfolio_core::{FontFamily, FontWeight, ImageFormat, ImageRef, TextAlign};

/// A square grid of QR modules, `true` for dark.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    pub fn new(size: usize, modules: Vec<bool>) -> Result<Self, ExportError> {
        if size == 0 {
            return Err(ExportError::BadQrMatrix("zero-size matrix".to_string()));
        }
        if modules.len() != size * size {
            return Err(ExportError::BadQrMatrix(format!(
                "{} modules for size {size}",
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }
}

/// Turns an opaque payload string into a module matrix. The payload is
/// never inspected or validated here.
pub trait QrRenderer {
    fn render(&self, payload: &str) -> Result<QrMatrix, ExportError>;
}

/// Resolves an image reference to pixels. URL references typically need a
/// host fetch; the reference implementation only handles inline PNG data.
pub trait ImageResolver {
    fn resolve(&self, source: &ImageRef) -> Result<Pixmap, ExportError>;
}

/// Single-channel coverage mask produced by a text rasterizer.
#[derive(Debug, Clone)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Wrap row-major coverage bytes, one per pixel.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::Text("zero-size coverage mask".to_string()));
        }
        if data.len() != width as usize * height as usize {
            return Err(ExportError::Text(format!(
                "{} coverage bytes for {width}x{height} mask",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }
}

/// Everything a shaping engine needs to lay out one text element, in
/// device pixels.
#[derive(Debug, Clone, Copy)]
pub struct TextRequest<'a> {
    pub content: &'a str,
    pub family: FontFamily,
    pub weight: FontWeight,
    pub align: TextAlign,
    /// Font size in device pixels (canvas units scaled).
    pub font_size: f64,
    pub width: u32,
    pub height: u32,
}

/// Shapes and rasterizes text to a coverage mask. Fonts live in the host,
/// so this collaborator is optional; without it text elements are skipped.
pub trait TextRasterizer {
    fn rasterize(&self, request: &TextRequest<'_>) -> Result<AlphaMask, ExportError>;
}

/// Reference resolver for inline base64 PNG data.
pub struct PngDataResolver;

impl ImageResolver for PngDataResolver {
    fn resolve(&self, source: &ImageRef) -> Result<Pixmap, ExportError> {
        match source {
            ImageRef::Url(url) => Err(ExportError::UnresolvedImage(format!(
                "url reference needs a host fetch: {url}"
            ))),
            ImageRef::Data { format, .. } if *format != ImageFormat::Png => Err(
                ExportError::UnresolvedImage(format!("{} data", format.mime_type())),
            ),
            ImageRef::Data { .. } => {
                let bytes = source.data().ok_or_else(|| {
                    ExportError::UnresolvedImage("corrupt base64 payload".to_string())
                })?;
                decode_png(&bytes)
            }
        }
    }
}

fn decode_png(bytes: &[u8]) -> Result<Pixmap, ExportError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Expands indexed and sub-byte images so only the four 8-bit color
    // types remain.
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(ExportError::UnresolvedImage(
                "indexed png survived expansion".to_string(),
            ));
        }
    };
    Pixmap::from_rgba(info.width, info.height, rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::encode_png;
    use tapfolio_core::SerializableColor;

    #[test]
    fn test_qr_matrix_validation() {
        assert!(QrMatrix::new(2, vec![true, false, false, true]).is_ok());
        assert!(QrMatrix::new(2, vec![true; 3]).is_err());
        assert!(QrMatrix::new(0, vec![]).is_err());
    }

    #[test]
    fn test_alpha_mask_validation() {
        assert!(AlphaMask::new(4, 2, vec![0; 8]).is_ok());
        assert!(matches!(
            AlphaMask::new(0, 0, Vec::new()),
            Err(ExportError::Text(_))
        ));
        assert!(matches!(
            AlphaMask::new(4, 2, vec![0; 7]),
            Err(ExportError::Text(_))
        ));
    }

    #[test]
    fn test_png_data_round_trip() {
        let mut pm = Pixmap::new(4, 3).unwrap();
        pm.fill(SerializableColor::new(200, 50, 25, 255));
        let encoded = encode_png(&pm).unwrap();

        let source = ImageRef::from_bytes(&encoded).unwrap();
        let decoded = PngDataResolver.resolve(&source).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
        assert_eq!(decoded.pixel(3, 2), [200, 50, 25, 255]);
    }

    #[test]
    fn test_url_reference_is_unresolved() {
        let source = ImageRef::Url("https://cdn.tapfolio.app/u/1/bg.png".to_string());
        assert!(matches!(
            PngDataResolver.resolve(&source),
            Err(ExportError::UnresolvedImage(_))
        ));
    }

    #[test]
    fn test_non_png_data_is_unresolved() {
        // JPEG magic bytes, never decodable here.
        let source = ImageRef::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]).unwrap();
        assert!(matches!(
            PngDataResolver.resolve(&source),
            Err(ExportError::UnresolvedImage(_))
        ));
    }
}
