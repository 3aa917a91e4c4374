//! A plain RGBA8 pixel surface.

use crate::error::ExportError;
use tapfolio_core::SerializableColor;

/// Owned RGBA8 buffer in row-major order, straight (non-premultiplied)
/// alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Allocate a transparent surface. Zero-area surfaces are an error.
    pub fn new(width: u32, height: u32) -> Result<Self, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::ZeroArea);
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Wrap an existing RGBA8 buffer, checking its length.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::ZeroArea);
        }
        if data.len() != width as usize * height as usize * 4 {
            return Err(ExportError::BufferSize {
                width,
                height,
                got: data.len(),
            });
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Flood the whole surface with one color, replacing what was there.
    pub fn fill(&mut self, color: SerializableColor) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Source-over blend of one pixel. `opacity` scales the source alpha.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4], opacity: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        let alpha = (f64::from(rgba[3]) * opacity.clamp(0.0, 1.0)).round();
        if alpha <= 0.0 {
            return;
        }
        let a = alpha.min(255.0) as u32;
        let inv = 255 - a;
        let i = self.index(x, y);
        for c in 0..3 {
            let src = u32::from(rgba[c]);
            let dst = u32::from(self.data[i + c]);
            self.data[i + c] = ((src * a + dst * inv + 127) / 255) as u8;
        }
        let dst_a = u32::from(self.data[i + 3]);
        self.data[i + 3] = (a + (dst_a * inv + 127) / 255).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_area_rejected() {
        assert!(matches!(Pixmap::new(0, 10), Err(ExportError::ZeroArea)));
        assert!(matches!(Pixmap::new(10, 0), Err(ExportError::ZeroArea)));
    }

    #[test]
    fn test_buffer_size_checked() {
        let err = Pixmap::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, ExportError::BufferSize { got: 15, .. }));
        assert!(Pixmap::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_fill_and_pixel() {
        let mut pm = Pixmap::new(3, 2).unwrap();
        pm.fill(SerializableColor::new(10, 20, 30, 255));
        assert_eq!(pm.pixel(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_blend_opaque_replaces() {
        let mut pm = Pixmap::new(1, 1).unwrap();
        pm.fill(SerializableColor::white());
        pm.blend_pixel(0, 0, [255, 0, 0, 255], 1.0);
        assert_eq!(pm.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_blend_half_opacity_mixes() {
        let mut pm = Pixmap::new(1, 1).unwrap();
        pm.fill(SerializableColor::white());
        pm.blend_pixel(0, 0, [0, 0, 0, 255], 0.5);
        let [r, g, b, a] = pm.pixel(0, 0);
        assert!(r.abs_diff(127) <= 1);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_blend_out_of_bounds_ignored() {
        let mut pm = Pixmap::new(2, 2).unwrap();
        pm.blend_pixel(5, 5, [255, 255, 255, 255], 1.0);
        assert_eq!(pm.pixel(1, 1), [0, 0, 0, 0]);
    }
}
