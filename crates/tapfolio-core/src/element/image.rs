//! Image references for embedded raster images.
//!
//! The core never uploads, fetches, or validates image content. A reference
//! is either a URL resolved by the host or inline bytes handed over by the
//! upload collaborator.

use serde::{Deserialize, Serialize};

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A resolved reference to raster image content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    /// URL served by the host's storage.
    Url(String),
    /// Inline bytes, base64-encoded for JSON friendliness.
    Data {
        base64: String,
        format: ImageFormat,
    },
}

impl ImageRef {
    /// Wrap raw image bytes, sniffing the format from magic bytes.
    /// Returns `None` for unrecognized content.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let format = ImageFormat::from_magic_bytes(data)?;
        Some(ImageRef::Data {
            base64: STANDARD.encode(data),
            format,
        })
    }

    /// Decode inline bytes. `None` for URL references or corrupt base64.
    pub fn data(&self) -> Option<Vec<u8>> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        match self {
            ImageRef::Url(_) => None,
            ImageRef::Data { base64, .. } => STANDARD.decode(base64).ok(),
        }
    }

    /// The declared format, when known without fetching.
    pub fn format(&self) -> Option<ImageFormat> {
        match self {
            ImageRef::Url(url) => url
                .rsplit('.')
                .next()
                .and_then(ImageFormat::from_extension),
            ImageRef::Data { format, .. } => Some(*format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_extension("gif"), None);

        let png_magic = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(
            ImageFormat::from_magic_bytes(&png_magic),
            Some(ImageFormat::Png)
        );
    }

    #[test]
    fn test_inline_bytes_round_trip() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 1, 2, 3, 4];
        let image = ImageRef::from_bytes(&bytes).unwrap();
        assert_eq!(image.format(), Some(ImageFormat::Png));
        assert_eq!(image.data().unwrap(), bytes);
    }

    #[test]
    fn test_url_reference() {
        let image = ImageRef::Url("https://cdn.tapfolio.app/u/42/avatar.jpeg".to_string());
        assert_eq!(image.format(), Some(ImageFormat::Jpeg));
        assert!(image.data().is_none());
    }

    #[test]
    fn test_unknown_bytes_rejected() {
        assert!(ImageRef::from_bytes(&[0x00, 0x01, 0x02, 0x03]).is_none());
    }
}
