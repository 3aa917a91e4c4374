use thiserror::Error;

/// Failures along the export path. The editor itself never produces these;
/// they surface only when a design is flattened to pixels.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export surface has zero area")]
    ZeroArea,

    #[error("pixel buffer length {got} does not match {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, got: usize },

    #[error("image reference cannot be resolved: {0}")]
    UnresolvedImage(String),

    #[error("png decode failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("png encode failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("qr module matrix is malformed: {0}")]
    BadQrMatrix(String),

    #[error("text rasterization failed: {0}")]
    Text(String),
}
