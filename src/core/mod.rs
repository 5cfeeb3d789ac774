use bytes::Bytes;
use thiserror::Error;

pub mod algorithm;

pub use algorithm::ImageCrateProcessor;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File empty")]
    Empty,
    #[error("Failed to process file: {0}")]
    Failed(String),
}

impl From<image::ImageError> for ProcessingError {
    fn from(e: image::ImageError) -> Self {
        ProcessingError::Failed(e.to_string())
    }
}

/// Boundary to the image codec library.
///
/// Every operation takes the encoded source image as raw bytes and returns
/// the re-encoded result. Implementations are synchronous and CPU-bound;
/// callers are expected to run them off the async executor.
pub trait ImageProcessor: Send + Sync {
    /// Decode `input` as PNG and re-encode it as JPEG at the encoder's
    /// default quality.
    fn convert_png_to_jpeg(&self, input: &[u8]) -> Result<Bytes, ProcessingError>;

    /// Scale `input` to exactly `width` x `height` without preserving the
    /// aspect ratio. The result is PNG.
    fn resize_image(&self, input: &[u8], width: u32, height: u32)
        -> Result<Bytes, ProcessingError>;

    /// Re-encode `input` as JPEG at `quality` (0-100).
    fn compress_image(&self, input: &[u8], quality: u8) -> Result<Bytes, ProcessingError>;
}
