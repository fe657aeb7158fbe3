//! Decoding validated bytes into pixels.
//!
//! Dimensions are read from the header first so an oversized image is
//! rejected before its pixel buffer is allocated.

use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Decodes images on the blocking pool under the configured limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// A decoded test image.
pub struct DecodedImage {
    pub image: DynamicImage,
    /// Format sniffed from the content, not the extension
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageDecoder {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode `bytes` on a blocking thread, giving up after `decode_timeout_ms`.
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        let max_dim = self.limits.max_image_dimension;
        let task_path = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || decode_bytes(bytes, &task_path, max_dim));

        let budget = Duration::from_millis(self.limits.decode_timeout_ms);
        match tokio::time::timeout(budget, task).await {
            Ok(Ok(decoded)) => decoded,
            Ok(Err(join)) => Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {join}"),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }
}

type SliceReader<'a> = ImageReader<Cursor<&'a [u8]>>;

fn reader_for<'a>(bytes: &'a [u8], path: &Path) -> Result<(SliceReader<'a>, ImageFormat), PipelineError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {e}"),
        })?;
    match reader.format() {
        Some(format) => Ok((reader, format)),
        None => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("unknown");
            Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: ext.to_string(),
            })
        }
    }
}

/// Synchronous decode with a header-level dimension check.
pub fn decode_bytes(bytes: Vec<u8>, path: &Path, max_dim: u32) -> Result<DecodedImage, PipelineError> {
    let decode_err = |e: image::ImageError| PipelineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let (width, height) = reader_for(&bytes, path)?
        .0
        .into_dimensions()
        .map_err(decode_err)?;
    if width > max_dim || height > max_dim {
        return Err(PipelineError::ImageTooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max_dim,
        });
    }

    let (reader, format) = reader_for(&bytes, path)?;
    let image = reader.decode().map_err(decode_err)?;
    Ok(DecodedImage {
        image,
        format,
        width,
        height,
    })
}
