//! Image preprocessing for the frozen classifier graph.
//!
//! The retrained Inception graph expects:
//! - Input size: `input_width × input_height` (299×299 by default)
//! - Resize: bilinear
//! - Normalization: `(pixel - input_mean) / input_std`, i.e. [-1, 1) for 128/128
//! - Tensor layout: NHWC [batch, height, width, channels]

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

use crate::config::ModelConfig;
use crate::error::PipelineError;

/// Validated preprocessing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessParams {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mean: f32,
    pub std: f32,
}

impl PreprocessParams {
    /// Build parameters, rejecting empty dimensions and non-positive scales.
    pub fn new(width: u32, height: u32, depth: u32, mean: f32, std: f32) -> Result<Self, PipelineError> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidInput(format!(
                "Input dimensions must be positive, got {width}x{height}"
            )));
        }
        if !matches!(depth, 1 | 3 | 4) {
            return Err(PipelineError::InvalidInput(format!(
                "Input depth must be 1, 3 or 4, got {depth}"
            )));
        }
        if !(std > 0.0) || !mean.is_finite() {
            return Err(PipelineError::InvalidInput(format!(
                "Input normalization must have finite mean and positive std, got mean={mean} std={std}"
            )));
        }
        Ok(Self {
            width,
            height,
            depth,
            mean,
            std,
        })
    }

    /// Parameters described by the model section of the config.
    pub fn from_model(model: &ModelConfig) -> Result<Self, PipelineError> {
        Self::new(
            model.input_width,
            model.input_height,
            model.input_depth,
            model.input_mean,
            model.input_std,
        )
    }
}

/// Resize and normalize an image into a `[1, H, W, D]` tensor.
///
/// Fails with `InvalidInput` if the parameters bypassed [`PreprocessParams::new`]
/// and describe a channel count or shape the pixels cannot fill.
pub fn preprocess(
    image: &DynamicImage,
    params: &PreprocessParams,
) -> Result<Array4<f32>, PipelineError> {
    // Channel count fixed by the graph, independent of the source image.
    let convert: fn(DynamicImage) -> Vec<u8> = match params.depth {
        1 => |img: DynamicImage| img.to_luma8().into_raw(),
        3 => |img: DynamicImage| img.to_rgb8().into_raw(),
        4 => |img: DynamicImage| img.to_rgba8().into_raw(),
        depth => {
            return Err(PipelineError::InvalidInput(format!(
                "Input depth must be 1, 3 or 4, got {depth}"
            )))
        }
    };
    let resized = image.resize_exact(params.width, params.height, FilterType::Triangle);
    let raw: Vec<u8> = convert(resized);

    let shape = (
        1,
        params.height as usize,
        params.width as usize,
        params.depth as usize,
    );
    // NHWC is the interleaved pixel order the image buffers already use.
    let data: Vec<f32> = raw
        .iter()
        .map(|&v| (v as f32 - params.mean) / params.std)
        .collect();

    Array4::from_shape_vec(shape, data).map_err(|e| {
        PipelineError::InvalidInput(format!("Tensor shape {shape:?} does not fit pixels: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn inception() -> PreprocessParams {
        PreprocessParams::from_model(&ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_preprocess_shape_nhwc() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = preprocess(&img, &inception()).unwrap();
        assert_eq!(tensor.shape(), &[1, 299, 299, 3]);
    }

    #[test]
    fn test_preprocess_grayscale_depth() {
        let params = PreprocessParams::new(32, 16, 1, 128.0, 128.0).unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let tensor = preprocess(&img, &params).unwrap();
        assert_eq!(tensor.shape(), &[1, 16, 32, 1]);
    }

    #[test]
    fn test_preprocess_normalization_range() {
        // White: (255 - 128) / 128 ≈ 0.992
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));
        let tensor = preprocess(&img, &inception()).unwrap();
        assert!(tensor.iter().all(|&v| (v - 127.0 / 128.0).abs() < 1e-4));

        // Black: (0 - 128) / 128 = -1.0
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let tensor = preprocess(&img, &inception()).unwrap();
        assert!(tensor.iter().all(|&v| (v + 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_channel_order_preserved() {
        let params = PreprocessParams::new(2, 2, 3, 0.0, 1.0).unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        let tensor = preprocess(&img, &params).unwrap();
        assert_eq!(tensor[[0, 1, 1, 0]], 1.0);
        assert_eq!(tensor[[0, 1, 1, 1]], 2.0);
        assert_eq!(tensor[[0, 1, 1, 2]], 3.0);
    }

    #[test]
    fn test_unchecked_depth_is_an_error() {
        let params = PreprocessParams {
            depth: 2,
            ..PreprocessParams::new(4, 4, 3, 0.0, 1.0).unwrap()
        };
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        assert!(matches!(
            preprocess(&img, &params),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(matches!(
            PreprocessParams::new(0, 299, 3, 128.0, 128.0),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            PreprocessParams::new(299, 299, 2, 128.0, 128.0),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            PreprocessParams::new(299, 299, 3, 128.0, -1.0),
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
