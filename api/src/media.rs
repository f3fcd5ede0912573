//! Image normalization for uploads
//!
//! Detects the format of uploaded bytes from their content, optionally scales
//! the image to a target width and re-encodes it in the same format. Codec work
//! runs on the blocking pool behind the [`ImageCodec`] seam.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::config::MediaConfig;
use crate::metrics;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("resized image would be {width}x{height}, limit is {limit} pixels per side")]
    DimensionsTooLarge { width: u32, height: u32, limit: u32 },

    #[error("image task failed: {0}")]
    Task(String),
}

/// Formats the optimizer re-encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Sniff the format from magic bytes; the file name is never consulted
    pub fn detect(bytes: &[u8]) -> Result<Self, MediaError> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => Ok(ImageKind::Jpeg),
            Ok(ImageFormat::Png) => Ok(ImageKind::Png),
            Ok(ImageFormat::WebP) => Ok(ImageKind::Webp),
            Ok(other) => Err(MediaError::UnsupportedFormat(
                format!("{:?}", other).to_lowercase(),
            )),
            Err(_) => Err(MediaError::UnsupportedFormat("unknown".to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Webp => ImageFormat::WebP,
        }
    }
}

/// Encoder parameters handed to the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeSettings {
    Jpeg { quality: u8 },
    Png { compression_level: u8 },
    Webp { quality: u8 },
}

/// Map a 0-100 quality onto the PNG 0-9 compression scale: `round(quality / 10)`
pub fn png_compression_level(quality: u8) -> u8 {
    let level = (u16::from(quality.min(100)) + 5) / 10;
    level.min(9) as u8
}

pub fn encode_settings(kind: ImageKind, quality: u8) -> EncodeSettings {
    let quality = quality.min(100);
    match kind {
        ImageKind::Jpeg => EncodeSettings::Jpeg { quality },
        ImageKind::Png => EncodeSettings::Png {
            compression_level: png_compression_level(quality),
        },
        ImageKind::Webp => EncodeSettings::Webp { quality },
    }
}

/// Height that keeps the aspect ratio when scaling to `target_width`
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height;
    }
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2) / u64::from(width);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

/// External codec capability
pub trait ImageCodec: Send + Sync {
    fn detect_format(&self, bytes: &[u8]) -> Result<ImageKind, MediaError> {
        ImageKind::detect(bytes)
    }

    fn transcode(
        &self,
        bytes: &[u8],
        kind: ImageKind,
        resize_width: Option<u32>,
        settings: EncodeSettings,
    ) -> Result<Vec<u8>, MediaError>;
}

/// Codec backed by the `image` crate, with libwebp for lossy WebP output
#[derive(Debug, Clone, Copy)]
pub struct ImageRsCodec {
    /// Neither side of a resized image may exceed this
    max_dimension: u32,
}

impl ImageRsCodec {
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }
}

impl Default for ImageRsCodec {
    fn default() -> Self {
        Self::new(MediaConfig::default().max_width)
    }
}

/// Level 0 stores the image uncompressed; 1-9 map onto the zlib levels
fn png_compression(level: u8) -> CompressionType {
    match level {
        0 => CompressionType::Uncompressed,
        level => CompressionType::Level(level.min(9)),
    }
}

impl ImageCodec for ImageRsCodec {
    fn transcode(
        &self,
        bytes: &[u8],
        kind: ImageKind,
        resize_width: Option<u32>,
        settings: EncodeSettings,
    ) -> Result<Vec<u8>, MediaError> {
        let mut img = image::load_from_memory_with_format(bytes, kind.image_format())
            .map_err(|e| MediaError::Decode(e.to_string()))?;

        if let Some(width) = resize_width.filter(|w| *w > 0 && *w != img.width()) {
            let height = scaled_height(img.width(), img.height(), width);
            if width > self.max_dimension || height > self.max_dimension {
                return Err(MediaError::DimensionsTooLarge {
                    width,
                    height,
                    limit: self.max_dimension,
                });
            }
            img = img.resize_exact(width, height, FilterType::Lanczos3);
        }

        encode(&img, settings)
    }
}

fn encode(img: &DynamicImage, settings: EncodeSettings) -> Result<Vec<u8>, MediaError> {
    let mut out = Cursor::new(Vec::new());
    match settings {
        EncodeSettings::Jpeg { quality } => {
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|e| MediaError::Encode(e.to_string()))?;
        }
        EncodeSettings::Png { compression_level } => {
            let rgba = img.to_rgba8();
            PngEncoder::new_with_quality(&mut out, png_compression(compression_level), PngFilter::Adaptive)
                .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
                .map_err(|e| MediaError::Encode(e.to_string()))?;
        }
        EncodeSettings::Webp { quality } => {
            let rgba = img.to_rgba8();
            let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode(f32::from(quality));
            return Ok(encoded.to_vec());
        }
    }
    Ok(out.into_inner())
}

/// Per-call knobs, usually taken from the upload request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    pub resize: bool,
    pub width: Option<u32>,
    pub quality: Option<u8>,
}

#[derive(Clone)]
pub struct ImageOptimizer {
    codec: Arc<dyn ImageCodec>,
    config: MediaConfig,
}

impl ImageOptimizer {
    pub fn new(config: MediaConfig) -> Self {
        Self::with_codec(Arc::new(ImageRsCodec::new(config.max_width)), config)
    }

    pub fn with_codec(codec: Arc<dyn ImageCodec>, config: MediaConfig) -> Self {
        Self { codec, config }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Re-encode `bytes` in their own format. Dropping the future discards any output.
    pub async fn optimize(&self, bytes: Vec<u8>, options: OptimizeOptions) -> Result<Vec<u8>, MediaError> {
        if bytes.len() > self.config.max_input_bytes {
            return Err(MediaError::TooLarge {
                size: bytes.len(),
                limit: self.config.max_input_bytes,
            });
        }

        let kind = self.codec.detect_format(&bytes)?;
        let quality = options.quality.unwrap_or(self.config.default_quality);
        let settings = encode_settings(kind, quality);
        let resize_width = options.resize.then(|| {
            let width = options.width.unwrap_or(self.config.default_width);
            if width > self.config.max_width {
                tracing::debug!(width, max_width = self.config.max_width, "resize width clamped");
            }
            width.min(self.config.max_width)
        });

        let codec = Arc::clone(&self.codec);
        let input_len = bytes.len();
        let started = Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            codec.transcode(&bytes, kind, resize_width, settings)
        })
        .await
        .map_err(|e| MediaError::Task(e.to_string()))?;

        metrics::IMAGE_OPTIMIZE_DURATION
            .with_label_values(&[kind.as_str()])
            .observe(started.elapsed().as_secs_f64());
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::IMAGE_OPTIMIZATIONS
            .with_label_values(&[kind.as_str(), outcome])
            .inc();

        match &result {
            Ok(output) => tracing::debug!(
                format = kind.as_str(),
                input_bytes = input_len,
                output_bytes = output.len(),
                ?resize_width,
                "image optimized"
            ),
            Err(err) => tracing::warn!(format = kind.as_str(), error = %err, "image optimization failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::sync::Mutex;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";

    fn jpeg_1x1() -> Vec<u8> {
        let img = RgbImage::from_pixel(1, 1, Rgb([200, 80, 40]));
        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(img.as_raw(), 1, 1, ExtendedColorType::Rgb8)
            .unwrap();
        out.into_inner()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]));
        let mut out = Cursor::new(Vec::new());
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out.into_inner()
    }

    #[derive(Default)]
    struct RecordingCodec {
        calls: Mutex<Vec<(ImageKind, Option<u32>, EncodeSettings)>>,
    }

    impl ImageCodec for RecordingCodec {
        fn transcode(
            &self,
            bytes: &[u8],
            kind: ImageKind,
            resize_width: Option<u32>,
            settings: EncodeSettings,
        ) -> Result<Vec<u8>, MediaError> {
            self.calls.lock().unwrap().push((kind, resize_width, settings));
            Ok(bytes.to_vec())
        }
    }

    #[test]
    fn test_png_compression_level() {
        assert_eq!(png_compression_level(0), 0);
        assert_eq!(png_compression_level(4), 0);
        assert_eq!(png_compression_level(5), 1);
        assert_eq!(png_compression_level(45), 5);
        assert_eq!(png_compression_level(50), 5);
        assert_eq!(png_compression_level(84), 8);
        assert_eq!(png_compression_level(100), 9);
    }

    #[test]
    fn test_quality_used_directly_for_lossy_formats() {
        assert_eq!(encode_settings(ImageKind::Jpeg, 80), EncodeSettings::Jpeg { quality: 80 });
        assert_eq!(encode_settings(ImageKind::Webp, 65), EncodeSettings::Webp { quality: 65 });
        assert_eq!(encode_settings(ImageKind::Jpeg, 150), EncodeSettings::Jpeg { quality: 100 });
    }

    #[test]
    fn test_scaled_height_keeps_aspect_ratio() {
        assert_eq!(scaled_height(4000, 3000, 800), 600);
        assert_eq!(scaled_height(4, 2, 2), 1);
        assert_eq!(scaled_height(1000, 1, 10), 1);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ImageKind::detect(&jpeg_1x1()).unwrap(), ImageKind::Jpeg);
        assert_eq!(ImageKind::detect(&PNG_SIGNATURE).unwrap(), ImageKind::Png);
        assert!(matches!(
            ImageKind::detect(GIF_BYTES),
            Err(MediaError::UnsupportedFormat(name)) if name == "gif"
        ));
        assert!(matches!(
            ImageKind::detect(b"plain text"),
            Err(MediaError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_jpeg_round_trip() {
        let optimizer = ImageOptimizer::new(MediaConfig::default());
        let output = optimizer
            .optimize(jpeg_1x1(), OptimizeOptions { quality: Some(80), ..Default::default() })
            .await
            .unwrap();

        assert!(!output.is_empty());
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1, 1));
    }

    #[tokio::test]
    async fn test_gif_is_unsupported() {
        let optimizer = ImageOptimizer::new(MediaConfig::default());
        let err = optimizer
            .optimize(GIF_BYTES.to_vec(), OptimizeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_png_quality_maps_to_compression_level() {
        let codec = Arc::new(RecordingCodec::default());
        let optimizer = ImageOptimizer::with_codec(codec.clone(), MediaConfig::default());
        optimizer
            .optimize(PNG_SIGNATURE.to_vec(), OptimizeOptions { quality: Some(50), ..Default::default() })
            .await
            .unwrap();

        let calls = codec.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (ImageKind::Png, None, EncodeSettings::Png { compression_level: 5 }));
    }

    #[tokio::test]
    async fn test_resize_uses_default_width_when_unset() {
        let codec = Arc::new(RecordingCodec::default());
        let config = MediaConfig {
            default_width: 640,
            ..MediaConfig::default()
        };
        let optimizer = ImageOptimizer::with_codec(codec.clone(), config);
        optimizer
            .optimize(jpeg_1x1(), OptimizeOptions { resize: true, ..Default::default() })
            .await
            .unwrap();

        let calls = codec.calls.lock().unwrap();
        assert_eq!(calls[0].1, Some(640));
        assert_eq!(calls[0].2, EncodeSettings::Jpeg { quality: 80 });
    }

    fn noisy_png(width: u32, height: u32) -> Vec<u8> {
        let mut seed: u32 = 0x2545_f491;
        let img = RgbaImage::from_fn(width, height, |x, _| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let noise = (seed >> 24) as u8 & 0x0f;
            Rgba([(x as u8).wrapping_mul(4) ^ noise, 90, 160, 255])
        });
        let mut out = Cursor::new(Vec::new());
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_levels_reach_the_encoder() {
        assert!(matches!(png_compression(0), CompressionType::Uncompressed));
        assert!(matches!(png_compression(1), CompressionType::Level(1)));
        assert!(matches!(png_compression(5), CompressionType::Level(5)));
        assert!(matches!(png_compression(9), CompressionType::Level(9)));
    }

    #[test]
    fn test_png_output_size_follows_level() {
        let source = noisy_png(64, 64);
        let codec = ImageRsCodec::default();
        let size = |level| {
            codec
                .transcode(&source, ImageKind::Png, None, EncodeSettings::Png { compression_level: level })
                .unwrap()
                .len()
        };

        let stored = size(0);
        let fastest = size(1);
        let smallest = size(9);
        assert!(stored >= 64 * 64 * 4, "level 0 should store raw pixels, got {stored} bytes");
        assert!(fastest < stored);
        assert!(smallest <= fastest);
    }

    #[tokio::test]
    async fn test_resize_width_clamped_to_max() {
        let codec = Arc::new(RecordingCodec::default());
        let config = MediaConfig {
            max_width: 2048,
            ..MediaConfig::default()
        };
        let optimizer = ImageOptimizer::with_codec(codec.clone(), config);
        optimizer
            .optimize(
                jpeg_1x1(),
                OptimizeOptions { resize: true, width: Some(100_000), quality: None },
            )
            .await
            .unwrap();

        assert_eq!(codec.calls.lock().unwrap()[0].1, Some(2048));
    }

    #[tokio::test]
    async fn test_resize_rejects_oversized_height() {
        let config = MediaConfig {
            max_width: 32,
            ..MediaConfig::default()
        };
        let optimizer = ImageOptimizer::new(config);
        let err = optimizer
            .optimize(png(1, 64), OptimizeOptions { resize: true, width: Some(16), quality: None })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MediaError::DimensionsTooLarge { width: 16, height: 1024, limit: 32 }
        ));
    }

    #[tokio::test]
    async fn test_png_resize_preserves_aspect_ratio() {
        let optimizer = ImageOptimizer::new(MediaConfig::default());
        let output = optimizer
            .optimize(
                png(4, 2),
                OptimizeOptions { resize: true, width: Some(2), quality: Some(90) },
            )
            .await
            .unwrap();

        let decoded = image::load_from_memory_with_format(&output, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 1));
    }

    #[tokio::test]
    async fn test_webp_is_reencoded_as_webp() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let source = webp::Encoder::from_rgba(rgba.as_raw(), 2, 2).encode(90.0).to_vec();

        let optimizer = ImageOptimizer::new(MediaConfig::default());
        let output = optimizer
            .optimize(source, OptimizeOptions { quality: Some(60), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::WebP);
    }

    #[tokio::test]
    async fn test_oversized_input_is_rejected() {
        let config = MediaConfig {
            max_input_bytes: 4,
            ..MediaConfig::default()
        };
        let optimizer = ImageOptimizer::new(config);
        let err = optimizer
            .optimize(PNG_SIGNATURE.to_vec(), OptimizeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { size: 8, limit: 4 }));
    }
}
