/// Image optimization settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaConfig {
    /// Quality used when a request does not set one (0-100)
    pub default_quality: u8,
    /// Target width used when resizing without an explicit width
    pub default_width: u32,
    /// Largest accepted upload, in bytes
    pub max_input_bytes: usize,
    /// Upper bound on either side of a resized image
    pub max_width: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            default_quality: 80,
            default_width: 1080,
            max_input_bytes: 10 * 1024 * 1024,
            max_width: 4096,
        }
    }
}

impl MediaConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(quality_str) = std::env::var("IMAGE_DEFAULT_QUALITY") {
            if let Ok(quality) = quality_str.parse::<u8>() {
                config.default_quality = quality.min(100);
            }
        }

        if let Ok(width_str) = std::env::var("IMAGE_DEFAULT_WIDTH") {
            if let Ok(width) = width_str.parse::<u32>() {
                if width > 0 {
                    config.default_width = width;
                }
            }
        }

        if let Ok(max_str) = std::env::var("IMAGE_MAX_INPUT_BYTES") {
            if let Ok(max) = max_str.parse::<usize>() {
                config.max_input_bytes = max;
            }
        }

        if let Ok(max_width_str) = std::env::var("IMAGE_MAX_WIDTH") {
            if let Ok(max_width) = max_width_str.parse::<u32>() {
                if max_width > 0 {
                    config.max_width = max_width;
                }
            }
        }

        tracing::info!(
            "Media config loaded: quality={}, width={}, max_input_bytes={}, max_width={}",
            config.default_quality,
            config.default_width,
            config.max_input_bytes,
            config.max_width
        );

        config
    }
}
