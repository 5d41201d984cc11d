//! Configuration types for matting data synthesis

use crate::error::MattingError;
use crate::tensor::ColorJitterFactors;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dataset mode selecting the augmentation profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    /// Randomized augmentations, unknown-region crops
    Train,
    /// Deterministic pass-through with letterboxing
    Valid,
}

impl Default for SynthesisMode {
    fn default() -> Self {
        Self::Train
    }
}

impl std::fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Valid => write!(f, "valid"),
        }
    }
}

/// Configuration for the synthesis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Dataset root containing the manifests and asset directories
    pub dataset_root: PathBuf,

    /// Dataset mode (train or valid)
    pub mode: SynthesisMode,

    /// Working resolution: every output tensor is `S x S`
    pub output_size: u32,

    /// Foreground directory under the dataset root
    pub foreground_dir: String,

    /// Alpha mask directory under the dataset root
    pub alpha_dir: String,

    /// Background directory under the dataset root
    pub background_dir: String,

    /// Foreground name manifest under the dataset root
    pub foreground_manifest: String,

    /// Background name manifest under the dataset root
    pub background_manifest: String,

    /// Uniform scale range for training resizes, half-open `[lo, hi)`
    pub scale_range: (f32, f32),

    /// Rotation range for training, inclusive degrees
    pub rotation_range: (i32, i32),

    /// Square crop side range for training, inclusive pixels
    pub crop_side_range: (u32, u32),

    /// Structuring element size range for training, inclusive pixels
    pub kernel_size_range: (u32, u32),

    /// Fixed structuring element size for validation
    pub validation_kernel_size: u32,

    /// Color jitter strength for brightness, contrast, and saturation
    pub jitter_strength: f32,

    /// Per-channel normalization mean for the input tensor
    pub normalization_mean: [f32; 3],

    /// Per-channel normalization standard deviation for the input tensor
    pub normalization_std: [f32; 3],
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::new(),
            mode: SynthesisMode::default(),
            output_size: 320,
            foreground_dir: "fg".to_string(),
            alpha_dir: "mask".to_string(),
            background_dir: "bg".to_string(),
            foreground_manifest: "fg_names.txt".to_string(),
            background_manifest: "bg_names.txt".to_string(),
            scale_range: (0.75, 1.5),
            rotation_range: (-45, 45),
            crop_side_range: (320, 800),
            kernel_size_range: (5, 29),
            validation_kernel_size: 15,
            jitter_strength: 0.25,
            // values from ImageNet
            normalization_mean: [0.485, 0.456, 0.406],
            normalization_std: [0.229, 0.224, 0.225],
        }
    }
}

impl SynthesisConfig {
    /// Create a new configuration builder for fluent API construction
    #[must_use]
    pub fn builder() -> SynthesisConfigBuilder {
        SynthesisConfigBuilder::default()
    }

    /// Manifest filename for the configured mode, e.g. `train_names.txt`
    #[must_use]
    pub fn sample_manifest_name(&self) -> String {
        format!("{}_names.txt", self.mode)
    }

    /// Load a configuration from a JSON file and validate it
    ///
    /// Missing fields fall back to their defaults, so partial configs are
    /// accepted.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, does not parse as
    /// JSON, or fails validation.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| MattingError::file_io_error("read config file", path.as_ref(), e))?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            MattingError::invalid_config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    ///
    /// # Errors
    /// - Output size of zero
    /// - Empty or inverted scale, rotation, crop, or kernel ranges
    /// - Zero kernel sizes or zero normalization deviations
    /// - Negative jitter strength
    pub fn validate(&self) -> crate::Result<()> {
        if self.output_size == 0 {
            return Err(MattingError::config_value_error(
                "output size",
                self.output_size,
                ">= 1",
                Some(320),
            ));
        }

        let (scale_lo, scale_hi) = self.scale_range;
        if !(scale_lo > 0.0 && scale_hi > scale_lo) {
            return Err(MattingError::invalid_config(format!(
                "Invalid scale range [{}, {}): lower bound must be positive and below the upper bound",
                scale_lo, scale_hi
            )));
        }

        let (rot_lo, rot_hi) = self.rotation_range;
        if rot_lo > rot_hi {
            return Err(MattingError::invalid_config(format!(
                "Invalid rotation range [{}, {}]: lower bound exceeds upper bound",
                rot_lo, rot_hi
            )));
        }

        let (crop_lo, crop_hi) = self.crop_side_range;
        if crop_lo == 0 || crop_lo > crop_hi {
            return Err(MattingError::invalid_config(format!(
                "Invalid crop side range [{}, {}]: sides must be positive and ordered",
                crop_lo, crop_hi
            )));
        }

        let (kernel_lo, kernel_hi) = self.kernel_size_range;
        if kernel_lo == 0 || kernel_lo > kernel_hi {
            return Err(MattingError::invalid_config(format!(
                "Invalid kernel size range [{}, {}]: sizes must be positive and ordered",
                kernel_lo, kernel_hi
            )));
        }

        if self.validation_kernel_size == 0 {
            return Err(MattingError::config_value_error(
                "validation kernel size",
                self.validation_kernel_size,
                ">= 1",
                Some(15),
            ));
        }

        if self.jitter_strength < 0.0 {
            return Err(MattingError::invalid_config(format!(
                "Invalid jitter strength {}: must be non-negative",
                self.jitter_strength
            )));
        }

        if self.normalization_std.iter().any(|&s| s == 0.0) {
            return Err(MattingError::invalid_config(
                "Normalization standard deviation components must be non-zero",
            ));
        }

        Ok(())
    }
}

/// Builder for `SynthesisConfig`
#[derive(Debug, Default)]
pub struct SynthesisConfigBuilder {
    config: SynthesisConfig,
}

impl SynthesisConfigBuilder {
    /// Set the dataset root directory
    #[must_use]
    pub fn dataset_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.dataset_root = root.into();
        self
    }

    /// Set the dataset mode
    #[must_use]
    pub fn mode(mut self, mode: SynthesisMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the working resolution
    #[must_use]
    pub fn output_size(mut self, size: u32) -> Self {
        self.config.output_size = size;
        self
    }

    /// Set the foreground directory name
    #[must_use]
    pub fn foreground_dir<S: Into<String>>(mut self, dir: S) -> Self {
        self.config.foreground_dir = dir.into();
        self
    }

    /// Set the alpha mask directory name
    #[must_use]
    pub fn alpha_dir<S: Into<String>>(mut self, dir: S) -> Self {
        self.config.alpha_dir = dir.into();
        self
    }

    /// Set the background directory name
    #[must_use]
    pub fn background_dir<S: Into<String>>(mut self, dir: S) -> Self {
        self.config.background_dir = dir.into();
        self
    }

    /// Set the foreground manifest filename
    #[must_use]
    pub fn foreground_manifest<S: Into<String>>(mut self, name: S) -> Self {
        self.config.foreground_manifest = name.into();
        self
    }

    /// Set the background manifest filename
    #[must_use]
    pub fn background_manifest<S: Into<String>>(mut self, name: S) -> Self {
        self.config.background_manifest = name.into();
        self
    }

    /// Set the training scale range
    #[must_use]
    pub fn scale_range(mut self, lo: f32, hi: f32) -> Self {
        self.config.scale_range = (lo, hi);
        self
    }

    /// Set the training rotation range in degrees
    #[must_use]
    pub fn rotation_range(mut self, lo: i32, hi: i32) -> Self {
        self.config.rotation_range = (lo, hi);
        self
    }

    /// Set the training crop side range in pixels
    #[must_use]
    pub fn crop_side_range(mut self, lo: u32, hi: u32) -> Self {
        self.config.crop_side_range = (lo, hi);
        self
    }

    /// Set the training structuring element size range
    #[must_use]
    pub fn kernel_size_range(mut self, lo: u32, hi: u32) -> Self {
        self.config.kernel_size_range = (lo, hi);
        self
    }

    /// Set the fixed validation structuring element size
    #[must_use]
    pub fn validation_kernel_size(mut self, size: u32) -> Self {
        self.config.validation_kernel_size = size;
        self
    }

    /// Set the color jitter strength
    #[must_use]
    pub fn jitter_strength(mut self, strength: f32) -> Self {
        self.config.jitter_strength = strength;
        self
    }

    /// Set the input tensor normalization statistics
    #[must_use]
    pub fn normalization(mut self, mean: [f32; 3], std: [f32; 3]) -> Self {
        self.config.normalization_mean = mean;
        self.config.normalization_std = std;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// Returns an error when any parameter fails [`SynthesisConfig::validate`].
    pub fn build(self) -> crate::Result<SynthesisConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}

/// Resolved augmentation profile for one dataset mode
///
/// Every randomized decision in the pipeline is drawn through this policy,
/// so the train/valid differences live in one place instead of being
/// scattered through the stages. The validation profile turns each draw
/// into its deterministic identity.
#[derive(Debug, Clone)]
pub struct AugmentationPolicy {
    /// Uniform scale range, `None` keeps the source resolution
    pub scale_range: Option<(f32, f32)>,
    /// Rotation range in inclusive degrees, `None` disables rotation
    pub rotation_range: Option<(i32, i32)>,
    /// Probability of each horizontal flip (foreground+alpha pair, background)
    pub flip_probability: f64,
    /// Structuring element size range, inclusive
    pub kernel_size_range: (u32, u32),
    /// Square crop side range, `None` selects the letterbox path instead
    pub crop_side_range: Option<(u32, u32)>,
    /// Whether the background crop offset is randomized within the slack
    pub random_background_offset: bool,
    /// Color jitter strength, `None` disables jitter
    pub jitter_strength: Option<f32>,
}

impl AugmentationPolicy {
    /// Training profile: all augmentations active
    #[must_use]
    pub fn train(config: &SynthesisConfig) -> Self {
        Self {
            scale_range: Some(config.scale_range),
            rotation_range: Some(config.rotation_range),
            flip_probability: 0.5,
            kernel_size_range: config.kernel_size_range,
            crop_side_range: Some(config.crop_side_range),
            random_background_offset: true,
            jitter_strength: Some(config.jitter_strength),
        }
    }

    /// Validation profile: identity geometry, fixed kernel, letterboxing
    #[must_use]
    pub fn validation(config: &SynthesisConfig) -> Self {
        Self {
            scale_range: None,
            rotation_range: None,
            flip_probability: 0.0,
            kernel_size_range: (config.validation_kernel_size, config.validation_kernel_size),
            crop_side_range: None,
            random_background_offset: false,
            jitter_strength: None,
        }
    }

    /// Profile matching the configured mode
    #[must_use]
    pub fn for_mode(config: &SynthesisConfig) -> Self {
        match config.mode {
            SynthesisMode::Train => Self::train(config),
            SynthesisMode::Valid => Self::validation(config),
        }
    }

    /// Draw a resize factor, 1.0 when scaling is disabled
    pub fn draw_scale(&self, rng: &mut impl Rng) -> f32 {
        match self.scale_range {
            Some((lo, hi)) => rng.random_range(lo..hi),
            None => 1.0,
        }
    }

    /// Draw a rotation angle in degrees, `None` when rotation is disabled
    pub fn draw_rotation(&self, rng: &mut impl Rng) -> Option<i32> {
        self.rotation_range.map(|(lo, hi)| rng.random_range(lo..=hi))
    }

    /// Draw one horizontal flip decision
    pub fn draw_flip(&self, rng: &mut impl Rng) -> bool {
        rng.random_bool(self.flip_probability)
    }

    /// Draw a structuring element size
    pub fn draw_kernel_size(&self, rng: &mut impl Rng) -> u32 {
        let (lo, hi) = self.kernel_size_range;
        rng.random_range(lo..=hi)
    }

    /// Draw a square crop side, `None` when cropping is disabled
    pub fn draw_crop_side(&self, rng: &mut impl Rng) -> Option<u32> {
        self.crop_side_range.map(|(lo, hi)| rng.random_range(lo..=hi))
    }

    /// Draw a background crop offset within `[0, slack)`
    pub fn draw_background_offset(&self, rng: &mut impl Rng, slack: u32) -> u32 {
        if self.random_background_offset && slack > 0 {
            rng.random_range(0..slack)
        } else {
            0
        }
    }

    /// Draw color jitter factors, `None` when jitter is disabled
    pub fn draw_jitter(&self, rng: &mut impl Rng) -> Option<ColorJitterFactors> {
        self.jitter_strength
            .map(|strength| ColorJitterFactors::draw(strength, rng))
    }
}
