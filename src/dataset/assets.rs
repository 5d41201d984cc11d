//! Image asset loading
//!
//! Assets are loaded straight from disk on every call; the pipeline is
//! stateless per sample and keeps no image cache. Foreground and alpha
//! share a filename under different directories.

use crate::config::SynthesisConfig;
use crate::error::MattingError;
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::{Path, PathBuf};

/// Filesystem-backed loader for foreground, alpha, and background images
#[derive(Debug, Clone)]
pub struct AssetStore {
    foreground_dir: PathBuf,
    alpha_dir: PathBuf,
    background_dir: PathBuf,
}

impl AssetStore {
    /// Resolve the asset directories from the configuration
    #[must_use]
    pub fn new(config: &SynthesisConfig) -> Self {
        let root = &config.dataset_root;
        Self {
            foreground_dir: root.join(&config.foreground_dir),
            alpha_dir: root.join(&config.alpha_dir),
            background_dir: root.join(&config.background_dir),
        }
    }

    /// Load a foreground image as 8-bit RGB
    ///
    /// # Errors
    /// Returns [`MattingError::MissingAsset`] when the file cannot be read
    /// or decoded.
    pub fn load_foreground(&self, name: &str) -> crate::Result<RgbImage> {
        Ok(open_image(&self.foreground_dir.join(name))?.to_rgb8())
    }

    /// Load an alpha mask as 8-bit grayscale
    ///
    /// # Errors
    /// Returns [`MattingError::MissingAsset`] when the file cannot be read
    /// or decoded.
    pub fn load_alpha(&self, name: &str) -> crate::Result<GrayImage> {
        Ok(open_image(&self.alpha_dir.join(name))?.to_luma8())
    }

    /// Load a background image as 8-bit RGB
    ///
    /// # Errors
    /// Returns [`MattingError::MissingAsset`] when the file cannot be read
    /// or decoded.
    pub fn load_background(&self, name: &str) -> crate::Result<RgbImage> {
        Ok(open_image(&self.background_dir.join(name))?.to_rgb8())
    }
}

fn open_image(path: &Path) -> crate::Result<DynamicImage> {
    image::open(path).map_err(|e| MattingError::missing_asset(path, e))
}
