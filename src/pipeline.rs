//! End-to-end sample synthesis
//!
//! [`Synthesizer`] owns the manifest, the asset store and the
//! augmentation policy for one mode, and turns a sample index plus a
//! random number generator into a fully packed training sample. All
//! randomness flows through the caller's generator, so a seeded
//! generator replays the identical sample.

use std::time::Instant;

use image::{imageops, GrayImage, Rgb, RgbImage};
use ndarray::Array3;
use rand::Rng;
use tracing::{debug, instrument};

use crate::config::{AugmentationPolicy, SynthesisConfig};
use crate::dataset::{AssetStore, DatasetManifest};
use crate::error::{MattingError, Result};
use crate::ops::augment::{flip_pair, rescale_pair, rotate_pair};
use crate::ops::background::{crop_window, scale_to_cover};
use crate::ops::compose::composite;
use crate::ops::crop::{crop_to_size_gray, crop_to_size_rgb, random_crop_origin};
use crate::ops::letterbox::letterbox_to_square;
use crate::ops::trimap::{coarse_trimap, ground_truth_trimap};
use crate::tensor::{pack_display, pack_input, pack_target};

/// One synthesized training sample in channel-first layout
///
/// All three tensors share the configured square spatial size. The
/// display tensor is the composite in unit range, the input tensor is
/// normalized color plus the trimap channel, and the target tensor is
/// alpha plus the per-pixel class map.
#[derive(Debug, Clone)]
pub struct SyntheticSample {
    /// Composite image, `(3, S, S)`, unit range
    pub display: Array3<f32>,
    /// Normalized color and trimap, `(4, S, S)`
    pub input: Array3<f32>,
    /// Alpha and class map, `(2, S, S)`
    pub target: Array3<f32>,
}

impl SyntheticSample {
    /// Recover the composite as an 8-bit image
    #[must_use]
    pub fn composite_image(&self) -> RgbImage {
        let (_, h, w) = self.display.dim();
        RgbImage::from_fn(w as u32, h as u32, |x, y| {
            let sample =
                |c: usize| (self.display[[c, y as usize, x as usize]] * 255.0).round() as u8;
            Rgb([sample(0), sample(1), sample(2)])
        })
    }

    /// Recover the input trimap as an 8-bit image
    #[must_use]
    pub fn trimap_image(&self) -> GrayImage {
        let (_, h, w) = self.input.dim();
        GrayImage::from_fn(w as u32, h as u32, |x, y| {
            image::Luma([(self.input[[3, y as usize, x as usize]] * 255.0).round() as u8])
        })
    }

    /// Recover the ground-truth alpha as an 8-bit image
    #[must_use]
    pub fn alpha_image(&self) -> GrayImage {
        let (_, h, w) = self.target.dim();
        GrayImage::from_fn(w as u32, h as u32, |x, y| {
            image::Luma([(self.target[[0, y as usize, x as usize]] * 255.0).round() as u8])
        })
    }
}

/// Sample synthesizer for one dataset split
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SynthesisConfig,
    policy: AugmentationPolicy,
    manifest: DatasetManifest,
    assets: AssetStore,
}

impl Synthesizer {
    /// Build a synthesizer, loading the manifests from the dataset root
    ///
    /// # Errors
    /// Returns an error when the configuration is invalid or a manifest
    /// cannot be read.
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        config.validate()?;
        let manifest = DatasetManifest::load(&config)?;
        Ok(Self::assemble(config, manifest))
    }

    /// Build a synthesizer around an already constructed manifest
    ///
    /// # Errors
    /// Returns an error when the configuration is invalid.
    pub fn with_manifest(config: SynthesisConfig, manifest: DatasetManifest) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, manifest))
    }

    fn assemble(config: SynthesisConfig, manifest: DatasetManifest) -> Self {
        let policy = AugmentationPolicy::for_mode(&config);
        let assets = AssetStore::new(&config);
        Self {
            config,
            policy,
            manifest,
            assets,
        }
    }

    /// Number of samples in the manifest
    #[must_use]
    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    /// Whether the manifest holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }

    /// The configuration this synthesizer was built with
    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// The augmentation policy in effect
    #[must_use]
    pub fn policy(&self) -> &AugmentationPolicy {
        &self.policy
    }

    /// Synthesize the sample at `index`
    ///
    /// Loads the foreground, alpha and background named by the manifest,
    /// applies the mode's augmentations in a fixed draw order and packs
    /// the result into tensors.
    ///
    /// # Errors
    /// Returns an error when the index is out of range, an asset is
    /// missing or unreadable, or the loaded geometry is inconsistent.
    #[instrument(skip(self, rng), fields(index = index, mode = %self.config.mode))]
    pub fn synthesize(&self, index: usize, rng: &mut impl Rng) -> Result<SyntheticSample> {
        let start = Instant::now();

        let pair = self.manifest.resolve(index)?;
        let foreground = self.assets.load_foreground(pair.foreground)?;
        let alpha = self.assets.load_alpha(pair.foreground)?;
        let background = self.assets.load_background(pair.background)?;
        if foreground.dimensions() != alpha.dimensions() {
            return Err(MattingError::degenerate(format!(
                "foreground {:?} does not match alpha {:?} for {}",
                foreground.dimensions(),
                alpha.dimensions(),
                pair.foreground
            )));
        }
        debug!(
            foreground = pair.foreground,
            background = pair.background,
            "Loaded sample assets"
        );

        let scale = self.policy.draw_scale(rng);
        let (mut foreground, mut alpha) = rescale_pair(&foreground, &alpha, scale);
        if let Some(degrees) = self.policy.draw_rotation(rng) {
            let rotated = rotate_pair(&foreground, &alpha, degrees);
            foreground = rotated.0;
            alpha = rotated.1;
        }
        if self.policy.draw_flip(rng) {
            let flipped = flip_pair(&foreground, &alpha);
            foreground = flipped.0;
            alpha = flipped.1;
        }
        let background = if self.policy.draw_flip(rng) {
            imageops::flip_horizontal(&background)
        } else {
            background
        };

        let gt_trimap = ground_truth_trimap(&alpha);
        let kernel_size = self.policy.draw_kernel_size(rng);
        let input_trimap = coarse_trimap(&gt_trimap, kernel_size);

        let size = self.config.output_size;
        let (image, input_trimap, alpha) = match self.policy.draw_crop_side(rng) {
            Some(side) => {
                let (x, y) = random_crop_origin(&gt_trimap, side, rng);
                let alpha = crop_to_size_gray(&alpha, x, y, side, size);
                let foreground = crop_to_size_rgb(&foreground, x, y, side, size);
                let input_trimap = crop_to_size_gray(&input_trimap, x, y, side, size);
                let plate = self.fit_background(&background, size, size, rng)?;
                let image = composite(&foreground, &plate, &alpha)?;
                (image, input_trimap, alpha)
            }
            None => {
                let (w, h) = foreground.dimensions();
                let plate = self.fit_background(&background, w, h, rng)?;
                let image = composite(&foreground, &plate, &alpha)?;
                let boxed = letterbox_to_square(&image, &input_trimap, &alpha, size)?;
                (boxed.image, boxed.trimap, boxed.alpha)
            }
        };

        let display = pack_display(&image);
        let jitter = self.policy.draw_jitter(rng);
        let input = pack_input(
            &image,
            &input_trimap,
            jitter,
            self.config.normalization_mean,
            self.config.normalization_std,
        )?;
        let target = pack_target(&alpha);

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            kernel_size, "Synthesized sample"
        );
        Ok(SyntheticSample {
            display,
            input,
            target,
        })
    }

    /// Scale the background to cover the frame and cut a window out of it
    fn fit_background(
        &self,
        background: &RgbImage,
        width: u32,
        height: u32,
        rng: &mut impl Rng,
    ) -> Result<RgbImage> {
        let plate = scale_to_cover(background, width, height)?;
        let x = self.policy.draw_background_offset(rng, plate.width() - width);
        let y = self
            .policy
            .draw_background_offset(rng, plate.height() - height);
        crop_window(&plate, x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisMode;
    use image::Luma;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    fn write_fixture_assets(dir: &Path) {
        for sub in ["fg", "mask", "bg"] {
            std::fs::create_dir_all(dir.join(sub)).unwrap();
        }
        let fg = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 120]));
        fg.save(dir.join("fg/subject.png")).unwrap();
        // Opaque core, transparent rim, soft band between
        let alpha = GrayImage::from_fn(40, 30, |x, y| {
            if (12..28).contains(&x) && (8..22).contains(&y) {
                Luma([255])
            } else if (8..32).contains(&x) && (5..25).contains(&y) {
                Luma([128])
            } else {
                Luma([0])
            }
        });
        alpha.save(dir.join("mask/subject.png")).unwrap();
        let bg = RgbImage::from_fn(64, 48, |x, y| Rgb([40, (x + y) as u8, 200]));
        bg.save(dir.join("bg/plate.png")).unwrap();
    }

    fn fixture_synthesizer(dir: &Path, mode: SynthesisMode) -> Synthesizer {
        write_fixture_assets(dir);
        let config = SynthesisConfig::builder()
            .dataset_root(dir)
            .mode(mode)
            .output_size(32)
            .crop_side_range(32, 64)
            .build()
            .unwrap();
        let manifest = DatasetManifest::from_lists(
            vec!["0_0.png".to_string()],
            vec!["subject.png".to_string()],
            vec!["plate.png".to_string()],
        );
        Synthesizer::with_manifest(config, manifest).unwrap()
    }

    #[test]
    fn test_train_sample_shapes() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = fixture_synthesizer(dir.path(), SynthesisMode::Train);
        let mut rng = StdRng::seed_from_u64(42);
        let sample = synth.synthesize(0, &mut rng).unwrap();
        assert_eq!(sample.display.dim(), (3, 32, 32));
        assert_eq!(sample.input.dim(), (4, 32, 32));
        assert_eq!(sample.target.dim(), (2, 32, 32));
    }

    #[test]
    fn test_valid_sample_shapes() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = fixture_synthesizer(dir.path(), SynthesisMode::Valid);
        let mut rng = StdRng::seed_from_u64(42);
        let sample = synth.synthesize(0, &mut rng).unwrap();
        assert_eq!(sample.display.dim(), (3, 32, 32));
        assert_eq!(sample.input.dim(), (4, 32, 32));
        assert_eq!(sample.target.dim(), (2, 32, 32));
    }

    #[test]
    fn test_same_seed_replays_sample() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = fixture_synthesizer(dir.path(), SynthesisMode::Train);
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first = synth.synthesize(0, &mut a).unwrap();
        let second = synth.synthesize(0, &mut b).unwrap();
        assert_eq!(first.display, second.display);
        assert_eq!(first.input, second.input);
        assert_eq!(first.target, second.target);
    }

    #[test]
    fn test_valid_trimap_channel_is_unit_range() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = fixture_synthesizer(dir.path(), SynthesisMode::Valid);
        let mut rng = StdRng::seed_from_u64(3);
        let sample = synth.synthesize(0, &mut rng).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                let v = sample.input[[3, y, x]];
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_index_out_of_range() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = fixture_synthesizer(dir.path(), SynthesisMode::Train);
        let mut rng = StdRng::seed_from_u64(1);
        let err = synth.synthesize(5, &mut rng).unwrap_err();
        assert!(matches!(err, MattingError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_missing_asset_surfaces() {
        let dir = tempfile::TempDir::new().unwrap();
        write_fixture_assets(dir.path());
        let config = SynthesisConfig::builder()
            .dataset_root(dir.path())
            .output_size(32)
            .build()
            .unwrap();
        let manifest = DatasetManifest::from_lists(
            vec!["0_0.png".to_string()],
            vec!["absent.png".to_string()],
            vec!["plate.png".to_string()],
        );
        let synth = Synthesizer::with_manifest(config, manifest).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = synth.synthesize(0, &mut rng).unwrap_err();
        assert!(matches!(err, MattingError::MissingAsset { .. }));
    }

    #[test]
    fn test_mismatched_alpha_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        write_fixture_assets(dir.path());
        // Shrunken mask no longer matches the foreground
        let alpha = GrayImage::from_pixel(10, 10, Luma([255]));
        alpha.save(dir.path().join("mask/subject.png")).unwrap();
        let config = SynthesisConfig::builder()
            .dataset_root(dir.path())
            .output_size(32)
            .build()
            .unwrap();
        let manifest = DatasetManifest::from_lists(
            vec!["0_0.png".to_string()],
            vec!["subject.png".to_string()],
            vec!["plate.png".to_string()],
        );
        let synth = Synthesizer::with_manifest(config, manifest).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = synth.synthesize(0, &mut rng).unwrap_err();
        assert!(matches!(err, MattingError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_recovered_images_match_tensor_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let synth = fixture_synthesizer(dir.path(), SynthesisMode::Valid);
        let mut rng = StdRng::seed_from_u64(9);
        let sample = synth.synthesize(0, &mut rng).unwrap();
        assert_eq!(sample.composite_image().dimensions(), (32, 32));
        assert_eq!(sample.trimap_image().dimensions(), (32, 32));
        assert_eq!(sample.alpha_image().dimensions(), (32, 32));
    }
}
