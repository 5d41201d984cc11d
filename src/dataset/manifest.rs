//! Manifest loading and sample name resolution
//!
//! A sample name like `42_7.png` selects foreground 42 and background 7
//! from the two name lists. The lists are read once at construction and
//! shared immutably afterwards.

use crate::config::SynthesisConfig;
use crate::error::MattingError;
use std::path::Path;
use tracing::debug;

/// Indices decoded from a sample name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleIndices {
    /// Position in the foreground name list
    pub foreground: usize,
    /// Position in the background name list
    pub background: usize,
}

/// Resolved asset names for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePair<'a> {
    /// Filename shared by the foreground image and its alpha mask
    pub foreground: &'a str,
    /// Filename of the background image
    pub background: &'a str,
}

/// Decode a `<fg>_<bg>.<ext>` sample name into its index pair
///
/// The extension is stripped at the first `.`; the stem must consist of
/// exactly two `_`-separated non-negative integers.
///
/// # Errors
/// Returns [`MattingError::InvalidSampleName`] for anything else.
pub fn decode_sample_name(name: &str) -> crate::Result<SampleIndices> {
    let stem = name.split('.').next().unwrap_or(name);
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() != 2 {
        return Err(MattingError::invalid_sample_name(name));
    }
    let foreground = parts[0]
        .parse::<usize>()
        .map_err(|_| MattingError::invalid_sample_name(name))?;
    let background = parts[1]
        .parse::<usize>()
        .map_err(|_| MattingError::invalid_sample_name(name))?;
    Ok(SampleIndices {
        foreground,
        background,
    })
}

/// Immutable name lists backing the dataset
#[derive(Debug, Clone)]
pub struct DatasetManifest {
    samples: Vec<String>,
    foregrounds: Vec<String>,
    backgrounds: Vec<String>,
}

impl DatasetManifest {
    /// Load the three manifests for the configured mode from the dataset root
    ///
    /// # Errors
    /// Returns an error when any manifest file cannot be read.
    pub fn load(config: &SynthesisConfig) -> crate::Result<Self> {
        let root = &config.dataset_root;
        let samples = read_names(&root.join(config.sample_manifest_name()))?;
        let foregrounds = read_names(&root.join(&config.foreground_manifest))?;
        let backgrounds = read_names(&root.join(&config.background_manifest))?;
        debug!(
            samples = samples.len(),
            foregrounds = foregrounds.len(),
            backgrounds = backgrounds.len(),
            "Loaded dataset manifests"
        );
        Ok(Self {
            samples,
            foregrounds,
            backgrounds,
        })
    }

    /// Build a manifest from in-memory lists
    #[must_use]
    pub fn from_lists(
        samples: Vec<String>,
        foregrounds: Vec<String>,
        backgrounds: Vec<String>,
    ) -> Self {
        Self {
            samples,
            foregrounds,
            backgrounds,
        }
    }

    /// Number of producible samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the sample list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Resolve a sample index to its foreground/background name pair
    ///
    /// # Errors
    /// Returns an error when the index is out of range, the sample name does
    /// not decode, or a decoded index exceeds its name list.
    pub fn resolve(&self, index: usize) -> crate::Result<SamplePair<'_>> {
        let name = self
            .samples
            .get(index)
            .ok_or_else(|| MattingError::index_out_of_range("sample", index, self.samples.len()))?;
        let indices = decode_sample_name(name)?;
        let foreground = self.foregrounds.get(indices.foreground).ok_or_else(|| {
            MattingError::index_out_of_range(
                "foreground",
                indices.foreground,
                self.foregrounds.len(),
            )
        })?;
        let background = self.backgrounds.get(indices.background).ok_or_else(|| {
            MattingError::index_out_of_range(
                "background",
                indices.background,
                self.backgrounds.len(),
            )
        })?;
        Ok(SamplePair {
            foreground,
            background,
        })
    }
}

fn read_names(path: &Path) -> crate::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| MattingError::file_io_error("read manifest", path, e))?;
    // Lines are kept verbatim so manifest positions stay stable; a blank
    // line surfaces as an invalid name if a sample ever points at it.
    Ok(contents.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisMode;
    use std::io::Write;

    fn sample_manifest() -> DatasetManifest {
        DatasetManifest::from_lists(
            vec!["0_1.png".to_string(), "1_0.jpg".to_string()],
            vec!["cat.png".to_string(), "dog.png".to_string()],
            vec!["beach.jpg".to_string(), "street.jpg".to_string()],
        )
    }

    #[test]
    fn test_decode_sample_name() {
        let indices = decode_sample_name("42_7.png").unwrap();
        assert_eq!(indices.foreground, 42);
        assert_eq!(indices.background, 7);

        // Extension is optional
        let indices = decode_sample_name("3_0").unwrap();
        assert_eq!(indices.foreground, 3);
        assert_eq!(indices.background, 0);
    }

    #[test]
    fn test_decode_sample_name_rejects_malformed() {
        for name in ["", "42.png", "a_b.png", "1_2_3.png", "-1_2.png", "1_.png"] {
            let err = decode_sample_name(name).unwrap_err();
            assert!(
                matches!(err, MattingError::InvalidSampleName { .. }),
                "expected invalid name error for {name:?}"
            );
        }
    }

    #[test]
    fn test_resolve_pairs() {
        let manifest = sample_manifest();
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());

        let pair = manifest.resolve(0).unwrap();
        assert_eq!(pair.foreground, "cat.png");
        assert_eq!(pair.background, "street.jpg");

        let pair = manifest.resolve(1).unwrap();
        assert_eq!(pair.foreground, "dog.png");
        assert_eq!(pair.background, "beach.jpg");
    }

    #[test]
    fn test_resolve_out_of_range() {
        let manifest = sample_manifest();
        let err = manifest.resolve(5).unwrap_err();
        assert!(matches!(
            err,
            MattingError::IndexOutOfRange {
                kind: "sample",
                index: 5,
                len: 2
            }
        ));

        let manifest = DatasetManifest::from_lists(
            vec!["9_0.png".to_string()],
            vec!["cat.png".to_string()],
            vec!["beach.jpg".to_string()],
        );
        let err = manifest.resolve(0).unwrap_err();
        assert!(matches!(
            err,
            MattingError::IndexOutOfRange {
                kind: "foreground",
                index: 9,
                len: 1
            }
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("valid_names.txt")).unwrap();
        writeln!(file, "0_0.png").unwrap();
        writeln!(file, "0_1.png").unwrap();
        let mut file = std::fs::File::create(dir.path().join("fg_names.txt")).unwrap();
        writeln!(file, "cat.png").unwrap();
        let mut file = std::fs::File::create(dir.path().join("bg_names.txt")).unwrap();
        writeln!(file, "beach.jpg").unwrap();
        writeln!(file, "street.jpg").unwrap();

        let config = SynthesisConfig::builder()
            .dataset_root(dir.path())
            .mode(SynthesisMode::Valid)
            .build()
            .unwrap();
        let manifest = DatasetManifest::load(&config).unwrap();
        assert_eq!(manifest.len(), 2);
        let pair = manifest.resolve(1).unwrap();
        assert_eq!(pair.foreground, "cat.png");
        assert_eq!(pair.background, "street.jpg");
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SynthesisConfig::builder()
            .dataset_root(dir.path())
            .build()
            .unwrap();
        let err = DatasetManifest::load(&config).unwrap_err();
        assert!(err.to_string().contains("train_names.txt"));
    }
}
