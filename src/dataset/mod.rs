//! Dataset access: name manifests and image assets
//!
//! The dataset is described by three newline-separated manifests (sample
//! names, foreground names, background names) plus three asset directories.
//! Sample names encode which foreground/background pair to composite.

pub mod assets;
pub mod manifest;

pub use assets::AssetStore;
pub use manifest::{decode_sample_name, DatasetManifest, SampleIndices, SamplePair};
