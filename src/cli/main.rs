//! Matting Sample Synthesis CLI Tool
//!
//! Renders synthesized training samples back to image files so the
//! compositing and augmentation behavior can be inspected without a
//! training loop.

use super::config::CliConfigBuilder;
use crate::config::SynthesisMode;
use crate::pipeline::{Synthesizer, SyntheticSample};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Matting sample synthesis CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "matting-synth")]
pub struct Cli {
    /// Dataset root containing the image directories and name manifests
    #[arg(value_name = "DATASET_ROOT")]
    pub dataset_root: PathBuf,

    /// Output directory for the rendered samples
    #[arg(short, long, value_name = "OUTPUT", default_value = "synth-out")]
    pub output: PathBuf,

    /// Dataset split to synthesize from
    #[arg(short, long, value_enum, default_value_t = CliMode::Train)]
    pub mode: CliMode,

    /// Number of samples to synthesize
    #[arg(short = 'n', long, default_value_t = 8)]
    pub count: usize,

    /// Seed for the random number generator
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Manifest index of the first sample; wraps around the manifest
    #[arg(long, default_value_t = 0)]
    pub start_index: usize,

    /// JSON configuration file overriding the synthesis defaults
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Square edge length of the synthesized samples
    #[arg(long)]
    pub output_size: Option<u32>,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Dataset split selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    Train,
    Valid,
}

impl From<CliMode> for SynthesisMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Train => Self::Train,
            CliMode::Valid => Self::Valid,
        }
    }
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose).context("Failed to initialize tracing")?;

    let config = CliConfigBuilder::from_cli(&cli)?;
    let synthesizer = Synthesizer::new(config).context("Failed to build synthesizer")?;
    if synthesizer.is_empty() {
        bail!("Sample manifest is empty, nothing to synthesize");
    }

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory {}", cli.output.display()))?;

    let progress = if cli.count > 1 {
        let pb = ProgressBar::new(cli.count as u64);
        pb.set_style(progress_style());
        Some(pb)
    } else {
        None
    };

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let start = Instant::now();
    for sequence in 0..cli.count {
        let index = (cli.start_index + sequence) % synthesizer.len();
        let sample = synthesizer
            .synthesize(index, &mut rng)
            .with_context(|| format!("Failed to synthesize sample {index}"))?;
        save_sample(&cli.output, cli.start_index + sequence, index, &sample)?;

        if let Some(pb) = &progress {
            pb.set_message(format!("sample {index}"));
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_with_message(format!("Synthesized {} samples", cli.count));
    }

    info!(
        count = cli.count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        output = %cli.output.display(),
        "Finished synthesis"
    );
    Ok(())
}

/// Bar style for multi-sample runs
fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.cyan} {elapsed_precise} [{bar:36.green/white}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("=> ")
}

/// Write the composite, trimap and alpha of one sample as PNG files
fn save_sample(dir: &Path, sequence: usize, index: usize, sample: &SyntheticSample) -> Result<()> {
    let base = format!("{sequence:05}_{index}");

    let composite_path = dir.join(format!("{base}_composite.png"));
    sample
        .composite_image()
        .save(&composite_path)
        .with_context(|| format!("Failed to write {}", composite_path.display()))?;

    let trimap_path = dir.join(format!("{base}_trimap.png"));
    sample
        .trimap_image()
        .save(&trimap_path)
        .with_context(|| format!("Failed to write {}", trimap_path.display()))?;

    let alpha_path = dir.join(format!("{base}_alpha.png"));
    sample
        .alpha_image()
        .save(&alpha_path)
        .with_context(|| format!("Failed to write {}", alpha_path.display()))?;

    Ok(())
}

fn init_tracing(verbose_count: u8) -> Result<()> {
    use crate::tracing_config::{TracingConfig, TracingFormat};

    TracingConfig::new()
        .with_verbosity(verbose_count)
        .with_format(TracingFormat::Console)
        .init()
        .context("Failed to initialize tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_style_builds() {
        let pb = ProgressBar::hidden();
        pb.set_style(progress_style());
        pb.inc(1);
        pb.finish();
    }

    #[test]
    fn test_cli_mode_conversion() {
        assert_eq!(SynthesisMode::from(CliMode::Train), SynthesisMode::Train);
        assert_eq!(SynthesisMode::from(CliMode::Valid), SynthesisMode::Valid);
    }

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["matting-synth", "/data/matting"]);
        assert_eq!(cli.dataset_root, PathBuf::from("/data/matting"));
        assert_eq!(cli.mode, CliMode::Train);
        assert_eq!(cli.count, 8);
        assert_eq!(cli.seed, 0);
        assert_eq!(cli.output, PathBuf::from("synth-out"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "matting-synth",
            "/data/matting",
            "--mode",
            "valid",
            "-n",
            "3",
            "--seed",
            "11",
            "--output-size",
            "512",
            "-vv",
        ]);
        assert_eq!(cli.mode, CliMode::Valid);
        assert_eq!(cli.count, 3);
        assert_eq!(cli.seed, 11);
        assert_eq!(cli.output_size, Some(512));
        assert_eq!(cli.verbose, 2);
    }
}
