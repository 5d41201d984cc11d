//! Matting Sample Synthesis CLI Tool
//!
//! Command-line interface for synthesizing image matting training samples
//! with the matting-synth library.

#[cfg(feature = "cli")]
use matting_synth::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
