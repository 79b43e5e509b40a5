//! # Transient Analyzer
//!
//! Detect onsets (transients) in an audio file and export them as sample offsets.
//!
//! The library decodes an audio file, mixes it down to mono, resamples it to a
//! fixed rate (48 kHz by default), runs onset detection and writes the result
//! twice: as a plain-text `.ana` file and as JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use transient_analyzer::{Config, TransientAnalyzer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let analyzer = TransientAnalyzer::new(Config::default());
//! let paths = analyzer.run("piano.wav", None)?;
//!
//! println!("{}", paths.text.display()); // piano.ana
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`audio`] - Decoding, mono-mix and resampling
//! - [`onset`] - The [`OnsetDetector`](onset::OnsetDetector) trait and the built-in backend
//! - [`analysis`] - The analysis result and its onset list
//! - [`output`] - Output path resolution and the `.ana` / `.json` writers
//! - [`pipeline`] - The [`TransientAnalyzer`] tying the steps together
//! - [`config`] - Configuration management
//!
//! ## Output Formats
//!
//! `.ana`:
//!
//! ```text
//! # sample_rate 48000
//! 11776
//! 35840
//! ```
//!
//! `.json`:
//!
//! ```text
//! {
//!   "sample_rate": 48000,
//!   "onsets": [
//!     11776,
//!     35840
//!   ]
//! }
//! ```

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod onset;
pub mod output;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use crate::{
    analysis::{AnalysisResult, OnsetSet},
    config::Config,
    error::{AnalyzerError, Result},
    onset::OnsetDetector,
    output::OutputPaths,
    pipeline::TransientAnalyzer,
};
