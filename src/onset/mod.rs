//! # Onset Detection Module
//!
//! Finds transients in a mono buffer and reports them as sample offsets.
//!
//! Detection sits behind the [`OnsetDetector`] trait so the pipeline does not
//! depend on any particular algorithm. [`SpectralFluxDetector`] is the
//! built-in backend.
//!
//! ## Custom Backends
//!
//! ```rust,no_run
//! use transient_analyzer::analysis::OnsetSet;
//! use transient_analyzer::onset::OnsetDetector;
//! use transient_analyzer::Result;
//!
//! struct Threshold(f32);
//!
//! impl OnsetDetector for Threshold {
//!     fn name(&self) -> &str {
//!         "threshold"
//!     }
//!
//!     fn detect(&self, samples: &[f32], _sample_rate: u32) -> Result<OnsetSet> {
//!         let offsets = samples
//!             .windows(2)
//!             .enumerate()
//!             .filter(|(_, w)| w[0].abs() < self.0 && w[1].abs() >= self.0)
//!             .map(|(i, _)| i as u64 + 1)
//!             .collect();
//!         Ok(OnsetSet::new(offsets)?)
//!     }
//! }
//! ```

pub mod detector;
pub mod mel;
pub mod peak;
pub mod spectral;

pub use detector::OnsetDetector;
pub use peak::PeakPicker;
pub use spectral::SpectralFluxDetector;
