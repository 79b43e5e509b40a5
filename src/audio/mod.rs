//! # Audio Loading Module
//!
//! Turns an audio file on disk into the mono, fixed-rate [`AudioBuffer`]
//! that onset detection runs on.
//!
//! ## Steps
//!
//! - **Decoding**: WAV through `hound`, everything else through `symphonia`
//! - **Mono-mix**: all channels averaged into one
//! - **Resampling**: sinc interpolation to the configured target rate
//!
//! ## Usage
//!
//! ```rust,no_run
//! use transient_analyzer::audio::AudioLoader;
//!
//! # fn main() -> anyhow::Result<()> {
//! let buffer = AudioLoader::new(48_000).load("song.wav")?;
//!
//! println!("{} samples at {} Hz", buffer.len(), buffer.sample_rate());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod resample;
pub mod types;
pub use loader::AudioLoader;
pub use resample::resample_mono;
pub use types::{AudioBuffer, AudioData, AudioFormat};
