use crate::{
    analysis::OnsetSet,
    audio::AudioBuffer,
    error::{DetectionError, Result},
};

/// Core trait that every onset detection backend implements
pub trait OnsetDetector: Send + Sync {
    /// Returns the unique name of this backend
    fn name(&self) -> &str;

    /// Detect onsets in a mono signal
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono samples to analyze
    /// * `sample_rate` - Rate the samples were decoded at
    ///
    /// # Returns
    ///
    /// Onset positions as sample offsets into `samples`, in non-decreasing order.
    fn detect(&self, samples: &[f32], sample_rate: u32) -> Result<OnsetSet>;

    /// Detect onsets in a loaded buffer
    ///
    /// `sample_rate` must be the rate the buffer was produced at; a mismatch
    /// is rejected before the backend runs.
    fn detect_buffer(&self, buffer: &AudioBuffer, sample_rate: u32) -> Result<OnsetSet> {
        if buffer.sample_rate() != sample_rate {
            return Err(DetectionError::SampleRateMismatch {
                expected: sample_rate,
                actual: buffer.sample_rate(),
            }
            .into());
        }

        if buffer.is_empty() {
            return Err(DetectionError::EmptyBuffer.into());
        }

        self.detect(buffer.samples(), sample_rate)
    }
}
