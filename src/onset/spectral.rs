use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;
use tracing::debug;

use crate::{
    analysis::OnsetSet,
    error::{DetectionError, Result},
    onset::{
        detector::OnsetDetector,
        mel::{power_to_db, MelFilterbank},
        peak::PeakPicker,
    },
};

/// FFT size of the analysis frames
pub const N_FFT: usize = 2048;

/// Samples between successive frames
pub const HOP_LENGTH: usize = 512;

/// Number of mel bands the spectrum is reduced to
pub const N_MELS: usize = 128;

/// Frame distance for the spectral difference
const LAG: usize = 1;

/// Power floor before taking the logarithm
const AMIN: f32 = 1e-10;

/// Dynamic range kept below the loudest mel cell
const TOP_DB: f32 = 80.0;

/// Default onset backend: mel-band spectral flux followed by peak picking
///
/// 1. Centered STFT frames (Hann window, zero padding of half a frame at both ends)
/// 2. Power spectrum reduced to mel bands and converted to dB
/// 3. Positive first difference per band, averaged across bands
/// 4. Envelope normalized to `[0, 1]` and handed to [`PeakPicker`]
/// 5. Peak frames converted to sample offsets
///
/// The parameters are fixed.
#[derive(Debug, Clone, Default)]
pub struct SpectralFluxDetector;

impl SpectralFluxDetector {
    pub fn new() -> Self {
        Self
    }

    /// Compute the onset strength envelope, one value per analysis frame
    ///
    /// The envelope is shifted so that frame `t` lines up with sample `t * HOP_LENGTH`.
    pub fn onset_envelope(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        if samples.is_empty() {
            return Err(DetectionError::EmptyBuffer.into());
        }

        let mel_db = self.log_mel_spectrogram(samples, sample_rate)?;
        let n_frames = mel_db.len();

        let flux: Vec<f32> = mel_db
            .windows(LAG + 1)
            .map(|pair| {
                let (previous, current) = (&pair[0], &pair[LAG]);
                let sum: f32 = current
                    .iter()
                    .zip(previous)
                    .map(|(&c, &p)| (c - p).max(0.0))
                    .sum();
                sum / current.len() as f32
            })
            .collect();

        // Compensate for the lag and the centered frames
        let pad = LAG + N_FFT / (2 * HOP_LENGTH);
        let mut envelope = vec![0.0f32; pad];
        envelope.extend(flux);
        envelope.truncate(n_frames);

        Ok(envelope)
    }

    /// Centered STFT → mel power → dB, returned frame by frame
    fn log_mel_spectrogram(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<Vec<f32>>> {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(N_FFT);
        let mut input_buffer = fft.make_input_vec();
        let mut spectrum_buffer: Vec<Complex<f32>> = fft.make_output_vec();
        let mut power = vec![0.0f32; N_FFT / 2 + 1];

        let filterbank = MelFilterbank::new(sample_rate, N_FFT, N_MELS, 0.0, sample_rate as f64 / 2.0);

        // Periodic Hann window
        let window: Vec<f32> = (0..N_FFT)
            .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / N_FFT as f32).cos())
            .collect();

        let pad = N_FFT / 2;
        let mut padded = vec![0.0f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let n_frames = 1 + samples.len() / HOP_LENGTH;
        let mut mel_frames = vec![0.0f32; n_frames * N_MELS];

        for (frame_idx, mel_frame) in mel_frames.chunks_exact_mut(N_MELS).enumerate() {
            let start = frame_idx * HOP_LENGTH;
            let frame = &padded[start..start + N_FFT];

            for ((slot, &sample), &w) in input_buffer.iter_mut().zip(frame).zip(&window) {
                *slot = sample * w;
            }

            fft.process(&mut input_buffer, &mut spectrum_buffer)
                .map_err(|e| DetectionError::AnalysisFailed {
                    reason: format!("FFT processing failed: {}", e)
                })?;

            for (p, c) in power.iter_mut().zip(&spectrum_buffer) {
                *p = c.norm_sqr();
            }

            filterbank.apply(&power, mel_frame);
        }

        let peak_db = power_to_db(&mut mel_frames, AMIN, TOP_DB);
        debug!(
            "Mel spectrogram: {} frames x {} bands, peak {:.1} dB",
            n_frames, N_MELS, peak_db
        );

        Ok(mel_frames.chunks_exact(N_MELS).map(|frame| frame.to_vec()).collect())
    }
}

impl OnsetDetector for SpectralFluxDetector {
    fn name(&self) -> &str {
        "spectral-flux"
    }

    fn detect(&self, samples: &[f32], sample_rate: u32) -> Result<OnsetSet> {
        if sample_rate == 0 {
            return Err(DetectionError::AnalysisFailed {
                reason: "sample rate must be positive".to_string()
            }.into());
        }

        let mut envelope = self.onset_envelope(samples, sample_rate)?;

        // Normalize to [0, 1]
        let min = envelope.iter().copied().fold(f32::INFINITY, f32::min);
        for value in envelope.iter_mut() {
            *value -= min;
        }
        let max = envelope.iter().copied().fold(0.0f32, f32::max);
        for value in envelope.iter_mut() {
            *value /= max + f32::MIN_POSITIVE;
        }

        if envelope.iter().all(|&value| value == 0.0) {
            debug!("Onset envelope is flat, no onsets");
            return Ok(OnsetSet::empty());
        }

        let peaks = PeakPicker::for_rate(sample_rate, HOP_LENGTH).pick(&envelope);
        debug!(
            "Onset envelope: {} frames, {} peaks picked",
            envelope.len(),
            peaks.len()
        );

        let offsets = peaks
            .into_iter()
            .map(|frame| (frame * HOP_LENGTH) as u64)
            .collect();

        Ok(OnsetSet::new(offsets)?)
    }
}
