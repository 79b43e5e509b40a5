//! Mel filterbank and decibel helpers for the onset envelope.
//!
//! Uses the Slaney mel scale (linear below 1 kHz, logarithmic above) and
//! area-normalized triangular filters.

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert a frequency in Hz to the Slaney mel scale
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert a Slaney mel value back to Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// One triangular filter, stored from its first non-zero bin
#[derive(Debug, Clone)]
struct MelFilter {
    start: usize,
    weights: Vec<f32>,
}

/// Triangular mel filterbank mapping a power spectrum onto mel bands
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    filters: Vec<MelFilter>,
    n_bins: usize,
}

impl MelFilterbank {
    /// Build `n_mels` filters between `fmin` and `fmax` for an `n_fft`-point transform
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize, fmin: f64, fmax: f64) -> Self {
        let n_bins = n_fft / 2 + 1;
        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
            .collect();

        // n_mels + 2 edge frequencies, evenly spaced in mel
        let min_mel = hz_to_mel(fmin);
        let max_mel = hz_to_mel(fmax);
        let mel_points: Vec<f64> = (0..n_mels + 2)
            .map(|i| {
                let mel = min_mel + (max_mel - min_mel) * i as f64 / (n_mels + 1) as f64;
                mel_to_hz(mel)
            })
            .collect();

        let filters = (0..n_mels)
            .map(|m| {
                let (left, center, right) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
                let enorm = 2.0 / (right - left);

                let dense: Vec<f32> = fft_freqs
                    .iter()
                    .map(|&f| {
                        let lower = (f - left) / (center - left);
                        let upper = (right - f) / (right - center);
                        (lower.min(upper).max(0.0) * enorm) as f32
                    })
                    .collect();

                let start = dense.iter().position(|&w| w > 0.0).unwrap_or(n_bins);
                let end = dense.iter().rposition(|&w| w > 0.0).map_or(start, |i| i + 1);

                MelFilter {
                    start,
                    weights: dense[start..end].to_vec(),
                }
            })
            .collect();

        Self { filters, n_bins }
    }

    pub fn n_mels(&self) -> usize {
        self.filters.len()
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Project one power spectrum frame onto the mel bands
    pub fn apply(&self, power: &[f32], out: &mut [f32]) {
        debug_assert_eq!(power.len(), self.n_bins);
        debug_assert_eq!(out.len(), self.filters.len());

        for (band, filter) in out.iter_mut().zip(&self.filters) {
            *band = filter
                .weights
                .iter()
                .zip(&power[filter.start..filter.start + filter.weights.len()])
                .map(|(w, p)| w * p)
                .sum();
        }
    }

    /// Dense weight of `band` at frequency bin `bin`
    pub fn weight(&self, band: usize, bin: usize) -> f32 {
        let filter = &self.filters[band];
        if bin < filter.start {
            return 0.0;
        }
        filter.weights.get(bin - filter.start).copied().unwrap_or(0.0)
    }
}

/// Convert power values to decibels in place, clipping to `top_db` below the peak
///
/// Returns the peak level in dB.
pub fn power_to_db(values: &mut [f32], amin: f32, top_db: f32) -> f32 {
    let mut peak = f32::NEG_INFINITY;
    for value in values.iter_mut() {
        *value = 10.0 * value.max(amin).log10();
        peak = peak.max(*value);
    }

    let floor = peak - top_db;
    for value in values.iter_mut() {
        *value = value.max(floor);
    }

    peak
}
