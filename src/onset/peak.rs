/// Local-maximum peak picker for onset envelopes
///
/// A frame `n` is a peak when all of the following hold:
///
/// * `x[n] == max(x[n - pre_max .. n + post_max])`
/// * `x[n] >= mean(x[n - pre_avg .. n + post_avg]) + delta`
/// * `x[n] > 0`
/// * `n` is more than `wait` frames after the previous peak
///
/// Windows are clipped at the edges of the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakPicker {
    pub pre_max: usize,
    pub post_max: usize,
    pub pre_avg: usize,
    pub post_avg: usize,
    pub delta: f32,
    pub wait: usize,
}

impl PeakPicker {
    /// Standard windows for an envelope with one frame per `hop_length` samples:
    /// 30 ms look-back for the max, 100 ms either side for the mean, 30 ms refractory wait
    pub fn for_rate(sample_rate: u32, hop_length: usize) -> Self {
        let frames = |seconds: f64| (seconds * sample_rate as f64 / hop_length as f64).floor() as usize;

        Self {
            pre_max: frames(0.03),
            post_max: 1,
            pre_avg: frames(0.10),
            post_avg: frames(0.10) + 1,
            delta: 0.07,
            wait: frames(0.03),
        }
    }

    /// Return the indices of the peaks in `envelope`, in increasing order
    pub fn pick(&self, envelope: &[f32]) -> Vec<usize> {
        let len = envelope.len();
        let mut peaks = Vec::new();
        let mut last_peak: Option<usize> = None;

        for (n, &value) in envelope.iter().enumerate() {
            if value <= 0.0 {
                continue;
            }

            let max_window = &envelope[n.saturating_sub(self.pre_max)..(n + self.post_max).min(len)];
            let local_max = max_window.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            if value != local_max {
                continue;
            }

            let avg_window = &envelope[n.saturating_sub(self.pre_avg)..(n + self.post_avg).min(len)];
            let local_mean = avg_window.iter().sum::<f32>() / avg_window.len() as f32;
            if value < local_mean + self.delta {
                continue;
            }

            if last_peak.map_or(true, |last| n > last + self.wait) {
                peaks.push(n);
                last_peak = Some(n);
            }
        }

        peaks
    }
}
