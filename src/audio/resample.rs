use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

use crate::error::{InputError, Result};

/// Frames handed to the resampler per call
const CHUNK_SIZE: usize = 1024;

/// Resample a mono signal from `from_rate` to `to_rate`
///
/// Uses band-limited sinc interpolation. The resampler's output delay is
/// trimmed so the result lines up with the input in time, and the output
/// holds exactly `ceil(len * to_rate / from_rate)` samples.
pub fn resample_mono(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(InputError::InvalidParameters {
            details: format!("cannot resample from {} Hz to {} Hz", from_rate, to_rate),
        }
        .into());
    }

    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let expected_len = (samples.len() as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .map_err(|e| InputError::ResampleFailed { reason: e.to_string() })?;

    let delay = resampler.output_delay();
    debug!(
        "Resampling {} samples: {} Hz -> {} Hz (ratio {:.4}, delay {} frames)",
        samples.len(), from_rate, to_rate, ratio, delay
    );

    let mut output = Vec::with_capacity(expected_len + delay + CHUNK_SIZE);
    let mut position = 0;

    // Full chunks
    while samples.len() - position >= resampler.input_frames_next() {
        let end = position + resampler.input_frames_next();
        let waves_in = [&samples[position..end]];
        let waves_out = resampler
            .process(&waves_in[..], None)
            .map_err(|e| InputError::ResampleFailed { reason: e.to_string() })?;
        output.extend_from_slice(&waves_out[0]);
        position = end;
    }

    // Remaining tail, zero-padded by the resampler
    if position < samples.len() {
        let waves_in = [&samples[position..]];
        let waves_out = resampler
            .process_partial(Some(&waves_in[..]), None)
            .map_err(|e| InputError::ResampleFailed { reason: e.to_string() })?;
        output.extend_from_slice(&waves_out[0]);
    }

    // Flush the filter until the delayed signal has fully come out
    while output.len() < expected_len + delay {
        let waves_out = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|e| InputError::ResampleFailed { reason: e.to_string() })?;
        if waves_out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&waves_out[0]);
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected_len, 0.0);

    Ok(output)
}
