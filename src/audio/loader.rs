use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::audio::resample::resample_mono;
use crate::audio::types::{AudioBuffer, AudioData, AudioFormat};
use crate::config::{AudioConfig, DEFAULT_SAMPLE_RATE};
use crate::error::{InputError, Result};

/// Audio file loader producing mono buffers at a fixed target rate
#[derive(Debug, Clone)]
pub struct AudioLoader {
    target_sample_rate: u32,
}

impl AudioLoader {
    /// Create a loader that resamples everything to `target_sample_rate`
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    /// Create a loader from the audio section of the configuration
    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.sample_rate)
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Load an audio file as a mono buffer at the target sample rate
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<AudioBuffer> {
        let audio_data = Self::decode(path)?;
        self.prepare(&audio_data)
    }

    /// Mix decoded audio down to mono and resample it to the target rate
    pub fn prepare(&self, audio_data: &AudioData) -> Result<AudioBuffer> {
        let mono = audio_data.mono_samples();
        debug!(
            "Mixed {} channel(s) down to {} mono samples",
            audio_data.channels,
            mono.len()
        );

        let samples = resample_mono(&mono, audio_data.sample_rate, self.target_sample_rate)?;
        Ok(AudioBuffer::new(samples, self.target_sample_rate))
    }

    /// Decode an audio file into raw interleaved samples at its native rate
    pub fn decode<P: AsRef<Path>>(path: P) -> Result<AudioData> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::NotFound {
                path: path.display().to_string()
            }.into());
        }

        match Self::detect_format(path).as_deref() {
            Some("wav") => Self::load_wav(path),
            _ => Self::load_with_symphonia(path),
        }
    }

    /// Load WAV files using the hound crate
    fn load_wav(path: &Path) -> Result<AudioData> {
        let reader = hound::WavReader::open(path)
            .map_err(|e| AudioLoader::load_failed(path, e))?;

        let spec = reader.spec();
        let sample_rate = spec.sample_rate;
        let channels = spec.channels;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.into_samples::<f32>()
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| AudioLoader::load_failed(path, e))?
            }
            hound::SampleFormat::Int => {
                let bit_depth = spec.bits_per_sample;
                reader.into_samples::<i32>()
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| AudioLoader::load_failed(path, e))?
                    .into_iter()
                    .map(|sample| Self::int_to_float(sample, bit_depth))
                    .collect()
            }
        };

        let duration = Self::duration_of(samples.len(), sample_rate, channels);
        debug!(
            "Decoded WAV {:?}: {} Hz, {} channel(s), {}-bit, {:.2}s",
            path, sample_rate, channels, spec.bits_per_sample, duration
        );

        Ok(AudioData {
            samples,
            sample_rate,
            channels,
            duration,
            file_path: path.to_path_buf(),
            format: AudioFormat {
                extension: "wav".to_string(),
                bit_depth: Some(spec.bits_per_sample),
                compression: None,
            },
        })
    }

    /// Load any other format using Symphonia, probing by content when the extension is unknown
    fn load_with_symphonia(path: &Path) -> Result<AudioData> {
        let extension = Self::detect_format(path).unwrap_or_default();

        let file = File::open(path)
            .map_err(|e| AudioLoader::load_failed(path, e))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if !extension.is_empty() {
            hint.with_extension(&extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|_| InputError::UnsupportedFormat {
                format: if extension.is_empty() { "unknown".to_string() } else { extension.clone() }
            })?;

        let mut format = probed.format;

        // First audio track with a known (decodable) codec
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| InputError::LoadFailed {
                path: path.display().to_string(),
                reason: "no decodable audio track".to_string(),
            })?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
        let mut channels = codec_params.channels.map(|c| c.count() as u16).unwrap_or(0);

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &dec_opts)
            .map_err(|e| AudioLoader::load_failed(path, e))?;

        let mut samples = Vec::new();
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                // End of stream
                Err(SymphoniaError::IoError(_)) => break,
                Err(e) => return Err(AudioLoader::load_failed(path, e)),
            };

            while !format.metadata().is_latest() {
                format.metadata().pop();
            }

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count() as u16;

                    let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    sample_buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(sample_buf.samples());
                }
                Err(SymphoniaError::IoError(_)) => break,
                Err(SymphoniaError::DecodeError(reason)) => {
                    skipped_packets += 1;
                    warn!("Skipping corrupt packet in {:?}: {}", path, reason);
                }
                Err(e) => return Err(AudioLoader::load_failed(path, e)),
            }
        }

        if sample_rate == 0 {
            return Err(InputError::InvalidParameters {
                details: "No sample rate found".to_string()
            }.into());
        }

        if channels == 0 {
            return Err(InputError::InvalidParameters {
                details: "No channel information found".to_string()
            }.into());
        }

        let duration = Self::duration_of(samples.len(), sample_rate, channels);
        debug!(
            "Decoded {:?} with Symphonia: {} Hz, {} channel(s), {:.2}s, {} packet(s) skipped",
            path, sample_rate, channels, duration, skipped_packets
        );

        Ok(AudioData {
            samples,
            sample_rate,
            channels,
            duration,
            file_path: path.to_path_buf(),
            format: AudioFormat {
                extension: if extension.is_empty() { "unknown".to_string() } else { extension },
                bit_depth: codec_params.bits_per_sample.map(|b| b as u16),
                compression: Some(format!("{:?}", codec_params.codec)),
            },
        })
    }

    /// Convert integer sample to float (-1.0 to 1.0)
    ///
    /// hound hands back 8-bit WAV samples already re-centred around zero,
    /// so every depth scales the same way.
    fn int_to_float(sample: i32, bit_depth: u16) -> f32 {
        match bit_depth {
            1..=32 => (sample as f64 / (1u64 << (bit_depth - 1)) as f64) as f32,
            _ => sample as f32 / 32768.0, // Default to 16-bit
        }
    }

    fn duration_of(sample_count: usize, sample_rate: u32, channels: u16) -> f64 {
        if sample_rate == 0 || channels == 0 {
            return 0.0;
        }
        sample_count as f64 / (sample_rate as f64 * channels as f64)
    }

    fn load_failed(path: &Path, reason: impl std::fmt::Display) -> crate::error::AnalyzerError {
        InputError::LoadFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
        .into()
    }

    /// Detect audio format from file extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

impl Default for AudioLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}
