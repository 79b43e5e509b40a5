use std::path::Path;
use tracing::{debug, info};

use crate::{
    analysis::AnalysisResult,
    audio::{AudioBuffer, AudioLoader},
    config::Config,
    error::Result,
    onset::{OnsetDetector, SpectralFluxDetector},
    output::{OutputPaths, OutputWriter},
};

/// Runs the whole analysis for one file
///
/// The pipeline is a single forward pass:
/// 1. Audio Loading - decode, mix to mono, resample to the configured rate
/// 2. Onset Detection - hand the buffer to the configured backend
/// 3. Path Resolution - explicit prefix, or the input path minus its extension
/// 4. Output Writing - `.ana` and `.json` files
pub struct TransientAnalyzer {
    config: Config,
    detector: Box<dyn OnsetDetector>,
}

impl TransientAnalyzer {
    /// Create an analyzer using the built-in spectral flux backend
    pub fn new(config: Config) -> Self {
        Self::with_detector(config, Box::new(SpectralFluxDetector::new()))
    }

    /// Create an analyzer with a custom onset detection backend
    pub fn with_detector(config: Config, detector: Box<dyn OnsetDetector>) -> Self {
        Self { config, detector }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Analyze `input` and write the results next to it, or under `prefix` when given
    ///
    /// Returns the paths that were written.
    pub fn run<P: AsRef<Path>>(&self, input: P, prefix: Option<&Path>) -> Result<OutputPaths> {
        let input = input.as_ref();

        info!("🎵 Analyzing {:?}", input);
        let result = self.analyze(input)?;

        // Step 3: Path Resolution
        let paths = OutputPaths::resolve(input, prefix);
        debug!("Output paths: {:?}, {:?}", paths.text, paths.json);

        // Step 4: Output Writing
        self.write_outputs(&result, &paths)?;

        Ok(paths)
    }

    /// Load `input` and detect its onsets without writing anything
    pub fn analyze<P: AsRef<Path>>(&self, input: P) -> Result<AnalysisResult> {
        // Step 1: Audio Loading
        let buffer = self.load_audio(input.as_ref())?;

        // Step 2: Onset Detection
        self.detect_onsets(&buffer)
    }

    fn load_audio(&self, input: &Path) -> Result<AudioBuffer> {
        let loader = AudioLoader::from_config(&self.config.audio);
        let buffer = loader.load(input)?;

        info!(
            "   Loaded {:.2}s of audio, {} samples at {} Hz",
            buffer.duration(),
            buffer.len(),
            buffer.sample_rate()
        );

        Ok(buffer)
    }

    fn detect_onsets(&self, buffer: &AudioBuffer) -> Result<AnalysisResult> {
        let sample_rate = self.config.audio.sample_rate;

        debug!("Running onset detection with the {} backend", self.detector.name());
        let onsets = self.detector.detect_buffer(buffer, sample_rate)?;

        info!("   ✅ Detected {} onsets", onsets.len());
        Ok(AnalysisResult::new(sample_rate, onsets))
    }

    fn write_outputs(&self, result: &AnalysisResult, paths: &OutputPaths) -> Result<()> {
        let writer = OutputWriter::from_config(&self.config.output);
        writer.write(result, paths)?;

        info!("   Wrote {:?} and {:?}", paths.text, paths.json);
        Ok(())
    }
}

impl Default for TransientAnalyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
