use thiserror::Error;

/// Main error type for the transient analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Onset detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading and decoding the input audio
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Audio file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load audio file: {path} ({reason})")]
    LoadFailed { path: String, reason: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid audio parameters: {details}")]
    InvalidParameters { details: String },

    #[error("Resampling failed: {reason}")]
    ResampleFailed { reason: String },
}

/// Errors raised by an onset detection backend
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Cannot detect onsets in an empty buffer")]
    EmptyBuffer,

    #[error("Sample rate mismatch: buffer is {actual} Hz, detector was given {expected} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Onsets are not ordered: {previous} followed by {next}")]
    NonMonotonic { previous: u64, next: u64 },

    #[error("Onset analysis failed: {reason}")]
    AnalysisFailed { reason: String },
}

/// Errors raised while writing the `.ana` and `.json` files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize analysis: {reason}")]
    SerializeFailed { reason: String },

    #[error("Failed to move staged output into place at {path}: {source}")]
    CommitFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using AnalyzerError
pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl AnalyzerError {
    /// Whether the failure came from the input file rather than the analyzer or the output side
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(InputError::NotFound { path }) => {
                format!("Could not find audio file '{}'. Please check the path.", path)
            }
            Self::Input(InputError::LoadFailed { path, .. }) => {
                format!("Could not load audio file '{}'. Please check the file is a supported audio format.", path)
            }
            Self::Detection(DetectionError::EmptyBuffer) => {
                "The audio file decoded to zero samples; nothing to analyze.".to_string()
            }
            Self::Output(OutputError::WriteFailed { path, .. }) => {
                format!("Could not write '{}'. Please check the directory exists and is writable.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
