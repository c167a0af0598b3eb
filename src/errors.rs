/*!
 * Error types for the koscribe application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions. Every remote or
 * I/O failure carries a short kind label (`kind()`) that the pipeline uses
 * when logging per-item failures.
 */

use thiserror::Error;

/// Errors returned by the remote OpenAI-compatible endpoints
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Request exceeded its configured timeout
    #[error("API request timed out: {0}")]
    Timeout(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Short classification label used for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => "RequestFailed",
            Self::Timeout(_) => "Timeout",
            Self::Api { .. } => "ApiError",
            Self::Parse(_) => "ParseError",
        }
    }
}

/// Errors that can occur while probing or slicing an audio file
#[derive(Error, Debug)]
pub enum SliceError {
    /// Underlying read/seek failure
    #[error("Audio read failed: {0}")]
    Io(#[from] std::io::Error),

    /// WAV container could not be parsed
    #[error("Invalid WAV container: {0}")]
    Wav(#[from] hound::Error),

    /// No recognizable MPEG frame header was found
    #[error("Invalid MP3 header in {0}")]
    InvalidHeader(String),

    /// File extension is not one the slicer understands
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

impl SliceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Wav(_) => "WavError",
            Self::InvalidHeader(_) => "InvalidHeader",
            Self::UnsupportedFormat(_) => "UnsupportedFormat",
        }
    }
}

/// Errors that can occur during transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error from the remote speech-to-text endpoint
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Every segment of a file failed to transcribe
    #[error("All {0} segments failed transcription")]
    AllSegmentsFailed(usize),
}

impl TranscriptionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider(e) => e.kind(),
            Self::AllSegmentsFailed(_) => "AllSegmentsFailed",
        }
    }
}

/// Errors that can occur during translation
///
/// The translation service degrades to pass-through on exhaustion, so this
/// type never crosses the service boundary; it exists for logging and tests.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the remote chat-completion endpoint
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider(e) => e.kind(),
        }
    }
}

/// Configuration errors, fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API credential in the config file or environment
    #[error("Missing API key: set it in the config file or the {0} environment variable")]
    MissingApiKey(&'static str),

    /// A config value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration loading or validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error from audio slicing
    #[error("Slice error: {0}")]
    Slice(#[from] SliceError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
