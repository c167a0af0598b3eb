use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory scanned for input audio files
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Directory receiving one output document per input file
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Audio segmentation config
    #[serde(default)]
    pub audio: AudioConfig,

    /// Transcription service config
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Remote API access config
    #[serde(default)]
    pub api: ApiConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Audio segmentation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    /// Fixed segment duration in seconds
    #[serde(default = "default_chunk_seconds")]
    pub chunk_seconds: u32,

    /// Input file extensions considered eligible
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: default_chunk_seconds(),
            extensions: default_extensions(),
        }
    }
}

/// Speech-to-text request settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Model name sent with each transcription request
    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per segment, including the first
    #[serde(default = "default_transcription_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in seconds
    #[serde(default = "default_transcription_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_transcription_model(),
            timeout_secs: default_transcription_timeout_secs(),
            max_attempts: default_transcription_attempts(),
            retry_delay_secs: default_transcription_retry_delay_secs(),
        }
    }
}

/// Translation request settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Model name sent with each chat-completion request
    #[serde(default = "default_translation_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,

    /// Additional attempts after the first failure
    #[serde(default = "default_translation_retries")]
    pub max_retries: u32,

    /// Base for the linear backoff (base + attempt seconds)
    #[serde(default = "default_translation_backoff_base_secs")]
    pub backoff_base_secs: u64,

    /// Maximum characters per translation request
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    /// Which lines are considered translatable
    #[serde(default)]
    pub policy: TranslationPolicy,

    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_translation_model(),
            timeout_secs: default_translation_timeout_secs(),
            max_retries: default_translation_retries(),
            backoff_base_secs: default_translation_backoff_base_secs(),
            max_chars_per_request: default_max_chars_per_request(),
            policy: TranslationPolicy::default(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
        }
    }
}

/// Remote API access settings, shared by both services
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base endpoint URL (OpenAI-compatible)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
        }
    }
}

/// Which lines the pipeline submits for translation
///
/// The two variants resolve mixed-script lines differently: with
/// `SkipTargetScript` a line that already contains any Hangul passes through
/// untouched; with `RequireSourceScript` a line is translated whenever it
/// contains Latin letters, Hangul present or not.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationPolicy {
    /// Translate unless the line already contains target-language script
    #[default]
    SkipTargetScript,
    /// Translate only lines containing source-language (Latin) letters
    RequireSourceScript,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Environment variable consulted when the config file carries no API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_input_dir() -> String {
    "converted".to_string()
}

fn default_output_dir() -> String {
    "transcripts".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_chunk_seconds() -> u32 {
    60
}

fn default_extensions() -> Vec<String> {
    vec!["wav".to_string(), "mp3".to_string()]
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_transcription_timeout_secs() -> u64 {
    180
}

fn default_transcription_attempts() -> u32 {
    2
}

fn default_transcription_retry_delay_secs() -> u64 {
    5
}

fn default_translation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    120
}

fn default_translation_retries() -> u32 {
    3
}

fn default_translation_backoff_base_secs() -> u64 {
    3
}

fn default_max_chars_per_request() -> usize {
    1200
}

fn default_temperature() -> f32 {
    0.3
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text from {source_language} to {target_language}. Produce a natural, accurate translation and nothing else.".to_string()
}

impl Config {
    /// Load configuration from a JSON file, creating a default file if absent
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Resolve the API key from config or environment
    pub fn api_key(&self) -> Option<String> {
        if !self.api.api_key.is_empty() {
            return Some(self.api.api_key.clone());
        }
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }

    /// Validate the configuration for consistency and required values
    ///
    /// A missing credential is fatal: the process must exit before any
    /// segment is sliced or any request is sent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, code) in [
            ("source", &self.source_language),
            ("target", &self.target_language),
        ] {
            if isolang::Language::from_639_1(code).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "unknown {} language code: {}",
                    label, code
                )));
            }
        }

        if self.audio.chunk_seconds == 0 {
            return Err(ConfigError::Invalid(
                "audio.chunk_seconds must be positive".to_string(),
            ));
        }

        if self.translation.max_chars_per_request == 0 {
            return Err(ConfigError::Invalid(
                "translation.max_chars_per_request must be positive".to_string(),
            ));
        }

        if self.api_key().is_none() {
            return Err(ConfigError::MissingApiKey(API_KEY_ENV));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            audio: AudioConfig::default(),
            transcription: TranscriptionConfig::default(),
            translation: TranslationConfig::default(),
            api: ApiConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
