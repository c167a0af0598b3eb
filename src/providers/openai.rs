use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::{ChatCompletionBackend, SpeechToTextBackend};

/// Client for an OpenAI-compatible API serving both pipeline endpoints
#[derive(Debug)]
pub struct OpenAIClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Normalized base endpoint URL, no trailing slash
    endpoint: String,
    /// Model for audio transcription requests
    transcription_model: String,
    /// Model for chat-completion requests
    chat_model: String,
    /// Per-request timeout for transcription uploads
    transcription_timeout: Duration,
    /// Per-request timeout for chat completions
    chat_timeout: Duration,
    /// Temperature for chat completions
    temperature: f32,
}

/// Chat-completion request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,
    /// Content of the message
    content: String,
}

/// Chat-completion response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Transcription response body
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Normalize a base endpoint: validated as a URL, trailing slash removed
fn normalize_endpoint(endpoint: &str) -> Result<String, ProviderError> {
    let url = url::Url::parse(endpoint)
        .map_err(|e| ProviderError::RequestFailed(format!("invalid endpoint {endpoint}: {e}")))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

impl OpenAIClient {
    /// Create a client from the application configuration
    ///
    /// The caller has already validated that an API key is present.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let api_key = config.api_key().unwrap_or_default();
        Ok(Self {
            // Per-request timeouts are applied below; the client itself has none
            client: Client::builder().build().unwrap_or_default(),
            api_key,
            endpoint: normalize_endpoint(&config.api.endpoint)?,
            transcription_model: config.transcription.model.clone(),
            chat_model: config.translation.model.clone(),
            transcription_timeout: Duration::from_secs(config.transcription.timeout_secs),
            chat_timeout: Duration::from_secs(config.translation.timeout_secs),
            temperature: config.translation.temperature,
        })
    }

    fn classify(error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(error.to_string())
        } else {
            ProviderError::RequestFailed(error.to_string())
        }
    }

    async fn error_from_status(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        ProviderError::Api {
            status_code: status,
            message,
        }
    }
}

#[async_trait::async_trait]
impl SpeechToTextBackend for OpenAIClient {
    async fn transcribe_blob(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, ProviderError> {
        let mime = if file_name.to_lowercase().ends_with(".wav") {
            "audio/wav"
        } else {
            "audio/mpeg"
        };
        let file_part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part)
            .text("model", self.transcription_model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.endpoint))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.transcription_timeout)
            .send()
            .await
            .map_err(Self::classify)?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }

        let parsed = response
            .json::<TranscriptionResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait::async_trait]
impl ChatCompletionBackend for OpenAIClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.chat_timeout)
            .send()
            .await
            .map_err(Self::classify)?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response).await);
        }

        let parsed = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))?;
        Ok(text)
    }
}
