/*!
 * Remote service backends.
 *
 * The pipeline talks to two remote endpoints: a speech-to-text service and a
 * chat-completion service. Both are served by one OpenAI-compatible client;
 * the traits below exist so the services can hold `Arc<dyn …>` and tests can
 * inject deterministic doubles.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Backend for the remote speech-to-text endpoint
#[async_trait]
pub trait SpeechToTextBackend: Send + Sync + Debug {
    /// Submit one audio blob and return the recovered text
    ///
    /// # Arguments
    /// * `audio` - The raw slice bytes to upload
    /// * `file_name` - File name reported to the service (format hint)
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - Recovered text or a classified error
    async fn transcribe_blob(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, ProviderError>;
}

/// Backend for the remote chat-completion endpoint
#[async_trait]
pub trait ChatCompletionBackend: Send + Sync + Debug {
    /// Submit one prompt and return the completion text
    ///
    /// # Arguments
    /// * `system` - System prompt guiding the model
    /// * `user` - User message carrying the text to translate
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - Completion text or a classified error
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

pub mod openai;
