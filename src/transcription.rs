/*!
 * Per-segment transcription with bounded retries.
 */

use std::sync::Arc;

use log::{error, info};

use crate::errors::{ProviderError, TranscriptionError};
use crate::providers::SpeechToTextBackend;
use crate::retry::RetryPolicy;

/// Text recovered from one audio segment
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFragment {
    pub segment_index: usize,
    pub text: String,
}

/// Transcription service wrapping the speech-to-text backend with retries
pub struct TranscriptionService {
    backend: Arc<dyn SpeechToTextBackend>,
    retry: RetryPolicy,
}

impl TranscriptionService {
    pub fn new(backend: Arc<dyn SpeechToTextBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Transcribe one audio slice, retrying on failure
    ///
    /// Attempts are bounded by the retry policy (two by default) with a fixed
    /// short delay between them. The error of the last attempt is returned on
    /// exhaustion; the caller decides that the segment contributes empty text.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, TranscriptionError> {
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                self.retry.wait_before(attempt - 1).await;
            }

            info!(
                "   [transcribe] attempt {}/{} for {}",
                attempt, self.retry.max_attempts, file_name
            );
            match self.backend.transcribe_blob(audio.clone(), file_name).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    error!(
                        "   transcription failed ({}): {} - attempt {}/{}",
                        e.kind(),
                        e,
                        attempt,
                        self.retry.max_attempts
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(TranscriptionError::Provider(last_error.unwrap_or_else(
            || ProviderError::RequestFailed("no attempts were made".to_string()),
        )))
    }

    /// Join fragments into the full transcript, index order, newline-separated
    ///
    /// Fragments with empty text (failed segments) are dropped from the join.
    pub fn join_fragments(mut fragments: Vec<TranscriptFragment>) -> String {
        fragments.sort_by_key(|f| f.segment_index);
        fragments
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
