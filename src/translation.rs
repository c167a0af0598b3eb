/*!
 * Chunked translation with graceful degradation.
 *
 * Sentences are split into request-sized chunks, each chunk is translated
 * independently with linearly backed-off retries, and a chunk whose retries
 * are exhausted falls back to its original text; translation failure never
 * aborts the run. A sentence where every chunk failed stays unmarked, and a
 * final safety sweep re-submits such lines once more, covering transient
 * failures earlier in the run.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::app_config::{TranslationConfig, TranslationPolicy};
use crate::errors::ProviderError;
use crate::providers::ChatCompletionBackend;
use crate::retry::RetryPolicy;
use crate::transcript_processor::{needs_translation, split_chunks, TranslatedLine};

/// Translation service owning the chat backend and the retry policy
pub struct TranslationService {
    backend: Arc<dyn ChatCompletionBackend>,
    retry: RetryPolicy,
    policy: TranslationPolicy,
    max_chars: usize,
    system_prompt: String,
}

impl TranslationService {
    /// Build the service from the translation config section
    ///
    /// The system prompt template is resolved here: `{source_language}` and
    /// `{target_language}` placeholders are replaced once at construction.
    pub fn new(
        backend: Arc<dyn ChatCompletionBackend>,
        config: &TranslationConfig,
        retry: RetryPolicy,
        source_language: &str,
        target_language: &str,
    ) -> Self {
        let system_prompt = config
            .system_prompt
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language);
        Self {
            backend,
            retry,
            policy: config.policy,
            max_chars: config.max_chars_per_request,
            system_prompt,
        }
    }

    /// Translate one chunk, falling back to the original text on exhaustion
    pub async fn translate_chunk(&self, chunk: &str) -> String {
        match self.try_translate_chunk(chunk).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "translation failed after {} attempts ({}): {} - passing original through",
                    self.retry.max_attempts,
                    e.kind(),
                    e
                );
                chunk.to_string()
            }
        }
    }

    /// Translate one chunk with the configured retry schedule
    async fn try_translate_chunk(&self, chunk: &str) -> Result<String, ProviderError> {
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                self.retry.wait_before(attempt - 1).await;
            }

            match self.backend.complete(&self.system_prompt, chunk).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    debug!(
                        "translation attempt {}/{} failed ({}): {}",
                        attempt,
                        self.retry.max_attempts,
                        e.kind(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::RequestFailed("no attempts were made".to_string())))
    }

    /// Translate a whole sentence: chunk, translate in order, rejoin with
    /// single spaces
    ///
    /// Returns `None` when every chunk failed: the line then carries no
    /// translation marker and the safety sweep may retry it. When only some
    /// chunks fail, the failed ones pass through inside the rejoined text.
    pub async fn translate_sentence(&self, sentence: &str) -> Option<String> {
        let chunks = split_chunks(sentence, self.max_chars);
        let total = chunks.len();
        let mut parts = Vec::with_capacity(total);
        let mut failures = 0;

        for chunk in &chunks {
            let chunk = chunk.trim();
            match self.try_translate_chunk(chunk).await {
                Ok(text) => parts.push(text),
                Err(e) => {
                    warn!(
                        "translation failed after {} attempts ({}): {} - passing original through",
                        self.retry.max_attempts,
                        e.kind(),
                        e
                    );
                    failures += 1;
                    parts.push(chunk.to_string());
                }
            }
        }

        if failures == total {
            return None;
        }
        Some(parts.join(" "))
    }

    /// Build the translated lines for an ordered sequence of sentences
    ///
    /// Lines the policy judges untranslatable pass through with no
    /// translation attached.
    pub async fn translate_lines(&self, sentences: &[String]) -> Vec<TranslatedLine> {
        let mut lines = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            let translation = if needs_translation(sentence, self.policy) {
                self.translate_sentence(sentence).await
            } else {
                None
            };
            lines.push(TranslatedLine {
                original: sentence.clone(),
                translation,
            });
        }
        lines
    }

    /// Safety sweep: one more submission for lines still lacking a translation
    pub async fn sweep(&self, lines: &mut [TranslatedLine]) {
        for line in lines.iter_mut() {
            if line.translation.is_none() && needs_translation(&line.original, self.policy) {
                debug!("sweep: retranslating '{}'", line.original);
                line.translation = self.translate_sentence(&line.original).await;
            }
        }
    }
}
