use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::audio_slicer::{self, Segment};
use crate::errors::TranscriptionError;
use crate::file_utils::FileManager;
use crate::providers::openai::OpenAIClient;
use crate::providers::{ChatCompletionBackend, SpeechToTextBackend};
use crate::retry::{Backoff, RetryPolicy};
use crate::transcript_processor::{split_sentences, TranscriptDocument};
use crate::transcription::{TranscriptFragment, TranscriptionService};
use crate::translation::TranslationService;

// @module: Pipeline driver for batch transcription and translation

/// Per-file processing state
///
/// `Skipped` and `Failed` are terminal short-circuits reachable from
/// `Pending` and `Transcribing` respectively; everything else advances in
/// order to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Pending,
    Segmenting,
    Transcribing,
    Translating,
    Writing,
    Done,
    Skipped,
    Failed,
}

/// Result counts for one batch run
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller driving the per-file pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
    transcription: TranscriptionService,
    translation: TranslationService,
}

impl Controller {
    // @method: Create a controller backed by the remote API client
    pub fn with_config(config: Config) -> Result<Self> {
        let client = Arc::new(OpenAIClient::from_config(&config)?);
        let stt: Arc<dyn SpeechToTextBackend> = client.clone();
        let chat: Arc<dyn ChatCompletionBackend> = client;
        Ok(Self::with_backends(config, stt, chat))
    }

    /// Create a controller with injected backends (used by tests)
    pub fn with_backends(
        config: Config,
        stt: Arc<dyn SpeechToTextBackend>,
        chat: Arc<dyn ChatCompletionBackend>,
    ) -> Self {
        let transcription_retry = RetryPolicy::new(
            config.transcription.max_attempts,
            Backoff::Fixed(Duration::from_secs(config.transcription.retry_delay_secs)),
        );
        // A zero base disables the backoff entirely
        let translation_backoff = if config.translation.backoff_base_secs == 0 {
            Backoff::None
        } else {
            Backoff::Linear {
                base_secs: config.translation.backoff_base_secs,
            }
        };
        let translation_retry =
            RetryPolicy::new(config.translation.max_retries + 1, translation_backoff);

        let transcription = TranscriptionService::new(stt, transcription_retry);
        let translation = TranslationService::new(
            chat,
            &config.translation,
            translation_retry,
            &config.source_language,
            &config.target_language,
        );

        Self {
            config,
            transcription,
            translation,
        }
    }

    /// Process every eligible file in the input directory, one at a time
    ///
    /// Per-file failures never abort the batch; the driver logs them and
    /// moves on to the next file.
    pub async fn run_folder(&self) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        let input_dir = PathBuf::from(&self.config.input_dir);
        if !input_dir.exists() {
            return Err(anyhow::anyhow!(
                "Input directory does not exist: {:?}",
                input_dir
            ));
        }
        FileManager::ensure_dir(&self.config.output_dir)?;

        let audio_files =
            FileManager::find_files(&input_dir, &self.config.audio.extensions)?;
        if audio_files.is_empty() {
            warn!("No eligible audio files in {:?}", input_dir);
            return Ok(BatchSummary::default());
        }

        info!("Processing {} audio file(s)...", audio_files.len());

        let folder_pb = ProgressBar::new(audio_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = BatchSummary::default();

        for (idx, audio_file) in audio_files.iter().enumerate() {
            let file_name = audio_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));
            info!("[{}/{}] {}", idx + 1, audio_files.len(), file_name);

            match self.process_file(audio_file).await {
                Ok(FileState::Done) => summary.done += 1,
                Ok(FileState::Skipped) => summary.skipped += 1,
                Ok(_) => summary.failed += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Batch complete");

        info!(
            "Batch completed: {} processed, {} skipped, {} failed - Duration: {}",
            summary.done,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Run one file through the state machine
    pub async fn process_file(&self, input_file: &Path) -> Result<FileState> {
        let mut state = FileState::Pending;

        // Presence of the output document is the completion marker
        let output_path = FileManager::transcript_output_path(
            input_file,
            &self.config.output_dir,
            &self.config.target_language,
        );
        if output_path.exists() {
            info!("   already completed, skipping");
            return Ok(FileState::Skipped);
        }

        state = self.advance(state, FileState::Segmenting);
        let info = match audio_slicer::probe(input_file) {
            Ok(info) => info,
            Err(e) => {
                error!("   probe failed ({}): {}", e.kind(), e);
                return Ok(FileState::Failed);
            }
        };
        let segments = audio_slicer::segments(&info, self.config.audio.chunk_seconds);
        info!(
            "   {:.1}s of audio, {} segment(s) of {}s",
            info.duration_secs,
            segments.len(),
            self.config.audio.chunk_seconds
        );

        state = self.advance(state, FileState::Transcribing);
        let transcript = match self.transcribe_segments(input_file, &info, &segments).await {
            Ok(text) => text,
            Err(e) => {
                error!("   transcription failed ({}): {}", e.kind(), e);
                return Ok(FileState::Failed);
            }
        };

        if transcript.trim().is_empty() {
            // Never leave an output file for a file with zero transcript text
            error!("   transcription produced no text, leaving file for rerun");
            return Ok(FileState::Failed);
        }

        state = self.advance(state, FileState::Translating);
        let sentences = split_sentences(&transcript);
        let mut lines = self.translation.translate_lines(&sentences).await;
        self.translation.sweep(&mut lines).await;

        state = self.advance(state, FileState::Writing);
        let document = TranscriptDocument::new(input_file, lines);
        FileManager::write_to_file(&output_path, &document.render())?;
        info!("   wrote {}", output_path.display());

        Ok(self.advance(state, FileState::Done))
    }

    /// Transcribe every segment of one file
    ///
    /// Each segment's slice lives in a named temp file that is removed when
    /// the guard drops, success or not. A segment whose slice or upload fails
    /// contributes empty text; only a total failure of all segments fails
    /// the file.
    async fn transcribe_segments(
        &self,
        input_file: &Path,
        info: &audio_slicer::AudioInfo,
        segments: &[Segment],
    ) -> Result<String, TranscriptionError> {
        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());
        let ext = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "wav".to_string());

        let mut fragments = Vec::with_capacity(segments.len());
        let mut successes = 0usize;

        for segment in segments {
            info!(
                "   segment {}/{} ({:.0}s - {:.0}s)",
                segment.index + 1,
                segments.len(),
                segment.start_secs,
                segment.end_secs
            );

            let blob = match audio_slicer::slice(input_file, info, segment) {
                Ok(blob) => blob,
                Err(e) => {
                    error!("   slice failed ({}): {}", e.kind(), e);
                    fragments.push(TranscriptFragment {
                        segment_index: segment.index,
                        text: String::new(),
                    });
                    continue;
                }
            };

            let slice_name = format!("{}.part{}.{}", stem, segment.index, ext);
            // Deleted on drop at the end of this iteration, on every path
            let text = match self.write_slice_to_temp(&blob, &ext) {
                Ok((tmp, bytes)) => {
                    let result = self.transcription.transcribe(bytes, &slice_name).await;
                    drop(tmp);
                    result
                }
                Err(e) => {
                    error!("   temp slice write failed: {}", e);
                    fragments.push(TranscriptFragment {
                        segment_index: segment.index,
                        text: String::new(),
                    });
                    continue;
                }
            };

            match text {
                Ok(text) => {
                    successes += 1;
                    fragments.push(TranscriptFragment {
                        segment_index: segment.index,
                        text,
                    });
                }
                Err(e) => {
                    // Retries already exhausted inside the service
                    warn!("   segment {} gave up ({})", segment.index, e.kind());
                    fragments.push(TranscriptFragment {
                        segment_index: segment.index,
                        text: String::new(),
                    });
                }
            }
        }

        if successes == 0 {
            return Err(TranscriptionError::AllSegmentsFailed(segments.len()));
        }

        Ok(TranscriptionService::join_fragments(fragments))
    }

    /// Write a slice blob to a temp file and read it back for upload
    ///
    /// Every slice is staged on disk before upload; the returned guard owns
    /// the file and deletes it on drop.
    fn write_slice_to_temp(
        &self,
        blob: &[u8],
        ext: &str,
    ) -> Result<(tempfile::NamedTempFile, Vec<u8>)> {
        let mut tmp = tempfile::Builder::new()
            .prefix("koscribe-slice-")
            .suffix(&format!(".{}", ext))
            .tempfile()
            .context("Failed to create temp slice file")?;
        tmp.write_all(blob)
            .context("Failed to write temp slice file")?;
        tmp.flush()?;
        let bytes = std::fs::read(tmp.path()).context("Failed to read temp slice file")?;
        Ok((tmp, bytes))
    }

    fn advance(&self, from: FileState, to: FileState) -> FileState {
        debug!("   state: {:?} -> {:?}", from, to);
        to
    }

    /// Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}:{:02}", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
