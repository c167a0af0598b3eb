/*!
 * Deterministic backend doubles for the two remote services
 */

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use koscribe::errors::ProviderError;
use koscribe::providers::{ChatCompletionBackend, SpeechToTextBackend};

/// Speech-to-text double returning scripted responses in order
#[derive(Debug)]
pub struct MockSpeechToText {
    responses: Mutex<VecDeque<String>>,
    always_fail: bool,
    calls: AtomicUsize,
}

impl MockSpeechToText {
    /// Returns the given responses one per call, then errors when exhausted
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            always_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a timeout
    pub fn always_failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            always_fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechToTextBackend for MockSpeechToText {
    async fn transcribe_blob(
        &self,
        _audio: Vec<u8>,
        _file_name: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.always_fail {
            return Err(ProviderError::Timeout("mock transcription timeout".to_string()));
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::RequestFailed("mock out of responses".to_string()))
    }
}

/// Chat-completion double translating via a fixed lookup table
#[derive(Debug)]
pub struct MockChatCompletion {
    map: HashMap<String, String>,
    always_fail: bool,
    /// Number of leading calls that fail before the map takes over
    fail_first: AtomicUsize,
    calls: AtomicUsize,
}

impl MockChatCompletion {
    /// Translates via the given pairs; unknown input echoes back unchanged
    pub fn with_map(pairs: &[(&str, &str)]) -> Self {
        Self {
            map: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            always_fail: false,
            fail_first: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call
    pub fn always_failing() -> Self {
        Self {
            map: HashMap::new(),
            always_fail: true,
            fail_first: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails the first `n` calls, then behaves like `with_map`
    pub fn failing_first(n: usize, pairs: &[(&str, &str)]) -> Self {
        let mock = Self::with_map(pairs);
        mock.fail_first.store(n, Ordering::SeqCst);
        mock
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletionBackend for MockChatCompletion {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.always_fail {
            return Err(ProviderError::RequestFailed(
                "mock translation failure".to_string(),
            ));
        }
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(ProviderError::Timeout("mock translation timeout".to_string()));
        }
        Ok(self
            .map
            .get(user)
            .cloned()
            .unwrap_or_else(|| user.to_string()))
    }
}
