//! Mock speech synthesizer for testing
//!
//! Provides a configurable mock backend that can simulate length rejections,
//! configuration failures, and successful synthesis.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{AudioClip, SpeechSynthesizer};
use crate::error::{Result, SpeechError};

/// A mock synthesizer for testing retry and ordering behavior
pub struct MockSynthesizer {
    /// Reject chunks whose UTF-8 byte length exceeds this limit
    reject_over_bytes: Option<usize>,
    /// Error to return on every call (None = succeed)
    fail_with: Mutex<Option<SpeechError>>,
    /// Current call count
    call_count: AtomicUsize,
    /// Every text received, in call order
    received: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    /// Create a synthesizer that always succeeds
    pub fn always_succeeds() -> Self {
        Self {
            reject_over_bytes: None,
            fail_with: Mutex::new(None),
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a synthesizer that always fails with the given error
    pub fn always_fails(error: SpeechError) -> Self {
        Self {
            reject_over_bytes: None,
            fail_with: Mutex::new(Some(error)),
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a synthesizer that rejects any chunk longer than `limit` bytes
    /// as too long, simulating a service-side length limit
    pub fn rejects_over_bytes(limit: usize) -> Self {
        Self {
            reject_over_bytes: Some(limit),
            fail_with: Mutex::new(None),
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get every text received so far, in call order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, _language: &str, _voice: &str) -> Result<AudioClip> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(text.to_string());

        if let Some(limit) = self.reject_over_bytes {
            if text.len() > limit {
                return Err(SpeechError::ChunkTooLong {
                    message: format!("chunk is {} bytes, service limit is {limit}", text.len()),
                });
            }
        }

        if let Some(err) = self.fail_with.lock().unwrap().as_ref() {
            return Err(clone_error(err));
        }

        Ok(AudioClip::new(format!("mock://{text}")))
    }
}

/// Clone a SpeechError (needed because SpeechError doesn't implement Clone)
fn clone_error(err: &SpeechError) -> SpeechError {
    match err {
        SpeechError::ChunkTooLong { message } => SpeechError::ChunkTooLong {
            message: message.clone(),
        },
        SpeechError::NotConfigured(s) => SpeechError::NotConfigured(s.clone()),
        SpeechError::Synthesis {
            message,
            status_code,
        } => SpeechError::Synthesis {
            message: message.clone(),
            status_code: *status_code,
        },
        SpeechError::Playback(s) => SpeechError::Playback(s.clone()),
        SpeechError::Config(s) => SpeechError::Config(s.clone()),
        // IO and TOML errors can't be cloned; degrade to a generic error
        SpeechError::Io(_) => SpeechError::Config("IO error (mock)".to_string()),
        SpeechError::TomlParse(_) => SpeechError::Config("TOML parse error (mock)".to_string()),
        SpeechError::TomlSerialize(_) => {
            SpeechError::Config("TOML serialize error (mock)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let synth = MockSynthesizer::always_succeeds();
        let clip = synth.synthesize("你好", "zh-CN", "standard-female").await.unwrap();
        assert_eq!(clip.url, "mock://你好");
        assert_eq!(synth.call_count(), 1);
        assert_eq!(synth.received(), vec!["你好"]);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let synth = MockSynthesizer::always_fails(SpeechError::NotConfigured(
            "no endpoint".to_string(),
        ));
        for _ in 0..3 {
            let result = synth.synthesize("hi", "en-US", "narrator").await;
            assert!(matches!(result, Err(SpeechError::NotConfigured(_))));
        }
        assert_eq!(synth.call_count(), 3);
    }

    #[tokio::test]
    async fn test_rejects_over_bytes() {
        let synth = MockSynthesizer::rejects_over_bytes(6);
        assert!(synth.synthesize("short", "en-US", "narrator").await.is_ok());

        let result = synth.synthesize("much too long", "en-US", "narrator").await;
        assert!(matches!(result, Err(SpeechError::ChunkTooLong { .. })));
    }
}
