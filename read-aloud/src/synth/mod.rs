//! Speech synthesis backend trait and types.

pub mod http;
pub mod mock;

use async_trait::async_trait;

use crate::error::Result;

/// A playable reference to the synthesized audio for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// URL (or other handle) understood by the audio player.
    pub url: String,
}

impl AudioClip {
    /// Create a new clip reference.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Speech synthesis backend - all synthesis services implement this.
///
/// Implementations classify failures structurally: a length rejection maps
/// to [`SpeechError::ChunkTooLong`] and missing credentials map to
/// [`SpeechError::NotConfigured`], so callers never match on message text.
///
/// [`SpeechError::ChunkTooLong`]: crate::error::SpeechError::ChunkTooLong
/// [`SpeechError::NotConfigured`]: crate::error::SpeechError::NotConfigured
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize one chunk of text into a playable clip.
    async fn synthesize(&self, text: &str, language: &str, voice: &str) -> Result<AudioClip>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_clip_creation() {
        let clip = AudioClip::new("https://cdn.example.com/clip.mp3");
        assert_eq!(clip.url, "https://cdn.example.com/clip.mp3");
    }
}
