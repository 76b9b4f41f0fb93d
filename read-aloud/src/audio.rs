//! Audio playback seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::synth::AudioClip;

/// Playback primitive for synthesized clips - implementations live with the
/// embedding application (HTML audio element, rodio sink, test fake).
///
/// `play_to_end` resolves once the clip has finished playing, or fails with
/// [`SpeechError::Playback`] on decode/network/unsupported-format errors.
/// `stop` and `pause` act on whatever is currently playing and must be safe
/// to call when nothing is.
///
/// [`SpeechError::Playback`]: crate::error::SpeechError::Playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play a clip and wait for it to finish.
    async fn play_to_end(&self, clip: &AudioClip) -> Result<()>;

    /// Stop and discard the current clip, if any.
    fn stop(&self);

    /// Pause the current clip, if any.
    fn pause(&self);
}
