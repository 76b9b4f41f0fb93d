//! Chunked text-to-speech playback for course content.
//!
//! Turns arbitrary text into sequentially played speech:
//! - sanitize the text (strip emoji, pronunciation annotations, and other
//!   characters a synthesizer would stumble over),
//! - segment it into chunks bounded by a UTF-8 byte budget,
//! - synthesize each chunk through a speech service with bounded concurrency,
//! - play the resulting clips strictly in order, with last-request-wins
//!   cancellation and automatic budget-reduction retries when the service
//!   rejects a chunk as too long.

pub mod audio;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod playback;
pub mod synth;
pub mod text;

pub use audio::AudioPlayer;
pub use config::SpeechConfig;
pub use dispatch::dispatch_ordered;
pub use error::{Result, SpeechError};
pub use playback::{PlaybackObserver, PlaybackSequencer};
pub use synth::http::HttpSynthesizer;
pub use synth::mock::MockSynthesizer;
pub use synth::{AudioClip, SpeechSynthesizer};
pub use text::{DEFAULT_MAX_CHUNK_BYTES, sanitize_text, segment_text};
