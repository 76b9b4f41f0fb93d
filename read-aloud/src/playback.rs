//! Sequential playback of synthesized chunks.
//!
//! The sequencer owns the whole "play this text" operation: sanitize,
//! segment, synthesize with bounded concurrency, then play the clips
//! strictly in order. Cancellation is last-request-wins: every `play` claims
//! a fresh request id, and anything still running under an older id goes
//! silent the next time it checks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::{debug, warn};

use crate::audio::AudioPlayer;
use crate::config::SpeechConfig;
use crate::dispatch::dispatch_ordered;
use crate::error::{Result, SpeechError};
use crate::synth::{AudioClip, SpeechSynthesizer};
use crate::text::{sanitize_text, segment_text};

/// Budget reduction applied per length-rejection retry, in bytes.
const RETRY_BUDGET_STEP: usize = 200;
/// Smallest budget the retry loop will attempt.
const RETRY_BUDGET_FLOOR: usize = 500;
/// Length-rejection retries before the error surfaces.
const MAX_BUDGET_RETRIES: u32 = 2;

/// Lifecycle callbacks for a play operation.
///
/// Callbacks fire only for the current request; a superseded request goes
/// silent instead of reporting.
pub trait PlaybackObserver: Send + Sync {
    fn on_play_start(&self) {}
    fn on_play_end(&self) {}
    fn on_error(&self, _error: &SpeechError) {}
}

struct NoopObserver;

impl PlaybackObserver for NoopObserver {}

/// Plays text as speech, one chunk at a time.
///
/// All cancellation state lives on the instance, so independent sequencers
/// can coexist without sharing anything.
pub struct PlaybackSequencer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
    config: SpeechConfig,
    observer: Arc<dyn PlaybackObserver>,
    request_seq: AtomicU64,
    playing: AtomicBool,
}

impl PlaybackSequencer {
    /// Create a new sequencer.
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        player: Arc<dyn AudioPlayer>,
        config: SpeechConfig,
    ) -> Self {
        Self {
            synthesizer,
            player,
            config,
            observer: Arc::new(NoopObserver),
            request_seq: AtomicU64::new(0),
            playing: AtomicBool::new(false),
        }
    }

    /// Install lifecycle callbacks.
    pub fn with_observer(mut self, observer: Arc<dyn PlaybackObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Whether a play operation currently owns the audio output.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Stop playback and invalidate the current request.
    pub fn stop(&self) {
        self.request_seq.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
        self.player.stop();
    }

    /// Pause the currently playing clip.
    pub fn pause(&self) {
        self.player.pause();
    }

    /// Speak `text` from the beginning, superseding any previous request.
    ///
    /// Returns `Ok(())` when playback finished, when there was nothing to
    /// say, or when a newer request took over mid-flight. Errors surface
    /// through both the return value and [`PlaybackObserver::on_error`].
    pub async fn play(&self, text: &str) -> Result<()> {
        let request = self.begin_request();

        let text = sanitize_text(text);
        if text.is_empty() {
            debug!("nothing to say after sanitization");
            return Ok(());
        }

        let clips = match self.synthesize_with_retry(&text, request).await {
            Ok(Some(clips)) => clips,
            // A newer request took over while we were synthesizing.
            Ok(None) => return Ok(()),
            Err(err) => {
                if !self.is_current(request) {
                    return Ok(());
                }
                self.observer.on_error(&err);
                return Err(err);
            }
        };

        self.play_clips(&clips, request).await
    }

    /// Claim a fresh request id and silence whatever was playing.
    ///
    /// Ownership of the playing flag transfers here, so it is cleared even
    /// if this request never reaches playback itself.
    fn begin_request(&self) -> u64 {
        let request = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.playing.store(false, Ordering::SeqCst);
        self.player.stop();
        request
    }

    fn is_current(&self, request: u64) -> bool {
        self.request_seq.load(Ordering::SeqCst) == request
    }

    /// Segment and synthesize, shrinking the chunk budget on length
    /// rejections: 800 → 600 → 500 with the default configuration, at most
    /// [`MAX_BUDGET_RETRIES`] retries.
    ///
    /// `Ok(None)` means the request was superseded and the caller should go
    /// silent. If a reduced budget reproduces the previous chunk list, the
    /// oversized unit is indivisible and the stored rejection surfaces
    /// immediately instead of looping.
    async fn synthesize_with_retry(
        &self,
        text: &str,
        request: u64,
    ) -> Result<Option<Vec<AudioClip>>> {
        let mut budget = self.config.max_chunk_bytes;
        let mut retries = 0u32;
        let mut previous: Option<Vec<String>> = None;
        let mut last_rejection: Option<SpeechError> = None;

        loop {
            let chunks = segment_text(text, budget);
            if chunks.is_empty() {
                return Ok(Some(Vec::new()));
            }

            if let Some(prev) = &previous {
                if *prev == chunks {
                    debug!("resegmentation at {budget} bytes changed nothing, giving up");
                    return Err(last_rejection.take().unwrap_or_else(|| {
                        SpeechError::ChunkTooLong {
                            message: "chunk exceeds the service limit".to_string(),
                        }
                    }));
                }
            }

            match self.synthesize_chunks(&chunks).await {
                Ok(clips) => return Ok(Some(clips)),
                Err(err @ SpeechError::ChunkTooLong { .. }) if retries < MAX_BUDGET_RETRIES => {
                    if !self.is_current(request) {
                        return Ok(None);
                    }
                    retries += 1;
                    let reduced = budget
                        .saturating_sub(RETRY_BUDGET_STEP)
                        .max(RETRY_BUDGET_FLOOR);
                    warn!(
                        "chunk rejected as too long at {budget} bytes, retrying at {reduced} \
                         ({retries}/{MAX_BUDGET_RETRIES})"
                    );
                    previous = Some(chunks);
                    last_rejection = Some(err);
                    budget = reduced;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Fan the chunks out to the synthesis service, bounded by the
    /// configured concurrency, and collect the clips in chunk order.
    async fn synthesize_chunks(&self, chunks: &[String]) -> Result<Vec<AudioClip>> {
        let synthesizer = &self.synthesizer;
        let language = self.config.language.as_str();
        let voice = self.config.voice.as_str();

        dispatch_ordered(chunks.to_vec(), self.config.concurrency, |chunk, index| {
            async move {
                debug!("synthesizing chunk {index} ({} bytes)", chunk.len());
                synthesizer.synthesize(&chunk, language, voice).await
            }
        })
        .await
    }

    /// Play clips strictly in order; clip `i + 1` never starts before clip
    /// `i` has finished. Bails out silently once the request goes stale.
    async fn play_clips(&self, clips: &[AudioClip], request: u64) -> Result<()> {
        if !self.is_current(request) {
            return Ok(());
        }
        self.playing.store(true, Ordering::SeqCst);
        self.observer.on_play_start();

        for (index, clip) in clips.iter().enumerate() {
            if !self.is_current(request) {
                // The new request owns the playing flag and the player now.
                return Ok(());
            }
            if let Err(err) = self.player.play_to_end(clip).await {
                if !self.is_current(request) {
                    return Ok(());
                }
                self.playing.store(false, Ordering::SeqCst);
                self.observer.on_error(&err);
                return Err(err);
            }
            debug!("finished clip {} of {}", index + 1, clips.len());
        }

        if self.is_current(request) {
            self.playing.store(false, Ordering::SeqCst);
            self.observer.on_play_end();
        }
        Ok(())
    }
}
