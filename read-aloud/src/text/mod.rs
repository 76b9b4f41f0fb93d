//! Text processing for speech synthesis: sanitization and segmentation.

mod sanitizer;
mod segmenter;

pub use sanitizer::sanitize_text;
pub use segmenter::{DEFAULT_MAX_CHUNK_BYTES, segment_text};
