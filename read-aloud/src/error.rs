use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech service rejected the chunk as too long: {message}")]
    ChunkTooLong { message: String },

    #[error("speech service is not configured: {0}")]
    NotConfigured(String),

    #[error("synthesis request failed{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    Synthesis {
        message: String,
        status_code: Option<u16>,
    },

    #[error("audio playback failed: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
