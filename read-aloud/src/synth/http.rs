//! HTTP JSON client for the speech synthesis service.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AudioClip, SpeechSynthesizer};
use crate::error::{Result, SpeechError};

/// Synthesizer backed by an HTTP endpoint.
///
/// Sends `{text, language, voice}` as JSON and expects `{audio_url}` back.
pub struct HttpSynthesizer {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpSynthesizer {
    /// Create a new synthesizer for the given endpoint.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            client: Client::new(),
        }
    }

    /// Create a synthesizer from configuration.
    pub fn from_config(config: &crate::config::SpeechConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            SpeechError::NotConfigured("no synthesis endpoint configured".to_string())
        })?;
        Ok(Self::new(endpoint, None))
    }
}

// Service request/response types

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    language: &'a str,
    voice: &'a str,
}

#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    audio_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ServiceError,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: Option<String>,
    message: String,
}

/// Map a failed service response onto the error taxonomy.
///
/// Classification is structural (status codes and machine-readable error
/// codes), never substring matching on human-readable messages.
fn classify_failure(status: u16, code: Option<&str>, message: String) -> SpeechError {
    match (status, code) {
        (413, _) | (_, Some("text_too_long")) => SpeechError::ChunkTooLong { message },
        (401 | 403, _) | (_, Some("not_configured" | "missing_credentials")) => {
            SpeechError::NotConfigured(message)
        }
        _ => SpeechError::Synthesis {
            message,
            status_code: Some(status),
        },
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, language: &str, voice: &str) -> Result<AudioClip> {
        let request = SynthesisRequest {
            text,
            language,
            voice,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder.send().await.map_err(|e| SpeechError::Synthesis {
            message: format!("request failed: {e}"),
            status_code: None,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => (parsed.error.code, parsed.error.message),
                Err(_) => (None, body),
            };
            return Err(classify_failure(status.as_u16(), code.as_deref(), message));
        }

        let parsed: SynthesisResponse =
            response.json().await.map_err(|e| SpeechError::Synthesis {
                message: format!("failed to parse response: {e}"),
                status_code: None,
            })?;

        debug!("synthesized {} bytes of text into {}", text.len(), parsed.audio_url);
        Ok(AudioClip::new(parsed.audio_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_413_maps_to_chunk_too_long() {
        let err = classify_failure(413, None, "payload too large".to_string());
        assert!(matches!(err, SpeechError::ChunkTooLong { .. }));
    }

    #[test]
    fn test_length_error_code_maps_to_chunk_too_long() {
        let err = classify_failure(400, Some("text_too_long"), "rejected".to_string());
        assert!(matches!(err, SpeechError::ChunkTooLong { .. }));
    }

    #[test]
    fn test_auth_failures_map_to_not_configured() {
        for status in [401, 403] {
            let err = classify_failure(status, None, "denied".to_string());
            assert!(matches!(err, SpeechError::NotConfigured(_)));
        }
        let err = classify_failure(500, Some("missing_credentials"), "no key".to_string());
        assert!(matches!(err, SpeechError::NotConfigured(_)));
    }

    #[test]
    fn test_other_failures_keep_status_code() {
        let err = classify_failure(502, None, "bad gateway".to_string());
        match err {
            SpeechError::Synthesis {
                status_code: Some(502),
                ..
            } => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = crate::config::SpeechConfig::default();
        assert!(matches!(
            HttpSynthesizer::from_config(&config),
            Err(SpeechError::NotConfigured(_))
        ));
    }
}
