//! Client settings types and validation.
//!
//! Pure domain types with no infrastructure dependencies. The CLI fills
//! these from flags and environment variables and validates them before
//! wiring adapters.

use serde::{Deserialize, Serialize};

/// Default base URL of the evaluation service.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default text-to-speech program for this platform.
#[cfg(target_os = "macos")]
pub const DEFAULT_TTS_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_TTS_COMMAND: &str = "espeak-ng";

/// Client settings structure.
///
/// All fields are optional to support partial configuration and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the evaluation service.
    pub api_base_url: Option<String>,

    /// HTTP request timeout in seconds (1-300).
    pub request_timeout_secs: Option<u64>,

    /// Id of the logged-in user; evaluation is refused without it.
    pub user_id: Option<String>,

    /// Program used to speak reference text.
    pub tts_command: Option<String>,

    /// Speaking rate passed to the TTS program (words per minute).
    pub tts_rate: Option<u32>,
}

impl ClientSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_id: None,
            tts_command: Some(DEFAULT_TTS_COMMAND.to_string()),
            tts_rate: None,
        }
    }

    /// Get the effective API base URL (with default fallback).
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Get the effective request timeout (with default fallback).
    #[must_use]
    pub const fn effective_timeout_secs(&self) -> u64 {
        match self.request_timeout_secs {
            Some(secs) => secs,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Get the effective TTS program (with default fallback).
    pub fn effective_tts_command(&self) -> &str {
        self.tts_command.as_deref().unwrap_or(DEFAULT_TTS_COMMAND)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("API base URL cannot be empty")]
    EmptyApiUrl,

    #[error("API base URL must start with http:// or https://, got {0}")]
    InvalidApiUrl(String),

    #[error("Request timeout must be between 1 and 300 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("TTS command cannot be empty")]
    EmptyTtsCommand,

    #[error("TTS rate must be between 50 and 500 words per minute, got {0}")]
    InvalidTtsRate(u32),
}

/// Validate settings values.
pub fn validate_settings(settings: &ClientSettings) -> Result<(), SettingsError> {
    // Validate API URL
    if let Some(ref url) = settings.api_base_url {
        let url = url.trim();
        if url.is_empty() {
            return Err(SettingsError::EmptyApiUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::InvalidApiUrl(url.to_string()));
        }
    }

    // Validate timeout
    if let Some(secs) = settings.request_timeout_secs {
        if !(1..=300).contains(&secs) {
            return Err(SettingsError::InvalidTimeout(secs));
        }
    }

    // Validate TTS command
    if settings
        .tts_command
        .as_ref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(SettingsError::EmptyTtsCommand);
    }

    if let Some(rate) = settings.tts_rate {
        if !(50..=500).contains(&rate) {
            return Err(SettingsError::InvalidTtsRate(rate));
        }
    }

    Ok(())
}
