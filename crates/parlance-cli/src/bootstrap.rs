//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where adapters are wired together:
//! - HTTP client for evaluation and the challenge catalog (via parlance-http)
//! - Microphone, player and speech synthesizer (via parlance-audio)
//! - Progress ledger (via parlance-core)
//!
//! Handlers receive the composed [`CliContext`] and build sessions from it.

use std::sync::Arc;

use parlance_audio::{AudioThreadHandle, CommandSynthesizer, CpalMicrophone, RodioPlayer};
use parlance_core::{ChallengeCatalogPort, ClientSettings, ProgressLedger, UserId, validate_settings};
use parlance_http::{ApiClientConfig, DefaultApiClient};
use parlance_session::SessionPorts;

use crate::error::CliError;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Challenge catalog (the same client as the evaluator).
    pub catalog: Arc<dyn ChallengeCatalogPort>,
    /// Ports handed to every practice session.
    pub ports: SessionPorts,
    /// Owner of the user's points and level.
    pub progress: Arc<ProgressLedger>,
    /// Logged-in user, if any.
    pub user_id: Option<UserId>,
}

impl CliContext {
    pub fn catalog(&self) -> &Arc<dyn ChallengeCatalogPort> {
        &self.catalog
    }

    /// A fresh copy of the session ports.
    pub fn session_ports(&self) -> SessionPorts {
        self.ports.clone()
    }
}

/// Bootstrap the CLI application.
///
/// Validates `settings`, then builds every adapter. No device is opened here;
/// the audio thread opens hardware on first use.
pub fn bootstrap(settings: &ClientSettings) -> Result<CliContext, CliError> {
    validate_settings(settings)?;

    // 1. HTTP client, shared by evaluation and the catalog
    let config = ApiClientConfig::from_settings(settings);
    let client =
        Arc::new(DefaultApiClient::new(&config).map_err(|e| CliError::Config(e.to_string()))?);
    tracing::debug!(base_url = %client.base_url(), "Evaluation service configured");

    // 2. Audio adapters sharing one audio thread
    let audio =
        Arc::new(AudioThreadHandle::spawn().map_err(|e| CliError::Audio(e.to_string()))?);
    let synthesizer = CommandSynthesizer::new(settings.effective_tts_command())
        .with_rate(settings.tts_rate);
    tracing::debug!(program = synthesizer.program(), "Speech synthesizer configured");

    // 3. Progress owner
    let progress = Arc::new(ProgressLedger::new());

    let ports = SessionPorts {
        microphone: Arc::new(CpalMicrophone::new(Arc::clone(&audio))),
        synthesizer: Arc::new(synthesizer),
        player: Arc::new(RodioPlayer::new(audio)),
        evaluator: client.clone(),
        progress: progress.clone(),
    };

    Ok(CliContext {
        catalog: client,
        ports,
        progress,
        user_id: settings.user_id.as_deref().and_then(UserId::new),
    })
}
