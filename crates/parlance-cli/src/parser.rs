//! Main CLI parser and top-level argument handling.
//!
//! Global options double as the client settings: each has an environment
//! fallback so a `.env` file can configure the client.

use clap::Parser;
use parlance_core::ClientSettings;

use crate::commands::Commands;

/// Command-line interface for pronunciation practice.
#[derive(Parser)]
#[command(name = "parlance")]
#[command(about = "Practice pronunciation against a scoring service")]
#[command(version)]
pub struct Cli {
    /// Base URL of the evaluation service
    #[arg(long = "api-url", env = "PARLANCE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Id of the logged-in user
    #[arg(long = "user-id", env = "PARLANCE_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Program used to speak reference text
    #[arg(long = "tts-command", env = "PARLANCE_TTS_COMMAND", global = true)]
    pub tts_command: Option<String>,

    /// Speaking rate for reference text, in words per minute
    #[arg(long = "tts-rate", env = "PARLANCE_TTS_RATE", global = true)]
    pub tts_rate: Option<u32>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", env = "PARLANCE_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Client settings described by the global options.
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            api_base_url: self.api_url.clone(),
            request_timeout_secs: self.timeout_secs,
            user_id: self.user_id.clone(),
            tts_command: self.tts_command.clone(),
            tts_rate: self.tts_rate,
        }
    }
}
