//! `SpeechSynthesizerPort` implementation that shells out to a TTS program.
//!
//! `espeak-ng`/`espeak` on Linux, `say` on macOS. Each utterance is one child
//! process; cancelling kills it.

use std::path::Path;
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};

use parlance_core::{SpeechSynthesizerPort, SynthesisError, SynthesisEvent};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

use crate::error::AudioError;

/// Speaks text through an external program.
pub struct CommandSynthesizer {
    program: String,
    rate: Option<u32>,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            rate: None,
            cancel: Mutex::new(None),
        }
    }

    /// Speaking rate in words per minute.
    #[must_use]
    pub const fn with_rate(mut self, rate: Option<u32>) -> Self {
        self.rate = rate;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn replace_cancel(&self, next: Option<oneshot::Sender<()>>) -> Option<oneshot::Sender<()>> {
        let mut slot = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }
}

/// Rate flag for the programs we know about.
pub(crate) fn rate_args(program: &str, rate: Option<u32>) -> Vec<String> {
    let Some(rate) = rate else {
        return Vec::new();
    };
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);
    match name {
        "espeak" | "espeak-ng" => vec!["-s".to_string(), rate.to_string()],
        "say" => vec!["-r".to_string(), rate.to_string()],
        _ => Vec::new(),
    }
}

impl SpeechSynthesizerPort for CommandSynthesizer {
    fn speak(&self, text: &str) -> mpsc::UnboundedReceiver<SynthesisEvent> {
        let (events, rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        if let Some(previous) = self.replace_cancel(Some(cancel_tx)) {
            let _ = previous.send(());
        }

        let mut command = Command::new(&self.program);
        command
            .args(rate_args(&self.program, self.rate))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, chars = text.len(), "Speaking");
        tokio::spawn(run_utterance(command, self.program.clone(), events, cancel_rx));
        rx
    }

    fn cancel(&self) {
        if let Some(cancel) = self.replace_cancel(None) {
            let _ = cancel.send(());
        }
    }
}

async fn run_utterance(
    mut command: Command,
    program: String,
    events: mpsc::UnboundedSender<SynthesisEvent>,
    cancel: oneshot::Receiver<()>,
) {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            tracing::warn!(%program, error = %source, "Speech program failed to start");
            let error = AudioError::SpeechProgram { program, source }.into();
            let _ = events.send(SynthesisEvent::Failed { error });
            return;
        }
    };
    let _ = events.send(SynthesisEvent::Started);

    // A dropped sender counts as a cancel.
    let terminal = tokio::select! {
        status = child.wait() => match status {
            Ok(status) if status.success() => SynthesisEvent::Finished,
            Ok(status) => SynthesisEvent::Failed {
                error: SynthesisError::Failed(format!("{program} exited with {status}")),
            },
            Err(e) => SynthesisEvent::Failed {
                error: SynthesisError::Failed(e.to_string()),
            },
        },
        _ = cancel => {
            let _ = child.kill().await;
            tracing::debug!(%program, "Utterance cancelled");
            SynthesisEvent::Finished
        }
    };
    let _ = events.send(terminal);
}
