//! Interactive practice loop.
//!
//! Reads single-letter commands from stdin and drives a [`PracticeSession`].
//! Terminal input, session completions and session events are multiplexed
//! with `select!`; the session itself never blocks.

use anyhow::Result;
use parlance_core::{PlaybackState, ReferenceState, SessionState};
use parlance_session::{PracticeFlow, PracticeSession, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::bootstrap::CliContext;
use crate::presentation::format_event;

/// A parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Record,
    Stop,
    Listen,
    Play,
    Evaluate,
    Reset,
    /// Replace the free-practice text.
    Text(String),
    Help,
    Quit,
}

impl Key {
    /// Parse one input line. `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(text) = line.strip_prefix("t ") {
            return Some(Self::Text(text.trim().to_string()));
        }
        match line.to_ascii_lowercase().as_str() {
            "r" => Some(Self::Record),
            "s" => Some(Self::Stop),
            "l" => Some(Self::Listen),
            "p" => Some(Self::Play),
            "e" => Some(Self::Evaluate),
            "x" => Some(Self::Reset),
            "h" | "?" => Some(Self::Help),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "\
  r  record        s  stop
  l  listen        p  play back
  e  evaluate      x  reset
  t <text>         change the phrase (free practice)
  q  quit";

/// Apply one key to the session.
pub fn dispatch(session: &mut PracticeSession, key: Key) -> Result<(), SessionError> {
    match key {
        Key::Record => session.start_recording(),
        Key::Stop => {
            // Stop whatever is running.
            if session.state() == SessionState::Recording {
                session.stop_recording();
            } else if session.reference_state() == ReferenceState::Speaking {
                session.stop_reference();
            } else if session.playback_state() == PlaybackState::Playing {
                session.stop_playback();
            }
            Ok(())
        }
        Key::Listen => session.play_reference(),
        Key::Play => session.play_recording(),
        Key::Evaluate => session.evaluate().map(|token| {
            tracing::debug!(token, "Evaluation submitted");
        }),
        Key::Reset => {
            session.reset();
            Ok(())
        }
        Key::Text(text) => session.set_target_text(text),
        Key::Help | Key::Quit => Ok(()),
    }
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run an interactive session until the user quits or stdin closes.
pub async fn run(ctx: &CliContext, flow: PracticeFlow) -> Result<()> {
    let (mut session, mut events) =
        PracticeSession::new(flow, ctx.session_ports(), ctx.user_id.clone());

    if ctx.user_id.is_none() {
        println!("Not logged in: set --user-id or PARLANCE_USER_ID to evaluate recordings.");
    }
    println!("{HELP}");

    let mut input = spawn_stdin_reader();
    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else { break };
                match Key::parse(&line) {
                    Some(Key::Quit) => break,
                    Some(Key::Help) => println!("{HELP}"),
                    Some(key) => {
                        if let Err(e) = dispatch(&mut session, key) {
                            println!("! {e}");
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("Unknown command '{}'. Type h for help.", line.trim()),
                }
            }
            _ = session.pump() => {}
            Some(event) = events.recv() => {
                tracing::debug!(?event, "Session event");
                if let Some(text) = format_event(&event) {
                    println!("{text}");
                }
            }
        }
    }

    session.reset();
    if let Some(progress) = ctx.progress.current() {
        println!("Total: {} points, level {}", progress.points, progress.level);
    }
    Ok(())
}
