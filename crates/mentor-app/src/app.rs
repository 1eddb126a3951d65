//! Terminal front end over a `SessionController`.
//!
//! The app never touches the transcript directly: it dispatches commands to
//! the controller and prints what the controller reports back.

use std::io::{self, Write};

use mentor_ai::{PromptBuilder, SessionController, SessionStatus, SubmitError, TurnOutcome};
use tokio::sync::mpsc;
use tracing::debug;

use crate::command::{Command, HELP};
use crate::render;

/// Messages from background completion tasks back to the input loop.
#[derive(Debug)]
pub enum AppEvent {
    Settled(TurnOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<W: Write> {
    session: SessionController,
    problem: Option<String>,
    events: mpsc::UnboundedSender<AppEvent>,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(
        session: SessionController,
        events: mpsc::UnboundedSender<AppEvent>,
        out: W,
    ) -> Self {
        Self {
            session,
            problem: None,
            events,
            out,
        }
    }

    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    pub fn greet(&mut self) -> io::Result<()> {
        writeln!(self.out, "DSA Mentor. Type /help for commands.")?;
        match &self.problem {
            Some(problem) => writeln!(self.out, "Problem: {problem}")?,
            None => writeln!(self.out, "Set a problem first with /problem <url>.")?,
        }
        self.out.flush()
    }

    pub async fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Send(text) => self.send(text).await?,
            Command::New => {
                self.session.reset().await;
                writeln!(self.out, "Started a new chat.")?;
            }
            Command::Problem(url) if url.is_empty() => {
                let current = self.problem.as_deref().unwrap_or("(none)");
                writeln!(self.out, "Problem: {current}")?;
            }
            Command::Problem(url) => self.set_problem(&url)?,
            Command::Status => {
                let text = render::status(
                    self.session.status(),
                    self.session.snapshot().await.len(),
                    self.problem.as_deref(),
                    &self.session.usage().await,
                );
                writeln!(self.out, "{text}")?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(name) => {
                writeln!(self.out, "Unknown command /{name}. Type /help for commands.")?;
            }
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    /// Set the active problem. Invalid URLs are reported and ignored.
    pub fn set_problem(&mut self, url: &str) -> io::Result<()> {
        match PromptBuilder::validate_problem_ref(url) {
            Ok(valid) => {
                self.problem = Some(valid.to_string());
                writeln!(self.out, "Problem: {valid}")
            }
            Err(e) => writeln!(self.out, "Not a usable problem URL: {e}"),
        }
    }

    async fn send(&mut self, text: String) -> io::Result<()> {
        let problem = self.problem.clone().unwrap_or_default();
        let pending = match self.session.begin_turn(text, &problem).await {
            Ok(pending) => pending,
            Err(SubmitError::Busy) => {
                return writeln!(self.out, "Still waiting for the mentor's reply.");
            }
            Err(SubmitError::MissingContext(_)) => {
                return writeln!(self.out, "Set a problem first with /problem <url>.");
            }
            Err(e @ SubmitError::InvalidInput(_)) => return writeln!(self.out, "{e}"),
        };

        if let Some(turn) = self.session.snapshot().await.last() {
            writeln!(self.out, "{}", render::turn(turn))?;
        }

        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = pending.complete().await;
            if events.send(AppEvent::Settled(outcome)).is_err() {
                debug!("Input loop gone; dropping turn outcome");
            }
        });
        Ok(())
    }

    pub fn on_event(&mut self, event: AppEvent) -> io::Result<()> {
        match event {
            AppEvent::Settled(outcome) => match outcome.appended() {
                Some(turn) => writeln!(self.out, "{}", render::turn(turn))?,
                None => debug!("Reply arrived after /new; not shown"),
            },
        }
        self.out.flush()
    }

    pub fn on_status(&mut self, status: SessionStatus) -> io::Result<()> {
        if status == SessionStatus::AwaitingReply {
            writeln!(self.out, "Mentor is thinking...")?;
            self.out.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }
}
