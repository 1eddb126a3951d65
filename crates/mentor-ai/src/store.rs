//! Ordered, append-only transcript of the active session.

use crate::turn::{Author, Turn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid turn: {0}")]
    InvalidTurn(String),
}

/// The session's turns in conversation order.
///
/// Turns are only ever appended or cleared wholesale. There is no size cap
/// here; any windowing happens in the prompt builder.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    turns: Vec<Turn>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the transcript.
    ///
    /// A timestamp earlier than the previous turn's is raised to it so the
    /// sequence stays ordered by `created_at` even if the wall clock steps back.
    /// Returns the turn as stored.
    pub fn append(&mut self, mut turn: Turn) -> Result<&Turn, StoreError> {
        if turn.text.trim().is_empty() {
            return Err(StoreError::InvalidTurn("turn text is empty".into()));
        }
        if turn.author == Author::Assistant && turn.problem_ref.is_some() {
            return Err(StoreError::InvalidTurn(
                "assistant turns do not carry a problem reference".into(),
            ));
        }
        if let Some(last) = self.turns.last() {
            if turn.created_at < last.created_at {
                turn.created_at = last.created_at;
            }
        }
        let index = self.turns.len();
        self.turns.push(turn);
        Ok(&self.turns[index])
    }

    /// Owned copy of the transcript.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
