//! One exchange unit of a tutoring conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// A single user or assistant message.
///
/// `problem_ref` is only ever set on user turns: it records the problem URL
/// that was active when the learner asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub author: Author,
    pub text: String,
    pub problem_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>, problem_ref: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            problem_ref: Some(problem_ref.into()),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            text: text.into(),
            problem_ref: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}
