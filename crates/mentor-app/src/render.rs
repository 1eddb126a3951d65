//! Plain-text transcript rendering.

use mentor_ai::{Author, SessionStatus, TokenTracker, Turn};

pub fn turn(turn: &Turn) -> String {
    let time = turn.created_at.format("%H:%M");
    match turn.author {
        Author::User => {
            let mut out = String::new();
            if let Some(problem) = &turn.problem_ref {
                out.push_str(&format!("Problem: {problem}\n"));
            }
            out.push_str(&format!("[{time}] You: {}", turn.text));
            out
        }
        Author::Assistant => format!("[{time}] Mentor: {}", turn.text),
    }
}

pub fn status(status: SessionStatus, turns: usize, problem: Option<&str>, usage: &TokenTracker) -> String {
    let state = match status {
        SessionStatus::Idle => "idle",
        SessionStatus::AwaitingReply => "waiting for the mentor",
    };
    format!(
        "Status: {state}\nProblem: {}\nTurns: {turns}\nTokens: {} in / {} out over {} calls",
        problem.unwrap_or("(none)"),
        usage.total().input_tokens,
        usage.total().output_tokens,
        usage.call_count(),
    )
}
