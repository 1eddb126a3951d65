//! Input line parsing.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a slash command goes to the mentor verbatim.
    Send(String),
    New,
    /// `/problem` with an empty argument shows the current problem.
    Problem(String),
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /problem <url>   set the problem you are working on
  /problem         show the current problem
  /new             start a new chat (clears the conversation)
  /status          show session status and token usage
  /help            show this help
  /quit            exit
Anything else is sent to the mentor.";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Some(Command::Send(line.trim_end().to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    Some(match name {
        "new" => Command::New,
        "problem" => Command::Problem(arg.to_string()),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    })
}
