use std::path::PathBuf;

use clap::Parser;

/// Mentor: a terminal tutor for data-structures-and-algorithms problems.
#[derive(Parser, Debug)]
#[command(name = "mentor", version, about)]
pub struct Args {
    /// Problem URL to start with (can be changed later with /problem).
    #[arg(short = 'p', long)]
    pub problem: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `mentor=debug`.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
