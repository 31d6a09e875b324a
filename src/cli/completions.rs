//! Completions command - print a completion script.
//!
//! The script covers the file commands (`add`, `hide`, `reveal`, `clean`,
//! `remove`, `status`) and the `keys` subcommands with their `--keyfile`
//! and `--id` flags.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell as Target;

use crate::cli::{Cli, Shell};
use crate::core::constants::TOOL_NAME;
use crate::error::Result;

impl From<Shell> for Target {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Target::Bash,
            Shell::Zsh => Target::Zsh,
            Shell::Fish => Target::Fish,
            Shell::PowerShell => Target::PowerShell,
        }
    }
}

/// Write the script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    render(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cli = Cli::command();
    let mut script = Vec::new();
    clap_complete::generate(Target::from(shell), &mut cli, TOOL_NAME, &mut script);
    out.write_all(&script)?;
    Ok(())
}
