//! Command-line interface.

pub mod add;
pub mod clean;
pub mod completions;
pub mod hide;
pub mod init;
pub mod keys;
pub mod output;
pub mod remove;
pub mod reveal;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::core::config::Settings;
use crate::core::prompt::{PassphrasePrompt, TerminalPrompt};
use crate::core::workflow::{Action, Summary};
use crate::core::workspace::Workspace;
use crate::error::Result;

/// git-private - keep secret files encrypted inside a git repository.
#[derive(Parser)]
#[command(
    name = "git-private",
    about = "Keep secret files encrypted inside a git repository",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// State directory (default: .gitprivate at the repository root)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Set up git-private in the current repository
    Init,

    /// Start tracking files
    Add {
        /// Files to track
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Stop tracking files and delete their encrypted versions
    Remove {
        /// Files to untrack
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Encrypt tracked files
    Hide {
        /// Private key file (`-` for stdin)
        #[arg(long, value_name = "FILE")]
        keyfile: Option<PathBuf>,
        /// Delete plaintexts after encrypting
        #[arg(long)]
        clean: bool,
        /// Re-encrypt files that are already in sync
        #[arg(short, long)]
        force: bool,
        /// Files to hide (default: all tracked files)
        files: Vec<PathBuf>,
    },

    /// Decrypt tracked files
    Reveal {
        /// Private key file (`-` for stdin)
        #[arg(long, value_name = "FILE")]
        keyfile: Option<PathBuf>,
        /// Overwrite plaintexts modified since they were hidden
        #[arg(short, long)]
        force: bool,
        /// Delete encrypted versions after decrypting
        #[arg(long)]
        clean: bool,
        /// Files to reveal (default: all tracked files)
        files: Vec<PathBuf>,
    },

    /// Delete plaintexts of hidden files
    Clean {
        /// Also delete files that are modified, never hidden or have no encrypted version
        #[arg(short, long)]
        force: bool,
    },

    /// Show the state of tracked files
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage authorized keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Key subcommands.
#[derive(Subcommand)]
pub enum KeysAction {
    /// List authorized keys
    List {
        /// Private key file (`-` for stdin)
        #[arg(long, value_name = "FILE")]
        keyfile: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Authorize a public key and re-encrypt all files
    Add {
        /// Private key file (`-` for stdin)
        #[arg(long, value_name = "FILE")]
        keyfile: Option<PathBuf>,
        /// Key id (default: the SSH key comment)
        #[arg(long)]
        id: Option<String>,
        /// Read the public key from a file (`-` for stdin)
        #[arg(long, value_name = "FILE")]
        pubfile: Option<PathBuf>,
        /// Allow revealing only
        #[arg(long)]
        readonly: bool,
        /// Public key (`age1...` or `ssh-ed25519 AAAA...`)
        key: Option<String>,
    },

    /// Revoke a key and re-encrypt all files
    Remove {
        /// Private key file (`-` for stdin)
        #[arg(long, value_name = "FILE")]
        keyfile: Option<PathBuf>,
        /// Key id
        #[arg(long = "id", value_name = "ID")]
        id_flag: Option<String>,
        /// Key id
        id: Option<String>,
    },

    /// Generate a new private key
    Generate {
        /// Where to write the private key
        #[arg(long, value_name = "FILE")]
        keyfile: PathBuf,
        /// Where to write the public key
        #[arg(long, value_name = "FILE")]
        pubfile: Option<PathBuf>,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    let settings = Settings::from_env().with_state_dir(cli.state_dir);

    match cli.command {
        Init => init::execute(settings),
        Add { files } => add::execute(settings, &files),
        Remove { files } => remove::execute(settings, &files),
        Hide {
            keyfile,
            clean,
            force,
            files,
        } => hide::execute(settings.with_key_file(keyfile), &files, clean, force),
        Reveal {
            keyfile,
            force,
            clean,
            files,
        } => reveal::execute(settings.with_key_file(keyfile), &files, force, clean),
        Clean { force } => clean::execute(settings, force),
        Status { json } => status::execute(settings, json),
        Keys { action } => match action {
            KeysAction::List { keyfile, json } => {
                keys::list::execute(settings.with_key_file(keyfile), json)
            }
            KeysAction::Add {
                keyfile,
                id,
                pubfile,
                readonly,
                key,
            } => keys::add::execute(
                settings.with_key_file(keyfile),
                id,
                pubfile,
                readonly,
                key,
            ),
            KeysAction::Remove {
                keyfile,
                id_flag,
                id,
            } => keys::remove::execute(settings.with_key_file(keyfile), id_flag.or(id)),
            KeysAction::Generate { keyfile, pubfile } => {
                keys::generate::execute(&keyfile, pubfile.as_deref())
            }
        },
        Completions { shell } => completions::execute(shell),
    }
}

/// Open the repository containing the working directory.
fn open(settings: Settings) -> Result<Workspace> {
    let cwd = std::env::current_dir()?;
    Workspace::open(settings, &cwd)
}

fn prompt() -> Arc<dyn PassphrasePrompt> {
    Arc::new(TerminalPrompt)
}

/// Print one line per file and the totals. `idle` describes files that
/// needed no work.
///
/// Called whether or not the batch succeeded, so partial progress is shown.
fn report(summary: &Summary, verb: &str, idle: &str) {
    for record in &summary.records {
        match record.action {
            Action::InSync => output::dimmed(&format!("  {} {}", record.path, idle)),
            _ => output::success(&format!("{} {}", verb, output::path(&record.path))),
        }
    }

    let done = format!("{} {}", output::plural(summary.processed(), "file"), verb);
    match summary.in_sync() {
        0 => output::dimmed(&done),
        n => output::dimmed(&format!("{}, {} {}", done, n, idle)),
    }
}
