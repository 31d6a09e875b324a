//! git-private - keep secret files encrypted inside a git repository.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use git_private::cli::output;
use git_private::cli::{execute, Cli};
use git_private::core::constants::ENV_LOG;
use git_private::error::ErrorKind;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("git_private=debug")
        } else {
            EnvFilter::new("git_private=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        let chain = e.chain();
        if let Some((first, rest)) = chain.split_first() {
            output::error(first);
            for cause in rest {
                output::cause(cause);
            }
        }

        let hint = match e.kind() {
            ErrorKind::NotInitialized => Some("run: git-private init"),
            ErrorKind::NoRecipients => {
                Some("authorize a read-write key: git-private keys add --id <ID> <PUBLIC KEY>")
            }
            ErrorKind::DecryptionFailed => {
                Some("check that your private key is authorized (run with --verbose for details)")
            }
            ErrorKind::SyncConflict => Some("run: git-private status"),
            ErrorKind::ReEncryptionBlocked => {
                Some("hide or reveal the listed files until `git-private status` shows all in sync")
            }
            _ => None,
        };
        if let Some(hint) = hint {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
