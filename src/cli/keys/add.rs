//! Keys add command.

use std::io::Read;
use std::path::PathBuf;

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::keys::{parse_key, Access};
use crate::core::reencrypt::{self, KeyChange};
use crate::core::workflow::Summary;
use crate::error::{Context, KeyError, Result};

/// Authorize a public key, then re-encrypt every tracked file.
pub fn execute(
    settings: Settings,
    id: Option<String>,
    pubfile: Option<PathBuf>,
    readonly: bool,
    key: Option<String>,
) -> Result<()> {
    let raw = match (pubfile, key) {
        (Some(path), _) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read public key from stdin")?;
            text
        }
        (Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read public key from {}", path.display()))?,
        (None, Some(key)) => key,
        (None, None) => {
            return Err(KeyError::InvalidKey("no public key given".to_string()).into())
        }
    };

    let material = parse_key(&raw)?;
    let id = match id.or_else(|| material.comment.clone()) {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => {
            return Err(KeyError::MissingId("use --id to name this key").into());
        }
    };
    let access = if readonly {
        Access::ReadOnly
    } else {
        Access::ReadWrite
    };

    let workspace = crate::cli::open(settings)?;
    let store = workspace.store();
    let mut manifest = store.load_manifest()?;
    let identity = workspace.identity(crate::cli::prompt())?;

    let mut summary = Summary::new();
    let result = reencrypt::apply(
        workspace.repo(),
        store,
        &mut manifest,
        &identity,
        KeyChange::Add {
            id,
            key: material,
            access,
        },
        &mut summary,
    );
    super::report(&summary);
    let entry = result?;

    info!(id = %entry.id, kind = %entry.kind, "key added");
    output::success(&format!(
        "added {} key {} ({})",
        entry.kind,
        output::path(&entry.id),
        entry.access
    ));
    Ok(())
}
