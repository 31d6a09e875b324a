//! Keys remove command.

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::reencrypt::{self, KeyChange};
use crate::core::workflow::Summary;
use crate::error::{KeyError, Result};

/// Revoke a key, then re-encrypt every tracked file without it.
pub fn execute(settings: Settings, id: Option<String>) -> Result<()> {
    let id = id.ok_or(KeyError::MissingId("specify the id of the key to remove"))?;

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
        KeyChange::Remove { id },
        &mut summary,
    );
    super::report(&summary);
    let entry = result?;

    info!(id = %entry.id, "key removed");
    output::success(&format!("removed key {}", output::path(&entry.id)));
    Ok(())
}
