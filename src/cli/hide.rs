//! Hide command - encrypt tracked files.

use std::path::PathBuf;

use crate::core::config::Settings;
use crate::core::workflow::{self, HideOptions, Summary};
use crate::error::Result;

/// Encrypt `files`, or every tracked file, to all authorized keys.
pub fn execute(settings: Settings, files: &[PathBuf], clean: bool, force: bool) -> Result<()> {
    let workspace = super::open(settings)?;
    let store = workspace.store();
    let mut manifest = store.load_manifest()?;
    let paths = workspace.select(&manifest, files)?;

    let identity = workspace.identity(super::prompt())?;
    let registry = store.load_registry(&identity)?;
    let recipients = registry.reveal_recipients()?;

    let mut summary = Summary::new();
    let result = workflow::hide(
        workspace.repo(),
        store,
        &mut manifest,
        &paths,
        &recipients,
        HideOptions { clean, force },
        &mut summary,
    );
    super::report(&summary, "hidden", "already in sync");
    result
}
