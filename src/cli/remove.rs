//! Remove command - stop tracking files.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::workflow::{self, Summary};
use crate::error::Result;

/// Untrack `files`, deleting their encrypted versions.
pub fn execute(settings: Settings, files: &[PathBuf]) -> Result<()> {
    let workspace = super::open(settings)?;
    let store = workspace.store();
    let mut manifest = store.load_manifest()?;
    let paths = workspace.relative_paths(files)?;

    let mut summary = Summary::new();
    for path in &paths {
        let removed = workflow::untrack(workspace.repo(), store, &mut manifest, path, &mut summary);
        match removed {
            Ok(true) => output::success(&format!("removed {}", output::path(path))),
            Ok(false) => output::warn(&format!("{} is not tracked", path)),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
