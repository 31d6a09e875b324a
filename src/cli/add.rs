//! Add command - start tracking files.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::workflow;
use crate::error::Result;

/// Track `files` and git-ignore their plaintexts.
pub fn execute(settings: Settings, files: &[PathBuf]) -> Result<()> {
    let workspace = super::open(settings)?;
    let store = workspace.store();
    let mut manifest = store.load_manifest()?;

    let paths = workspace.relative_paths(files)?;
    let added = workflow::track(workspace.repo(), store, &mut manifest, &paths)?;
    workflow::verify_ignored(workspace.repo(), store, &mut manifest, &added)?;

    for path in &paths {
        if added.contains(path) {
            output::success(&format!("tracking {}", output::path(path)));
        } else {
            output::dimmed(&format!("  {} already tracked", path));
        }
    }
    if !added.is_empty() {
        output::hint(&format!("encrypt with {}", output::cmd("git-private hide")));
    }
    Ok(())
}
