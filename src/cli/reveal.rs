//! Reveal command - decrypt tracked files.

use std::path::PathBuf;

use crate::core::config::Settings;
use crate::core::workflow::{self, RevealOptions, Summary};
use crate::error::Result;

/// Decrypt `files`, or every tracked file.
pub fn execute(settings: Settings, files: &[PathBuf], force: bool, clean: bool) -> Result<()> {
    let workspace = super::open(settings)?;
    let manifest = workspace.store().load_manifest()?;
    let paths = workspace.select(&manifest, files)?;
    let identity = workspace.identity(super::prompt())?;

    let mut summary = Summary::new();
    let result = workflow::reveal(
        workspace.repo(),
        &manifest,
        &paths,
        &identity,
        RevealOptions {
            overwrite: force,
            clean,
        },
        &mut summary,
    );
    super::report(&summary, "revealed", "already in sync");
    result
}
