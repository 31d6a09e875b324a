//! Clean command - delete plaintexts.

use crate::core::config::Settings;
use crate::core::workflow::{self, Summary};
use crate::error::Result;

/// Delete the plaintext of every tracked file.
pub fn execute(settings: Settings, force: bool) -> Result<()> {
    let workspace = super::open(settings)?;
    let manifest = workspace.store().load_manifest()?;
    let paths = workspace.select(&manifest, &[])?;

    let mut summary = Summary::new();
    let result = workflow::clean(workspace.repo(), &manifest, &paths, force, &mut summary);
    super::report(&summary, "cleaned", "already clean");
    result
}
