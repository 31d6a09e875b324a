//! Init command - set up the state directory.

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::error::Result;

/// Create the state directory and make sure git will commit it.
pub fn execute(settings: Settings) -> Result<()> {
    let workspace = super::open(settings)?;
    let repo = workspace.repo();
    let store = workspace.store();

    store.init()?;

    repo.add_ignore_pattern("!*.private")?;
    if let Ok(relative) = store.dir().strip_prefix(repo.root()) {
        let pattern = format!("!{}/", relative.to_string_lossy().replace('\\', "/"));
        repo.add_ignore_pattern(&pattern)?;
    }

    info!(dir = %store.dir().display(), "initialized");
    output::success(&format!(
        "initialized {}",
        output::path(&store.dir().display().to_string())
    ));
    output::hint(&format!(
        "authorize a key with {}",
        output::cmd("git-private keys add --id <ID> <PUBLIC KEY>")
    ));
    Ok(())
}
