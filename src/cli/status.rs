//! Status command - show the state of tracked files.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::status::{file_status, FileStatus};
use crate::error::Result;

/// Print every tracked file with its state.
pub fn execute(settings: Settings, json: bool) -> Result<()> {
    let workspace = super::open(settings)?;
    let manifest = workspace.store().load_manifest()?;

    let mut rows = Vec::with_capacity(manifest.len());
    for entry in &manifest.entries {
        rows.push((entry.path.as_str(), file_status(workspace.repo(), entry)?));
    }

    if json {
        let files: Vec<_> = rows
            .iter()
            .map(|(path, status)| {
                serde_json::json!({
                    "path": path,
                    "status": status,
                })
            })
            .collect();
        let result = serde_json::json!({
            "files": files,
            "count": rows.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if rows.is_empty() {
        output::dimmed("no tracked files");
        output::hint(&format!("track one with {}", output::cmd("git-private add <FILE>")));
        return Ok(());
    }

    let width = rows.iter().map(|(p, _)| p.len()).max().unwrap_or(0);
    for (path, status) in &rows {
        let label = format!("[{}]", status);
        let label = match status {
            FileStatus::HiddenInSync => output::green(&label),
            FileStatus::HiddenModified | FileStatus::NotHidden => output::yellow(&label),
            FileStatus::HiddenPrivateMissing => output::red(&label),
            FileStatus::HiddenNotRevealed => output::dim(&label),
        };
        println!("{:width$}    {}", path, label, width = width);
    }

    let in_sync = rows
        .iter()
        .filter(|(_, s)| *s == FileStatus::HiddenInSync)
        .count();
    output::blank();
    output::dimmed(&format!(
        "{} tracked, {} in sync",
        output::plural(rows.len(), "file"),
        in_sync
    ));
    Ok(())
}
