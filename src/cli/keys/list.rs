//! Keys list command.

use crate::cli::output;
use crate::core::config::Settings;
use crate::error::Result;

/// Number of trailing key characters shown.
const KEY_TAIL: usize = 12;

/// List authorized keys.
pub fn execute(settings: Settings, json: bool) -> Result<()> {
    let workspace = crate::cli::open(settings)?;
    let identity = workspace.identity(crate::cli::prompt())?;
    let registry = workspace.store().load_registry(&identity)?;
    let entries = registry.entries();

    if json {
        let keys: Vec<_> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id,
                    "kind": e.kind,
                    "access": e.access,
                    "key": e.material,
                })
            })
            .collect();
        let result = serde_json::json!({
            "keys": keys,
            "count": entries.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if entries.is_empty() {
        output::dimmed("no keys");
    } else {
        output::blank();
        output::header(&output::plural(entries.len(), "key"));
        output::rule();
        let width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0);
        for entry in entries {
            let tail_start = entry.material.len().saturating_sub(KEY_TAIL);
            println!(
                "  {:width$}  [{}]  {:10}  (...{})",
                entry.id,
                entry.kind,
                entry.access.to_string(),
                &entry.material[tail_start..],
                width = width
            );
        }
    }

    Ok(())
}
