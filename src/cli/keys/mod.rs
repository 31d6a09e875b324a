//! Key management commands.

pub mod add;
pub mod generate;
pub mod list;
pub mod remove;

use crate::cli::output;
use crate::core::workflow::Summary;

/// Report the outcome of a key change.
fn report(summary: &Summary) {
    for record in &summary.records {
        output::dimmed(&format!("  re-encrypted {}", record.path));
    }
    if !summary.records.is_empty() {
        output::success(&format!(
            "re-encrypted {}",
            output::plural(summary.processed(), "file")
        ));
    }
}
