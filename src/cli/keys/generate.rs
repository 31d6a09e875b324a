//! Keys generate command.

use std::path::Path;

use crate::cli::output;
use crate::core::protect;
use crate::error::Result;

/// Generate a private key, protected by a passphrase unless it is empty.
pub fn execute(key_file: &Path, pub_file: Option<&Path>) -> Result<()> {
    let generated = protect::generate(key_file, pub_file, crate::cli::prompt().as_ref())?;

    output::success(&format!(
        "generated {}",
        output::path(&key_file.display().to_string())
    ));
    output::kv("public key", &generated.public_key);
    if !generated.protected {
        output::warn("the private key is stored without a passphrase");
    }
    if let Some(path) = pub_file {
        output::kv("public key file", path.display());
    }
    Ok(())
}
