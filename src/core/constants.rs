//! Constants used throughout git-private.
//!
//! Centralizes magic strings and file names.

/// Name used in user-facing messages and hints.
pub const TOOL_NAME: &str = "git-private";

/// Suffix of the encrypted sibling of a tracked file.
pub const PRIVATE_EXTENSION: &str = ".private";

/// Default state directory, relative to the repository root.
pub const STATE_DIR: &str = ".gitprivate";

/// Encrypted key list inside the state directory.
pub const KEYS_FILE: &str = "keys.dat";

/// Tracked file manifest inside the state directory.
pub const PATHS_FILE: &str = "paths.json";

/// Version written into both persisted documents.
pub const FORMAT_VERSION: u32 = 1;

/// Ignore file at the repository root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Environment variable relocating the state directory.
pub const ENV_STATE_DIR: &str = "GIT_PRIVATE_DIR";

/// Environment variable holding an inline private key.
pub const ENV_KEY: &str = "GIT_PRIVATE_KEY";

/// Environment variable naming a private key file.
pub const ENV_KEY_FILE: &str = "GIT_PRIVATE_KEYFILE";

/// Environment variable holding a tracing filter directive.
pub const ENV_LOG: &str = "GIT_PRIVATE_LOG";

/// Prefix of a clear-text age secret key.
pub const SECRET_KEY_PREFIX: &str = "AGE-SECRET-KEY-";

/// Human-readable prefix of a passphrase-protected key.
pub const PROTECTED_KEY_HRP: &str = "GIT-PRIVATE-PROTECTED-KEY-";
