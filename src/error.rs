//! Error types.
//!
//! Errors are grouped by concern and wrapped by the top-level [`Error`].
//! Callers branch on [`Error::kind`]; humans read [`Error::chain`].

use std::fmt;

use thiserror::Error;

/// Repository and workspace configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: run `git-private init` first")]
    NotInitialized,

    #[error("already initialized: {0} exists")]
    AlreadyInitialized(String),

    #[error("not inside a git repository")]
    NotInRepository,

    #[error("path is outside the repository: {0}")]
    OutsideRepository(String),

    #[error("state directory {0} is git-ignored")]
    StateDirIgnored(String),

    #[error("no private key provided: use --keyfile, GIT_PRIVATE_KEY or GIT_PRIVATE_KEYFILE")]
    NoIdentity,

    #[error("git: {0}")]
    Git(String),
}

/// Key registry and identity errors.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("key with id '{0}' already exists")]
    DuplicateId(String),

    #[error("key '{0}' not found")]
    NotFound(String),

    #[error("invalid key format: {0}")]
    InvalidKey(String),

    #[error("multiple keys found, add one key at a time")]
    MultipleKeys,

    #[error("no key id given: {0}")]
    MissingId(&'static str),

    #[error("no read-write keys in the key list, cannot encrypt")]
    NoRecipients,

    #[error("invalid private key: {0}")]
    InvalidIdentity(String),

    #[error("will not overwrite existing key file {0}")]
    KeyFileExists(String),

    #[error("passphrases do not match")]
    PassphraseMismatch,
}

/// Encryption backend errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Deliberately carries no detail: a wrong key and a corrupt file read the same.
    #[error("decryption failed: wrong key or corrupt data")]
    DecryptionFailed,

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),
}

/// Per-file synchronization errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("file '{0}' is not tracked")]
    NotTracked(String),

    #[error("no such file: {0}")]
    NoSuchFile(String),

    #[error("cannot encrypt the encrypted version of a file: {0}")]
    AlreadyPrivate(String),

    #[error("git does not ignore '{0}' after tracking it, check .gitignore")]
    NotIgnored(String),

    #[error("file '{0}' has never been hidden")]
    NotHidden(String),

    #[error("private version of '{0}' is missing")]
    PrivateMissing(String),

    #[error("'{0}' has local modifications")]
    Modified(String),

    #[error("plaintext of '{0}' is missing, reveal it first")]
    PlaintextMissing(String),

    #[error("re-encryption blocked, files not in sync: {}", .files.join(", "))]
    ReEncryptionBlocked { files: Vec<String> },
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cancelled")]
    Cancelled,

    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification used for exit handling and hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotInitialized,
    NoRecipients,
    DuplicateId,
    NotFound,
    DecryptionFailed,
    SyncConflict,
    ReEncryptionBlocked,
    InvalidInput,
    Cancelled,
    Io,
}

impl Error {
    /// Classify this error, looking through context layers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Context { source, .. } => source.kind(),
            Error::Config(ConfigError::NotInitialized) => ErrorKind::NotInitialized,
            Error::Config(_) => ErrorKind::InvalidInput,
            Error::Key(KeyError::NoRecipients) => ErrorKind::NoRecipients,
            Error::Key(KeyError::DuplicateId(_)) => ErrorKind::DuplicateId,
            Error::Key(KeyError::NotFound(_)) => ErrorKind::NotFound,
            Error::Key(_) => ErrorKind::InvalidInput,
            Error::Cipher(CipherError::DecryptionFailed) => ErrorKind::DecryptionFailed,
            Error::Cipher(_) => ErrorKind::Io,
            Error::Sync(SyncError::ReEncryptionBlocked { .. }) => ErrorKind::ReEncryptionBlocked,
            Error::Sync(
                SyncError::NotHidden(_)
                | SyncError::PrivateMissing(_)
                | SyncError::Modified(_)
                | SyncError::PlaintextMissing(_),
            ) => ErrorKind::SyncConflict,
            Error::Sync(SyncError::NotTracked(_) | SyncError::NoSuchFile(_)) => {
                ErrorKind::NotFound
            }
            Error::Sync(SyncError::AlreadyPrivate(_) | SyncError::NotIgnored(_)) => {
                ErrorKind::InvalidInput
            }
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Io,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// The innermost error, below every context layer.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Messages from the outermost context down to the root cause.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current: &dyn std::error::Error = self;
        while let Some(next) = current.source() {
            let message = next.to_string();
            if messages.last() != Some(&message) {
                messages.push(message);
            }
            current = next;
        }
        messages
    }

    fn with_context(self, context: String) -> Self {
        Error::Context {
            context,
            source: Box::new(self),
        }
    }
}

/// Attach human-readable context to a failing result.
pub trait Context<T> {
    /// Wrap the error with a fixed message.
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Wrap the error with a lazily built message.
    fn with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|e| e.into().with_context(context.to_string()))
    }

    fn with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().with_context(f().to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
