//! Command context: repository, state store and settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::core::config::Settings;
use crate::core::identity::Identity;
use crate::core::manifest::FileManifest;
use crate::core::prompt::PassphrasePrompt;
use crate::core::repo::Repo;
use crate::core::store::Store;
use crate::core::types::RepoPath;
use crate::error::{ConfigError, Result};

/// Everything a command needs to act on one repository.
#[derive(Debug)]
pub struct Workspace {
    repo: Repo,
    store: Store,
    settings: Settings,
    cwd: PathBuf,
}

impl Workspace {
    /// Discover the repository containing `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StateDirIgnored` if git ignores the state
    /// directory, since its documents would then never be committed.
    pub fn open(settings: Settings, cwd: &Path) -> Result<Self> {
        let repo = Repo::discover(cwd)?;
        let workspace = Self::build(repo, settings, cwd);

        let dir = workspace.store.dir();
        if dir.exists() && repo_contains(&workspace.repo, dir) && workspace.repo.is_ignored(dir)? {
            return Err(ConfigError::StateDirIgnored(dir.display().to_string()).into());
        }
        Ok(workspace)
    }

    /// Use `root` directly, without asking git.
    pub fn at(root: &Path, settings: Settings) -> Result<Self> {
        let repo = Repo::at(root)?;
        let cwd = repo.root().to_path_buf();
        Ok(Self::build(repo, settings, &cwd))
    }

    fn build(repo: Repo, settings: Settings, cwd: &Path) -> Self {
        let store = Store::new(settings.state_dir(repo.root()));
        debug!(root = %repo.root().display(), state = %store.dir().display(), "opened workspace");
        Self {
            repo,
            store,
            settings,
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Repository-relative forms of user-supplied paths.
    pub fn relative_paths(&self, paths: &[PathBuf]) -> Result<Vec<RepoPath>> {
        paths
            .iter()
            .map(|p| self.repo.relative(&self.cwd, p))
            .collect()
    }

    /// Resolve `paths`, or every tracked path when empty.
    pub fn select(&self, manifest: &FileManifest, paths: &[PathBuf]) -> Result<Vec<RepoPath>> {
        if paths.is_empty() {
            Ok(manifest.paths().map(str::to_string).collect())
        } else {
            self.relative_paths(paths)
        }
    }

    /// Load the private key named by the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoIdentity` when no source is configured.
    pub fn identity(&self, prompt: Arc<dyn PassphrasePrompt>) -> Result<Identity> {
        let source = self
            .settings
            .identity_source()
            .ok_or(ConfigError::NoIdentity)?;
        Identity::load(&source, prompt)
    }
}

fn repo_contains(repo: &Repo, path: &Path) -> bool {
    std::fs::canonicalize(path)
        .map(|p| p.starts_with(repo.root()))
        .unwrap_or(false)
}
