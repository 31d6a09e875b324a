//! Git repository integration.
//!
//! Root discovery and ignore queries shell out to `git`; the `.gitignore`
//! file itself is edited directly, one pattern per line.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::core::constants;
use crate::core::types::RepoPath;
use crate::error::{ConfigError, Result};

/// A git working tree.
#[derive(Debug, Clone)]
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// Find the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Git` if git is not installed and
    /// `ConfigError::NotInRepository` outside a work tree.
    pub fn discover(dir: &Path) -> Result<Self> {
        let output = git(dir, &["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(ConfigError::NotInRepository.into());
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(root = %root, "found repository root");
        Self::at(Path::new(&root))
    }

    /// Use `root` as the repository root without asking git.
    pub fn at(root: &Path) -> Result<Self> {
        let root = fs::canonicalize(root)?;
        Ok(Self { root })
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a repository-relative path.
    pub fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Repository-relative form of `path`, resolved against `cwd`.
    ///
    /// The path does not need to exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutsideRepository` if the path resolves outside
    /// the work tree.
    pub fn relative(&self, cwd: &Path, path: &Path) -> Result<RepoPath> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        let resolved = resolve(&joined);

        let relative = resolved
            .strip_prefix(&self.root)
            .map_err(|_| ConfigError::OutsideRepository(path.display().to_string()))?;

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        if parts.is_empty() {
            return Err(ConfigError::OutsideRepository(path.display().to_string()).into());
        }
        Ok(parts.join("/"))
    }

    /// Whether the ignore rules match `path`, whether or not git already
    /// has it in the index.
    pub fn is_ignored(&self, path: &Path) -> Result<bool> {
        let target = path.to_string_lossy().to_string();
        let output = git(&self.root, &["check-ignore", "-q", "--no-index", &target])?;
        Ok(output.status.success())
    }

    fn gitignore(&self) -> PathBuf {
        self.root.join(constants::GITIGNORE_FILE)
    }

    /// Append `pattern` to `.gitignore` unless an identical line exists.
    ///
    /// Returns whether the file changed.
    pub fn add_ignore_pattern(&self, pattern: &str) -> Result<bool> {
        let path = self.gitignore();
        let existing = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            String::new()
        };

        if existing.lines().any(|l| same_line(l, pattern)) {
            trace!(pattern, "ignore pattern already present");
            return Ok(false);
        }

        let mut updated = existing;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(pattern);
        updated.push('\n');
        fs::write(&path, updated)?;

        debug!(pattern, "added ignore pattern");
        Ok(true)
    }

    /// Remove every `.gitignore` line equal to `pattern`.
    ///
    /// Returns whether the file changed.
    pub fn remove_ignore_pattern(&self, pattern: &str) -> Result<bool> {
        let path = self.gitignore();
        if !path.exists() {
            return Ok(false);
        }

        let existing = fs::read_to_string(&path)?;
        let kept: Vec<&str> = existing
            .lines()
            .filter(|l| !same_line(l, pattern))
            .collect();
        if kept.len() == existing.lines().count() {
            return Ok(false);
        }

        let mut updated = kept.join("\n");
        if !updated.is_empty() {
            updated.push('\n');
        }
        fs::write(&path, updated)?;

        debug!(pattern, "removed ignore pattern");
        Ok(true)
    }
}

/// Compare a `.gitignore` line with a pattern. Leading whitespace and
/// line endings never matter, but an escaped trailing space does.
fn same_line(line: &str, pattern: &str) -> bool {
    let line = line.trim_start().trim_end_matches('\r');
    line == pattern || (!line.ends_with("\\ ") && line.trim_end() == pattern)
}

/// Run git in `dir`, capturing its output.
fn git(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
    let binary = which::which("git").map_err(|e| ConfigError::Git(format!("git not found: {}", e)))?;
    trace!(?args, "running git");

    Command::new(binary)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ConfigError::Git(format!("failed to run git: {}", e)).into())
}

/// Canonicalize the longest existing ancestor of `path` and normalize the rest.
fn resolve(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut tail = Vec::new();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => break,
        }
    }

    let mut resolved = fs::canonicalize(&existing).unwrap_or(existing);
    for part in tail.into_iter().rev() {
        resolved.push(part);
    }
    normalize(&resolved)
}

/// Lexically remove `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
