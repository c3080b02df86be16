//! Repository Source: turns the run configuration into the ordered sequence
//! of repositories to process.
//!
//! Single mode validates one local path; account mode lists the GitHub
//! user's repositories and ensures a local clone of each under a tool-managed
//! working directory in the current directory (clone if absent, reuse
//! otherwise).

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::config::RepoSource;
use crate::error::RunError;
use crate::{git, github};

/// Directory under the current working directory that holds the clones made
/// in all-repos mode.
pub const WORK_DIR: &str = "rewrite-workdir";

/// One repository to process.
///
/// Created here, consumed by the rewrite and push steps, discarded after its
/// `RunResult` is recorded. `remote_url` is `None` for a local repository
/// with no `origin` configured; there is then nothing to push.
#[derive(Debug, Clone)]
pub struct RepositoryRef {
    pub name: String,
    pub local_path: PathBuf,
    pub remote_url: Option<String>,
}

/// Resolves the configured source into the ordered sequence of repositories.
///
/// # Errors
///
/// * [`RunError::NotARepository`] in single mode when the path is not a
///   repository root. Fatal: single mode has nothing to continue to.
/// * [`RunError::AccountListingFailed`] in account mode when the listing
///   call fails. Fatal: the list is a precondition for any work.
///
/// An account with zero repositories resolves to an empty sequence, which is
/// not an error.
pub fn resolve(source: &RepoSource) -> Result<Vec<RepositoryRef>, RunError> {
    match source {
        RepoSource::Single(path) => {
            if !git::is_repo_root(path) {
                return Err(RunError::NotARepository(path.display().to_string()));
            }
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("repository")
                .to_string();
            Ok(vec![RepositoryRef {
                name,
                local_path: path.clone(),
                remote_url: git::remote_url(path),
            }])
        }
        RepoSource::Account(user) => {
            let listed = github::list_user_repos(user)?;
            let work_dir = workdir_path();
            Ok(listed
                .into_iter()
                .map(|repo| RepositoryRef {
                    local_path: work_dir.join(&repo.name),
                    name: repo.name,
                    remote_url: Some(repo.ssh_url),
                })
                .collect())
        }
    }
}

/// Ensures a local clone of the repository exists at its `local_path`.
///
/// An existing directory is reused as-is; otherwise the remote is cloned
/// into place. A `RepositoryRef` from single mode always has an existing
/// path (it was validated by [`resolve`]), so this is a no-op there.
///
/// # Errors
///
/// * [`RunError::CloneFailed`] if the working directory cannot be created,
///   the repository has no remote to clone from, or `git clone` fails.
///   Per-repository: the orchestrator records it and moves on.
pub fn ensure_local_clone(repo: &RepositoryRef) -> Result<(), RunError> {
    if repo.local_path.exists() {
        return Ok(());
    }

    let url = repo
        .remote_url
        .as_deref()
        .ok_or_else(|| RunError::CloneFailed(format!("{}: no remote URL", repo.name)))?;

    if let Some(parent) = repo.local_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RunError::CloneFailed(format!("{}: {}", repo.name, e)))?;
    }

    git::clone(url, &repo.local_path)
        .map_err(|e| RunError::CloneFailed(format!("{}: {}", repo.name, e)))
}

fn workdir_path() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(WORK_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mode_rejects_a_plain_directory() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let source = RepoSource::Single(tmp.path().to_path_buf());

        let err = match resolve(&source) {
            Ok(_) => panic!("plain directory resolved as a repository"),
            Err(e) => e,
        };
        assert!(matches!(err, RunError::NotARepository(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn single_mode_rejects_a_missing_path() {
        let source = RepoSource::Single(PathBuf::from("/definitely/not/here"));
        assert!(matches!(
            resolve(&source),
            Err(RunError::NotARepository(_))
        ));
    }

    #[test]
    fn existing_local_path_is_reused_without_a_remote() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let repo = RepositoryRef {
            name: "already-here".to_string(),
            local_path: tmp.path().to_path_buf(),
            remote_url: None,
        };
        assert!(ensure_local_clone(&repo).is_ok());
    }

    #[test]
    fn missing_clone_without_remote_fails() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let repo = RepositoryRef {
            name: "ghost".to_string(),
            local_path: tmp.path().join("ghost"),
            remote_url: None,
        };
        assert!(matches!(
            ensure_local_clone(&repo),
            Err(RunError::CloneFailed(_))
        ));
    }
}
