use thiserror::Error;

/// Everything that can go wrong during a run.
///
/// Two classes of failure exist, distinguished by [`RunError::is_fatal`]:
///
/// - **Fatal**: no work is possible at all ([`NotARepository`] in single-repo
///   mode, [`AccountListingFailed`], [`Prompt`]). The process exits non-zero.
/// - **Per-repository**: the failure is recorded against the offending
///   repository and the orchestration loop moves on to the next one
///   ([`CloneFailed`], [`DirtyWorkingTree`], [`RewriteFailed`],
///   [`PushRejected`]).
///
/// [`NotARepository`]: RunError::NotARepository
/// [`AccountListingFailed`]: RunError::AccountListingFailed
/// [`Prompt`]: RunError::Prompt
/// [`CloneFailed`]: RunError::CloneFailed
/// [`DirtyWorkingTree`]: RunError::DirtyWorkingTree
/// [`RewriteFailed`]: RunError::RewriteFailed
/// [`PushRejected`]: RunError::PushRejected
#[derive(Debug, Error)]
pub enum RunError {
    /// The user-supplied path is not the root of a git repository.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Listing the account's repositories failed; without the list there is
    /// no work to do.
    #[error("listing repositories for the account failed: {0}")]
    AccountListingFailed(String),

    /// `git clone` exited non-zero for this repository.
    #[error("clone failed for {0}")]
    CloneFailed(String),

    /// The repository has uncommitted local changes; history filtering
    /// refuses to run on top of them.
    #[error("working tree has uncommitted changes: {0}")]
    DirtyWorkingTree(String),

    /// The history-filtering command itself failed; the tool's message is
    /// passed through.
    #[error("history rewrite failed: {0}")]
    RewriteFailed(String),

    /// The remote refused the force push (e.g. branch protection).
    #[error("push rejected by remote: {0}")]
    PushRejected(String),

    /// Interactive input could not be collected.
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl RunError {
    /// Whether this error aborts the whole run rather than one repository.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RunError::NotARepository(_) | RunError::AccountListingFailed(_) | RunError::Prompt(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::RunError;

    #[test]
    fn fatal_kinds_are_fatal() {
        assert!(RunError::NotARepository("/tmp/x".to_string()).is_fatal());
        assert!(RunError::AccountListingFailed("HTTP 404".to_string()).is_fatal());
        assert!(RunError::Prompt("closed".to_string()).is_fatal());
    }

    #[test]
    fn per_repository_kinds_are_not_fatal() {
        assert!(!RunError::CloneFailed("repo".to_string()).is_fatal());
        assert!(!RunError::DirtyWorkingTree("/tmp/x".to_string()).is_fatal());
        assert!(!RunError::RewriteFailed("boom".to_string()).is_fatal());
        assert!(!RunError::PushRejected("protected branch".to_string()).is_fatal());
    }

    #[test]
    fn messages_name_the_offender() {
        let e = RunError::NotARepository("/home/me/notes".to_string());
        assert_eq!(format!("{}", e), "not a git repository: /home/me/notes");

        let e = RunError::PushRejected("remote: denied".to_string());
        assert!(format!("{}", e).contains("remote: denied"));
    }
}
