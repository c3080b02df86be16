//! # git-identity-rewrite
//!
//! A CLI tool to rewrite the author/committer identity across the full
//! history of one git repository, or of every repository a GitHub user
//! owns, then force-push the rewritten branches.
//!
//! The whole run is prompt-driven and strictly sequential:
//! - Prompt for the identity to replace and its replacement
//! - Resolve the target repositories (one local path, or the account's
//!   full listing cloned into a working directory)
//! - Rewrite every matching commit on every branch, per repository
//! - Force-push and record a per-repository result
//! - Print a summary
//!
//! ## Usage
//!
//! ```bash
//! git-identity-rewrite
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Entry point and the per-repository orchestration loop
//! - [`config`] - Identities, run configuration, prompt-driven collection
//! - [`source`] - Repository sequence: path validation, clone-or-reuse
//! - [`github`] - Repository-listing API client
//! - [`git`] - Git command wrappers, including the history filter pass
//! - [`prompt`] - User input abstractions
//! - [`report`] - Banner and final summary
//! - [`error`] - Error kinds and the fatal/per-repository split

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod prompt;
pub mod report;
pub mod source;
