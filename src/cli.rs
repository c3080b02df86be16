use crate::error::RunError;
use crate::report::{RunResult, print_banner, print_summary};
use crate::source::RepositoryRef;
use crate::{config, git, prompt, source};

use console::style;
use std::env;

/// Collects the whole run configuration through the interactive prompts, in
/// order: old name, old e-mail, new name, new e-mail, mode, then the path or
/// the GitHub username. Built once; nothing mutates it afterwards.
///
/// A failing prompt surfaces as [`RunError::Prompt`], which is fatal: with
/// no configuration there is nothing to do.
fn collect_config() -> Result<config::RunConfig, RunError> {
    let mut string_prompter = prompt::DialoguerStringPrompter;

    let (old, new) = config::collect_identities(&mut string_prompter)?;

    let mut select_prompter = prompt::DialoguerSelectPrompter;
    let source = config::choose_source(&mut select_prompter, &mut string_prompter)?;

    Ok(config::RunConfig { old, new, source })
}

/// Builds the identity listing for one repository: a header line, then one
/// line per identity, flagging the entries the rewrite will touch.
fn author_lines(
    repo_name: &str,
    list: &[(String, String)],
    old: &config::IdentityPair,
) -> Vec<String> {
    let mut lines = vec![format!("Identities in {}:", repo_name)];
    for (name, email) in list {
        if old.matches(name, email) {
            lines.push(format!(
                "  {} <{}> {}",
                name,
                email,
                style("(will be rewritten)").yellow()
            ));
        } else {
            lines.push(format!("  {} <{}>", name, email));
        }
    }
    lines
}

/// Prints the identities found in the repository. Shown before the rewrite
/// (with the matching entries flagged) and again afterwards so the user can
/// verify the result.
fn show_authors(repo: &RepositoryRef, config: &config::RunConfig) {
    let list = match git::authors(&repo.local_path) {
        Ok(list) => list,
        Err(_) => return,
    };
    if list.is_empty() {
        return;
    }

    for line in author_lines(&repo.name, &list, &config.old) {
        println!("{}", line);
    }
}

/// Processes one repository end to end: ensure a local clone, refuse a dirty
/// working tree, rewrite the history, then force-push.
///
/// The push runs only when the rewrite succeeded; a repository without a
/// configured remote is rewritten locally and the push is skipped with a
/// notice. A repository with no commits is a successful no-op.
///
/// # Errors
///
/// Any of the per-repository kinds: [`RunError::CloneFailed`],
/// [`RunError::DirtyWorkingTree`], [`RunError::RewriteFailed`],
/// [`RunError::PushRejected`]. The caller records the error and continues
/// with the next repository.
pub fn process_repository(
    repo: &RepositoryRef,
    config: &config::RunConfig,
) -> Result<(), RunError> {
    source::ensure_local_clone(repo)?;

    show_authors(repo, config);

    if !git::has_commits(&repo.local_path) {
        println!(
            "{}",
            style("Repository has no commits; nothing to rewrite.").yellow()
        );
        return Ok(());
    }

    match git::is_clean(&repo.local_path) {
        Ok(true) => {}
        Ok(false) => {
            return Err(RunError::DirtyWorkingTree(
                repo.local_path.display().to_string(),
            ));
        }
        Err(e) => return Err(RunError::RewriteFailed(e)),
    }

    git::rewrite_identity(&repo.local_path, &config.old, &config.new)
        .map_err(RunError::RewriteFailed)?;
    println!("{}", style("History rewritten.").green());
    show_authors(repo, config);

    match &repo.remote_url {
        Some(_) => {
            git::push_all_force(&repo.local_path).map_err(RunError::PushRejected)?;
            println!("{}", style("Force-pushed all branches.").green());
        }
        None => {
            println!(
                "{}",
                style("No remote configured; nothing to push.").yellow()
            );
        }
    }

    Ok(())
}

/// Prints usage information to stdout.
fn print_help() {
    println!(
        "\
git-identity-rewrite {}

Rewrite the author/committer identity across the full history of one
repository, or of every repository a GitHub user owns, then force-push.

USAGE:
    git-identity-rewrite

OPTIONS:
    -h, --help       Print help information
    -V, --version    Print version information

DESCRIPTION:
    All configuration is gathered interactively: the identity to replace,
    its replacement, and the target (a local repository path, or all
    repositories for a GitHub user, cloned under ./{}).

    Commits whose author or committer exactly matches the old identity are
    rewritten on every branch; everything else is left untouched. Rewritten
    branches are force-pushed, permanently overwriting remote history.",
        env!("CARGO_PKG_VERSION"),
        source::WORK_DIR
    );
}

/// Main CLI entry point for `git-identity-rewrite`.
///
/// This function:
/// 1. Handles `--help` / `--version`.
/// 2. Verifies that `git` is installed.
/// 3. Collects the run configuration via prompts.
/// 4. Resolves the repository sequence (fatal on `NotARepository` or
///    `AccountListingFailed`).
/// 5. Shows the banner and asks for confirmation.
/// 6. Processes each repository in sequence, recording per-repository
///    results, then prints the summary.
///
/// Returns `Ok(exit_code)` on completing the loop (including runs where
/// some repositories failed, which the summary reports), or `Err(())` for
/// fatal precondition failures, which the binary maps to exit code 1.
pub fn entry() -> Result<i32, ()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(0);
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("git-identity-rewrite {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    // Ensure `git` is available before prompting for anything.
    match which::which("git") {
        Ok(_) => {}
        Err(_) => {
            eprintln!("{}", style("Error: `git` not found in PATH.").red().bold());
            return Err(());
        }
    }

    let config = match collect_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", style(format!("Error: {}", e)).red().bold());
            return Err(());
        }
    };

    let repos = match source::resolve(&config.source) {
        Ok(repos) => repos,
        Err(e) => {
            eprintln!("{}", style(format!("Error: {}", e)).red().bold());
            return Err(());
        }
    };

    if repos.is_empty() {
        print_summary(&[]);
        return Ok(0);
    }

    print_banner(&config);

    let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
    match prompt::confirm_start(&mut confirm_prompter) {
        Ok(true) => {}
        Ok(false) => {
            println!(
                "{}",
                style("Canceled by user. No changes made.").yellow().bold()
            );
            return Ok(0);
        }
        Err(e) => {
            let err = RunError::Prompt(e);
            eprintln!("{}", style(format!("Error: {}", err)).red().bold());
            return Err(());
        }
    }

    let mut results: Vec<RunResult> = Vec::with_capacity(repos.len());
    for repo in &repos {
        println!();
        println!("{}", style(format!("==> {}", repo.name)).cyan().bold());

        let outcome = process_repository(repo, &config);
        if let Err(e) = &outcome {
            eprintln!("{}", style(format!("❌ {}", e)).red().bold());
        }
        results.push(RunResult {
            name: repo.name.clone(),
            outcome,
        });
    }

    print_summary(&results);

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::author_lines;
    use crate::config::IdentityPair;

    fn old() -> IdentityPair {
        IdentityPair {
            name: "Old Name".to_string(),
            email: "old@x.com".to_string(),
        }
    }

    #[test]
    fn matching_identities_are_flagged_before_the_rewrite() {
        let list = vec![
            ("Old Name".to_string(), "old@x.com".to_string()),
            ("Other".to_string(), "other@x.com".to_string()),
        ];
        let lines = author_lines("dotfiles", &list, &old());

        assert_eq!(lines[0], "Identities in dotfiles:");
        assert!(lines[1].contains("Old Name <old@x.com>"));
        assert!(lines[1].contains("(will be rewritten)"));
        assert!(lines[2].contains("Other <other@x.com>"));
        assert!(!lines[2].contains("(will be rewritten)"));
    }

    #[test]
    fn rewritten_listing_carries_no_flags() {
        // After the rewrite nothing matches the old identity any longer, so
        // the verification listing is plain.
        let list = vec![
            ("New Name".to_string(), "new@x.com".to_string()),
            ("Other".to_string(), "other@x.com".to_string()),
        ];
        let lines = author_lines("dotfiles", &list, &old());

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !l.contains("(will be rewritten)")));
    }
}
