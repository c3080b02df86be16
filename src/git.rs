use crate::config::IdentityPair;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The `--env-filter` script applied to every commit during the rewrite.
///
/// The four identity values are read from the environment of the
/// `git filter-branch` process rather than interpolated into the script, so
/// names and addresses containing quotes or shell metacharacters cannot
/// break out of the comparison. Author and committer are matched and
/// replaced independently; both require an exact match on name AND e-mail.
const ENV_FILTER: &str = r#"
if [ "$GIT_AUTHOR_NAME" = "$OLD_IDENT_NAME" ] && [ "$GIT_AUTHOR_EMAIL" = "$OLD_IDENT_EMAIL" ]; then
    export GIT_AUTHOR_NAME="$NEW_IDENT_NAME"
    export GIT_AUTHOR_EMAIL="$NEW_IDENT_EMAIL"
fi
if [ "$GIT_COMMITTER_NAME" = "$OLD_IDENT_NAME" ] && [ "$GIT_COMMITTER_EMAIL" = "$OLD_IDENT_EMAIL" ]; then
    export GIT_COMMITTER_NAME="$NEW_IDENT_NAME"
    export GIT_COMMITTER_EMAIL="$NEW_IDENT_EMAIL"
fi
"#;

/// Builds a `git -C <repo>` command so every git call runs against an
/// explicit repository path instead of the process working directory.
fn git_in(repo: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(repo);
    cmd
}

/// Runs a command and returns only its exit status.
///
/// # Returns
///
/// * `Ok(())` if the command exited with status `0`.
/// * `Err(String)` with the exit status, or the I/O error message if the
///   process failed to start.
fn run_status(mut cmd: Command) -> Result<(), String> {
    match cmd.status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("exited with {}", status)),
        Err(e) => Err(e.to_string()),
    }
}

/// Runs a command and returns its trimmed standard output on success,
/// or its trimmed standard error as an `Err` on failure.
///
/// # Returns
///
/// * `Ok(String)` containing trimmed `stdout` if the command succeeded.
/// * `Err(String)` containing trimmed `stderr`, or the I/O error message if
///   the process failed to start.
fn run_output(mut cmd: Command) -> Result<String, String> {
    match cmd.output() {
        Ok(out) if out.status.success() => {
            Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
        }
        Ok(out) => Err(String::from_utf8_lossy(&out.stderr).trim().to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Resolves the repository root containing `path` via
/// `git rev-parse --show-toplevel`.
///
/// # Returns
///
/// * `Ok(PathBuf)` of the work-tree root if `path` is inside a repository.
/// * `Err(String)` with git's error output otherwise.
pub fn toplevel(path: &Path) -> Result<PathBuf, String> {
    let mut cmd = git_in(path);
    cmd.arg("rev-parse").arg("--show-toplevel");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    run_output(cmd).map(PathBuf::from)
}

/// Checks that `path` is itself the root of a git repository, not merely
/// somewhere inside one.
///
/// A nested directory of a repository is rejected: rewriting is a
/// whole-repository operation and accepting a subdirectory would silently
/// target a different tree than the one the user named.
pub fn is_repo_root(path: &Path) -> bool {
    let top = match toplevel(path) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match (std::fs::canonicalize(&top), std::fs::canonicalize(path)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Reports whether the working tree has no uncommitted changes.
///
/// Runs `git status --porcelain`; any output at all (staged, unstaged, or
/// untracked entries) counts as dirty, matching what history filtering will
/// refuse to run on top of.
///
/// # Returns
///
/// * `Ok(true)` if the working tree is clean.
/// * `Ok(false)` if there are uncommitted changes.
/// * `Err(String)` if the status command itself failed.
pub fn is_clean(repo: &Path) -> Result<bool, String> {
    let mut cmd = git_in(repo);
    cmd.arg("status").arg("--porcelain");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    run_output(cmd).map(|out| out.is_empty())
}

/// Clones `url` into `dest`.
///
/// Standard input, output, and error are inherited so the user sees clone
/// progress and the SSH agent can prompt for host verification if needed.
///
/// # Returns
///
/// * `Ok(())` if the clone completed.
/// * `Err(String)` if `git clone` exited non-zero or failed to start.
pub fn clone(url: &str, dest: &Path) -> Result<(), String> {
    let mut cmd = Command::new("git");
    cmd.arg("clone").arg(url).arg(dest);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    run_status(cmd)
}

/// Returns the `origin` remote URL of the repository, if one is configured.
pub fn remote_url(repo: &Path) -> Option<String> {
    let mut cmd = git_in(repo);
    cmd.arg("remote").arg("get-url").arg("origin");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    run_output(cmd).ok().filter(|url| !url.is_empty())
}

/// Reports whether the repository has at least one commit on any ref.
///
/// A freshly initialized (or freshly cloned empty) repository has nothing to
/// rewrite; the filter tooling errors out on an empty ref set, so callers
/// skip the rewrite entirely in that case.
pub fn has_commits(repo: &Path) -> bool {
    let mut cmd = git_in(repo);
    cmd.arg("rev-list").arg("--all").arg("-n").arg("1");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    match run_output(cmd) {
        Ok(out) => !out.is_empty(),
        Err(_) => false,
    }
}

/// Rewrites every commit on every ref whose author or committer identity
/// exactly equals `old`, replacing it with `new`.
///
/// Internally, this executes one pass of git's history-filtering facility:
///
/// ```text
/// git filter-branch -f --env-filter <script> --tag-name-filter cat -- --all
/// ```
///
/// with the identity values supplied through the environment (see
/// [`ENV_FILTER`]). Commits that do not match keep their identity fields
/// byte-for-byte; their hashes still change when an ancestor was rewritten,
/// which is inherent to a content-addressed commit graph. Running the same
/// rewrite again is a no-op: no commit matches `old` any longer, every
/// commit re-filters to identical content, and every ref keeps its hash.
///
/// The backup refs git leaves under `refs/original/` are deleted after a
/// successful pass; this tool makes no promise of an automatic backup, and
/// keeping them would make a re-run push stale history with `--all`-style
/// ref enumeration.
///
/// # Parameters
///
/// * `repo` – Path to the repository root.
/// * `old` – Identity to replace (exact match on name and e-mail).
/// * `new` – Replacement identity.
///
/// # Returns
///
/// * `Ok(())` if the filter pass completed.
/// * `Err(String)` with the filter tool's stderr if it failed.
///
/// # Examples
///
/// ```ignore
/// // Ignored because it requires a git repository with commits.
/// use git_identity_rewrite::config::IdentityPair;
/// use git_identity_rewrite::git::rewrite_identity;
/// use std::path::Path;
///
/// let old = IdentityPair { name: "Old".into(), email: "old@x.com".into() };
/// let new = IdentityPair { name: "New".into(), email: "new@x.com".into() };
/// if let Err(err) = rewrite_identity(Path::new("/tmp/repo"), &old, &new) {
///     eprintln!("Rewrite failed: {}", err);
/// }
/// ```
pub fn rewrite_identity(repo: &Path, old: &IdentityPair, new: &IdentityPair) -> Result<(), String> {
    let mut cmd = git_in(repo);
    cmd.arg("filter-branch")
        .arg("-f")
        .arg("--env-filter")
        .arg(ENV_FILTER)
        .arg("--tag-name-filter")
        .arg("cat")
        .arg("--")
        .arg("--all");
    cmd.env("FILTER_BRANCH_SQUELCH_WARNING", "1");
    cmd.env("OLD_IDENT_NAME", &old.name);
    cmd.env("OLD_IDENT_EMAIL", &old.email);
    cmd.env("NEW_IDENT_NAME", &new.name);
    cmd.env("NEW_IDENT_EMAIL", &new.email);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    run_output(cmd)?;
    drop_backup_refs(repo)
}

/// Deletes the `refs/original/*` backups left behind by a filter pass.
fn drop_backup_refs(repo: &Path) -> Result<(), String> {
    let mut cmd = git_in(repo);
    cmd.arg("for-each-ref")
        .arg("--format=%(refname)")
        .arg("refs/original/");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    let refs = run_output(cmd)?;

    for name in refs.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut del = git_in(repo);
        del.arg("update-ref").arg("-d").arg(name);
        del.stdout(Stdio::null());
        del.stderr(Stdio::piped());
        run_status(del)?;
    }
    Ok(())
}

/// Force-pushes every branch, then every tag, to the configured remote.
///
/// This runs:
///
/// ```text
/// git push --all --force
/// git push --tags --force
/// ```
///
/// Two invocations because git rejects `--all` combined with `--tags`. The
/// rewrite filters tags along with branches, so both must reach the remote
/// or local and remote tag state silently diverge. Force semantics are
/// required, not optional: the rewritten commit identifiers diverge from
/// whatever the remote holds, so a plain push can never fast-forward. The
/// remote's history is permanently overwritten. A repository without tags
/// makes the second push a no-op.
///
/// # Returns
///
/// * `Ok(())` if every branch and tag was pushed.
/// * `Err(String)` with the remote's refusal message if either push was
///   rejected (e.g. branch protection).
pub fn push_all_force(repo: &Path) -> Result<(), String> {
    let mut branches = git_in(repo);
    branches.arg("push").arg("--all").arg("--force");
    branches.stdin(Stdio::inherit());
    branches.stdout(Stdio::piped());
    branches.stderr(Stdio::piped());
    run_output(branches)?;

    let mut tags = git_in(repo);
    tags.arg("push").arg("--tags").arg("--force");
    tags.stdin(Stdio::inherit());
    tags.stdout(Stdio::piped());
    tags.stderr(Stdio::piped());
    run_output(tags).map(|_| ())
}

/// Lists the distinct author identities present in the repository.
///
/// Parses `git shortlog -sne --all` into `(name, email)` pairs so the user
/// can see which identities exist before the rewrite touches anything.
///
/// # Returns
///
/// * `Ok(Vec<(String, String)>)` of identities in shortlog order (most
///   commits first).
/// * `Err(String)` if shortlog failed.
pub fn authors(repo: &Path) -> Result<Vec<(String, String)>, String> {
    let mut cmd = git_in(repo);
    cmd.arg("shortlog").arg("-sne").arg("--all");
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    run_output(cmd).map(|out| parse_shortlog(&out))
}

/// Parses `git shortlog -sne` output lines of the form
/// `"   12\tName <email>"` into `(name, email)` pairs.
///
/// Lines without a tab separator or without the `<email>` suffix are
/// skipped rather than reported; shortlog occasionally emits entries with
/// no address and those carry nothing this tool can match against.
fn parse_shortlog(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            let (_, ident) = line.split_once('\t')?;
            let ident = ident.trim();
            let open = ident.rfind(" <")?;
            let email = ident[open + 2..].strip_suffix('>')?;
            Some((ident[..open].to_string(), email.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ENV_FILTER, is_repo_root, parse_shortlog};

    #[test]
    fn shortlog_lines_parse_to_name_and_email() {
        let out = "    12\tOld Name <old@x.com>\n     1\tOther <other@x.com>";
        let parsed = parse_shortlog(out);
        assert_eq!(
            parsed,
            vec![
                ("Old Name".to_string(), "old@x.com".to_string()),
                ("Other".to_string(), "other@x.com".to_string()),
            ]
        );
    }

    #[test]
    fn shortlog_names_may_contain_angle_brackets() {
        let out = "     3\tWeird <Name> Here <weird@x.com>";
        let parsed = parse_shortlog(out);
        assert_eq!(
            parsed,
            vec![("Weird <Name> Here".to_string(), "weird@x.com".to_string())]
        );
    }

    #[test]
    fn malformed_shortlog_lines_are_skipped() {
        let out = "garbage line\n     2\tNo Email Here\n     1\tOk <ok@x.com>";
        let parsed = parse_shortlog(out);
        assert_eq!(parsed, vec![("Ok".to_string(), "ok@x.com".to_string())]);
    }

    #[test]
    fn empty_shortlog_parses_to_empty() {
        assert!(parse_shortlog("").is_empty());
    }

    #[test]
    fn env_filter_covers_author_and_committer() {
        assert!(ENV_FILTER.contains("GIT_AUTHOR_NAME"));
        assert!(ENV_FILTER.contains("GIT_AUTHOR_EMAIL"));
        assert!(ENV_FILTER.contains("GIT_COMMITTER_NAME"));
        assert!(ENV_FILTER.contains("GIT_COMMITTER_EMAIL"));
    }

    #[test]
    fn env_filter_reads_identities_from_environment_only() {
        // The script must reference the env vars, never literal values.
        assert!(ENV_FILTER.contains("$OLD_IDENT_NAME"));
        assert!(ENV_FILTER.contains("$OLD_IDENT_EMAIL"));
        assert!(ENV_FILTER.contains("$NEW_IDENT_NAME"));
        assert!(ENV_FILTER.contains("$NEW_IDENT_EMAIL"));
    }

    #[test]
    fn plain_directory_is_not_a_repo_root() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        assert!(!is_repo_root(tmp.path()));
    }
}
