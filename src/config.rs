use crate::error::RunError;
use crate::prompt::{SelectPrompter, StringPrompter};

use std::fmt;
use std::path::PathBuf;

/// A commit identity: the name and e-mail recorded in author/committer fields.
///
/// Two instances exist per run: the identity to replace (`old`) and its
/// replacement (`new`). Both are fixed before any repository is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPair {
    pub name: String,
    pub email: String,
}

impl IdentityPair {
    /// Exact match on both name and e-mail.
    ///
    /// Matching is deliberately verbatim: no trimming, no case folding, no
    /// e-mail validation. An identity that was typed slightly wrong against
    /// history simply matches zero commits.
    pub fn matches(&self, name: &str, email: &str) -> bool {
        self.name == name && self.email == email
    }
}

impl fmt::Display for IdentityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Where the repositories to process come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    /// One local repository at the given path.
    Single(PathBuf),
    /// Every repository owned by the given GitHub user, cloned locally.
    Account(String),
}

/// Immutable per-run configuration, built once from the prompts at startup
/// and passed by reference into every component.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub old: IdentityPair,
    pub new: IdentityPair,
    pub source: RepoSource,
}

/// Labels for the mode-selection prompt, in selection order.
const MODE_ITEMS: [&str; 2] = [
    "One repository (local path)",
    "All repositories for a GitHub user",
];

/// Prompts for the old and new identities, in order: old name, old e-mail,
/// new name, new e-mail.
///
/// Values are trimmed but otherwise unvalidated; empty answers are permitted
/// and passed through. A failing prompt surfaces as the fatal
/// [`RunError::Prompt`] kind.
pub fn collect_identities<P: StringPrompter>(
    prompter: &mut P,
) -> Result<(IdentityPair, IdentityPair), RunError> {
    let old_name = prompter.prompt("Old author name", "").map_err(RunError::Prompt)?;
    let old_email = prompter
        .prompt("Old author email", "")
        .map_err(RunError::Prompt)?;
    let new_name = prompter.prompt("New author name", "").map_err(RunError::Prompt)?;
    let new_email = prompter
        .prompt("New author email", "")
        .map_err(RunError::Prompt)?;

    let old = IdentityPair {
        name: old_name.trim().to_string(),
        email: old_email.trim().to_string(),
    };
    let new = IdentityPair {
        name: new_name.trim().to_string(),
        email: new_email.trim().to_string(),
    };

    Ok((old, new))
}

/// Prompts for the repository source: mode selection first, then either the
/// local path (single mode) or the GitHub username (all-repos mode).
pub fn choose_source<S: SelectPrompter, P: StringPrompter>(
    selecter: &mut S,
    prompter: &mut P,
) -> Result<RepoSource, RunError> {
    let choice = selecter
        .select("What do you want to rewrite", &MODE_ITEMS)
        .map_err(RunError::Prompt)?;

    if choice == 0 {
        let path = prompter
            .prompt("Path to the repository", "")
            .map_err(RunError::Prompt)?;
        Ok(RepoSource::Single(PathBuf::from(path.trim())))
    } else {
        let user = prompter
            .prompt("GitHub username", "")
            .map_err(RunError::Prompt)?;
        Ok(RepoSource::Account(user.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedStringPrompter {
        answers: Vec<String>,
        next: usize,
    }

    impl ScriptedStringPrompter {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
                next: 0,
            }
        }
    }

    impl StringPrompter for ScriptedStringPrompter {
        fn prompt(&mut self, _prompt: &str, _default: &str) -> Result<String, String> {
            let answer = self
                .answers
                .get(self.next)
                .cloned()
                .ok_or_else(|| "ran out of scripted answers".to_string());
            self.next += 1;
            answer
        }
    }

    struct FixedSelectPrompter {
        choice: usize,
    }

    impl SelectPrompter for FixedSelectPrompter {
        fn select(&mut self, _prompt: &str, items: &[&str]) -> Result<usize, String> {
            assert_eq!(items.len(), 2);
            Ok(self.choice)
        }
    }

    #[test]
    fn identities_collected_in_order_and_trimmed() {
        let mut prompter = ScriptedStringPrompter::new(&[
            " Old Name ",
            "old@x.com",
            "New Name",
            " new@x.com ",
        ]);
        let (old, new) = collect_identities(&mut prompter).expect("collect failed");

        assert_eq!(old.name, "Old Name");
        assert_eq!(old.email, "old@x.com");
        assert_eq!(new.name, "New Name");
        assert_eq!(new.email, "new@x.com");
    }

    #[test]
    fn empty_answers_pass_through() {
        let mut prompter = ScriptedStringPrompter::new(&["", "", "", ""]);
        let (old, new) = collect_identities(&mut prompter).expect("collect failed");

        assert_eq!(old.name, "");
        assert_eq!(new.email, "");
    }

    #[test]
    fn single_mode_asks_for_a_path() {
        let mut selecter = FixedSelectPrompter { choice: 0 };
        let mut prompter = ScriptedStringPrompter::new(&["/home/me/project"]);
        let source = choose_source(&mut selecter, &mut prompter).expect("choose failed");

        assert_eq!(source, RepoSource::Single(PathBuf::from("/home/me/project")));
    }

    #[test]
    fn account_mode_asks_for_a_username() {
        let mut selecter = FixedSelectPrompter { choice: 1 };
        let mut prompter = ScriptedStringPrompter::new(&["octocat "]);
        let source = choose_source(&mut selecter, &mut prompter).expect("choose failed");

        assert_eq!(source, RepoSource::Account("octocat".to_string()));
    }

    #[test]
    fn failed_identity_prompt_is_a_fatal_prompt_error() {
        // Three answers only; the fourth prompt fails.
        let mut prompter = ScriptedStringPrompter::new(&["Old", "old@x.com", "New"]);
        let err = match collect_identities(&mut prompter) {
            Ok(_) => panic!("collection succeeded with a failing prompter"),
            Err(e) => e,
        };
        assert!(matches!(err, RunError::Prompt(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn failed_mode_selection_is_a_fatal_prompt_error() {
        struct FailingSelectPrompter;
        impl SelectPrompter for FailingSelectPrompter {
            fn select(&mut self, _prompt: &str, _items: &[&str]) -> Result<usize, String> {
                Err("terminal closed".to_string())
            }
        }

        let mut selecter = FailingSelectPrompter;
        let mut prompter = ScriptedStringPrompter::new(&[]);
        let err = match choose_source(&mut selecter, &mut prompter) {
            Ok(_) => panic!("selection succeeded with a failing prompter"),
            Err(e) => e,
        };
        assert!(matches!(err, RunError::Prompt(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn matching_is_exact_on_both_fields() {
        let old = IdentityPair {
            name: "Old Name".to_string(),
            email: "old@x.com".to_string(),
        };

        assert!(old.matches("Old Name", "old@x.com"));
        assert!(!old.matches("Old Name", "other@x.com"));
        assert!(!old.matches("Other", "old@x.com"));
        assert!(!old.matches("old name", "old@x.com"));
    }

    #[test]
    fn display_formats_as_name_and_angle_email() {
        let pair = IdentityPair {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        };
        assert_eq!(format!("{}", pair), "Jane <jane@example.com>");
    }
}
