use console::{measure_text_width, style};

use crate::config::{RepoSource, RunConfig};
use crate::error::RunError;

/// Outcome of processing one repository, accumulated across the run for the
/// final summary.
pub struct RunResult {
    pub name: String,
    pub outcome: Result<(), RunError>,
}

/// Prints a boxed, colorized banner describing what is about to happen.
///
/// The box is dynamically sized to the widest **visible** line, using
/// [`console::measure_text_width`] so ANSI color codes inside the content do
/// not skew the padding, and framed with Unicode box-drawing characters.
/// Borders are styled independently from the inner text.
///
/// # Parameters
///
/// * `config` – The run configuration: both identities and the target.
///
/// # Output
///
/// Prints directly to standard output; returns nothing.
pub fn print_banner(config: &RunConfig) {
    let lines = banner_lines(config);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l)) // ignore ANSI in content
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(&line);
        let pad = max_width - visible; // includes the one space after left border
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Constructs the banner lines, in display order: title, destructive-push
/// warning, the identity substitution, and the target.
///
/// Some lines carry ANSI styling; consumers measuring width must use visible
/// width, not `str::len()`.
fn banner_lines(config: &RunConfig) -> Vec<String> {
    let target = match &config.source {
        RepoSource::Single(path) => format!("Target: repository at {}", path.display()),
        RepoSource::Account(user) => {
            format!("Target: all repositories for GitHub user '{}'", user)
        }
    };

    vec![
        "Rewrite commit identities across full history".to_string(),
        String::new(),
        style("Force push will permanently overwrite remote history.")
            .yellow()
            .bold()
            .to_string(),
        style("No backup refs are kept, locally or on the remote.")
            .yellow()
            .to_string(),
        String::new(),
        format!("Old identity: {}", config.old),
        format!("New identity: {}", config.new),
        target,
    ]
}

/// Prints the final per-repository summary.
///
/// One line per repository in processing order, success or failure with the
/// error message, followed by the totals. An empty run prints a single
/// notice instead.
pub fn print_summary(results: &[RunResult]) {
    println!();
    println!("{}", style("Run summary").blue().bold());
    for line in summary_lines(results) {
        println!("{}", line);
    }
}

fn summary_lines(results: &[RunResult]) -> Vec<String> {
    if results.is_empty() {
        return vec!["No repositories were processed.".to_string()];
    }

    let mut lines: Vec<String> = results
        .iter()
        .map(|r| match &r.outcome {
            Ok(()) => format!("{} {}", style("✅").green(), r.name),
            Err(e) => format!("{} {}: {}", style("❌").red(), r.name, e),
        })
        .collect();

    let ok = results.iter().filter(|r| r.outcome.is_ok()).count();
    lines.push(String::new());
    lines.push(format!("{} succeeded, {} failed", ok, results.len() - ok));
    lines
}
