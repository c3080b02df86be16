use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

/// Abstraction over a string input prompt.
///
/// Implementors define how string input is collected from the user,
/// including any styling or interactivity. This trait enables testability
/// by decoupling user input from the logic that consumes it.
pub trait StringPrompter {
    /// Prompt the user for a string input.
    ///
    /// # Parameters
    /// - `prompt`: The message shown to the user.
    /// - `default`: Default value if the user presses Enter without input.
    ///
    /// # Returns
    /// `Ok(String)` if input is successfully collected, or an `Err(String)` describing the failure.
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String>;
}

/// Abstraction over a boolean (yes/no) confirmation prompt.
///
/// This trait allows interactive confirmation to be injected or mocked,
/// promoting testability in CLI workflows.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Parameters
    /// - `prompt`: The confirmation message.
    /// - `default`: The default answer if the user presses Enter.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Abstraction over a pick-one-of-several prompt.
///
/// Used for the mode selection (single repository vs. all repositories for an
/// account). Returns the index of the chosen item.
pub trait SelectPrompter {
    /// Prompt the user to pick one item from `items`.
    ///
    /// # Parameters
    /// - `prompt`: The message shown above the list.
    /// - `items`: The selectable labels, in display order.
    ///
    /// # Returns
    /// `Ok(index)` of the chosen item, or `Err(String)` on input failure.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, String>;
}

/// Default implementation of `StringPrompter` using `dialoguer::Input`.
///
/// Uses the `ColorfulTheme` for user-friendly styling. Empty input is
/// allowed; identity matching is verbatim, so validation happens nowhere.
pub struct DialoguerStringPrompter;

impl StringPrompter for DialoguerStringPrompter {
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String> {
        let theme = ColorfulTheme::default();
        let input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .default(default.to_string());
        match input.interact_text() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
///
/// Displays a yes/no dialog with styling from `ColorfulTheme`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let theme = ColorfulTheme::default();
        let confirm = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Default implementation of `SelectPrompter` using `dialoguer::Select`.
pub struct DialoguerSelectPrompter;

impl SelectPrompter for DialoguerSelectPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, String> {
        let theme = ColorfulTheme::default();
        let select = Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(items)
            .default(0);
        match select.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Ask the user to confirm before any history is rewritten or pushed.
///
/// The default answer is `false`: rewriting is destructive and force-pushing
/// overwrites remote history, so Enter alone must not start it.
///
/// # Parameters
/// - `prompter`: A mutable reference to a `ConfirmPrompter` implementation.
///
/// # Returns
/// - `Ok(true)` if the user confirmed.
/// - `Ok(false)` if the user declined.
/// - `Err(String)` if input failed.
pub fn confirm_start<P: ConfirmPrompter>(prompter: &mut P) -> Result<bool, String> {
    let prompt = "Rewrite history and force-push now? (overwrites remote history)";
    prompter.confirm(prompt, false)
}
