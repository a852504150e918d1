//! Interactive user prompts.
//!
//! Providers and the orchestrator never read stdin directly; everything that
//! talks to the user goes through a [`Prompter`], so orchestration can run
//! against scripted answers.

use crate::Result;

/// Interaction with the person running devbox.
pub trait Prompter {
    /// Ask a yes/no question. Only an explicit "y"/"Y" counts as yes.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Ask the user to do something by hand and block until they are done.
    ///
    /// # Errors
    ///
    /// Returns an error if the acknowledgement cannot be read.
    fn pause(&self, message: &str) -> Result<()>;

    /// Show a progress or informational message.
    fn say(&self, message: &str);
}

/// Interpret a typed answer: "y" or "Y", surrounding whitespace ignored.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}
