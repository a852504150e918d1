//! The interactive [`Prompter`] used by the binary.

use std::io::{self, BufRead, IsTerminal, Write};

use devbox_core::prompt::is_yes;
use devbox_core::{Error, Prompter, Result};

/// Prompts on stdout and reads answers from stdin.
///
/// End of input counts as "no" for questions and as acknowledgement for
/// pauses, so piping `/dev/null` in never hangs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Whether stdin is attached to a terminal.
    pub fn is_interactive() -> bool {
        io::stdin().is_terminal()
    }

    fn ask(prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt}")
            .and_then(|()| stdout.flush())
            .map_err(|e| Error::io(e, None, "writing prompt"))?;

        let mut answer = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| Error::io(e, None, "reading answer"))?;
        Ok((read > 0).then_some(answer))
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        Ok(Self::ask(question)?.is_some_and(|answer| is_yes(&answer)))
    }

    fn pause(&self, message: &str) -> Result<()> {
        Self::ask(&format!("{message} [press Enter when done]"))?;
        Ok(())
    }

    fn say(&self, message: &str) {
        println!("{message}");
    }
}
