//! Shared test doubles for devbox crates.
//!
//! Enabled with the `test-utils` feature so provider crates can drive their
//! strategies without real VCS clients, browsers or terminals.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::command::{CommandRunner, Invocation};
use crate::prompt::Prompter;
use crate::{Error, Result};

type Matcher = Box<dyn Fn(&Invocation) -> bool>;
type Effect = Box<dyn Fn(&Invocation) -> std::io::Result<()>>;

/// A [`CommandRunner`] that records invocations instead of spawning them.
///
/// Failures and filesystem side effects can be scripted per invocation.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    failures: Vec<(Matcher, i32)>,
    effects: Vec<(Matcher, Effect)>,
}

impl RecordingRunner {
    /// A runner where every command succeeds without side effects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail invocations matching `matcher` with exit status `code`.
    #[must_use]
    pub fn fail_when(mut self, matcher: impl Fn(&Invocation) -> bool + 'static, code: i32) -> Self {
        self.failures.push((Box::new(matcher), code));
        self
    }

    /// Run `effect` for successful invocations matching `matcher`.
    #[must_use]
    pub fn on(
        mut self,
        matcher: impl Fn(&Invocation) -> bool + 'static,
        effect: impl Fn(&Invocation) -> std::io::Result<()> + 'static,
    ) -> Self {
        self.effects.push((Box::new(matcher), Box::new(effect)));
        self
    }

    /// Make `hg clone` and `svn checkout` create their destination directory,
    /// the last argument of the invocation.
    #[must_use]
    pub fn materializing_checkouts(self) -> Self {
        self.on(
            |inv| {
                let args = inv.args_lossy();
                matches!(
                    args.first().map(String::as_str),
                    Some("clone" | "checkout")
                )
            },
            |inv| {
                let dest = inv.get_args().last().map(PathBuf::from).unwrap_or_default();
                let dest = match inv.get_current_dir() {
                    Some(dir) if dest.is_relative() => dir.join(dest),
                    _ => dest,
                };
                std::fs::create_dir_all(dest)
            },
        )
    }

    /// Everything run so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Invocations rendered as command lines.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// How many invocations ran `program`.
    #[must_use]
    pub fn count(&self, program: &str) -> usize {
        self.invocations
            .borrow()
            .iter()
            .filter(|inv| inv.program() == program)
            .count()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.invocations.borrow_mut().push(invocation.clone());

        if let Some((_, code)) = self.failures.iter().find(|(m, _)| m(invocation)) {
            return Err(Error::command_failed(
                invocation.program_lossy(),
                invocation.args_lossy(),
                Some(*code),
            ));
        }

        for (matcher, effect) in &self.effects {
            if matcher(invocation) {
                effect(invocation)
                    .map_err(|e| Error::io(e, None, format!("simulating `{invocation}`")))?;
            }
        }
        Ok(())
    }
}

/// A [`Prompter`] answering from a script and recording what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<bool>>,
    default_answer: bool,
    questions: RefCell<Vec<String>>,
    pauses: RefCell<Vec<String>>,
    messages: RefCell<Vec<String>>,
    confirm_calls: Cell<usize>,
}

impl ScriptedPrompter {
    /// Answer every question with yes.
    #[must_use]
    pub fn always_yes() -> Self {
        Self {
            default_answer: true,
            ..Self::default()
        }
    }

    /// Answer every question with no.
    #[must_use]
    pub fn always_no() -> Self {
        Self::default()
    }

    /// Answer questions in order from `answers`, then with no.
    #[must_use]
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Questions asked via [`Prompter::confirm`].
    #[must_use]
    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }

    /// Messages shown via [`Prompter::pause`].
    #[must_use]
    pub fn pauses(&self) -> Vec<String> {
        self.pauses.borrow().clone()
    }

    /// Messages shown via [`Prompter::say`].
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Number of confirmations requested.
    #[must_use]
    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.get()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.confirm_calls.set(self.confirm_calls.get() + 1);
        self.questions.borrow_mut().push(question.to_string());
        Ok(self
            .answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.default_answer))
    }

    fn pause(&self, message: &str) -> Result<()> {
        self.pauses.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn say(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
