//! Prompt primitive
//!
//! A single blocking question/answer seam. The credential schema engine
//! and the scheme resolver talk to the `Prompter` trait so tests can
//! script answers instead of driving a terminal.

use crate::error::AirliftResult;

/// Abstract interactive prompt interface.
///
/// Validation lives in the callers: they re-issue a question after
/// calling [`Prompter::report_invalid`] with the reason, so every
/// implementation stays a dumb question/answer pipe.
pub trait Prompter {
    /// Yes/no question with a default answer.
    fn confirm(&mut self, message: &str, default: bool) -> AirliftResult<bool>;

    /// Free-text question; `initial` pre-fills an editable answer.
    fn text(&mut self, message: &str, initial: Option<&str>) -> AirliftResult<String>;

    /// Masked question; input is never echoed.
    fn password(&mut self, message: &str) -> AirliftResult<String>;

    /// Choose one item from `choices`, returning its index.
    fn select(&mut self, message: &str, choices: &[String]) -> AirliftResult<usize>;

    /// Inline validation feedback shown before a question repeats.
    fn report_invalid(&mut self, message: &str) {
        crate::ui::warn(message);
    }

    /// Out-of-band warning tied to the prompt flow.
    fn warn(&mut self, message: &str) {
        crate::ui::warn(message);
    }
}

/// Terminal-backed prompter using `dialoguer`.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str, default: bool) -> AirliftResult<bool> {
        Ok(dialoguer::Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()?)
    }

    fn text(&mut self, message: &str, initial: Option<&str>) -> AirliftResult<String> {
        let answer = match initial {
            Some(initial) => dialoguer::Input::<String>::new()
                .with_prompt(message)
                .allow_empty(true)
                .with_initial_text(initial)
                .interact_text()?,
            None => dialoguer::Input::<String>::new()
                .with_prompt(message)
                .allow_empty(true)
                .interact_text()?,
        };
        Ok(answer)
    }

    fn password(&mut self, message: &str) -> AirliftResult<String> {
        Ok(dialoguer::Password::new()
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()?)
    }

    fn select(&mut self, message: &str, choices: &[String]) -> AirliftResult<usize> {
        Ok(dialoguer::Select::new()
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact()?)
    }
}

/// Scripted prompter for tests.
///
/// Pops pre-seeded answers in order and records every prompt it served,
/// mirroring how `MockFileSystem`-style doubles replace the real seam.
/// Panics (test failure) when a question arrives that the script did not
/// anticipate.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<Answer>,
    /// Messages of every question asked, in order.
    pub prompts: Vec<String>,
    /// `initial` value passed to each text question, in order.
    pub initials: Vec<Option<String>>,
    /// Validation messages reported back to the user.
    pub invalid: Vec<String>,
    /// Out-of-band warnings emitted through the prompt flow.
    pub warnings: Vec<String>,
}

/// One scripted answer.
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum Answer {
    Confirm(bool),
    Text(String),
    Password(String),
    Select(usize),
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            prompts: Vec::new(),
            initials: Vec::new(),
            invalid: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn next(&mut self, message: &str) -> Answer {
        match self.answers.pop_front() {
            Some(answer) => answer,
            None => panic!("unscripted prompt: {message}"),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str, _default: bool) -> AirliftResult<bool> {
        self.prompts.push(message.to_string());
        match self.next(message) {
            Answer::Confirm(value) => Ok(value),
            other => panic!("expected confirm answer for '{message}', got {other:?}"),
        }
    }

    fn text(&mut self, message: &str, initial: Option<&str>) -> AirliftResult<String> {
        self.prompts.push(message.to_string());
        self.initials.push(initial.map(str::to_string));
        match self.next(message) {
            Answer::Text(value) => Ok(value),
            other => panic!("expected text answer for '{message}', got {other:?}"),
        }
    }

    fn password(&mut self, message: &str) -> AirliftResult<String> {
        self.prompts.push(message.to_string());
        match self.next(message) {
            Answer::Password(value) => Ok(value),
            other => panic!("expected password answer for '{message}', got {other:?}"),
        }
    }

    fn select(&mut self, message: &str, choices: &[String]) -> AirliftResult<usize> {
        self.prompts.push(format!("{message} {choices:?}"));
        match self.next(message) {
            Answer::Select(index) => Ok(index),
            other => panic!("expected select answer for '{message}', got {other:?}"),
        }
    }

    fn report_invalid(&mut self, message: &str) {
        self.invalid.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}
