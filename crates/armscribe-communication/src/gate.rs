//! Operator confirmation before motion
//!
//! Nothing is sent to the robot until a [`ConfirmationGate`] says yes.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use armscribe_core::Result;
use tracing::{info, warn};

/// Asks whether execution may proceed
pub trait ConfirmationGate {
    /// Present `prompt` and return the operator's answer
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Whether an answer counts as yes: `y` or `yes`, any case, surrounding
/// whitespace ignored
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Gate that prompts on a writer and reads one line from a reader
pub struct PromptGate<R, W> {
    input: R,
    output: W,
}

impl PromptGate<StdinLock<'static>, Stdout> {
    /// Prompt on the terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    /// Create a gate over arbitrary streams
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give the streams back
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for PromptGate<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{} (y/n): ", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            warn!("No answer before end of input; treating as no");
            return Ok(false);
        }

        let accepted = is_affirmative(&answer);
        info!(accepted, "Operator answered {:?}", answer.trim());
        Ok(accepted)
    }
}

/// Gate with a fixed answer, for unattended runs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoGate {
    /// Accept every prompt
    AlwaysYes,
    /// Decline every prompt
    AlwaysNo,
}

impl ConfirmationGate for AutoGate {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let accepted = matches!(self, AutoGate::AlwaysYes);
        info!(accepted, "{} (answered automatically)", prompt);
        Ok(accepted)
    }
}
