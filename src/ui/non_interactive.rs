//! Non-interactive UI for CI/headless environments.
//!
//! Prompts are never shown; defaults are taken where available, and a
//! prompt without a default is an error rather than a hang.

use anyhow::anyhow;

use crate::error::Result;

use super::{
    OutputMode, ProgressSpinner, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// UI implementation that answers every prompt from its default.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode != OutputMode::Quiet {
            eprintln!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode != OutputMode::Quiet {
            eprintln!("{}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("warning: {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("error: {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        match (&prompt.prompt_type, &prompt.default) {
            (PromptType::Confirm, Some(d)) => Ok(PromptResult::Bool(d == "true")),
            (PromptType::Confirm, None) => Ok(PromptResult::Bool(false)),
            (_, Some(d)) => Ok(PromptResult::String(d.clone())),
            (PromptType::Select { options }, None) if !options.is_empty() => {
                Ok(PromptResult::String(options[0].value.clone()))
            }
            _ => Err(anyhow!(
                "Prompt '{}' has no default and cannot be answered non-interactively",
                prompt.key
            )
            .into()),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode != OutputMode::Quiet {
            eprintln!("{}", message);
        }
        Box::new(ProgressSpinner::hidden())
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
