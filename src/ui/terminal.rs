//! Interactive terminal UI.

use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{GantryError, Result};

use super::theme::GantryTheme;
use super::{
    OutputMode, ProgressSpinner, Prompt, PromptOption, PromptResult, PromptType, SpinnerHandle,
    UserInterface,
};

/// Convert dialoguer errors to GantryError.
fn map_dialoguer_err(e: dialoguer::Error) -> GantryError {
    GantryError::Io(e.into())
}

/// UI implementation for interactive terminal sessions.
pub struct TerminalUI {
    mode: OutputMode,
    term: Term,
    theme: GantryTheme,
}

impl TerminalUI {
    /// Create a terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            term: Term::stderr(),
            theme: GantryTheme::new(),
        }
    }

    fn prompt_confirm(&self, prompt: &Prompt) -> Result<PromptResult> {
        let default = prompt
            .default
            .as_ref()
            .map(|s| s.to_lowercase() == "true" || s == "y" || s == "yes")
            .unwrap_or(true);

        let result = Confirm::new()
            .with_prompt(&prompt.question)
            .default(default)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)?;

        Ok(PromptResult::Bool(result))
    }

    fn prompt_input(&self, prompt: &Prompt) -> Result<PromptResult> {
        let theme = ColorfulTheme::default();
        let input = Input::<String>::with_theme(&theme)
            .with_prompt(&prompt.question);

        let result: String = if let Some(default) = &prompt.default {
            input
                .default(default.clone())
                .interact_on(&self.term)
                .map_err(map_dialoguer_err)?
        } else {
            input.interact_on(&self.term).map_err(map_dialoguer_err)?
        };

        Ok(PromptResult::String(result))
    }

    fn prompt_select(&self, prompt: &Prompt, options: &[PromptOption]) -> Result<PromptResult> {
        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

        let default_idx = prompt
            .default
            .as_ref()
            .and_then(|d| options.iter().position(|o| o.value == *d))
            .unwrap_or(0);

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(&prompt.question)
            .items(&labels)
            .default(default_idx)
            .interact_on(&self.term)
            .map_err(map_dialoguer_err)?;

        Ok(PromptResult::String(options[selection].value.clone()))
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode != OutputMode::Quiet {
            let _ = self.term.write_line(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode != OutputMode::Quiet {
            let _ = self.term.write_line(&self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        let _ = self.term.write_line(&self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        let _ = self.term.write_line(&self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        match &prompt.prompt_type {
            PromptType::Confirm => self.prompt_confirm(prompt),
            PromptType::Input => self.prompt_input(prompt),
            PromptType::Select { options } => self.prompt_select(prompt, options),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode == OutputMode::Quiet {
            Box::new(ProgressSpinner::hidden())
        } else {
            Box::new(ProgressSpinner::new(message))
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
