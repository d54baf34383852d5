//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses keyed by prompt key.

use std::collections::HashMap;

use anyhow::anyhow;

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Messages captured so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Success messages captured so far.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Warnings captured so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Errors captured so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Keys of prompts that were shown, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }
}

/// Spinner handle that does nothing.
struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let response = self
            .prompt_responses
            .get(&prompt.key)
            .cloned()
            .or_else(|| prompt.default.clone())
            .ok_or_else(|| anyhow!("No mock response configured for prompt '{}'", prompt.key))?;

        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(response == "true")),
            _ => Ok(PromptResult::String(response)),
        }
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(MockSpinner)
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.success("done");
        ui.error("boom");

        assert_eq!(ui.messages(), &["hello".to_string()]);
        assert_eq!(ui.successes(), &["done".to_string()]);
        assert_eq!(ui.errors(), &["boom".to_string()]);
    }

    #[test]
    fn answers_prompt_from_configured_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("name", "my-app");

        let result = ui.prompt(&Prompt::input("name", "Project name?", None)).unwrap();
        assert_eq!(result.as_string(), "my-app");
        assert_eq!(ui.prompts_shown(), &["name".to_string()]);
    }

    #[test]
    fn falls_back_to_prompt_default() {
        let mut ui = MockUI::new();
        let result = ui
            .prompt(&Prompt::input("version", "Version?", Some("1.0.0")))
            .unwrap();
        assert_eq!(result.as_string(), "1.0.0");
    }

    #[test]
    fn unconfigured_prompt_without_default_errors() {
        let mut ui = MockUI::new();
        assert!(ui.prompt(&Prompt::input("missing", "?", None)).is_err());
    }

    #[test]
    fn confirm_response_parses_bool() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("continue", "true");

        let result = ui
            .prompt(&Prompt::confirm("continue", "Continue?", false))
            .unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }
}
