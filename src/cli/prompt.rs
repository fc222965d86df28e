//! Interactive prompts

use dialoguer::{Confirm, Input, Password};

use crate::error::Result;

/// Source of interactive answers
pub trait Prompter {
    /// Free-text line; an empty answer returns `default` when one is given
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Hidden input (private key)
    fn secret(&self, prompt: &str) -> Result<String>;

    /// Yes/no question, defaulting to no
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Terminal prompts via dialoguer
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        let value = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(value.trim().to_string())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }
}
