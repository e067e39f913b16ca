//! Interactive prompts for the deployment tool.

use dialoguer::{Confirm, Password};

use crate::error::DeployError;

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool, DeployError> {
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|e| DeployError::Prompt(e.to_string()))
}

/// Prompt for the operator's mnemonic phrase without echoing it.
pub fn prompt_mnemonic() -> Result<String, DeployError> {
    Password::new()
        .with_prompt("Enter mnemonic phrase")
        .interact()
        .map_err(|e| DeployError::Prompt(e.to_string()))
}
