//! Shared helpers for command handlers.

use std::path::Path;

use crate::cli::Toggle;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt {
            message: e.to_string(),
        })
}

/// Read a PEM or other text file supplied on the command line.
pub fn read_text_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a binary file (firmware image).
pub fn read_binary_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

pub fn toggle(value: Option<Toggle>) -> Option<bool> {
    value.map(Toggle::enabled)
}

/// Ask for a secret twice; both entries must match.
pub fn prompt_new_secret(label: &str) -> Result<String, CliError> {
    dialoguer::Password::new()
        .with_prompt(label)
        .with_confirmation("Repeat to confirm", "Entries do not match")
        .interact()
        .map_err(|e| CliError::Prompt {
            message: e.to_string(),
        })
}
