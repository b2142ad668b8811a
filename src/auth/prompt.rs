use anyhow::{Context, Result};

use crate::host::TokenPrompt;

/// Text shown before asking for a personal access token
pub const LOGIN_PROMPT_MESSAGE: &str = "Hi, To use Monopoly cli we need to get a way to access your github information\n\
the easiest way is for you to create a personal token - you can make one at https://github.com/settings/tokens , we need repo permissions only.\n\
Please enter it here";

/// Reads the token from the controlling terminal without echoing it
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TokenPrompt for TerminalPrompt {
    fn prompt_token(&self, username: &str, message: &str) -> Result<String> {
        eprintln!("{}", message);
        let token = rpassword::prompt_password(format!("Token for {}: ", username))
            .context("Failed to read token from terminal")?;
        Ok(token.trim().to_string())
    }
}
