//! Login/logout subcommands
//!
//! Host binaries flatten [`AuthCommands`] into their own subcommand enum and
//! dispatch the parsed value through [`run_auth_command`].

use anyhow::Result;
use clap::Subcommand;

use crate::host::{AuthHandler, TokenPrompt};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum AuthCommands {
    /// Handle user login for monopoly
    Login,
    /// Removes username and password storage
    Logout,
}

pub async fn run_auth_command<A, P>(command: &AuthCommands, handler: &A, prompt: &P) -> Result<()>
where
    A: AuthHandler,
    P: TokenPrompt,
{
    match command {
        AuthCommands::Login => {
            let outcome = handler.interactive_login(prompt).await;
            if outcome.success {
                println!("credentials saved successfully!");
            } else if let Some(diagnostic) = outcome.diagnostic {
                eprintln!("login did not complete: {}", diagnostic);
            }
        }
        AuthCommands::Logout => {
            if handler.logout().await? {
                println!("Stored credentials removed");
            } else {
                println!("No stored credentials found");
            }
        }
    }
    Ok(())
}
