//! Credential resolution, keychain persistence and interactive login

pub mod error;
pub mod handler;
pub mod prompt;
pub mod secret_store;

pub use error::AuthError;
pub use handler::GithubAuthHandler;
pub use prompt::{LOGIN_PROMPT_MESSAGE, TerminalPrompt};
pub use secret_store::{KeyringSecretStore, SecretStore};
