//! Credential types
//!
//! Secrets are wrapped so they never end up in `Debug` output or log lines.

use serde::{Deserialize, Serialize};

/// Fixed keychain service name credentials are stored under
pub const SERVICE_NAME: &str = "monopoly-CLI";

/// Username the keychain entry is keyed by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(username: String) -> Self {
        Self(username)
    }

    /// Get the username as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Username::new(s.to_string())
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Username::new(s)
    }
}

impl PartialEq<&str> for Username {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Password or personal access token
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new<T: Into<String>>(secret: T) -> Self {
        Self(secret.into())
    }

    /// Exposes the raw secret. Only hand this to the API client or the keychain.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Secret(s)
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Secret(s.to_string())
    }
}

/// Username plus password, where a personal access token may stand in for the password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: Username,
    pub password: Secret,
}

impl Credentials {
    pub fn new(username: Username, password: Secret) -> Self {
        Self { username, password }
    }

    /// Both parts must be non-empty for the credentials to be usable
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted_in_debug_output() {
        let credentials = Credentials::new(Username::from("alice"), Secret::from("tok123"));
        let rendered = format!("{:?}", credentials);

        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("tok123"));
    }

    #[test]
    fn test_incomplete_credentials() {
        assert!(!Credentials::new(Username::from(""), Secret::from("tok123")).is_complete());
        assert!(!Credentials::new(Username::from("alice"), Secret::from("")).is_complete());
        assert!(Credentials::new(Username::from("alice"), Secret::from("tok123")).is_complete());
    }
}
