//! OS keychain access
//!
//! Entries are keyed by a service name and a username. The `keyring` crate
//! picks the platform store: macOS Keychain, Windows Credential Manager, or
//! on Linux the kernel keyring cached in front of the Secret Service, which
//! is what persists the entry across reboots.

use super::AuthError;

/// Persistent store for login secrets
pub trait SecretStore {
    /// Stored secret for `username`, `None` when there is no entry
    fn get(&self, service: &str, username: &str) -> Result<Option<String>, AuthError>;

    fn save(&self, service: &str, username: &str, secret: &str) -> Result<(), AuthError>;

    /// Removes the entry. Returns whether one existed.
    fn remove(&self, service: &str, username: &str) -> Result<bool, AuthError>;
}

/// [`SecretStore`] backed by the platform keychain
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringSecretStore;

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(service: &str, username: &str) -> Result<keyring::Entry, AuthError> {
        keyring::Entry::new(service, username)
            .map_err(|e| AuthError::SecretStore(format!("Invalid keychain entry: {}", e)))
    }
}

impl SecretStore for KeyringSecretStore {
    fn get(&self, service: &str, username: &str) -> Result<Option<String>, AuthError> {
        match Self::entry(service, username)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::SecretStore(format!(
                "Failed to read keychain entry: {}",
                e
            ))),
        }
    }

    fn save(&self, service: &str, username: &str, secret: &str) -> Result<(), AuthError> {
        Self::entry(service, username)?
            .set_password(secret)
            .map_err(|e| AuthError::SecretStore(format!("could not save credentials to OS keychain: {}", e)))
    }

    fn remove(&self, service: &str, username: &str) -> Result<bool, AuthError> {
        match Self::entry(service, username)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(AuthError::SecretStore(format!(
                "Failed to remove keychain entry: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use keyring::credential::{CredentialBuilderApi, CredentialPersistence};

    #[test]
    fn test_platform_store_keeps_entries_until_deleted() {
        let builder = keyring::default::default_credential_builder();

        assert!(matches!(
            builder.persistence(),
            CredentialPersistence::UntilDelete
        ));
    }
}
