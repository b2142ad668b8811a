use crate::github::ProviderError;

/// Authentication failures
#[derive(Debug)]
pub enum AuthError {
    /// Neither the environment nor the keychain yielded usable credentials
    NotLoggedIn,
    /// Keychain could not be reached or refused the operation
    SecretStore(String),
    /// Provider client rejected the credentials or could not be reached
    Provider(ProviderError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotLoggedIn => {
                write!(f, "Not logged in to monopoly, please run login command")
            }
            AuthError::SecretStore(details) => write!(f, "Secret store error: {}", details),
            AuthError::Provider(error) => write!(f, "Provider error: {}", error),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Provider(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(error: ProviderError) -> Self {
        AuthError::Provider(error)
    }
}
