use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::prompt::LOGIN_PROMPT_MESSAGE;
use super::{AuthError, SecretStore};
use crate::config::AuthSettings;
use crate::github::{ProviderAuth, RateLimitStatus, RepositoryProvider};
use crate::host::{AuthHandler, SideEffectOutcome, TokenPrompt};
use crate::types::{Credentials, Secret, Username};

/// Token-based authentication against GitHub.
///
/// Credentials come from the `MP_USER`/`MP_PASSWORD` override when both are
/// set, otherwise from the keychain entry of the resolved username. The only
/// state kept between calls is whether an interactive login is running.
pub struct GithubAuthHandler<S, P> {
    store: S,
    provider: Arc<P>,
    settings: AuthSettings,
    username: Username,
    in_progress: AtomicBool,
}

impl<S: SecretStore, P: RepositoryProvider> GithubAuthHandler<S, P> {
    /// Resolves the keychain username from the override, else the OS user (lowercased)
    pub fn new(store: S, provider: Arc<P>, settings: AuthSettings) -> Self {
        let username = settings
            .user_override
            .clone()
            .unwrap_or_else(|| Username::from(whoami::username().to_lowercase()));

        Self::with_username(store, provider, settings, username)
    }

    pub fn with_username(
        store: S,
        provider: Arc<P>,
        settings: AuthSettings,
        username: Username,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
            username,
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    fn resolve_credentials(&self) -> Option<Credentials> {
        if let (Some(user), Some(password)) = (
            &self.settings.user_override,
            &self.settings.password_override,
        ) {
            warn!("Using environment credentials!");
            return Some(Credentials::new(user.clone(), password.clone()));
        }

        match self
            .store
            .get(&self.settings.service_name, self.username.as_str())
        {
            Ok(Some(secret)) => Some(Credentials::new(self.username.clone(), Secret::from(secret))),
            Ok(None) => {
                debug!("no stored credentials for {}", self.username);
                None
            }
            Err(e) => {
                debug!("did not get credentials from OS: {}", e);
                None
            }
        }
    }
}

impl<S: SecretStore, P: RepositoryProvider> AuthHandler for GithubAuthHandler<S, P> {
    type Error = AuthError;

    async fn do_login(&self) -> Result<(), AuthError> {
        let credentials = self
            .resolve_credentials()
            .filter(Credentials::is_complete)
            .ok_or(AuthError::NotLoggedIn)?;

        debug!("authenticating as {}", credentials.username);
        self.provider
            .authenticate(ProviderAuth::Token(credentials.password))?;
        Ok(())
    }

    async fn interactive_login<T: TokenPrompt>(&self, prompt: &T) -> SideEffectOutcome {
        self.in_progress.store(true, Ordering::SeqCst);

        let outcome = match prompt.prompt_token(self.username.as_str(), LOGIN_PROMPT_MESSAGE) {
            Ok(token) if token.is_empty() => SideEffectOutcome::failed("no token entered"),
            Ok(token) => match self.store.save(
                &self.settings.service_name,
                self.username.as_str(),
                &token,
            ) {
                Ok(()) => {
                    info!("credentials saved successfully!");
                    SideEffectOutcome::succeeded()
                }
                Err(e) => SideEffectOutcome::failed(e.to_string()),
            },
            Err(e) => SideEffectOutcome::failed(format!("{:#}", e)),
        };

        if let Some(diagnostic) = &outcome.diagnostic {
            warn!("{}", diagnostic);
        }

        self.in_progress.store(false, Ordering::SeqCst);
        outcome
    }

    async fn logout(&self) -> Result<bool, AuthError> {
        let removed = self
            .store
            .remove(&self.settings.service_name, self.username.as_str())?;
        if removed {
            info!("removed stored credentials for {}", self.username);
        } else {
            debug!("no stored credentials for {}", self.username);
        }
        Ok(removed)
    }

    async fn set_credentials(&self, credentials: Credentials) -> Result<(), AuthError> {
        if !credentials.is_complete() {
            return Err(AuthError::NotLoggedIn);
        }
        self.provider.authenticate(ProviderAuth::Basic(credentials))?;
        Ok(())
    }

    async fn check_connectivity(&self) -> Result<RateLimitStatus, AuthError> {
        let status = self.provider.rate_limit().await?;
        debug!(
            "rate limit: {}/{} remaining, resets at {}",
            status.remaining, status.limit, status.reset
        );
        Ok(status)
    }
}
