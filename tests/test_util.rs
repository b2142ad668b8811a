//! Shared fixtures for the integration tests: an in-memory provider, an
//! in-memory keychain and a scripted token prompt.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use monopoly_github::adapter::GitHandler;
use monopoly_github::auth::{AuthError, GithubAuthHandler, SecretStore};
use monopoly_github::config::AuthSettings;
use monopoly_github::github::{
    FileContent, ProviderAuth, ProviderError, RateLimitStatus, RemoteRepository,
    RepositoryProvider,
};
use monopoly_github::host::TokenPrompt;
use monopoly_github::types::{Owner, RepositoryName, SERVICE_NAME, Secret, Username};

pub fn remote_repository(owner: &str, name: &str) -> RemoteRepository {
    RemoteRepository {
        name: RepositoryName::from(name),
        full_name: Some(format!("{}/{}", owner, name)),
        owner: Owner::from(owner),
        clone_url: Some(format!("https://github.com/{}/{}.git", owner, name)),
        default_branch: Some("main".to_string()),
    }
}

pub fn manifest_file(json: &str) -> FileContent {
    FileContent {
        path: "package.json".to_string(),
        encoding: Some("base64".to_string()),
        content: Some(STANDARD.encode(json)),
    }
}

/// In-memory [`RepositoryProvider`] recording what it was asked for
#[derive(Default)]
pub struct MockProvider {
    pub repositories: Vec<RemoteRepository>,
    pub list_error: Option<ProviderError>,
    pub repository_errors: HashMap<String, ProviderError>,
    pub files: HashMap<String, Result<FileContent, ProviderError>>,
    pub rate_limit: Option<RateLimitStatus>,
    pub auth_calls: Mutex<Vec<ProviderAuth>>,
    pub file_requests: Mutex<Vec<(String, Option<String>)>>,
    pub rate_limit_calls: AtomicUsize,
}

impl MockProvider {
    pub fn with_repositories(repositories: Vec<RemoteRepository>) -> Self {
        Self {
            repositories,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, owner: &str, name: &str, file: Result<FileContent, ProviderError>) -> Self {
        self.files.insert(format!("{}/{}", owner, name), file);
        self
    }

    pub fn auth_calls(&self) -> Vec<ProviderAuth> {
        self.auth_calls.lock().unwrap().clone()
    }

    pub fn file_requests(&self) -> Vec<(String, Option<String>)> {
        self.file_requests.lock().unwrap().clone()
    }
}

impl RepositoryProvider for MockProvider {
    fn authenticate(&self, auth: ProviderAuth) -> Result<(), ProviderError> {
        self.auth_calls.lock().unwrap().push(auth);
        Ok(())
    }

    async fn get_repository(
        &self,
        owner: &Owner,
        name: &RepositoryName,
    ) -> Result<RemoteRepository, ProviderError> {
        let key = format!("{}/{}", owner, name);
        if let Some(error) = self.repository_errors.get(&key) {
            return Err(error.clone());
        }
        self.repositories
            .iter()
            .find(|repository| &repository.owner == owner && &repository.name == name)
            .cloned()
            .ok_or(ProviderError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    async fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError> {
        match &self.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.repositories.clone()),
        }
    }

    async fn get_file_content(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        _path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, ProviderError> {
        let key = format!("{}/{}", owner, name);
        self.file_requests
            .lock()
            .unwrap()
            .push((key.clone(), git_ref.map(str::to_string)));

        self.files.get(&key).cloned().unwrap_or(Err(ProviderError::Status {
            status: 404,
            message: "Not Found".to_string(),
        }))
    }

    async fn rate_limit(&self) -> Result<RateLimitStatus, ProviderError> {
        self.rate_limit_calls.fetch_add(1, Ordering::SeqCst);
        self.rate_limit.ok_or(ProviderError::Status {
            status: 401,
            message: "Bad credentials".to_string(),
        })
    }
}

/// In-memory [`SecretStore`] counting calls per operation
#[derive(Default)]
pub struct MemorySecretStore {
    pub entries: Mutex<HashMap<(String, String), String>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub get_calls: AtomicUsize,
    pub remove_calls: Mutex<Vec<String>>,
}

impl MemorySecretStore {
    pub fn with_entry(username: &str, secret: &str) -> Self {
        let store = Self::default();
        store.entries.lock().unwrap().insert(
            (SERVICE_NAME.to_string(), username.to_string()),
            secret.to_string(),
        );
        store
    }

    pub fn stored(&self, username: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(&(SERVICE_NAME.to_string(), username.to_string()))
            .cloned()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, username: &str) -> Result<Option<String>, AuthError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(AuthError::SecretStore("keychain locked".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(service.to_string(), username.to_string()))
            .cloned())
    }

    fn save(&self, service: &str, username: &str, secret: &str) -> Result<(), AuthError> {
        if self.fail_writes {
            return Err(AuthError::SecretStore(
                "could not save credentials to OS keychain".to_string(),
            ));
        }
        self.entries.lock().unwrap().insert(
            (service.to_string(), username.to_string()),
            secret.to_string(),
        );
        Ok(())
    }

    fn remove(&self, service: &str, username: &str) -> Result<bool, AuthError> {
        self.remove_calls.lock().unwrap().push(username.to_string());
        Ok(self
            .entries
            .lock()
            .unwrap()
            .remove(&(service.to_string(), username.to_string()))
            .is_some())
    }
}

/// Prompt answering with a fixed token, or failing when none is set
pub struct ScriptedPrompt {
    pub token: Option<String>,
    pub prompted_for: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            prompted_for: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            token: None,
            prompted_for: Mutex::new(Vec::new()),
        }
    }
}

impl TokenPrompt for ScriptedPrompt {
    fn prompt_token(&self, username: &str, _message: &str) -> anyhow::Result<String> {
        self.prompted_for.lock().unwrap().push(username.to_string());
        self.token
            .clone()
            .ok_or_else(|| anyhow::anyhow!("prompt closed"))
    }
}

pub fn env_settings(user: &str, password: &str) -> AuthSettings {
    AuthSettings {
        user_override: Some(Username::from(user)),
        password_override: Some(Secret::from(password)),
        ..AuthSettings::default()
    }
}

pub type TestAuthHandler = GithubAuthHandler<MemorySecretStore, MockProvider>;

pub fn auth_handler(
    store: MemorySecretStore,
    provider: Arc<MockProvider>,
    settings: AuthSettings,
    username: &str,
) -> TestAuthHandler {
    GithubAuthHandler::with_username(store, provider, settings, Username::from(username))
}

/// Adapter over `provider` whose keychain already holds a token for "alice"
pub fn logged_in_handler(
    provider: MockProvider,
) -> (Arc<MockProvider>, GitHandler<MockProvider, TestAuthHandler>) {
    let provider = Arc::new(provider);
    let auth = auth_handler(
        MemorySecretStore::with_entry("alice", "stored-token"),
        provider.clone(),
        AuthSettings::default(),
        "alice",
    );
    (provider.clone(), GitHandler::new(provider, auth))
}
