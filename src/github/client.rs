use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use octocrab::Octocrab;
use octocrab::models::repos::Content;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::{debug, info};

use crate::github::error::ProviderError;
use crate::types::{Credentials, Owner, RepositoryName, Secret};

/// Public GitHub REST endpoint, used unless an enterprise base URL is configured
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Page size for repository listings (GitHub API maximum)
const REPOSITORY_LIST_PER_PAGE: u8 = 100;

/// Repository metadata as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub name: RepositoryName,
    pub full_name: Option<String>,
    pub owner: Owner,
    pub clone_url: Option<String>,
    pub default_branch: Option<String>,
}

/// Raw file content as returned by the contents endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    /// Encoding of `content`, `base64` for regular files
    pub encoding: Option<String>,
    pub content: Option<String>,
}

/// Core rate-limit quota of the authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub limit: u64,
    pub remaining: u64,
    /// Unix epoch seconds at which the quota resets
    pub reset: u64,
}

/// How subsequent provider calls authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderAuth {
    Token(Secret),
    Basic(Credentials),
}

/// Operations the adapter needs from a source-control provider.
///
/// The adapter only talks to the provider through this trait so tests can
/// substitute an in-memory implementation.
pub trait RepositoryProvider {
    /// Attach credentials to every subsequent request
    fn authenticate(&self, auth: ProviderAuth) -> Result<(), ProviderError>;

    #[allow(async_fn_in_trait)]
    async fn get_repository(
        &self,
        owner: &Owner,
        name: &RepositoryName,
    ) -> Result<RemoteRepository, ProviderError>;

    /// All repositories visible to the authenticated identity, in provider order
    #[allow(async_fn_in_trait)]
    async fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError>;

    #[allow(async_fn_in_trait)]
    async fn get_file_content(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, ProviderError>;

    #[allow(async_fn_in_trait)]
    async fn rate_limit(&self) -> Result<RateLimitStatus, ProviderError>;
}

impl<P: RepositoryProvider> RepositoryProvider for Arc<P> {
    fn authenticate(&self, auth: ProviderAuth) -> Result<(), ProviderError> {
        (**self).authenticate(auth)
    }

    async fn get_repository(
        &self,
        owner: &Owner,
        name: &RepositoryName,
    ) -> Result<RemoteRepository, ProviderError> {
        (**self).get_repository(owner, name).await
    }

    async fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError> {
        (**self).list_repositories().await
    }

    async fn get_file_content(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, ProviderError> {
        (**self).get_file_content(owner, name, path, git_ref).await
    }

    async fn rate_limit(&self) -> Result<RateLimitStatus, ProviderError> {
        (**self).rate_limit().await
    }
}

/// GitHub REST client backed by octocrab.
///
/// Octocrab instances are immutable, so authenticating rebuilds the inner
/// client with the new credentials and swaps it in place.
#[derive(Clone)]
pub struct GitHubClient {
    client: Arc<RwLock<Octocrab>>,
    base_url: String,
    timeout: Option<Duration>,
}

impl GitHubClient {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let client = build_octocrab(&base_url, timeout, None)?;

        Ok(Self {
            client: Arc::new(RwLock::new(client)),
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn octocrab(&self) -> Result<Octocrab, ProviderError> {
        self.client
            .read()
            .map(|client| client.clone())
            .map_err(|_| ProviderError::Configuration("GitHub client lock poisoned".to_string()))
    }

    /// GETs `route` relative to the base URL and decodes the JSON body.
    ///
    /// The status is checked before decoding so that non-JSON error bodies
    /// from proxies or GHE front ends still surface as `Status` errors.
    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, ProviderError> {
        let client = self.octocrab()?;
        let response = client._get(route).await?;
        let status = response.status();
        let body = client.body_to_string(response).await;

        if !status.is_success() {
            debug!("GET {} answered {}", route, status);
            return Err(ProviderError::from_response(
                status.as_u16(),
                status.canonical_reason(),
                &body.unwrap_or_default(),
            ));
        }

        serde_json::from_str(&body?).map_err(|e| {
            ProviderError::Decode(format!("Failed to parse response from {}: {}", route, e))
        })
    }
}

/// Contents endpoint answers with an object for files and an array for directories
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentResponse {
    File(Box<Content>),
    Directory(Vec<Content>),
}

fn build_octocrab(
    base_url: &str,
    timeout: Option<Duration>,
    auth: Option<&ProviderAuth>,
) -> Result<Octocrab> {
    let mut builder = Octocrab::builder()
        .base_uri(base_url)
        .with_context(|| format!("Invalid GitHub API base URL: {}", base_url))?;

    match auth {
        Some(ProviderAuth::Token(token)) => {
            builder = builder.personal_token(token.expose().to_string());
        }
        Some(ProviderAuth::Basic(credentials)) => {
            builder = builder.basic_auth(
                credentials.username.as_str().to_string(),
                credentials.password.expose().to_string(),
            );
        }
        None => {}
    }

    let timeout_duration = timeout.unwrap_or_else(|| Duration::from_secs(10));
    let connection_timeout = if timeout_duration < Duration::from_secs(10) {
        std::cmp::max(timeout_duration, Duration::from_secs(1))
    } else {
        Duration::from_secs(30)
    };

    let read_write_timeout = std::cmp::max(timeout_duration, Duration::from_secs(1));

    builder = builder
        .set_connect_timeout(Some(connection_timeout))
        .set_read_timeout(Some(read_write_timeout))
        .set_write_timeout(Some(read_write_timeout));

    builder.build().context("Failed to build GitHub client")
}

impl From<octocrab::models::Repository> for RemoteRepository {
    fn from(repository: octocrab::models::Repository) -> Self {
        // The owner is always present on REST repository payloads; fall back to
        // the full name prefix when it is not.
        let owner = repository
            .owner
            .map(|owner| owner.login)
            .or_else(|| {
                repository
                    .full_name
                    .as_deref()
                    .and_then(|full_name| full_name.split_once('/'))
                    .map(|(owner, _)| owner.to_string())
            })
            .unwrap_or_default();

        Self {
            name: RepositoryName::new(repository.name),
            full_name: repository.full_name,
            owner: Owner::new(owner),
            clone_url: repository.clone_url.map(|url| url.to_string()),
            default_branch: repository.default_branch,
        }
    }
}

impl RepositoryProvider for GitHubClient {
    fn authenticate(&self, auth: ProviderAuth) -> Result<(), ProviderError> {
        let client = build_octocrab(&self.base_url, self.timeout, Some(&auth))
            .map_err(|e| ProviderError::Configuration(format!("{:#}", e)))?;

        let mut guard = self
            .client
            .write()
            .map_err(|_| ProviderError::Configuration("GitHub client lock poisoned".to_string()))?;
        *guard = client;

        debug!(
            "GitHub client authenticated with {} credentials",
            match auth {
                ProviderAuth::Token(_) => "token",
                ProviderAuth::Basic(_) => "basic",
            }
        );
        Ok(())
    }

    async fn get_repository(
        &self,
        owner: &Owner,
        name: &RepositoryName,
    ) -> Result<RemoteRepository, ProviderError> {
        debug!("Fetching repository {}/{}", owner, name);

        let repository: octocrab::models::Repository = self
            .get_json(&format!("/repos/{}/{}", owner, name))
            .await?;

        Ok(RemoteRepository::from(repository))
    }

    async fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError> {
        let start_time = std::time::Instant::now();
        let mut repositories = Vec::new();

        // a short page is the last one
        for page in 1u32.. {
            let batch: Vec<octocrab::models::Repository> = self
                .get_json(&format!(
                    "/user/repos?per_page={}&page={}",
                    REPOSITORY_LIST_PER_PAGE, page
                ))
                .await?;
            let last_page = batch.len() < usize::from(REPOSITORY_LIST_PER_PAGE);
            repositories.extend(batch.into_iter().map(RemoteRepository::from));
            if last_page {
                break;
            }
        }

        info!(
            "Listed {} repositories in {:?}",
            repositories.len(),
            start_time.elapsed()
        );

        Ok(repositories)
    }

    async fn get_file_content(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, ProviderError> {
        debug!(
            "Fetching {} from {}/{} at {}",
            path,
            owner,
            name,
            git_ref.unwrap_or("default branch")
        );

        let mut route = format!("/repos/{}/{}/contents/{}", owner, name, path);
        if let Some(git_ref) = git_ref {
            let encoded: String = url::form_urlencoded::byte_serialize(git_ref.as_bytes()).collect();
            route.push_str(&format!("?ref={}", encoded));
        }

        let item = match self.get_json::<ContentResponse>(&route).await? {
            ContentResponse::File(item) => *item,
            ContentResponse::Directory(_) => {
                return Err(ProviderError::Decode(format!(
                    "{} is a directory, not a file",
                    path
                )));
            }
        };

        Ok(FileContent {
            path: item.path,
            encoding: item.encoding,
            content: item.content,
        })
    }

    async fn rate_limit(&self) -> Result<RateLimitStatus, ProviderError> {
        let rate_limit: octocrab::models::RateLimit = self.get_json("/rate_limit").await?;
        let core = rate_limit.resources.core;

        Ok(RateLimitStatus {
            limit: core.limit as u64,
            remaining: core.remaining as u64,
            reset: core.reset,
        })
    }
}
