//! Host interface
//!
//! The workspace CLI host drives the adapter through the [`RepoApi`] and
//! [`AuthHandler`] traits. Every repository operation answers with an
//! [`OperationResult`], serialized as an object tagged by `status` with the
//! payload fields flattened next to it:
//!
//! ```json
//! {"status": "OK", "repo": {"name": "acme/widgets", "id": "widgets"}}
//! {"status": "ERROR", "message": "API response 404: Not Found"}
//! ```

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::github::RateLimitStatus;
use crate::types::{
    Branch, Credentials, OrganizationRepositories, Owner, Repository, RepositoryFilter,
    RepositoryLookup, RepositoryName, RepositorySummary,
};

/// Message used by operations the adapter does not provide yet
pub const NOT_IMPLEMENTED_MESSAGE: &str = "not implemented yet";

/// Status tag of an [`OperationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperationStatus {
    #[strum(serialize = "OK")]
    Ok,
    #[strum(serialize = "ERROR")]
    Error,
    #[strum(serialize = "UNSUPPORTED")]
    Unsupported,
}

/// Uniform result handed back to the host. Errors never cross the adapter
/// boundary any other way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum OperationResult<T> {
    #[serde(rename = "OK")]
    Ok(T),
    #[serde(rename = "ERROR")]
    Error { message: String },
    /// The operation is part of the interface but not built for this provider
    #[serde(rename = "UNSUPPORTED")]
    Unsupported { operation: String, message: String },
}

impl<T> OperationResult<T> {
    pub fn error<M: std::fmt::Display>(message: M) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    pub fn unsupported(operation: &str) -> Self {
        Self::Unsupported {
            operation: operation.to_string(),
            message: NOT_IMPLEMENTED_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> OperationStatus {
        match self {
            Self::Ok(_) => OperationStatus::Ok,
            Self::Error { .. } => OperationStatus::Error,
            Self::Unsupported { .. } => OperationStatus::Unsupported,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Ok(payload) => Some(payload),
            _ => None,
        }
    }

    /// Error or unsupported message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Error { message } | Self::Unsupported { message, .. } => Some(message),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for OperationResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Self::Ok(payload),
            // alternate formatting keeps the anyhow context chain
            Err(e) => Self::error(format!("{:#}", e)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPayload {
    pub repo: Repository,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoListPayload {
    pub repo_list: Vec<OrganizationRepositories>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchListPayload {
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependenciesPayload {
    pub dependencies: Vec<RepositorySummary>,
}

pub type RepoResult = OperationResult<RepoPayload>;
pub type RepoListResult = OperationResult<RepoListPayload>;
pub type BranchListResult = OperationResult<BranchListPayload>;
pub type DependenciesResult = OperationResult<DependenciesPayload>;

/// Whether and where a listing reads repository manifests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DependencyMode {
    #[default]
    Skip,
    /// Read manifests at the listing branch, or the default branch when none is given
    Include,
    /// Read manifests at an explicit ref
    IncludeAt(Branch),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub branch: Option<Branch>,
    pub dependencies: DependencyMode,
}

impl ListOptions {
    pub fn with_dependencies(mut self, dependencies: DependencyMode) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_branch(mut self, branch: Option<Branch>) -> Self {
        self.branch = branch;
        self
    }

    /// Ref manifests should be read at, `None` meaning the default branch.
    /// Returns `None` as well when dependencies are skipped; check
    /// [`ListOptions::includes_dependencies`] first.
    pub fn manifest_ref(&self) -> Option<&Branch> {
        match &self.dependencies {
            DependencyMode::Skip => None,
            DependencyMode::Include => self.branch.as_ref(),
            DependencyMode::IncludeAt(git_ref) => Some(git_ref),
        }
    }

    pub fn includes_dependencies(&self) -> bool {
        !matches!(self.dependencies, DependencyMode::Skip)
    }
}

/// Outcome of a best-effort side effect such as a keychain write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffectOutcome {
    pub success: bool,
    pub diagnostic: Option<String>,
}

impl SideEffectOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            diagnostic: None,
        }
    }

    pub fn failed<M: Into<String>>(diagnostic: M) -> Self {
        Self {
            success: false,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Repository queries the host issues against a provider
pub trait RepoApi {
    /// Authenticate the provider client for subsequent calls
    #[allow(async_fn_in_trait)]
    async fn connect(&self) -> anyhow::Result<()>;

    #[allow(async_fn_in_trait)]
    async fn get_repo(&self, filter: &RepositoryLookup) -> RepoResult;

    #[allow(async_fn_in_trait)]
    async fn list(&self, filter: Option<&RepositoryFilter>, options: &ListOptions)
    -> RepoListResult;

    #[allow(async_fn_in_trait)]
    async fn list_branches(
        &self,
        project: &Owner,
        repo_name: &RepositoryName,
        filter: Option<&str>,
    ) -> BranchListResult;

    #[allow(async_fn_in_trait)]
    async fn list_dependencies(
        &self,
        project: &Owner,
        repo_name: &RepositoryName,
        branch: Option<&Branch>,
        filter: Option<&str>,
    ) -> DependenciesResult;
}

/// Source of the token typed in by the operator during interactive login
pub trait TokenPrompt {
    /// Show `message` and read a secret for `username`
    fn prompt_token(&self, username: &str, message: &str) -> anyhow::Result<String>;
}

/// Authentication lifecycle the host drives
pub trait AuthHandler {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve stored credentials and attach them to the provider client
    #[allow(async_fn_in_trait)]
    async fn do_login(&self) -> Result<(), Self::Error>;

    /// Prompt the operator for a token and persist it. Never fails the caller.
    #[allow(async_fn_in_trait)]
    async fn interactive_login<P: TokenPrompt>(&self, prompt: &P) -> SideEffectOutcome;

    /// Remove the stored credential. Returns whether an entry existed.
    #[allow(async_fn_in_trait)]
    async fn logout(&self) -> Result<bool, Self::Error>;

    /// Attach explicit username/password credentials
    #[allow(async_fn_in_trait)]
    async fn set_credentials(&self, credentials: Credentials) -> Result<(), Self::Error>;

    /// Read-only check that the provider is reachable with the current credentials
    #[allow(async_fn_in_trait)]
    async fn check_connectivity(&self) -> Result<RateLimitStatus, Self::Error>;
}
