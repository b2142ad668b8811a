//! Repository domain types
//!
//! This module holds the repository shapes handed back to the host: the single
//! repository record returned by `get_repo`, the per-repository summary used in
//! listings, and the organization grouping wrapped around those summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::DependencyRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Branch(pub String);

impl Branch {
    pub fn new<T: Into<String>>(branch: T) -> Self {
        Self(branch.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner login (user or organization) wrapper for type safety
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(owner: String) -> Self {
        Self(owner)
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Owner {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Repository name wrapper for type safety
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn new(repo_name: String) -> Self {
        Self(repo_name)
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RepositoryName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepositoryName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifies exactly one repository for `get_repo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLookup {
    pub name: RepositoryName,
    pub organization: Owner,
}

impl RepositoryLookup {
    pub fn new<T1: Into<String>, T2: Into<String>>(organization: T1, name: T2) -> Self {
        Self {
            name: RepositoryName::new(name.into()),
            organization: Owner::new(organization.into()),
        }
    }
}

impl std::fmt::Display for RepositoryLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.name)
    }
}

/// Substring filter applied to repository listings.
///
/// Every criterion that is present must match: `name` against the repository
/// name and `organization` against the owner login. A filter with no criteria
/// matches every repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFilter {
    pub name: Option<String>,
    pub organization: Option<String>,
}

impl RepositoryFilter {
    pub fn new(name: Option<String>, organization: Option<String>) -> Self {
        Self { name, organization }
    }

    pub fn is_empty(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
            && self.organization.as_deref().is_none_or(str::is_empty)
    }

    pub fn matches(&self, repository_name: &str, owner_login: &str) -> bool {
        let name_matches = self
            .name
            .as_deref()
            .is_none_or(|name| repository_name.contains(name));
        let organization_matches = self
            .organization
            .as_deref()
            .is_none_or(|organization| owner_login.contains(organization));

        name_matches && organization_matches
    }
}

/// Normalized repository record returned to the host by `get_repo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Full provider name (`owner/repo`)
    pub name: String,
    /// Short repository name
    pub id: String,
    /// Organization the caller asked for
    pub organization: Owner,
    /// Clone URL
    pub url: Option<String>,
    pub default_branch: Option<Branch>,
}

/// One entry of a repository listing.
///
/// Dependency fields are only populated when the listing asked for
/// dependencies and the repository manifest could be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: RepositoryName,
    /// Owner login of the repository
    pub project: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_deps: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_deps: Option<BTreeMap<String, String>>,
}

impl RepositorySummary {
    pub fn new(name: RepositoryName, project: Owner) -> Self {
        Self {
            name,
            project,
            package_name: None,
            version: None,
            deps: None,
            peer_deps: None,
            dev_deps: None,
        }
    }

    pub fn with_dependencies(mut self, record: DependencyRecord) -> Self {
        self.package_name = record.package_name;
        self.version = record.version;
        self.deps = Some(record.dependencies);
        self.peer_deps = Some(record.peer_dependencies);
        self.dev_deps = Some(record.dev_dependencies);
        self
    }

    pub fn has_dependencies(&self) -> bool {
        self.deps.is_some()
    }
}

/// Repositories sharing one owner login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRepositories {
    pub organization: Owner,
    pub repos: Vec<RepositorySummary>,
}
