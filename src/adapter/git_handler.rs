use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::github::{RemoteRepository, RepositoryProvider};
use crate::host::{
    AuthHandler, BranchListResult, DependenciesResult, ListOptions, OperationResult, RepoApi,
    RepoListPayload, RepoListResult, RepoPayload, RepoResult,
};
use crate::services::{ManifestReader, group_by_organization};
use crate::types::{
    Branch, DependencyRecord, Owner, Repository, RepositoryFilter, RepositoryLookup,
    RepositoryName, RepositorySummary,
};

/// Repository adapter for GitHub.
///
/// Every host operation logs in through the auth handler first, then talks
/// to the injected provider client. Failures come back as
/// [`OperationResult::Error`]; nothing is propagated to the host.
pub struct GitHandler<P, A> {
    provider: Arc<P>,
    auth_handler: A,
}

impl<P, A> GitHandler<P, A>
where
    P: RepositoryProvider,
    A: AuthHandler,
{
    pub fn new(provider: Arc<P>, auth_handler: A) -> Self {
        Self {
            provider,
            auth_handler,
        }
    }

    pub fn auth_handler(&self) -> &A {
        &self.auth_handler
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Dependency record of one repository; `None` when the manifest is
    /// missing or unreadable
    pub async fn get_dependencies(
        &self,
        owner: &Owner,
        name: &RepositoryName,
        git_ref: Option<&Branch>,
    ) -> Option<DependencyRecord> {
        ManifestReader::new(self.provider.as_ref())
            .get_dependencies(owner, name, git_ref)
            .await
    }

    async fn fetch_repo(&self, filter: &RepositoryLookup) -> Result<RepoPayload> {
        self.connect().await?;

        let remote = self
            .provider
            .get_repository(&filter.organization, &filter.name)
            .await
            .inspect_err(|e| debug!("get_repo {} failed: {:?}", filter, e))?;

        Ok(RepoPayload {
            repo: normalize_repository(remote, &filter.organization),
        })
    }

    async fn fetch_list(
        &self,
        filter: Option<&RepositoryFilter>,
        options: &ListOptions,
    ) -> Result<RepoListPayload> {
        self.connect().await?;

        let mut repositories = self
            .provider
            .list_repositories()
            .await
            .map_err(anyhow::Error::from)
            .context("could not list repositories")?;

        if let Some(filter) = filter {
            repositories.retain(|repository| {
                filter.matches(repository.name.as_str(), repository.owner.as_str())
            });
            debug!("{} repositories left after filter {:?}", repositories.len(), filter);
        }

        let summaries: Vec<RepositorySummary> = if options.includes_dependencies() {
            let records = ManifestReader::new(self.provider.as_ref())
                .get_dependencies_for_all(&repositories, options.manifest_ref())
                .await;

            let missing = records.iter().filter(|record| record.is_none()).count();
            if missing > 0 {
                warn!(
                    "{} of {} repositories listed without dependencies",
                    missing,
                    records.len()
                );
            }

            repositories
                .into_iter()
                .zip(records)
                .map(|(repository, record)| {
                    let summary = summarize(repository);
                    match record {
                        Some(record) => summary.with_dependencies(record),
                        None => summary,
                    }
                })
                .collect()
        } else {
            repositories.into_iter().map(summarize).collect()
        };

        let repo_list = group_by_organization(summaries);
        info!("listed repositories of {} organizations", repo_list.len());

        Ok(RepoListPayload { repo_list })
    }
}

impl<P, A> RepoApi for GitHandler<P, A>
where
    P: RepositoryProvider,
    A: AuthHandler,
{
    async fn connect(&self) -> Result<()> {
        self.auth_handler.do_login().await?;
        Ok(())
    }

    async fn get_repo(&self, filter: &RepositoryLookup) -> RepoResult {
        self.fetch_repo(filter).await.into()
    }

    async fn list(
        &self,
        filter: Option<&RepositoryFilter>,
        options: &ListOptions,
    ) -> RepoListResult {
        self.fetch_list(filter, options).await.into()
    }

    async fn list_branches(
        &self,
        _project: &Owner,
        _repo_name: &RepositoryName,
        _filter: Option<&str>,
    ) -> BranchListResult {
        OperationResult::unsupported("listBranches")
    }

    async fn list_dependencies(
        &self,
        _project: &Owner,
        _repo_name: &RepositoryName,
        _branch: Option<&Branch>,
        _filter: Option<&str>,
    ) -> DependenciesResult {
        OperationResult::unsupported("listDependencies")
    }
}

/// Relabels a provider repository to the host's field names
fn normalize_repository(remote: RemoteRepository, organization: &Owner) -> Repository {
    let full_name = remote
        .full_name
        .unwrap_or_else(|| format!("{}/{}", remote.owner, remote.name));

    Repository {
        name: full_name,
        id: remote.name.into_string(),
        organization: organization.clone(),
        url: remote.clone_url,
        default_branch: remote.default_branch.map(Branch::new),
    }
}

fn summarize(repository: RemoteRepository) -> RepositorySummary {
    RepositorySummary::new(repository.name, repository.owner)
}
