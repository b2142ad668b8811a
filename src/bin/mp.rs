use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use monopoly_github::adapter::GitHandler;
use monopoly_github::auth::{GithubAuthHandler, KeyringSecretStore, TerminalPrompt};
use monopoly_github::commands::{AuthCommands, run_auth_command};
use monopoly_github::config::Settings;
use monopoly_github::formatter::{
    MarkdownContent, operation_result_markdown, repository_body_markdown,
    repository_list_markdown,
};
use monopoly_github::github::GitHubClient;
use monopoly_github::host::{
    AuthHandler, DependencyMode, ListOptions, OperationResult, RepoApi,
};
use monopoly_github::types::{Branch, Owner, RepositoryFilter, RepositoryLookup, RepositoryName};

#[derive(Parser)]
#[command(name = "mp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monopoly (Github) workspace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output format for results - json prints the raw host result, markdown a readable summary
    #[arg(long, global = true, default_value = "json")]
    format: OutputFormat,
    /// GitHub API base URL, e.g. for GitHub Enterprise (overrides GHE_URL and the config file)
    #[arg(long, global = true)]
    ghe_url: Option<String>,
    /// Request timeout in seconds for GitHub API calls
    #[arg(long, global = true)]
    request_timeout: Option<u64>,
    /// Path to a config.toml (default: <config dir>/monopoly/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Auth(AuthCommands),
    /// Fetch a single repository
    GetRepo {
        /// Owning organization or user
        organization: String,
        /// Repository name
        name: String,
    },
    /// List repositories visible to the logged in user, grouped by organization
    List {
        /// Keep repositories whose name contains this text
        #[arg(long)]
        name: Option<String>,
        /// Keep repositories whose owner contains this text
        #[arg(long)]
        organization: Option<String>,
        /// Branch to read manifests from when --dependencies is given without a ref
        #[arg(long)]
        branch: Option<String>,
        /// Include package.json dependencies, optionally read at the given ref
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        dependencies: Option<String>,
    },
    /// List branches of a repository
    ListBranches {
        project: String,
        repo: String,
        #[arg(long)]
        filter: Option<String>,
    },
    /// List dependencies of a repository
    ListDependencies {
        project: String,
        repo: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Check that GitHub is reachable with the stored credentials
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // octocrab's TLS stack needs a process-level crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("monopoly_github=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(ghe_url) = cli.ghe_url {
        settings.api_base_url = ghe_url;
    }
    if let Some(secs) = cli.request_timeout {
        settings.request_timeout = Some(Duration::from_secs(secs));
    }
    settings.validate()?;

    let provider = Arc::new(GitHubClient::new(
        Some(settings.api_base_url.clone()),
        settings.request_timeout,
    )?);
    let auth_handler =
        GithubAuthHandler::new(KeyringSecretStore::new(), provider.clone(), settings.auth);
    let handler = GitHandler::new(provider, auth_handler);

    match cli.command {
        Commands::Auth(command) => {
            run_auth_command(&command, handler.auth_handler(), &TerminalPrompt).await?;
        }
        Commands::GetRepo { organization, name } => {
            let result = handler
                .get_repo(&RepositoryLookup::new(organization, name))
                .await;
            print_result(&cli.format, &result, |payload| {
                repository_body_markdown(&payload.repo)
            })?;
        }
        Commands::List {
            name,
            organization,
            branch,
            dependencies,
        } => {
            let filter = RepositoryFilter::new(name, organization);
            let dependencies = match dependencies {
                None => DependencyMode::Skip,
                Some(git_ref) if git_ref.is_empty() => DependencyMode::Include,
                Some(git_ref) => DependencyMode::IncludeAt(Branch::new(git_ref)),
            };
            let options = ListOptions::default()
                .with_branch(branch.map(Branch::new))
                .with_dependencies(dependencies);

            let filter = (!filter.is_empty()).then_some(filter);
            let result = handler.list(filter.as_ref(), &options).await;
            print_result(&cli.format, &result, |payload| {
                repository_list_markdown(&payload.repo_list)
            })?;
        }
        Commands::ListBranches {
            project,
            repo,
            filter,
        } => {
            let result = handler
                .list_branches(
                    &Owner::from(project),
                    &RepositoryName::from(repo),
                    filter.as_deref(),
                )
                .await;
            print_result(&cli.format, &result, |payload| {
                MarkdownContent(
                    payload
                        .branches
                        .iter()
                        .map(|branch| format!("- {}\n", branch))
                        .collect(),
                )
            })?;
        }
        Commands::ListDependencies {
            project,
            repo,
            branch,
            filter,
        } => {
            let branch = branch.map(Branch::new);
            let result = handler
                .list_dependencies(
                    &Owner::from(project),
                    &RepositoryName::from(repo),
                    branch.as_ref(),
                    filter.as_deref(),
                )
                .await;
            print_result(&cli.format, &result, |payload| {
                MarkdownContent(
                    payload
                        .dependencies
                        .iter()
                        .map(|summary| format!("- {}\n", summary.name))
                        .collect(),
                )
            })?;
        }
        Commands::Check => {
            handler.connect().await?;
            let status = handler.auth_handler().check_connectivity().await?;
            println!(
                "Connected to {} ({} of {} requests remaining)",
                handler.provider().base_url(),
                status.remaining,
                status.limit
            );
        }
    }

    Ok(())
}

fn print_result<T, F>(format: &OutputFormat, result: &OperationResult<T>, body: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> MarkdownContent,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Markdown => print!("{}", operation_result_markdown(result, body)),
    }
    Ok(())
}
