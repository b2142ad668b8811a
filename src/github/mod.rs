pub mod client;
pub mod error;

pub use client::{
    FileContent, GitHubClient, ProviderAuth, RateLimitStatus, RemoteRepository,
    RepositoryProvider,
};
pub use error::ProviderError;
