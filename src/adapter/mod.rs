//! Repository adapter implementing the host's repository interface for GitHub

pub mod git_handler;

pub use git_handler::GitHandler;
