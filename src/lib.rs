/// Repository adapter implementing the host's repository interface for GitHub
pub mod adapter;

/// Credential resolution, keychain storage and interactive login
pub mod auth;

/// Login/logout subcommand wiring for host binaries
pub mod commands;

/// Layered settings from config file, environment and flags
pub mod config;

/// Markdown rendering of host results
pub mod formatter;

/// GitHub REST client and the provider trait the adapter talks through
pub mod github;

/// Traits and result shapes defined by the workspace CLI host
pub mod host;

/// Manifest reading and organization grouping used by listings
pub mod services;

/// Core type definitions and domain models used throughout the library
pub mod types;
