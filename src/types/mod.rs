//! Core type system and domain definitions
//!
//! This module provides the value shapes exchanged between the host, the
//! adapter and the provider client. None of them outlive the request that
//! produced them.

pub mod credentials;
pub mod dependency;
pub mod repository;

pub use credentials::*;
pub use dependency::*;
pub use repository::*;
