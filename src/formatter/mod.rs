pub mod repository;

use serde::{Deserialize, Serialize};

use crate::host::OperationResult;

pub use repository::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownContent(pub String);

impl std::fmt::Display for MarkdownContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renders a host result, using `body` for the success payload
pub fn operation_result_markdown<T, F>(result: &OperationResult<T>, body: F) -> MarkdownContent
where
    F: FnOnce(&T) -> MarkdownContent,
{
    match result {
        OperationResult::Ok(payload) => body(payload),
        OperationResult::Error { message } => {
            MarkdownContent(format!("**{}**: {}\n", result.status(), message))
        }
        OperationResult::Unsupported { operation, message } => MarkdownContent(format!(
            "**{}**: {} ({})\n",
            result.status(),
            operation,
            message
        )),
    }
}
