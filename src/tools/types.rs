//! Shared types for the tool system.
//!
//! This module defines the core abstractions for tools:
//! - Tool input type (an operation name plus its raw arguments)
//! - The normalized execution result every operation produces
//! - Error types for dispatch-level failures

use serde::{Deserialize, Serialize};

/// Error label attached to every failed engine invocation.
pub const EXECUTION_FAILED: &str = "Command execution failed";

/// Error label for a module listing with an unrecognized category.
pub const INVALID_MODULE_TYPE: &str = "Invalid module type";

/// Input to a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallInput {
    pub name: String,
    pub args: serde_json::Value,
}

impl ToolCallInput {
    pub fn new(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Normalized outcome of one engine invocation.
///
/// `success` is true only when the process ran to completion without writing
/// to its error stream. On failure `output` carries the captured error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: Some(error.into()),
        }
    }
}

/// Errors raised before an operation reaches the adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("invalid argument '{field}': {reason}")]
    InvalidArguments { field: String, reason: String },
}

impl ToolError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
