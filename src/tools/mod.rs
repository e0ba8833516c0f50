//! Operation catalog, dispatch and the Metasploit adapter.
//!
//! # Tool Lifecycle
//!
//! 1. A call arrives by operation name with raw JSON arguments
//! 2. The registry validates the arguments against the operation's schema
//! 3. The adapter renders one console script and runs it once
//! 4. The process outcome is normalized into an `ExecutionResult`
//!
//! # Module Structure
//!
//! - `types`: Core types (ToolCallInput, ExecutionResult, ToolError)
//! - `operations`: The operation catalog and typed argument structs
//! - `schema`: Schema derivation and structural validation
//! - `registry`: ToolRegistry for listing and invoking operations
//! - `msf`: Script templating and result normalization
//! - `runner`: Subprocess capability behind a trait

pub use msf::MetasploitAdapter;
pub use operations::{ModuleType, Operation};
pub use registry::ToolRegistry;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use types::{ExecutionResult, ToolCallInput, ToolError};

pub mod msf;
pub mod operations;
mod registry;
pub mod runner;
pub mod schema;
mod types;

pub use types::{EXECUTION_FAILED, INVALID_MODULE_TYPE};
