//! Metasploit MCP server library.
//!
//! Exposes a fixed catalog of Metasploit console operations to MCP clients
//! over stdio. It handles:
//! - Protocol framing and JSON-RPC routing
//! - Schema validation of tool arguments
//! - Translating each operation into one `msfconsole` invocation
//!
//! # Architecture
//!
//! - `mcp`: JSON-RPC types, stdio transport and the request router
//! - `tools`: Operation catalog, dispatch and the console adapter
//! - `config`: Environment-driven settings
//! - `core`: Shared types

pub mod config;
pub mod core;
pub mod mcp;
pub mod tools;

use std::sync::Arc;

use config::ServerConfig;
use mcp::{McpServer, TransportError};
use tools::{CommandRunner, MetasploitAdapter, ProcessRunner, ToolRegistry};

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Wire the registry and server around a command runner.
pub fn build_server(config: &ServerConfig, runner: Arc<dyn CommandRunner>) -> Arc<McpServer> {
    let adapter = MetasploitAdapter::new(config.console_path.clone(), runner);
    Arc::new(McpServer::new(ToolRegistry::new(adapter)))
}

/// Serve MCP on stdin/stdout until the client closes its end.
pub async fn serve_stdio(config: &ServerConfig) -> Result<(), AppError> {
    let server = build_server(config, Arc::new(ProcessRunner));
    let (reader, writer) = mcp::transport::stdio();

    tracing::info!(
        console = %config.console_path,
        tools = server.registry().list().len(),
        "Metasploit MCP server running on stdio"
    );
    server.serve(reader, writer).await?;
    tracing::info!("Input closed, shutting down");
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
    // stdout carries protocol messages, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

// ---------------------------------------------------------------------------
// Application entry point
// ---------------------------------------------------------------------------

pub fn run() -> Result<(), AppError> {
    let config = ServerConfig::load();
    init_tracing(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve_stdio(&config)).inspect_err(|e| {
        tracing::error!("Failed to run Metasploit MCP server: {}", e);
    })
}
