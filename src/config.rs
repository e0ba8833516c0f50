//! Runtime configuration read from the environment.
//!
//! An optional `.env` file in the working directory is loaded first; values
//! already present in the process environment take precedence.

use crate::tools::msf::DEFAULT_CONSOLE_PATH;

pub const CONSOLE_PATH_ENV: &str = "MSF_CONSOLE_PATH";
pub const LOG_FILTER_ENV: &str = "MSF_MCP_LOG";
pub const DEFAULT_LOG_FILTER: &str = "metasploit_mcp_lib=info,warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Executable used to start the console.
    pub console_path: String,
    /// `EnvFilter` directive for the log subscriber.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            console_path: DEFAULT_CONSOLE_PATH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            console_path: read(CONSOLE_PATH_ENV).unwrap_or(defaults.console_path),
            log_filter: read(LOG_FILTER_ENV)
                .or_else(|| read("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
        }
    }
}
