//! The fixed catalog of operations and their typed arguments.
//!
//! Each argument struct is the single source of truth for its operation:
//! the advertised `inputSchema` is derived from it and validated payloads are
//! deserialized into it.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Module categories understood by `show <type>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Exploit,
    Auxiliary,
    Post,
    Payload,
    Encoder,
    Nop,
}

impl ModuleType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exploit => "exploit",
            Self::Auxiliary => "auxiliary",
            Self::Post => "post",
            Self::Payload => "payload",
            Self::Encoder => "encoder",
            Self::Nop => "nop",
        }
    }

    pub const fn all() -> &'static [ModuleType] {
        &[
            ModuleType::Exploit,
            ModuleType::Auxiliary,
            ModuleType::Post,
            ModuleType::Payload,
            ModuleType::Encoder,
            ModuleType::Nop,
        ]
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(ModuleType::as_str).collect()
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModuleType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unsupported module type: {value}"))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteCommandArgs {
    /// The Metasploit command to execute
    pub command: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchExploitArgs {
    /// Search query (e.g., name, CVE number)
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfoArgs {
    /// Full path to the module (e.g., exploit/windows/smb/ms17_010_eternalblue)
    pub module_path: String,
}

/// Arguments for `list-modules`.
///
/// `type` is advertised as an enum, so an unknown category is rejected at
/// dispatch as an invalid argument. Callers that reach
/// [`MetasploitAdapter::list_modules`](crate::tools::MetasploitAdapter::list_modules)
/// directly get a failed result labelled "Invalid module type" instead.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListModulesArgs {
    /// Module type (exploit, auxiliary, post, payload, encoder, nop)
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetVersionArgs {}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunNmapScanArgs {
    /// Target IP or hostname
    pub target: String,
    /// Additional nmap options
    pub options: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunVulnScanArgs {
    /// Target IP or hostname
    pub target: String,
}

/// Every operation the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ExecuteCommand,
    SearchExploit,
    ModuleInfo,
    ListModules,
    GetVersion,
    RunNmapScan,
    RunVulnScan,
}

impl Operation {
    pub const fn all() -> &'static [Operation] {
        &[
            Operation::ExecuteCommand,
            Operation::SearchExploit,
            Operation::ModuleInfo,
            Operation::ListModules,
            Operation::GetVersion,
            Operation::RunNmapScan,
            Operation::RunVulnScan,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ExecuteCommand => "execute-command",
            Self::SearchExploit => "search-exploit",
            Self::ModuleInfo => "module-info",
            Self::ListModules => "list-modules",
            Self::GetVersion => "get-version",
            Self::RunNmapScan => "run-nmap-scan",
            Self::RunVulnScan => "run-vuln-scan",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::ExecuteCommand => "Execute a raw Metasploit command",
            Self::SearchExploit => "Search for exploits by name or CVE",
            Self::ModuleInfo => "Get information about a specific Metasploit module",
            Self::ListModules => "List available modules by type",
            Self::GetVersion => "Get Metasploit version information",
            Self::RunNmapScan => "Run a nmap scan using Metasploit",
            Self::RunVulnScan => "Run a vulnerability scan on a target",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
