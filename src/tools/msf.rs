//! Metasploit console adapter.
//!
//! Every logical operation is a pure script builder that funnels into
//! [`MetasploitAdapter::execute_command`], which owns process spawning,
//! output capture and success/failure normalization.

use std::io;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::tools::operations::ModuleType;
use crate::tools::runner::{CommandOutput, CommandRunner};
use crate::tools::types::{ExecutionResult, EXECUTION_FAILED, INVALID_MODULE_TYPE};

/// Default executable for the external console.
pub const DEFAULT_CONSOLE_PATH: &str = "msfconsole";

/// Scanner module driven by the vulnerability scan.
pub const VULN_SCAN_MODULE: &str = "auxiliary/scanner/smb/smb_ms17_010";

/// Quiet banner, no database init prompt.
const CONSOLE_FLAGS: [&str; 2] = ["-q", "-n"];

/// Instruction appended after every script so the console tears itself down.
const EXIT_INSTRUCTION: &str = "exit";

pub fn search_script(query: &str) -> String {
    format!("search {query}")
}

pub fn info_script(module_path: &str) -> String {
    format!("info {module_path}")
}

pub fn show_script(module_type: ModuleType) -> String {
    format!("show {}", module_type.as_str())
}

pub fn version_script() -> String {
    "version".to_string()
}

pub fn nmap_script(target: &str, options: &str) -> String {
    format!("db_nmap {options} {target}")
}

pub fn vuln_scan_script(target: &str) -> String {
    format!("use {VULN_SCAN_MODULE}; set RHOSTS {target}; run; back")
}

/// Argument vector passed to the console for one scripted invocation.
pub fn console_args(script: &str) -> Vec<String> {
    let mut args: Vec<String> = CONSOLE_FLAGS.iter().map(|flag| flag.to_string()).collect();
    args.extend([
        "-x".to_string(),
        script.to_string(),
        "-x".to_string(),
        EXIT_INSTRUCTION.to_string(),
    ]);
    args
}

/// Collapses a finished (or failed) process into an [`ExecutionResult`].
///
/// Error-stream content wins over everything else, so a process that wrote
/// to stderr always reports that text as its output.
pub fn normalize(rendered: &str, outcome: io::Result<CommandOutput>) -> ExecutionResult {
    let output = match outcome {
        Ok(output) => output,
        Err(err) => return ExecutionResult::failed(err.to_string(), EXECUTION_FAILED),
    };

    if !output.stderr.trim().is_empty() {
        return ExecutionResult::failed(output.stderr, EXECUTION_FAILED);
    }

    if !output.success {
        let status = match output.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "signal".to_string(),
        };
        return ExecutionResult::failed(
            format!("Command failed ({status}): {rendered}"),
            EXECUTION_FAILED,
        );
    }

    ExecutionResult::succeeded(output.stdout)
}

/// Translates logical operations into `msfconsole` invocations.
#[derive(Clone)]
pub struct MetasploitAdapter {
    console_path: String,
    runner: Arc<dyn CommandRunner>,
}

impl MetasploitAdapter {
    pub fn new(console_path: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            console_path: console_path.into(),
            runner,
        }
    }

    /// Shell-style rendering of the invocation, for logs and error text.
    /// The process itself is spawned from an argv array, never from this string.
    pub fn display_command(&self, script: &str) -> String {
        format!(
            "{} {} -x \"{}\" -x \"{}\"",
            self.console_path,
            CONSOLE_FLAGS.join(" "),
            script,
            EXIT_INSTRUCTION
        )
    }

    /// Runs `command` as a console script in a fresh, non-interactive console.
    pub async fn execute_command(&self, command: &str) -> ExecutionResult {
        let rendered = self.display_command(command);
        debug!(command = %rendered, "running console script");

        let outcome = self
            .runner
            .run(&self.console_path, &console_args(command))
            .await;
        let result = normalize(&rendered, outcome);

        if !result.success {
            warn!(command = %rendered, "console invocation failed");
        }
        result
    }

    pub async fn search_exploit(&self, query: &str) -> ExecutionResult {
        self.execute_command(&search_script(query)).await
    }

    pub async fn get_module_info(&self, module_path: &str) -> ExecutionResult {
        self.execute_command(&info_script(module_path)).await
    }

    /// Lists modules of one category. Unknown categories are rejected
    /// without starting the console.
    pub async fn list_modules(&self, module_type: &str) -> ExecutionResult {
        match module_type.parse::<ModuleType>() {
            Ok(kind) => self.execute_command(&show_script(kind)).await,
            Err(_) => ExecutionResult::failed(
                format!("Valid types: {}", ModuleType::names().join(", ")),
                INVALID_MODULE_TYPE,
            ),
        }
    }

    pub async fn get_version(&self) -> ExecutionResult {
        self.execute_command(&version_script()).await
    }

    pub async fn run_nmap_scan(&self, target: &str, options: &str) -> ExecutionResult {
        self.execute_command(&nmap_script(target, options)).await
    }

    pub async fn run_vuln_scan(&self, target: &str) -> ExecutionResult {
        self.execute_command(&vuln_scan_script(target)).await
    }
}

impl std::fmt::Debug for MetasploitAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetasploitAdapter")
            .field("console_path", &self.console_path)
            .finish_non_exhaustive()
    }
}
