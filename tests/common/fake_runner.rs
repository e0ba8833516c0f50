// tests/common/fake_runner.rs
//! Recording command runner used in place of a real console.

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use metasploit_mcp_lib::tools::{CommandOutput, CommandRunner};

/// A fake runner that records invocations and replies with canned output.
pub struct FakeRunner {
    invocations: Mutex<Vec<Vec<String>>>,
    stdout: Mutex<String>,
    stderr: Mutex<String>,
    delay: Mutex<Duration>,
}

impl FakeRunner {
    /// Create a runner whose processes print `stdout` and exit cleanly.
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
            stdout: Mutex::new(stdout.into()),
            stderr: Mutex::new(String::new()),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    /// Make every subsequent process also write `stderr`.
    pub fn set_stderr(&self, stderr: impl Into<String>) {
        *self.stderr.lock().unwrap() = stderr.into();
    }

    /// Delay each run, to keep requests in flight.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Full argument vectors, one per spawned process.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    /// The `-x` script of each spawned process.
    pub fn scripts(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter_map(|args| args.get(3).cloned())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, _program: &str, args: &[String]) -> io::Result<CommandOutput> {
        self.invocations.lock().unwrap().push(args.to_vec());

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        Ok(CommandOutput {
            stdout: self.stdout.lock().unwrap().clone(),
            stderr: self.stderr.lock().unwrap().clone(),
            exit_code: Some(0),
            success: true,
        })
    }
}
