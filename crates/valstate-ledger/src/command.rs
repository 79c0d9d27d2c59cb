use std::env;
use std::path::PathBuf;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{LedgerError, Result};
use crate::traits::LedgerSource;

/// How to reach the node's `read_ledger` tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadLedgerConfig {
    /// Path of the `read_ledger` executable.
    pub program: PathBuf,
    /// Ledger partition passed as `--type`.
    pub ledger_type: String,
    /// Account that owns the node's data. Other users go through `sudo`.
    pub service_account: String,
    /// Path of the `sudo` executable.
    pub sudo: PathBuf,
}

impl Default for ReadLedgerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("/usr/local/bin/read_ledger"),
            ledger_type: "pool".into(),
            service_account: "indy".into(),
            sudo: PathBuf::from("/usr/bin/sudo"),
        }
    }
}

/// Ledger source backed by the node-local `read_ledger` command.
///
/// Each call spawns the command once and waits for it to finish. There are
/// no retries; a non-zero exit is returned as [`LedgerError::CommandFailed`].
pub struct ReadLedgerCommand {
    config: ReadLedgerConfig,
    current_user: Option<String>,
}

impl ReadLedgerCommand {
    pub fn new(config: ReadLedgerConfig) -> Self {
        Self {
            config,
            current_user: current_user(),
        }
    }

    /// Override the detected login name.
    pub fn with_current_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }

    /// Full argv for one invocation, including the `sudo` prefix if needed.
    pub fn argv(&self, args: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 6);
        if self.needs_sudo() {
            argv.push(self.config.sudo.display().to_string());
            argv.extend(["-i", "-u"].map(String::from));
            argv.push(self.config.service_account.clone());
        }
        argv.push(self.config.program.display().to_string());
        argv.extend(["--type".to_string(), self.config.ledger_type.clone()]);
        argv.extend(args.iter().cloned());
        argv
    }

    fn needs_sudo(&self) -> bool {
        self.current_user.as_deref() != Some(self.config.service_account.as_str())
    }

    fn run(&self, args: &[String]) -> Result<String> {
        let argv = self.argv(args);
        let (program, rest) = argv
            .split_first()
            .ok_or_else(|| LedgerError::InvalidOutput {
                program: String::new(),
                reason: "empty command line".into(),
            })?;
        debug!(command = %argv.join(" "), "running ledger command");

        let output = Command::new(program)
            .args(rest)
            .output()
            .map_err(|source| {
                error!(program = %program, %source, "failed to spawn ledger command");
                LedgerError::CommandSpawn {
                    program: program.clone(),
                    source,
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(status = %output.status, %stderr, "ledger command failed");
            return Err(LedgerError::CommandFailed {
                program: self.config.program.display().to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        String::from_utf8(output.stdout).map_err(|e| LedgerError::InvalidOutput {
            program: self.config.program.display().to_string(),
            reason: format!("stdout is not UTF-8: {e}"),
        })
    }
}

impl LedgerSource for ReadLedgerCommand {
    fn record_count(&self) -> Result<u64> {
        let stdout = self.run(&["--count".to_string()])?;
        parse_count(&stdout).ok_or_else(|| LedgerError::InvalidOutput {
            program: self.config.program.display().to_string(),
            reason: format!("expected a record count, got {:?}", stdout.trim()),
        })
    }

    fn read_range(&self, from: u64, to: u64) -> Result<Vec<String>> {
        if from == 0 || to == 0 || from > to {
            return Err(LedgerError::InvalidRange { from, to });
        }
        let stdout = self.run(&[
            "--frm".to_string(),
            from.to_string(),
            "--to".to_string(),
            to.to_string(),
        ])?;
        Ok(split_records(&stdout))
    }
}

fn parse_count(stdout: &str) -> Option<u64> {
    stdout.trim().parse().ok()
}

fn split_records(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Login name of the invoking user, from the usual environment variables.
fn current_user() -> Option<String> {
    ["LOGNAME", "USER", "LNAME", "USERNAME"]
        .into_iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.is_empty()))
}
