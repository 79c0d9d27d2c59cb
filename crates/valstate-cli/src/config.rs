use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use valstate_ledger::ReadLedgerConfig;
use valstate_report::OutputFormat;
use valstate_types::ProtocolVersion;

use crate::cli::Cli;

/// Contents of the optional TOML configuration file.
///
/// ```toml
/// protocol_version = "2"
/// output = "json"
///
/// [source]
/// program = "/usr/local/bin/read_ledger"
/// ledger_type = "pool"
/// service_account = "indy"
///
/// [log]
/// level = "info"
/// file = "current_validators.log"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub protocol_version: Option<String>,
    pub output: Option<OutputFormat>,
    pub input: Option<PathBuf>,
    pub source: ReadLedgerConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive.
    pub level: String,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Effective settings for one run: defaults, then the config file, then flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub protocol: ProtocolVersion,
    pub format: OutputFormat,
    pub input: Option<PathBuf>,
    pub source: ReadLedgerConfig,
    pub log: LogConfig,
}

impl Settings {
    /// Resolve settings without touching the ledger. An unknown protocol
    /// version is reported here.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(file, cli)
    }

    fn merge(file: FileConfig, cli: &Cli) -> anyhow::Result<Self> {
        let protocol = match cli.protocol_version.as_deref().or(file.protocol_version.as_deref()) {
            Some(raw) => raw
                .parse::<ProtocolVersion>()
                .context("invalid --protocol-version (example: --protocol-version 1)")?,
            None => ProtocolVersion::default(),
        };

        let format = if cli.write_json {
            OutputFormat::Json
        } else {
            file.output.unwrap_or_default()
        };

        let mut source = file.source;
        if let Some(program) = &cli.read_ledger {
            source.program = program.clone();
        }
        if let Some(ledger_type) = &cli.ledger_type {
            source.ledger_type = ledger_type.clone();
        }

        let mut log = file.log;
        if cli.verbose {
            log.level = "debug".into();
        }
        if let Some(level) = &cli.log_level {
            log.level = level.clone();
        }
        if let Some(path) = &cli.log_file {
            log.file = Some(path.clone());
        }

        Ok(Self {
            protocol,
            format,
            input: cli.input.clone().or(file.input),
            source,
            log,
        })
    }
}
