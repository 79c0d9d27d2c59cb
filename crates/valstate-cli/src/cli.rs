use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "current-validators",
    about = "Discover the current configuration of every validator recorded in the pool ledger",
    version
)]
pub struct Cli {
    /// Emit JSON instead of CSV
    #[arg(long = "write-json", visible_alias = "writeJson")]
    pub write_json: bool,

    /// Ledger protocol version: 1 (legacy) or 2 (current). Defaults to 2
    #[arg(long = "protocol-version", visible_alias = "protocolVersion", value_name = "VERSION")]
    pub protocol_version: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read ledger lines from a file (`-` for stdin) instead of running read_ledger
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path of the read_ledger executable
    #[arg(long, value_name = "PATH")]
    pub read_ledger: Option<PathBuf>,

    /// Ledger partition passed to read_ledger
    #[arg(long, value_name = "TYPE")]
    pub ledger_type: Option<String>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Append logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    pub verbose: bool,
}
