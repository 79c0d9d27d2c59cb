use std::io;

use valstate_types::TypeError;

/// Errors produced by ledger acquisition and replay.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Invalid protocol selector or other configuration problem.
    #[error("configuration error: {0}")]
    Config(#[from] TypeError),

    /// A ledger line could not be decoded for the declared protocol.
    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("invalid record range: from={from}, to={to}")]
    InvalidRange { from: u64, to: u64 },

    #[error("failed to run {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from {program}: {reason}")]
    InvalidOutput { program: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the ledger crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
