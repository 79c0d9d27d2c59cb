use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported protocol version {0:?}: expected 1 or 2")]
    UnknownProtocol(String),
}
