use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Wire-encoding variant of a ledger transaction.
///
/// The two versions carry the same semantic fields under different nesting:
///
/// ```text
/// V1: [seq_no, { "dest", "identifier", "data": { .. } }]
/// V2: { "txn": { "data": { "dest", "data": { .. } }, "metadata": { "from" } } }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProtocolVersion {
    /// Legacy encoding.
    V1,
    /// Current encoding.
    #[default]
    V2,
}

impl ProtocolVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            other => Err(TypeError::UnknownProtocol(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProtocolVersion {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProtocolVersion> for String {
    fn from(value: ProtocolVersion) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
