use std::fmt;

use serde::{Deserialize, Serialize};

/// A validator attribute tracked by the projection.
///
/// Each attribute has a wire name (the key used inside a transaction's data
/// payload) and a column name (the key used in reports). They differ only
/// for [`Attribute::BlsKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Alias,
    BlsKey,
    ClientIp,
    ClientPort,
    NodeIp,
    NodePort,
    Services,
}

impl Attribute {
    /// Every recognized attribute, in report column order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Alias,
        Attribute::BlsKey,
        Attribute::ClientIp,
        Attribute::ClientPort,
        Attribute::NodeIp,
        Attribute::NodePort,
        Attribute::Services,
    ];

    /// Key of this attribute inside a transaction data payload.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::BlsKey => "blskey",
            Self::ClientIp => "client_ip",
            Self::ClientPort => "client_port",
            Self::NodeIp => "node_ip",
            Self::NodePort => "node_port",
            Self::Services => "services",
        }
    }

    /// Key of this attribute in rendered reports.
    pub fn column(&self) -> &'static str {
        match self {
            Self::BlsKey => "bls_key",
            other => other.wire_name(),
        }
    }

    /// Look up an attribute by its payload key. Unrecognized keys yield `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.wire_name() == name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_and_column_names_differ_only_for_bls_key() {
        for attr in Attribute::ALL {
            if attr == Attribute::BlsKey {
                assert_eq!(attr.wire_name(), "blskey");
                assert_eq!(attr.column(), "bls_key");
            } else {
                assert_eq!(attr.wire_name(), attr.column());
            }
        }
    }

    #[test]
    fn from_wire_ignores_unknown_keys() {
        assert_eq!(Attribute::from_wire("node_ip"), Some(Attribute::NodeIp));
        assert_eq!(Attribute::from_wire("blskey"), Some(Attribute::BlsKey));
        assert_eq!(Attribute::from_wire("bls_key"), None);
        assert_eq!(Attribute::from_wire("blskey_pop"), None);
    }
}
