use std::collections::BTreeMap;

use serde_json::{Map, Value};
use valstate_types::{Attribute, Identity, ProtocolVersion};

use crate::error::{LedgerError, Result};

/// A ledger transaction normalized across protocol versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedRecord {
    /// Identity the transaction mutates (`dest`).
    pub target: Identity,
    /// Recognized attributes carried by this transaction.
    pub fragment: BTreeMap<Attribute, Value>,
    /// Identity that authored the transaction, when recorded.
    pub originator: Option<Identity>,
}

impl DecodedRecord {
    pub fn new(target: impl Into<Identity>) -> Self {
        Self {
            target: target.into(),
            fragment: BTreeMap::new(),
            originator: None,
        }
    }

    pub fn with(mut self, attribute: Attribute, value: impl Into<Value>) -> Self {
        self.fragment.insert(attribute, value.into());
        self
    }

    pub fn from_originator(mut self, originator: impl Into<Identity>) -> Self {
        self.originator = Some(originator.into());
        self
    }
}

/// Decodes raw ledger lines of a single protocol version.
///
/// `decode` returns `Ok(None)` when the transaction has no target identity;
/// such records are dropped by the projection.
#[derive(Clone, Copy, Debug)]
pub struct RecordDecoder {
    protocol: ProtocolVersion,
}

impl RecordDecoder {
    pub fn new(protocol: ProtocolVersion) -> Self {
        Self { protocol }
    }

    /// Decode one ledger line. `line` is the 1-based position used in errors.
    pub fn decode(&self, line: u64, raw: &str) -> Result<Option<DecodedRecord>> {
        let value: Value = serde_json::from_str(raw).map_err(|e| malformed(line, e))?;
        match self.protocol {
            ProtocolVersion::V1 => decode_v1(line, &value),
            ProtocolVersion::V2 => decode_v2(line, &value),
        }
    }
}

/// `[seq_no, { "dest", "identifier", "data": { .. } }]`
fn decode_v1(line: u64, value: &Value) -> Result<Option<DecodedRecord>> {
    let txn = value
        .as_array()
        .and_then(|entry| entry.get(1))
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(line, "expected a [seq_no, txn] array"))?;

    let Some(target) = identity_field(line, txn, "dest")? else {
        return Ok(None);
    };
    Ok(Some(DecodedRecord {
        target,
        fragment: fragment(line, txn.get("data"))?,
        originator: identity_field(line, txn, "identifier")?,
    }))
}

/// `{ "txn": { "data": { "dest", "data": { .. } }, "metadata": { "from" } } }`
fn decode_v2(line: u64, value: &Value) -> Result<Option<DecodedRecord>> {
    let txn = value
        .get("txn")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(line, "missing txn object"))?;
    let txn_data = txn
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(line, "missing txn.data object"))?;

    let Some(target) = identity_field(line, txn_data, "dest")? else {
        return Ok(None);
    };
    let originator = match txn.get("metadata") {
        None | Some(Value::Null) => None,
        Some(Value::Object(metadata)) => identity_field(line, metadata, "from")?,
        Some(_) => return Err(malformed(line, "txn.metadata is not an object")),
    };
    Ok(Some(DecodedRecord {
        target,
        fragment: fragment(line, txn_data.get("data"))?,
        originator,
    }))
}

/// Null and absent identities are both "not present".
fn identity_field(line: u64, object: &Map<String, Value>, key: &str) -> Result<Option<Identity>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(Identity::new(s.as_str()))),
        Some(other) => Err(malformed(
            line,
            format!("{key} is not a string: {other}"),
        )),
    }
}

/// Keep recognized attributes, ignore everything else in the payload.
fn fragment(line: u64, payload: Option<&Value>) -> Result<BTreeMap<Attribute, Value>> {
    match payload {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(data)) => Ok(data
            .iter()
            .filter_map(|(key, value)| Attribute::from_wire(key).map(|a| (a, value.clone())))
            .collect()),
        Some(_) => Err(malformed(line, "attribute payload is not an object")),
    }
}

fn malformed(line: u64, reason: impl ToString) -> LedgerError {
    LedgerError::Malformed {
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const DEST: &str = "Gw6pDLhcBcoQesN72qfotTgFa7cbuqZpkX3Xo6pLhPhv";
    const STEWARD: &str = "Th7MpTaRZVRYnPiabds81Y";

    fn v1_line(dest: Value, data: Value) -> String {
        json!([1, {
            "dest": dest,
            "identifier": STEWARD,
            "txnId": "fea82e10e894419fe2bea7d96296a6d46f50f93f9eeda954ec461b2ed2950b62",
            "type": "0",
            "data": data,
        }])
        .to_string()
    }

    fn v2_line(dest: Value, data: Value) -> String {
        json!({
            "reqSignature": {},
            "txn": {
                "data": { "dest": dest, "data": data },
                "metadata": { "from": STEWARD },
                "type": "0",
            },
            "txnMetadata": { "seqNo": 1, "txnId": "fea82e10" },
            "ver": "1",
        })
        .to_string()
    }

    fn node_data() -> Value {
        json!({
            "alias": "Node1",
            "blskey": "4N8aUNHSgjQVgkpm8nhNEfDf6txHznoYREg9kirmJrkivgL4oSEimFF6nsQ6M41QvhM2Z33nves5vfSn9n1UwNFJBYtWVnHYMATn76vLuL3zU88KyeAYcHfsih3He6UHcXDxcaecHVz6jhCYz1P2UZn2bDVruL5wXpehgBfBaLKm3Ba",
            "client_ip": "10.0.0.2",
            "client_port": 9702,
            "node_ip": "10.0.0.2",
            "node_port": 9701,
            "services": ["VALIDATOR"],
            "blskey_pop": "RahHYiCvoNCtPTrVtP7nMC5eTYrsUA8WjXbdhNc8debh1agE9bGiJxWBXYNFbnJXoXhWFMvyqhqhRoq737YQemH5ik9oL7R4NTTCz2LEZhkgLJzB3QRQqJyBNyv7acbdHrAT8nQ9UkLbaVL9NBpnWXBTw4LEMePaSHEw66RzPNdAX1",
        })
    }

    #[test]
    fn decodes_v1_node_transaction() {
        let decoder = RecordDecoder::new(ProtocolVersion::V1);
        let record = decoder
            .decode(1, &v1_line(json!(DEST), node_data()))
            .unwrap()
            .unwrap();

        assert_eq!(record.target, Identity::from(DEST));
        assert_eq!(record.originator, Some(Identity::from(STEWARD)));
        assert_eq!(record.fragment.len(), 7);
        assert_eq!(record.fragment[&Attribute::Alias], json!("Node1"));
        assert_eq!(record.fragment[&Attribute::NodePort], json!(9701));
        assert_eq!(record.fragment[&Attribute::Services], json!(["VALIDATOR"]));
    }

    #[test]
    fn decodes_v2_node_transaction() {
        let decoder = RecordDecoder::new(ProtocolVersion::V2);
        let record = decoder
            .decode(1, &v2_line(json!(DEST), node_data()))
            .unwrap()
            .unwrap();

        assert_eq!(record.target, Identity::from(DEST));
        assert_eq!(record.originator, Some(Identity::from(STEWARD)));
        assert_eq!(record.fragment[&Attribute::BlsKey], node_data()["blskey"]);
    }

    #[test]
    fn both_protocols_normalize_identically() {
        let data = json!({"alias": "Node2", "client_ip": "10.0.0.3"});
        let v1 = RecordDecoder::new(ProtocolVersion::V1)
            .decode(1, &v1_line(json!(DEST), data.clone()))
            .unwrap();
        let v2 = RecordDecoder::new(ProtocolVersion::V2)
            .decode(1, &v2_line(json!(DEST), data))
            .unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn null_or_absent_target_yields_none() {
        let v1 = RecordDecoder::new(ProtocolVersion::V1);
        assert_eq!(v1.decode(1, &v1_line(Value::Null, node_data())).unwrap(), None);
        assert_eq!(
            v1.decode(2, &json!([2, {"data": {"alias": "x"}}]).to_string())
                .unwrap(),
            None
        );

        let v2 = RecordDecoder::new(ProtocolVersion::V2);
        assert_eq!(v2.decode(1, &v2_line(Value::Null, node_data())).unwrap(), None);
    }

    #[test]
    fn unknown_payload_keys_are_ignored() {
        let decoder = RecordDecoder::new(ProtocolVersion::V2);
        let record = decoder
            .decode(1, &v2_line(json!(DEST), json!({"blskey_pop": "abc", "extra": 1})))
            .unwrap()
            .unwrap();
        assert!(record.fragment.is_empty());
    }

    #[test]
    fn missing_originator_is_not_an_error() {
        let line = json!({"txn": {"data": {"dest": DEST, "data": {"alias": "n"}}}}).to_string();
        let record = RecordDecoder::new(ProtocolVersion::V2)
            .decode(1, &line)
            .unwrap()
            .unwrap();
        assert_eq!(record.originator, None);
    }

    #[test]
    fn invalid_json_reports_line() {
        let err = RecordDecoder::new(ProtocolVersion::V2)
            .decode(42, "{not json")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Malformed { line: 42, .. }));
    }

    #[test]
    fn wrong_layout_is_malformed() {
        // A v2 record read as v1 and vice versa.
        let v2_as_v1 = RecordDecoder::new(ProtocolVersion::V1)
            .decode(3, &v2_line(json!(DEST), node_data()))
            .unwrap_err();
        assert!(matches!(v2_as_v1, LedgerError::Malformed { line: 3, .. }));

        let v1_as_v2 = RecordDecoder::new(ProtocolVersion::V2)
            .decode(4, &v1_line(json!(DEST), node_data()))
            .unwrap_err();
        assert!(matches!(v1_as_v2, LedgerError::Malformed { line: 4, .. }));
    }

    #[test]
    fn non_string_identity_is_malformed() {
        let err = RecordDecoder::new(ProtocolVersion::V1)
            .decode(1, &v1_line(json!(17), node_data()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Malformed { line: 1, .. }));
    }
}
