use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::attribute::Attribute;
use crate::identity::Identity;

/// Report key of the snapshot's own identity.
pub const IDENTITY_COLUMN: &str = "identity";
/// Report key of the identity that authored the first record for a snapshot.
pub const ORIGINATOR_COLUMN: &str = "originator_identity";

/// Materialized current state of a single validator.
///
/// Attribute values are kept as raw JSON values so that whatever the ledger
/// recorded (strings, port numbers, service lists) survives unchanged into
/// the report. `None` means the attribute has never been written for this
/// identity; `Some(Value::Null)` means the latest write recorded `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSnapshot {
    pub identity: Identity,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub alias: Option<Value>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub bls_key: Option<Value>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<Value>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub client_port: Option<Value>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub node_ip: Option<Value>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub node_port: Option<Value>,
    #[serde(default, deserialize_with = "written", skip_serializing_if = "Option::is_none")]
    pub services: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_identity: Option<Identity>,
}

impl ValidatorSnapshot {
    /// An empty snapshot for `identity`: no attributes, no originator.
    pub fn new(identity: Identity) -> Self {
        Self::established(identity, None)
    }

    /// An empty snapshot whose originator is fixed at creation.
    pub fn established(identity: Identity, originator_identity: Option<Identity>) -> Self {
        Self {
            identity,
            alias: None,
            bls_key: None,
            client_ip: None,
            client_port: None,
            node_ip: None,
            node_port: None,
            services: None,
            originator_identity,
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&Value> {
        self.slot(attribute).as_ref()
    }

    /// Overwrite a single attribute, leaving all others untouched.
    ///
    /// An explicit JSON `null` is stored as written.
    pub fn set(&mut self, attribute: Attribute, value: Value) {
        *self.slot_mut(attribute) = Some(value);
    }

    /// Attributes that currently hold a value, in column order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &Value)> {
        Attribute::ALL
            .into_iter()
            .filter_map(move |attr| self.get(attr).map(|value| (attr, value)))
    }

    /// Flatten into a report record keyed by column name.
    ///
    /// Keys are sorted lexicographically and absent attributes are omitted.
    pub fn to_record(&self) -> BTreeMap<&'static str, Value> {
        let mut record: BTreeMap<&'static str, Value> = self
            .attributes()
            .map(|(attr, value)| (attr.column(), value.clone()))
            .collect();
        record.insert(IDENTITY_COLUMN, Value::from(self.identity.as_str()));
        if let Some(originator) = &self.originator_identity {
            record.insert(ORIGINATOR_COLUMN, Value::from(originator.as_str()));
        }
        record
    }

    fn slot(&self, attribute: Attribute) -> &Option<Value> {
        match attribute {
            Attribute::Alias => &self.alias,
            Attribute::BlsKey => &self.bls_key,
            Attribute::ClientIp => &self.client_ip,
            Attribute::ClientPort => &self.client_port,
            Attribute::NodeIp => &self.node_ip,
            Attribute::NodePort => &self.node_port,
            Attribute::Services => &self.services,
        }
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut Option<Value> {
        match attribute {
            Attribute::Alias => &mut self.alias,
            Attribute::BlsKey => &mut self.bls_key,
            Attribute::ClientIp => &mut self.client_ip,
            Attribute::ClientPort => &mut self.client_port,
            Attribute::NodeIp => &mut self.node_ip,
            Attribute::NodePort => &mut self.node_port,
            Attribute::Services => &mut self.services,
        }
    }
}

/// A key that is present deserializes to `Some`, even when its value is `null`.
fn written<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_touches_only_one_attribute() {
        let mut snap = ValidatorSnapshot::new(Identity::from("X"));
        snap.set(Attribute::Alias, json!("n1"));
        snap.set(Attribute::ClientIp, json!("1.2.3.4"));
        snap.set(Attribute::Alias, json!("n2"));

        assert_eq!(snap.get(Attribute::Alias), Some(&json!("n2")));
        assert_eq!(snap.get(Attribute::ClientIp), Some(&json!("1.2.3.4")));
        assert_eq!(snap.get(Attribute::NodeIp), None);
    }

    #[test]
    fn null_is_kept_as_written() {
        let mut snap = ValidatorSnapshot::new(Identity::from("X"));
        snap.set(Attribute::Alias, json!("n1"));
        snap.set(Attribute::Alias, Value::Null);
        assert_eq!(snap.get(Attribute::Alias), Some(&Value::Null));
        assert_eq!(snap.to_record().get("alias"), Some(&Value::Null));
    }

    #[test]
    fn written_null_survives_serde() {
        let mut snap = ValidatorSnapshot::new(Identity::from("X"));
        snap.set(Attribute::Alias, Value::Null);
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value, json!({"identity": "X", "alias": null}));

        let back: ValidatorSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn established_fixes_originator() {
        let snap = ValidatorSnapshot::established(Identity::from("X"), Some(Identity::from("P")));
        assert_eq!(snap.originator_identity, Some(Identity::from("P")));
        assert_eq!(ValidatorSnapshot::new(Identity::from("Y")).originator_identity, None);
    }

    #[test]
    fn record_is_sorted_and_sparse() {
        let mut snap = ValidatorSnapshot::established(Identity::from("X"), Some(Identity::from("A")));
        snap.set(Attribute::NodePort, json!(9701));
        snap.set(Attribute::BlsKey, json!("4N8aUN"));

        let keys: Vec<_> = snap.to_record().keys().copied().collect();
        assert_eq!(
            keys,
            vec!["bls_key", "identity", "node_port", "originator_identity"]
        );
    }

    #[test]
    fn serde_omits_absent_fields() {
        let mut snap = ValidatorSnapshot::new(Identity::from("X"));
        snap.set(Attribute::Services, json!(["VALIDATOR"]));
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value, json!({"identity": "X", "services": ["VALIDATOR"]}));

        let back: ValidatorSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snap);
    }
}
