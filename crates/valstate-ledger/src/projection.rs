use std::collections::HashMap;

use valstate_types::{Identity, ValidatorSnapshot};

use crate::records::DecodedRecord;

/// Validator snapshots keyed by identity, in order of first appearance.
///
/// This is the accumulator of the projection: callers construct it, pass it
/// through [`ProjectionBuilder::fold`] (or [`ValidatorSet::apply`] record by
/// record) and own the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    snapshots: Vec<ValidatorSnapshot>,
    index: HashMap<Identity, usize>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, identity: &Identity) -> Option<&ValidatorSnapshot> {
        self.index.get(identity).map(|&i| &self.snapshots[i])
    }

    /// Snapshots in first-appearance order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidatorSnapshot> {
        self.snapshots.iter()
    }

    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.snapshots.iter().map(|s| &s.identity)
    }

    /// Fold one decoded record into the set.
    ///
    /// Attributes carried by the record overwrite the stored values; attributes
    /// it does not carry are left alone. The originator is taken from the
    /// record that creates the snapshot, even when that record has none, and
    /// is never changed afterwards. Returns `true` if the record created a new
    /// snapshot.
    pub fn apply(&mut self, record: DecodedRecord) -> bool {
        let DecodedRecord {
            target,
            fragment,
            originator,
        } = record;

        let (slot, created) = match self.index.get(&target) {
            Some(&slot) => (slot, false),
            None => {
                let slot = self.snapshots.len();
                self.snapshots
                    .push(ValidatorSnapshot::established(target.clone(), originator));
                self.index.insert(target.clone(), slot);
                (slot, true)
            }
        };

        let snapshot = &mut self.snapshots[slot];
        for (attribute, value) in fragment {
            snapshot.set(attribute, value);
        }
        snapshot.identity = target;
        created
    }
}

impl<'a> IntoIterator for &'a ValidatorSet {
    type Item = &'a ValidatorSnapshot;
    type IntoIter = std::slice::Iter<'a, ValidatorSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Deterministic projection of decoded records into validator snapshots.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    /// Apply `records` to `validators` in order. `None` entries are records
    /// without a target and are skipped.
    pub fn fold<I>(mut validators: ValidatorSet, records: I) -> ValidatorSet
    where
        I: IntoIterator<Item = Option<DecodedRecord>>,
    {
        for record in records.into_iter().flatten() {
            validators.apply(record);
        }
        validators
    }
}
