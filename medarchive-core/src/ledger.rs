//! Version ledger and processed-submission set.
//!
//! The ledger is the source of truth for resumability: it records, per
//! submitter, which artifact base name was produced for each version. Versions
//! for a key start at 1 and grow by one per processed submission, in processing
//! order. Callers must process submissions oldest-to-newest.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::{SubmissionId, SubmitterKey};

/// History of one submitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Always `max(versions) + 1`.
    pub next_version: u32,
    /// Version number → artifact base name.
    pub versions: BTreeMap<u32, String>,
}

/// A version number reserved for a submitter but not yet recorded.
///
/// Obtained from [`VersionLedger::next_slot`] and turned into a ledger entry by
/// [`VersionLedger::commit`] once the submission is fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSlot {
    pub key: SubmitterKey,
    pub version: u32,
}

/// Per-submitter version history, keyed and iterated in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionLedger(BTreeMap<SubmitterKey, LedgerEntry>);

impl VersionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The version the next submission from `key` will receive.
    pub fn next_slot(&self, key: SubmitterKey) -> VersionSlot {
        let version = self.0.get(&key).map_or(1, |entry| entry.next_version);
        VersionSlot { key, version }
    }

    /// Record `base_name` under the slot's version and advance the counter.
    pub fn commit(&mut self, slot: VersionSlot, base_name: impl Into<String>) {
        let entry = self.0.entry(slot.key).or_default();
        entry.versions.insert(slot.version, base_name.into());
        entry.next_version = slot.version + 1;
    }

    pub fn entry(&self, key: SubmitterKey) -> Option<&LedgerEntry> {
        self.0.get(&key)
    }

    pub fn contains_key(&self, key: SubmitterKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Submitter keys, ascending.
    pub fn keys(&self) -> impl Iterator<Item = SubmitterKey> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Versions of `key` counting up from 1, stopping at the first gap.
    pub fn contiguous(&self, key: SubmitterKey) -> Vec<(u32, &str)> {
        let Some(entry) = self.0.get(&key) else {
            return Vec::new();
        };
        (1u32..)
            .map_while(|v| entry.versions.get(&v).map(|name| (v, name.as_str())))
            .collect()
    }

    /// Every `(key, version, base name)` reachable contiguously from version 1,
    /// keys ascending.
    pub fn artifacts(&self) -> Vec<(SubmitterKey, u32, &str)> {
        self.keys()
            .flat_map(|key| {
                self.contiguous(key)
                    .into_iter()
                    .map(move |(version, name)| (key, version, name))
            })
            .collect()
    }
}

/// Submission ids already turned into artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessedSet(BTreeSet<SubmissionId>);

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `id` was already present.
    pub fn insert(&mut self, id: SubmissionId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: &SubmissionId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubmissionId> {
        self.0.iter()
    }
}
