use std::collections::{BTreeSet, HashSet};

use crate::domain::error::KeysetError;
use crate::domain::keyset::{KeyEntry, KeyId, KeyStatus};

/// An ordered collection of keys with at most one primary.
///
/// - `entries` keeps insertion order; it is observable and reproduced on every round trip.
/// - `retired_key_ids` remembers ids of deleted entries so that they are never reissued.
/// - Values are never mutated in place by lifecycle operations; each transition
///   returns a new `Keyset` (see `lifecycle`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyset {
    pub(super) entries: Vec<KeyEntry>,
    pub(super) primary_key_id: Option<KeyId>,
    pub(super) retired_key_ids: BTreeSet<KeyId>,
}

/// One row of the keyset listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRow {
    pub key_id: KeyId,
    pub status: KeyStatus,
    pub is_primary: bool,
}

impl Keyset {
    /// An empty keyset with no primary. Not operational until a key is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a keyset from decoded parts, checking the structural invariants.
    ///
    /// Fails with `InvalidTransition` on duplicate ids, a dangling or disabled
    /// primary, or a retired id that is still live.
    pub fn from_parts(
        entries: Vec<KeyEntry>,
        primary_key_id: Option<KeyId>,
        retired_key_ids: BTreeSet<KeyId>,
    ) -> Result<Self, KeysetError> {
        let keyset = Self {
            entries,
            primary_key_id,
            retired_key_ids,
        };
        keyset.validate()?;
        Ok(keyset)
    }

    /// Checks the invariants that must hold after every mutation.
    pub fn validate(&self) -> Result<(), KeysetError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !seen.insert(entry.id()) {
                return Err(KeysetError::InvalidTransition(format!(
                    "duplicate key id {}",
                    entry.id()
                )));
            }
            if self.retired_key_ids.contains(&entry.id()) {
                return Err(KeysetError::InvalidTransition(format!(
                    "key id {} is both live and retired",
                    entry.id()
                )));
            }
        }

        if let Some(primary) = self.primary_key_id {
            match self.entry(primary) {
                None => {
                    return Err(KeysetError::InvalidTransition(format!(
                        "primary key {primary} is not in the keyset"
                    )))
                }
                Some(entry) if !entry.is_enabled() => {
                    return Err(KeysetError::InvalidTransition(format!(
                        "primary key {primary} is not enabled"
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Checks that the keyset can be used for cryptographic operations:
    /// valid, non-empty, and with an enabled primary.
    pub fn ensure_operational(&self) -> Result<(), KeysetError> {
        self.validate()?;
        if self.entries.is_empty() {
            return Err(KeysetError::InvalidTransition(
                "keyset has no keys".to_string(),
            ));
        }
        if self.primary_key_id.is_none() {
            return Err(KeysetError::InvalidTransition(
                "keyset has no primary key".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_operational(&self) -> bool {
        self.ensure_operational().is_ok()
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub fn primary_key_id(&self) -> Option<KeyId> {
        self.primary_key_id
    }

    pub fn retired_key_ids(&self) -> &BTreeSet<KeyId> {
        &self.retired_key_ids
    }

    pub fn entry(&self, key_id: KeyId) -> Option<&KeyEntry> {
        self.entries.iter().find(|e| e.id() == key_id)
    }

    pub fn primary(&self) -> Option<&KeyEntry> {
        self.primary_key_id.and_then(|id| self.entry(id))
    }

    pub fn is_primary(&self, key_id: KeyId) -> bool {
        self.primary_key_id == Some(key_id)
    }

    /// Whether `key_id` is live or was used by a deleted entry.
    pub fn is_known(&self, key_id: KeyId) -> bool {
        self.entry(key_id).is_some() || self.retired_key_ids.contains(&key_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listing of `(id, status, is_primary)` in entry order.
    pub fn rows(&self) -> Vec<KeyRow> {
        self.entries
            .iter()
            .map(|e| KeyRow {
                key_id: e.id(),
                status: e.status(),
                is_primary: self.is_primary(e.id()),
            })
            .collect()
    }

    pub(super) fn position(&self, key_id: KeyId) -> Result<usize, KeysetError> {
        self.entries
            .iter()
            .position(|e| e.id() == key_id)
            .ok_or(KeysetError::KeyNotFound(key_id))
    }
}
