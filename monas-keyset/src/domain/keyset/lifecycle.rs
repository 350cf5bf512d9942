//! Key lifecycle transitions.
//!
//! Every transition borrows the current keyset and returns a new one together
//! with the event it produced. A failed transition returns an error and the
//! caller still holds the untouched original, so there is no partial state.

use crate::domain::error::KeysetError;
use crate::domain::keyset::{KeyEntry, KeyId, KeyMaterial, KeyStatus, Keyset};

/// Upper bound on re-rolls when the generator keeps returning taken ids.
const MAX_KEY_ID_ATTEMPTS: usize = 1024;

/// Source of candidate key ids. Implementations return raw 32-bit values;
/// `0` and ids already known to the keyset are re-rolled by the engine.
pub trait KeyIdGenerator {
    fn next_key_id(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysetEvent {
    KeyAdded { key_id: KeyId, became_primary: bool },
    KeyEnabled { key_id: KeyId },
    KeyDisabled { key_id: KeyId },
    KeyDeleted { key_id: KeyId },
    PrimaryPromoted {
        key_id: KeyId,
        previous: Option<KeyId>,
    },
}

impl KeysetEvent {
    pub fn key_id(&self) -> KeyId {
        match self {
            KeysetEvent::KeyAdded { key_id, .. }
            | KeysetEvent::KeyEnabled { key_id }
            | KeysetEvent::KeyDisabled { key_id }
            | KeysetEvent::KeyDeleted { key_id }
            | KeysetEvent::PrimaryPromoted { key_id, .. } => *key_id,
        }
    }
}

impl Keyset {
    /// Appends a new enabled key with a freshly allocated id.
    ///
    /// The key becomes primary only when the keyset was empty and had no primary.
    pub fn add<G>(
        &self,
        material: KeyMaterial,
        key_ids: &G,
    ) -> Result<(Keyset, KeysetEvent), KeysetError>
    where
        G: KeyIdGenerator + ?Sized,
    {
        let key_id = self.allocate_key_id(key_ids)?;
        let became_primary = self.entries.is_empty() && self.primary_key_id.is_none();

        let mut next = self.clone();
        next.entries
            .push(KeyEntry::new(key_id, KeyStatus::Enabled, material));
        if became_primary {
            next.primary_key_id = Some(key_id);
        }
        next.validate()?;

        Ok((
            next,
            KeysetEvent::KeyAdded {
                key_id,
                became_primary,
            },
        ))
    }

    /// Marks the key enabled. Enabling an enabled key leaves the keyset unchanged.
    pub fn enable(&self, key_id: KeyId) -> Result<(Keyset, KeysetEvent), KeysetError> {
        let next = self.with_status(key_id, KeyStatus::Enabled)?;
        Ok((next, KeysetEvent::KeyEnabled { key_id }))
    }

    /// Marks the key disabled. The primary cannot be disabled.
    pub fn disable(&self, key_id: KeyId) -> Result<(Keyset, KeysetEvent), KeysetError> {
        self.position(key_id)?;
        if self.is_primary(key_id) {
            return Err(KeysetError::InvalidTransition(format!(
                "cannot disable key {key_id}: it is the primary key"
            )));
        }
        let next = self.with_status(key_id, KeyStatus::Disabled)?;
        Ok((next, KeysetEvent::KeyDisabled { key_id }))
    }

    /// Removes the key and retires its id. The primary cannot be deleted.
    pub fn delete(&self, key_id: KeyId) -> Result<(Keyset, KeysetEvent), KeysetError> {
        let index = self.position(key_id)?;
        if self.is_primary(key_id) {
            return Err(KeysetError::InvalidTransition(format!(
                "cannot delete key {key_id}: it is the primary key"
            )));
        }

        let mut next = self.clone();
        next.entries.remove(index);
        next.retired_key_ids.insert(key_id);
        next.validate()?;

        Ok((next, KeysetEvent::KeyDeleted { key_id }))
    }

    /// Makes an enabled key the primary. Promoting the current primary is a no-op.
    pub fn promote(&self, key_id: KeyId) -> Result<(Keyset, KeysetEvent), KeysetError> {
        let index = self.position(key_id)?;
        if !self.entries[index].is_enabled() {
            return Err(KeysetError::InvalidTransition(format!(
                "cannot promote key {key_id}: it is disabled"
            )));
        }

        let previous = self.primary_key_id;
        let mut next = self.clone();
        next.primary_key_id = Some(key_id);
        next.validate()?;

        Ok((next, KeysetEvent::PrimaryPromoted { key_id, previous }))
    }

    fn with_status(&self, key_id: KeyId, status: KeyStatus) -> Result<Keyset, KeysetError> {
        let index = self.position(key_id)?;
        let mut next = self.clone();
        next.entries[index] = self.entries[index].with_status(status);
        next.validate()?;
        Ok(next)
    }

    fn allocate_key_id<G>(&self, key_ids: &G) -> Result<KeyId, KeysetError>
    where
        G: KeyIdGenerator + ?Sized,
    {
        (0..MAX_KEY_ID_ATTEMPTS)
            .filter_map(|_| KeyId::new(key_ids.next_key_id()))
            .find(|candidate| !self.is_known(*candidate))
            .ok_or_else(|| {
                KeysetError::InvalidTransition(format!(
                    "no fresh key id after {MAX_KEY_ID_ATTEMPTS} attempts"
                ))
            })
    }
}
