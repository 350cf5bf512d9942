use crate::domain::error::KeysetError;
use crate::domain::keyset::{KeyId, KeyStatus, Keyset, OutputPrefixKind};

/// Cleartext summary of one entry of an encrypted keyset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    key_id: KeyId,
    status: KeyStatus,
    type_identifier: String,
    output_prefix_kind: OutputPrefixKind,
}

impl KeyInfo {
    pub fn new(
        key_id: KeyId,
        status: KeyStatus,
        type_identifier: impl Into<String>,
        output_prefix_kind: OutputPrefixKind,
    ) -> Self {
        Self {
            key_id,
            status,
            type_identifier: type_identifier.into(),
            output_prefix_kind,
        }
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn status(&self) -> KeyStatus {
        self.status
    }

    pub fn type_identifier(&self) -> &str {
        &self.type_identifier
    }

    pub fn output_prefix_kind(&self) -> OutputPrefixKind {
        self.output_prefix_kind
    }
}

/// Cleartext summary of an encrypted keyset, used for listing without decryption.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeysetInfo {
    primary_key_id: Option<KeyId>,
    key_infos: Vec<KeyInfo>,
}

impl KeysetInfo {
    pub fn new(primary_key_id: Option<KeyId>, key_infos: Vec<KeyInfo>) -> Self {
        Self {
            primary_key_id,
            key_infos,
        }
    }

    pub fn from_keyset(keyset: &Keyset) -> Self {
        let key_infos = keyset
            .entries()
            .iter()
            .map(|e| {
                KeyInfo::new(
                    e.id(),
                    e.status(),
                    e.material().type_identifier(),
                    e.material().output_prefix_kind(),
                )
            })
            .collect();

        Self {
            primary_key_id: keyset.primary_key_id(),
            key_infos,
        }
    }

    pub fn primary_key_id(&self) -> Option<KeyId> {
        self.primary_key_id
    }

    pub fn key_infos(&self) -> &[KeyInfo] {
        &self.key_infos
    }

    /// Checks that this summary describes exactly `keyset`.
    ///
    /// A mismatch means the container was tampered with or written by a broken
    /// codec, and is reported as `KeysetCorrupted`.
    pub fn verify_matches(&self, keyset: &Keyset) -> Result<(), KeysetError> {
        if self.primary_key_id != keyset.primary_key_id() {
            return Err(KeysetError::corrupted(format!(
                "keyset info names primary {:?} but the keyset has {:?}",
                self.primary_key_id.map(|id| id.value()),
                keyset.primary_key_id().map(|id| id.value())
            )));
        }

        if self.key_infos.len() != keyset.len() {
            return Err(KeysetError::corrupted(format!(
                "keyset info lists {} keys but the keyset has {}",
                self.key_infos.len(),
                keyset.len()
            )));
        }

        let expected = Self::from_keyset(keyset);
        for (listed, actual) in self.key_infos.iter().zip(expected.key_infos.iter()) {
            if listed.key_id != actual.key_id {
                return Err(KeysetError::corrupted(format!(
                    "keyset info lists key {} where the keyset has key {}",
                    listed.key_id, actual.key_id
                )));
            }
            if listed != actual {
                return Err(KeysetError::corrupted(format!(
                    "keyset info for key {} does not match the keyset",
                    listed.key_id
                )));
            }
        }

        Ok(())
    }
}

/// Protected on-disk form of a keyset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedContainer {
    encrypted_keyset: Vec<u8>,
    keyset_info: Option<KeysetInfo>,
}

impl ProtectedContainer {
    pub fn new(encrypted_keyset: Vec<u8>, keyset_info: Option<KeysetInfo>) -> Self {
        Self {
            encrypted_keyset,
            keyset_info,
        }
    }

    pub fn encrypted_keyset(&self) -> &[u8] {
        &self.encrypted_keyset
    }

    pub fn keyset_info(&self) -> Option<&KeysetInfo> {
        self.keyset_info.as_ref()
    }
}
