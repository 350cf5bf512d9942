use std::fmt;

use crate::domain::keyset::KeyId;

/// Status of a key entry. Deleted entries are removed, so there is no tombstone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    Enabled,
    Disabled,
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStatus::Enabled => f.write_str("ENABLED"),
            KeyStatus::Disabled => f.write_str("DISABLED"),
        }
    }
}

/// How outputs produced with a key are framed. Preserved verbatim, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPrefixKind {
    Tink,
    Legacy,
    Raw,
    Crunchy,
}

/// Broad class of the key material.
///
/// Only `AsymmetricPrivate` material has a public counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMaterialType {
    Symmetric,
    AsymmetricPrivate,
    AsymmetricPublic,
    Remote,
}

/// Opaque, type-tagged key material.
///
/// The engine moves this value around intact and never looks inside `value`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    type_identifier: String,
    value: Vec<u8>,
    material_type: KeyMaterialType,
    output_prefix_kind: OutputPrefixKind,
}

impl KeyMaterial {
    pub fn new(
        type_identifier: impl Into<String>,
        value: Vec<u8>,
        material_type: KeyMaterialType,
        output_prefix_kind: OutputPrefixKind,
    ) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            value,
            material_type,
            output_prefix_kind,
        }
    }

    pub fn type_identifier(&self) -> &str {
        &self.type_identifier
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn material_type(&self) -> KeyMaterialType {
        self.material_type
    }

    pub fn output_prefix_kind(&self) -> OutputPrefixKind {
        self.output_prefix_kind
    }
}

// Key bytes stay out of logs and panic messages.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("type_identifier", &self.type_identifier)
            .field("value", &format_args!("<{} bytes>", self.value.len()))
            .field("material_type", &self.material_type)
            .field("output_prefix_kind", &self.output_prefix_kind)
            .finish()
    }
}

/// One key inside a keyset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    id: KeyId,
    status: KeyStatus,
    material: KeyMaterial,
}

impl KeyEntry {
    pub fn new(id: KeyId, status: KeyStatus, material: KeyMaterial) -> Self {
        Self {
            id,
            status,
            material,
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn status(&self) -> KeyStatus {
        self.status
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    pub fn is_enabled(&self) -> bool {
        self.status == KeyStatus::Enabled
    }

    pub(crate) fn with_status(&self, status: KeyStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub(crate) fn with_material(&self, material: KeyMaterial) -> Self {
        Self {
            material,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> KeyMaterial {
        KeyMaterial::new(
            "type.googleapis.com/google.crypto.tink.AesGcmKey",
            vec![0x42; 16],
            KeyMaterialType::Symmetric,
            OutputPrefixKind::Tink,
        )
    }

    #[test]
    fn debug_output_hides_key_bytes() {
        let rendered = format!("{:?}", material());
        assert!(rendered.contains("<16 bytes>"));
        assert!(!rendered.contains("66"));
    }

    #[test]
    fn with_status_keeps_id_and_material() {
        let entry = KeyEntry::new(KeyId::new(9).unwrap(), KeyStatus::Enabled, material());
        let disabled = entry.with_status(KeyStatus::Disabled);

        assert_eq!(disabled.id(), entry.id());
        assert_eq!(disabled.material(), entry.material());
        assert!(!disabled.is_enabled());
        assert!(entry.is_enabled());
    }
}
