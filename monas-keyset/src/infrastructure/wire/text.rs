//! JSON encoding of keysets in Tink's JSON keyset shape.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::application_service::keyset_service::KeysetWireCodec;
use crate::domain::{
    KeyEntry, KeyId, KeyInfo, KeyMaterial, KeyMaterialType, KeyStatus, Keyset, KeysetError,
    KeysetInfo, OutputPrefixKind, ProtectedContainer,
};

/// Tink-compatible JSON keyset codec. Output is pretty-printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextWireCodec;

impl KeysetWireCodec for TextWireCodec {
    fn encode_keyset(&self, keyset: &Keyset) -> Result<Vec<u8>, KeysetError> {
        to_json(&KeysetJson::from(keyset))
    }

    fn decode_keyset(&self, bytes: &[u8]) -> Result<Keyset, KeysetError> {
        let json: KeysetJson = from_json(bytes)?;
        json.into_keyset()
    }

    fn encode_container(&self, container: &ProtectedContainer) -> Result<Vec<u8>, KeysetError> {
        to_json(&EncryptedKeysetJson {
            encrypted_keyset: container.encrypted_keyset().to_vec(),
            keyset_info: container.keyset_info().map(KeysetInfoJson::from),
        })
    }

    fn decode_container(&self, bytes: &[u8]) -> Result<ProtectedContainer, KeysetError> {
        let json: EncryptedKeysetJson = from_json(bytes)?;
        let info = json.keyset_info.map(KeysetInfoJson::into_info).transpose()?;
        Ok(ProtectedContainer::new(json.encrypted_keyset, info))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, KeysetError> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| KeysetError::malformed(format!("failed to encode JSON: {e}")))
}

fn from_json<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T, KeysetError> {
    serde_json::from_slice(bytes).map_err(|e| KeysetError::malformed(format!("invalid keyset JSON: {e}")))
}

fn key_id(value: u32) -> Result<KeyId, KeysetError> {
    KeyId::new(value).ok_or_else(|| KeysetError::malformed("key id 0 is reserved"))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeysetJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_key_id: Option<u32>,
    key: Vec<KeyJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    retired_key_id: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeyJson {
    key_data: KeyDataJson,
    status: StatusJson,
    key_id: u32,
    output_prefix_type: PrefixJson,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeyDataJson {
    type_url: String,
    #[serde(with = "base64_bytes")]
    value: Vec<u8>,
    key_material_type: MaterialTypeJson,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EncryptedKeysetJson {
    #[serde(with = "base64_bytes")]
    encrypted_keyset: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keyset_info: Option<KeysetInfoJson>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeysetInfoJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_key_id: Option<u32>,
    key_info: Vec<KeyInfoJson>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeyInfoJson {
    type_url: String,
    status: StatusJson,
    key_id: u32,
    output_prefix_type: PrefixJson,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum StatusJson {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum PrefixJson {
    Tink,
    Legacy,
    Raw,
    Crunchy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum MaterialTypeJson {
    Symmetric,
    AsymmetricPrivate,
    AsymmetricPublic,
    Remote,
}

impl From<&Keyset> for KeysetJson {
    fn from(keyset: &Keyset) -> Self {
        Self {
            primary_key_id: keyset.primary_key_id().map(|id| id.value()),
            key: keyset.entries().iter().map(KeyJson::from).collect(),
            retired_key_id: keyset.retired_key_ids().iter().map(|id| id.value()).collect(),
        }
    }
}

impl KeysetJson {
    fn into_keyset(self) -> Result<Keyset, KeysetError> {
        let primary = self.primary_key_id.map(key_id).transpose()?;
        let entries = self
            .key
            .into_iter()
            .map(KeyJson::into_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let mut retired = BTreeSet::new();
        for raw in self.retired_key_id {
            let id = key_id(raw)?;
            if !retired.insert(id) {
                return Err(KeysetError::malformed(format!(
                    "retired key id {id} listed twice"
                )));
            }
        }

        Keyset::from_parts(entries, primary, retired)
            .map_err(|e| KeysetError::malformed(e.to_string()))
    }
}

impl From<&KeyEntry> for KeyJson {
    fn from(entry: &KeyEntry) -> Self {
        let material = entry.material();
        Self {
            key_data: KeyDataJson {
                type_url: material.type_identifier().to_string(),
                value: material.value().to_vec(),
                key_material_type: material.material_type().into(),
            },
            status: entry.status().into(),
            key_id: entry.id().value(),
            output_prefix_type: material.output_prefix_kind().into(),
        }
    }
}

impl KeyJson {
    fn into_entry(self) -> Result<KeyEntry, KeysetError> {
        let material = KeyMaterial::new(
            self.key_data.type_url,
            self.key_data.value,
            self.key_data.key_material_type.into(),
            self.output_prefix_type.into(),
        );
        Ok(KeyEntry::new(
            key_id(self.key_id)?,
            self.status.into(),
            material,
        ))
    }
}

impl From<&KeysetInfo> for KeysetInfoJson {
    fn from(info: &KeysetInfo) -> Self {
        Self {
            primary_key_id: info.primary_key_id().map(|id| id.value()),
            key_info: info
                .key_infos()
                .iter()
                .map(|k| KeyInfoJson {
                    type_url: k.type_identifier().to_string(),
                    status: k.status().into(),
                    key_id: k.key_id().value(),
                    output_prefix_type: k.output_prefix_kind().into(),
                })
                .collect(),
        }
    }
}

impl KeysetInfoJson {
    fn into_info(self) -> Result<KeysetInfo, KeysetError> {
        let primary = self.primary_key_id.map(key_id).transpose()?;
        let key_infos = self
            .key_info
            .into_iter()
            .map(|k| {
                Ok(KeyInfo::new(
                    key_id(k.key_id)?,
                    k.status.into(),
                    k.type_url,
                    k.output_prefix_type.into(),
                ))
            })
            .collect::<Result<Vec<_>, KeysetError>>()?;
        Ok(KeysetInfo::new(primary, key_infos))
    }
}

impl From<KeyStatus> for StatusJson {
    fn from(status: KeyStatus) -> Self {
        match status {
            KeyStatus::Enabled => StatusJson::Enabled,
            KeyStatus::Disabled => StatusJson::Disabled,
        }
    }
}

impl From<StatusJson> for KeyStatus {
    fn from(status: StatusJson) -> Self {
        match status {
            StatusJson::Enabled => KeyStatus::Enabled,
            StatusJson::Disabled => KeyStatus::Disabled,
        }
    }
}

impl From<OutputPrefixKind> for PrefixJson {
    fn from(prefix: OutputPrefixKind) -> Self {
        match prefix {
            OutputPrefixKind::Tink => PrefixJson::Tink,
            OutputPrefixKind::Legacy => PrefixJson::Legacy,
            OutputPrefixKind::Raw => PrefixJson::Raw,
            OutputPrefixKind::Crunchy => PrefixJson::Crunchy,
        }
    }
}

impl From<PrefixJson> for OutputPrefixKind {
    fn from(prefix: PrefixJson) -> Self {
        match prefix {
            PrefixJson::Tink => OutputPrefixKind::Tink,
            PrefixJson::Legacy => OutputPrefixKind::Legacy,
            PrefixJson::Raw => OutputPrefixKind::Raw,
            PrefixJson::Crunchy => OutputPrefixKind::Crunchy,
        }
    }
}

impl From<KeyMaterialType> for MaterialTypeJson {
    fn from(material_type: KeyMaterialType) -> Self {
        match material_type {
            KeyMaterialType::Symmetric => MaterialTypeJson::Symmetric,
            KeyMaterialType::AsymmetricPrivate => MaterialTypeJson::AsymmetricPrivate,
            KeyMaterialType::AsymmetricPublic => MaterialTypeJson::AsymmetricPublic,
            KeyMaterialType::Remote => MaterialTypeJson::Remote,
        }
    }
}

impl From<MaterialTypeJson> for KeyMaterialType {
    fn from(material_type: MaterialTypeJson) -> Self {
        match material_type {
            MaterialTypeJson::Symmetric => KeyMaterialType::Symmetric,
            MaterialTypeJson::AsymmetricPrivate => KeyMaterialType::AsymmetricPrivate,
            MaterialTypeJson::AsymmetricPublic => KeyMaterialType::AsymmetricPublic,
            MaterialTypeJson::Remote => KeyMaterialType::Remote,
        }
    }
}

/// Standard padded base64 for byte fields.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
