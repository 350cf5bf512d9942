//! Protobuf wire encoding of keysets, compatible with Tink's `Keyset`,
//! `EncryptedKeyset` and `KeysetInfo` messages.
//!
//! Fields are written in ascending tag order with minimal varints and retired
//! ids sorted, so the output for a given keyset is unique. The decoder accepts
//! only that canonical layout: out-of-order or interleaved fields, unsorted
//! retired ids, unknown fields, repeated scalars, non-minimal varints and
//! missing fields are all `MalformedWireData`.

use std::collections::BTreeSet;

use crate::application_service::keyset_service::KeysetWireCodec;
use crate::domain::{
    KeyEntry, KeyId, KeyInfo, KeyMaterial, KeyMaterialType, KeyStatus, Keyset, KeysetError,
    KeysetInfo, OutputPrefixKind, ProtectedContainer,
};

const WIRE_VARINT: u8 = 0;
const WIRE_LEN: u8 = 2;
const MAX_VARINT_LEN: usize = 10;

mod tag {
    pub const KEYSET_PRIMARY_KEY_ID: u32 = 1;
    pub const KEYSET_KEY: u32 = 2;
    pub const KEYSET_RETIRED_KEY_ID: u32 = 15;

    pub const KEY_KEY_DATA: u32 = 1;
    pub const KEY_STATUS: u32 = 2;
    pub const KEY_KEY_ID: u32 = 3;
    pub const KEY_OUTPUT_PREFIX_TYPE: u32 = 4;

    pub const KEY_DATA_TYPE_URL: u32 = 1;
    pub const KEY_DATA_VALUE: u32 = 2;
    pub const KEY_DATA_MATERIAL_TYPE: u32 = 3;

    pub const ENCRYPTED_KEYSET: u32 = 2;
    pub const ENCRYPTED_KEYSET_INFO: u32 = 3;

    pub const INFO_PRIMARY_KEY_ID: u32 = 1;
    pub const INFO_KEY_INFO: u32 = 2;

    pub const KEY_INFO_TYPE_URL: u32 = 1;
    pub const KEY_INFO_STATUS: u32 = 2;
    pub const KEY_INFO_KEY_ID: u32 = 3;
    pub const KEY_INFO_OUTPUT_PREFIX_TYPE: u32 = 4;
}

/// Tink-compatible binary keyset codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryWireCodec;

impl KeysetWireCodec for BinaryWireCodec {
    fn encode_keyset(&self, keyset: &Keyset) -> Result<Vec<u8>, KeysetError> {
        Ok(write_keyset(keyset).into_bytes())
    }

    fn decode_keyset(&self, bytes: &[u8]) -> Result<Keyset, KeysetError> {
        read_keyset(bytes)
    }

    fn encode_container(&self, container: &ProtectedContainer) -> Result<Vec<u8>, KeysetError> {
        let mut w = ProtoWriter::new();
        w.bytes(tag::ENCRYPTED_KEYSET, container.encrypted_keyset());
        if let Some(info) = container.keyset_info() {
            w.message(tag::ENCRYPTED_KEYSET_INFO, write_keyset_info(info));
        }
        Ok(w.into_bytes())
    }

    fn decode_container(&self, bytes: &[u8]) -> Result<ProtectedContainer, KeysetError> {
        let mut encrypted = None;
        let mut info = None;

        let mut r = ProtoReader::new(bytes);
        while let Some((field, value)) = r.next_field()? {
            match field {
                tag::ENCRYPTED_KEYSET => set_once(
                    &mut encrypted,
                    value.bytes("EncryptedKeyset.encrypted_keyset")?.to_vec(),
                    "EncryptedKeyset.encrypted_keyset",
                )?,
                tag::ENCRYPTED_KEYSET_INFO => set_once(
                    &mut info,
                    read_keyset_info(value.bytes("EncryptedKeyset.keyset_info")?)?,
                    "EncryptedKeyset.keyset_info",
                )?,
                other => return Err(unknown_field("EncryptedKeyset", other)),
            }
        }

        Ok(ProtectedContainer::new(
            required(encrypted, "EncryptedKeyset.encrypted_keyset")?,
            info,
        ))
    }
}

fn write_keyset(keyset: &Keyset) -> ProtoWriter {
    let mut w = ProtoWriter::new();
    if let Some(primary) = keyset.primary_key_id() {
        w.uint32(tag::KEYSET_PRIMARY_KEY_ID, primary.value());
    }
    for entry in keyset.entries() {
        w.message(tag::KEYSET_KEY, write_key(entry));
    }
    for retired in keyset.retired_key_ids() {
        w.uint32(tag::KEYSET_RETIRED_KEY_ID, retired.value());
    }
    w
}

fn write_key(entry: &KeyEntry) -> ProtoWriter {
    let material = entry.material();

    let mut key_data = ProtoWriter::new();
    key_data.bytes(tag::KEY_DATA_TYPE_URL, material.type_identifier().as_bytes());
    key_data.bytes(tag::KEY_DATA_VALUE, material.value());
    key_data.uint32(
        tag::KEY_DATA_MATERIAL_TYPE,
        material_type_code(material.material_type()),
    );

    let mut w = ProtoWriter::new();
    w.message(tag::KEY_KEY_DATA, key_data);
    w.uint32(tag::KEY_STATUS, status_code(entry.status()));
    w.uint32(tag::KEY_KEY_ID, entry.id().value());
    w.uint32(
        tag::KEY_OUTPUT_PREFIX_TYPE,
        prefix_code(material.output_prefix_kind()),
    );
    w
}

fn write_keyset_info(info: &KeysetInfo) -> ProtoWriter {
    let mut w = ProtoWriter::new();
    if let Some(primary) = info.primary_key_id() {
        w.uint32(tag::INFO_PRIMARY_KEY_ID, primary.value());
    }
    for key_info in info.key_infos() {
        let mut k = ProtoWriter::new();
        k.bytes(tag::KEY_INFO_TYPE_URL, key_info.type_identifier().as_bytes());
        k.uint32(tag::KEY_INFO_STATUS, status_code(key_info.status()));
        k.uint32(tag::KEY_INFO_KEY_ID, key_info.key_id().value());
        k.uint32(
            tag::KEY_INFO_OUTPUT_PREFIX_TYPE,
            prefix_code(key_info.output_prefix_kind()),
        );
        w.message(tag::INFO_KEY_INFO, k);
    }
    w
}

fn read_keyset(bytes: &[u8]) -> Result<Keyset, KeysetError> {
    let mut primary = None;
    let mut entries = Vec::new();
    let mut retired = BTreeSet::new();

    let mut r = ProtoReader::new(bytes);
    while let Some((field, value)) = r.next_field()? {
        match field {
            tag::KEYSET_PRIMARY_KEY_ID => set_once(
                &mut primary,
                value.uint32("Keyset.primary_key_id")?,
                "Keyset.primary_key_id",
            )?,
            tag::KEYSET_KEY => entries.push(read_key(value.bytes("Keyset.key")?)?),
            tag::KEYSET_RETIRED_KEY_ID => {
                let id = key_id(value.uint32("Keyset.retired_key_id")?)?;
                if retired.last().is_some_and(|last| *last >= id) {
                    return Err(KeysetError::malformed(format!(
                        "retired key id {id} is not in ascending order"
                    )));
                }
                retired.insert(id);
            }
            other => return Err(unknown_field("Keyset", other)),
        }
    }

    let primary = primary.map(key_id).transpose()?;
    Keyset::from_parts(entries, primary, retired).map_err(|e| KeysetError::malformed(e.to_string()))
}

fn read_key(bytes: &[u8]) -> Result<KeyEntry, KeysetError> {
    let mut key_data = None;
    let mut status = None;
    let mut id = None;
    let mut prefix = None;

    let mut r = ProtoReader::new(bytes);
    while let Some((field, value)) = r.next_field()? {
        match field {
            tag::KEY_KEY_DATA => set_once(
                &mut key_data,
                value.bytes("Key.key_data")?,
                "Key.key_data",
            )?,
            tag::KEY_STATUS => set_once(
                &mut status,
                status_from_code(value.uint32("Key.status")?)?,
                "Key.status",
            )?,
            tag::KEY_KEY_ID => set_once(&mut id, key_id(value.uint32("Key.key_id")?)?, "Key.key_id")?,
            tag::KEY_OUTPUT_PREFIX_TYPE => set_once(
                &mut prefix,
                prefix_from_code(value.uint32("Key.output_prefix_type")?)?,
                "Key.output_prefix_type",
            )?,
            other => return Err(unknown_field("Key", other)),
        }
    }

    let id = required(id, "Key.key_id")?;
    let status = required(status, "Key.status")?;
    let prefix = required(prefix, "Key.output_prefix_type")?;
    let material = read_key_data(required(key_data, "Key.key_data")?, prefix)?;

    Ok(KeyEntry::new(id, status, material))
}

fn read_key_data(bytes: &[u8], prefix: OutputPrefixKind) -> Result<KeyMaterial, KeysetError> {
    let mut type_url = None;
    let mut value_bytes = None;
    let mut material_type = None;

    let mut r = ProtoReader::new(bytes);
    while let Some((field, value)) = r.next_field()? {
        match field {
            tag::KEY_DATA_TYPE_URL => set_once(
                &mut type_url,
                value.string("KeyData.type_url")?,
                "KeyData.type_url",
            )?,
            tag::KEY_DATA_VALUE => set_once(
                &mut value_bytes,
                value.bytes("KeyData.value")?.to_vec(),
                "KeyData.value",
            )?,
            tag::KEY_DATA_MATERIAL_TYPE => set_once(
                &mut material_type,
                material_type_from_code(value.uint32("KeyData.key_material_type")?)?,
                "KeyData.key_material_type",
            )?,
            other => return Err(unknown_field("KeyData", other)),
        }
    }

    Ok(KeyMaterial::new(
        required(type_url, "KeyData.type_url")?,
        required(value_bytes, "KeyData.value")?,
        required(material_type, "KeyData.key_material_type")?,
        prefix,
    ))
}

fn read_keyset_info(bytes: &[u8]) -> Result<KeysetInfo, KeysetError> {
    let mut primary = None;
    let mut key_infos = Vec::new();

    let mut r = ProtoReader::new(bytes);
    while let Some((field, value)) = r.next_field()? {
        match field {
            tag::INFO_PRIMARY_KEY_ID => set_once(
                &mut primary,
                key_id(value.uint32("KeysetInfo.primary_key_id")?)?,
                "KeysetInfo.primary_key_id",
            )?,
            tag::INFO_KEY_INFO => key_infos.push(read_key_info(value.bytes("KeysetInfo.key_info")?)?),
            other => return Err(unknown_field("KeysetInfo", other)),
        }
    }

    Ok(KeysetInfo::new(primary, key_infos))
}

fn read_key_info(bytes: &[u8]) -> Result<KeyInfo, KeysetError> {
    let mut type_url = None;
    let mut status = None;
    let mut id = None;
    let mut prefix = None;

    let mut r = ProtoReader::new(bytes);
    while let Some((field, value)) = r.next_field()? {
        match field {
            tag::KEY_INFO_TYPE_URL => set_once(
                &mut type_url,
                value.string("KeyInfo.type_url")?,
                "KeyInfo.type_url",
            )?,
            tag::KEY_INFO_STATUS => set_once(
                &mut status,
                status_from_code(value.uint32("KeyInfo.status")?)?,
                "KeyInfo.status",
            )?,
            tag::KEY_INFO_KEY_ID => set_once(
                &mut id,
                key_id(value.uint32("KeyInfo.key_id")?)?,
                "KeyInfo.key_id",
            )?,
            tag::KEY_INFO_OUTPUT_PREFIX_TYPE => set_once(
                &mut prefix,
                prefix_from_code(value.uint32("KeyInfo.output_prefix_type")?)?,
                "KeyInfo.output_prefix_type",
            )?,
            other => return Err(unknown_field("KeyInfo", other)),
        }
    }

    Ok(KeyInfo::new(
        required(id, "KeyInfo.key_id")?,
        required(status, "KeyInfo.status")?,
        required(type_url, "KeyInfo.type_url")?,
        required(prefix, "KeyInfo.output_prefix_type")?,
    ))
}

fn status_code(status: KeyStatus) -> u32 {
    match status {
        KeyStatus::Enabled => 1,
        KeyStatus::Disabled => 2,
    }
}

fn status_from_code(code: u32) -> Result<KeyStatus, KeysetError> {
    match code {
        1 => Ok(KeyStatus::Enabled),
        2 => Ok(KeyStatus::Disabled),
        other => Err(KeysetError::malformed(format!("unknown key status {other}"))),
    }
}

fn prefix_code(prefix: OutputPrefixKind) -> u32 {
    match prefix {
        OutputPrefixKind::Tink => 1,
        OutputPrefixKind::Legacy => 2,
        OutputPrefixKind::Raw => 3,
        OutputPrefixKind::Crunchy => 4,
    }
}

fn prefix_from_code(code: u32) -> Result<OutputPrefixKind, KeysetError> {
    match code {
        1 => Ok(OutputPrefixKind::Tink),
        2 => Ok(OutputPrefixKind::Legacy),
        3 => Ok(OutputPrefixKind::Raw),
        4 => Ok(OutputPrefixKind::Crunchy),
        other => Err(KeysetError::malformed(format!(
            "unknown output prefix type {other}"
        ))),
    }
}

fn material_type_code(material_type: KeyMaterialType) -> u32 {
    match material_type {
        KeyMaterialType::Symmetric => 1,
        KeyMaterialType::AsymmetricPrivate => 2,
        KeyMaterialType::AsymmetricPublic => 3,
        KeyMaterialType::Remote => 4,
    }
}

fn material_type_from_code(code: u32) -> Result<KeyMaterialType, KeysetError> {
    match code {
        1 => Ok(KeyMaterialType::Symmetric),
        2 => Ok(KeyMaterialType::AsymmetricPrivate),
        3 => Ok(KeyMaterialType::AsymmetricPublic),
        4 => Ok(KeyMaterialType::Remote),
        other => Err(KeysetError::malformed(format!(
            "unknown key material type {other}"
        ))),
    }
}

fn key_id(value: u32) -> Result<KeyId, KeysetError> {
    KeyId::new(value).ok_or_else(|| KeysetError::malformed("key id 0 is reserved"))
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &str) -> Result<(), KeysetError> {
    if slot.is_some() {
        return Err(KeysetError::malformed(format!("{field} appears more than once")));
    }
    *slot = Some(value);
    Ok(())
}

fn required<T>(slot: Option<T>, field: &str) -> Result<T, KeysetError> {
    slot.ok_or_else(|| KeysetError::malformed(format!("missing required field {field}")))
}

fn unknown_field(message: &str, field: u32) -> KeysetError {
    KeysetError::malformed(format!("unknown field {field} in {message}"))
}

struct ProtoWriter {
    buf: Vec<u8>,
}

impl ProtoWriter {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    fn key(&mut self, field: u32, wire_type: u8) {
        self.varint((u64::from(field) << 3) | u64::from(wire_type));
    }

    fn uint32(&mut self, field: u32, value: u32) {
        self.key(field, WIRE_VARINT);
        self.varint(u64::from(value));
    }

    fn bytes(&mut self, field: u32, value: &[u8]) {
        self.key(field, WIRE_LEN);
        self.varint(value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    fn message(&mut self, field: u32, message: ProtoWriter) {
        self.bytes(field, &message.buf);
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

enum FieldValue<'a> {
    Varint(u64),
    Bytes(&'a [u8]),
}

impl<'a> FieldValue<'a> {
    fn uint32(&self, field: &str) -> Result<u32, KeysetError> {
        match self {
            FieldValue::Varint(v) => u32::try_from(*v).map_err(|_| {
                KeysetError::malformed(format!("{field} does not fit in 32 bits"))
            }),
            FieldValue::Bytes(_) => Err(wrong_wire_type(field)),
        }
    }

    fn bytes(&self, field: &str) -> Result<&'a [u8], KeysetError> {
        match self {
            FieldValue::Bytes(b) => Ok(*b),
            FieldValue::Varint(_) => Err(wrong_wire_type(field)),
        }
    }

    fn string(&self, field: &str) -> Result<String, KeysetError> {
        let bytes = self.bytes(field)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| KeysetError::malformed(format!("{field} is not valid UTF-8")))
    }
}

fn wrong_wire_type(field: &str) -> KeysetError {
    KeysetError::malformed(format!("{field} has the wrong wire type"))
}

/// Reads fields of one message. Field numbers must never decrease, which
/// also keeps the values of a repeated field contiguous.
struct ProtoReader<'a> {
    buf: &'a [u8],
    pos: usize,
    last_field: u32,
}

impl<'a> ProtoReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            last_field: 0,
        }
    }

    fn varint(&mut self) -> Result<u64, KeysetError> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or_else(|| KeysetError::malformed("truncated varint"))?;
            self.pos += 1;

            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(KeysetError::malformed("varint exceeds 64 bits"));
            }
            value |= u64::from(byte & 0x7F) << (7 * i);

            if byte & 0x80 == 0 {
                if byte == 0 && i > 0 {
                    return Err(KeysetError::malformed("non-minimal varint"));
                }
                return Ok(value);
            }
        }
        Err(KeysetError::malformed("varint exceeds 64 bits"))
    }

    fn next_field(&mut self) -> Result<Option<(u32, FieldValue<'a>)>, KeysetError> {
        if self.pos == self.buf.len() {
            return Ok(None);
        }

        let key = self.varint()?;
        let field = u32::try_from(key >> 3)
            .ok()
            .filter(|f| *f != 0)
            .ok_or_else(|| KeysetError::malformed(format!("invalid field number {}", key >> 3)))?;
        if field < self.last_field {
            return Err(KeysetError::malformed(format!(
                "field {field} follows field {}",
                self.last_field
            )));
        }
        self.last_field = field;

        let value = match (key & 0x07) as u8 {
            WIRE_VARINT => FieldValue::Varint(self.varint()?),
            WIRE_LEN => {
                let len = usize::try_from(self.varint()?)
                    .map_err(|_| KeysetError::malformed("length prefix too large"))?;
                let end = self
                    .pos
                    .checked_add(len)
                    .filter(|end| *end <= self.buf.len())
                    .ok_or_else(|| KeysetError::malformed("length prefix runs past the end"))?;
                let bytes = &self.buf[self.pos..end];
                self.pos = end;
                FieldValue::Bytes(bytes)
            }
            other => {
                return Err(KeysetError::malformed(format!(
                    "unsupported wire type {other} for field {field}"
                )))
            }
        };

        Ok(Some((field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    const SINGLE_KEY: [u8; 20] = [
        0x08, 0x01, 0x12, 0x10, 0x0A, 0x08, 0x0A, 0x01, 0x74, 0x12, 0x01, 0xAA, 0x18, 0x01, 0x10,
        0x01, 0x18, 0x01, 0x20, 0x01,
    ];

    fn id(value: u32) -> KeyId {
        KeyId::new(value).unwrap()
    }

    fn single_key_keyset() -> Keyset {
        let material = KeyMaterial::new(
            "t",
            vec![0xAA],
            KeyMaterialType::Symmetric,
            OutputPrefixKind::Tink,
        );
        Keyset::from_parts(
            vec![KeyEntry::new(id(1), KeyStatus::Enabled, material)],
            Some(id(1)),
            BTreeSet::new(),
        )
        .unwrap()
    }

    fn assert_malformed(bytes: &[u8]) {
        let err = BinaryWireCodec
            .decode_keyset(bytes)
            .expect_err("input must be rejected");
        assert_eq!(err.kind(), ErrorKind::MalformedWireData, "{err}");
    }

    #[test]
    fn encodes_known_vector() {
        let bytes = BinaryWireCodec.encode_keyset(&single_key_keyset()).unwrap();
        assert_eq!(bytes, SINGLE_KEY);
    }

    #[test]
    fn decodes_known_vector() {
        let keyset = BinaryWireCodec.decode_keyset(&SINGLE_KEY).unwrap();
        assert_eq!(keyset, single_key_keyset());
    }

    #[test]
    fn large_ids_and_retired_ids_survive() {
        let material = KeyMaterial::new(
            "type.googleapis.com/google.crypto.tink.HmacKey",
            vec![1, 2, 3],
            KeyMaterialType::Symmetric,
            OutputPrefixKind::Raw,
        );
        let keyset = Keyset::from_parts(
            vec![
                KeyEntry::new(id(u32::MAX), KeyStatus::Enabled, material.clone()),
                KeyEntry::new(id(300), KeyStatus::Disabled, material),
            ],
            Some(id(u32::MAX)),
            BTreeSet::from([id(7), id(70_000)]),
        )
        .unwrap();

        let bytes = BinaryWireCodec.encode_keyset(&keyset).unwrap();
        let decoded = BinaryWireCodec.decode_keyset(&bytes).unwrap();
        assert_eq!(decoded, keyset);
        assert_eq!(BinaryWireCodec.encode_keyset(&decoded).unwrap(), bytes);
    }

    #[test]
    fn container_keeps_info() {
        let keyset = single_key_keyset();
        let container =
            ProtectedContainer::new(vec![9, 9, 9], Some(KeysetInfo::from_keyset(&keyset)));

        let bytes = BinaryWireCodec.encode_container(&container).unwrap();
        assert_eq!(BinaryWireCodec.decode_container(&bytes).unwrap(), container);
    }

    #[test]
    fn container_requires_payload() {
        let err = BinaryWireCodec
            .decode_container(&[])
            .expect_err("encrypted_keyset is required");
        assert_eq!(err.kind(), ErrorKind::MalformedWireData);
    }

    #[test]
    fn rejects_truncated_input() {
        // `08 01` alone is also rejected: its primary does not exist.
        for len in 1..SINGLE_KEY.len() {
            assert_malformed(&SINGLE_KEY[..len]);
        }
    }

    #[test]
    fn rejects_non_minimal_varint() {
        assert_malformed(&[0x08, 0x81, 0x00]);
    }

    #[test]
    fn rejects_reordered_key_fields() {
        // Key fields as status, key_id, prefix, key_data.
        assert_malformed(&[
            0x08, 0x01, 0x12, 0x10, 0x10, 0x01, 0x18, 0x01, 0x20, 0x01, 0x0A, 0x08, 0x0A, 0x01,
            0x74, 0x12, 0x01, 0xAA, 0x18, 0x01,
        ]);
    }

    #[test]
    fn rejects_reordered_key_data_fields() {
        // KeyData fields as value, type_url, material type.
        assert_malformed(&[
            0x08, 0x01, 0x12, 0x10, 0x0A, 0x08, 0x12, 0x01, 0xAA, 0x0A, 0x01, 0x74, 0x18, 0x01,
            0x10, 0x01, 0x18, 0x01, 0x20, 0x01,
        ]);
    }

    #[test]
    fn rejects_primary_after_keys() {
        let mut bytes = SINGLE_KEY[2..].to_vec();
        bytes.extend_from_slice(&[0x08, 0x01]);
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_interleaved_keys_and_retired_ids() {
        let mut second = SINGLE_KEY[2..].to_vec();
        second[15] = 0x02;

        let mut bytes = SINGLE_KEY.to_vec();
        bytes.extend_from_slice(&[0x78, 0x09]);
        bytes.extend_from_slice(&second);
        assert_malformed(&bytes);

        let mut canonical = SINGLE_KEY.to_vec();
        canonical.extend_from_slice(&second);
        canonical.extend_from_slice(&[0x78, 0x09]);
        let decoded = BinaryWireCodec.decode_keyset(&canonical).unwrap();
        assert_eq!(BinaryWireCodec.encode_keyset(&decoded).unwrap(), canonical);
    }

    #[test]
    fn retired_ids_must_ascend() {
        let mut unsorted = SINGLE_KEY.to_vec();
        unsorted.extend_from_slice(&[0x78, 0x09, 0x78, 0x03]);
        assert_malformed(&unsorted);

        let mut repeated = SINGLE_KEY.to_vec();
        repeated.extend_from_slice(&[0x78, 0x03, 0x78, 0x03]);
        assert_malformed(&repeated);

        let mut sorted = SINGLE_KEY.to_vec();
        sorted.extend_from_slice(&[0x78, 0x03, 0x78, 0x09]);
        let decoded = BinaryWireCodec.decode_keyset(&sorted).unwrap();
        assert_eq!(BinaryWireCodec.encode_keyset(&decoded).unwrap(), sorted);
    }

    #[test]
    fn rejects_reordered_container_fields() {
        let keyset = single_key_keyset();
        let container =
            ProtectedContainer::new(vec![9, 9, 9], Some(KeysetInfo::from_keyset(&keyset)));
        let bytes = BinaryWireCodec.encode_container(&container).unwrap();

        // Move the leading encrypted_keyset field (5 bytes) behind keyset_info.
        let mut reordered = bytes[5..].to_vec();
        reordered.extend_from_slice(&bytes[..5]);
        let err = BinaryWireCodec
            .decode_container(&reordered)
            .expect_err("keyset_info must follow encrypted_keyset");
        assert_eq!(err.kind(), ErrorKind::MalformedWireData);
    }

    #[test]
    fn rejects_varint_past_64_bits() {
        assert_malformed(&[
            0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02,
        ]);
    }

    #[test]
    fn rejects_unknown_field() {
        let mut bytes = SINGLE_KEY.to_vec();
        bytes.extend_from_slice(&[0x28, 0x01]);
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_unsupported_wire_type() {
        assert_malformed(&[0x0D, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn rejects_repeated_primary() {
        let mut bytes = vec![0x08, 0x01];
        bytes.extend_from_slice(&SINGLE_KEY);
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_missing_status() {
        // Key without field 2.
        assert_malformed(&[
            0x08, 0x01, 0x12, 0x0E, 0x0A, 0x08, 0x0A, 0x01, 0x74, 0x12, 0x01, 0xAA, 0x18, 0x01,
            0x18, 0x01, 0x20, 0x01,
        ]);
    }

    #[test]
    fn rejects_zero_enum_value() {
        let mut bytes = SINGLE_KEY;
        bytes[15] = 0x00;
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_zero_key_id() {
        let mut bytes = SINGLE_KEY;
        bytes[17] = 0x00;
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_explicit_zero_primary() {
        let mut bytes = SINGLE_KEY;
        bytes[1] = 0x00;
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut bytes = SINGLE_KEY.to_vec();
        bytes.extend_from_slice(&SINGLE_KEY[2..]);
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_dangling_primary() {
        let mut bytes = SINGLE_KEY;
        bytes[1] = 0x02;
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_invalid_utf8_type_url() {
        let mut bytes = SINGLE_KEY;
        bytes[8] = 0xFF;
        assert_malformed(&bytes);
    }

    #[test]
    fn rejects_length_past_end() {
        let mut bytes = SINGLE_KEY;
        bytes[3] = 0x11;
        assert_malformed(&bytes);
    }
}
