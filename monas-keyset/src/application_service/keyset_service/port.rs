use crate::domain::{KeyMaterial, KeyTemplate, Keyset, KeysetError, ProtectedContainer};

/// Serializes keysets and protected containers in one concrete format.
///
/// - Decoders reject anything that is not a structurally valid keyset with
///   `MalformedWireData`; they never default a missing field.
/// - Encoding a decoded value reproduces the canonical input byte for byte.
pub trait KeysetWireCodec {
    fn encode_keyset(&self, keyset: &Keyset) -> Result<Vec<u8>, KeysetError>;

    fn decode_keyset(&self, bytes: &[u8]) -> Result<Keyset, KeysetError>;

    fn encode_container(&self, container: &ProtectedContainer) -> Result<Vec<u8>, KeysetError>;

    fn decode_container(&self, bytes: &[u8]) -> Result<ProtectedContainer, KeysetError>;
}

/// Named key templates.
pub trait TemplateCatalog {
    /// Unknown names fail with `TemplateNotFound`.
    fn lookup(&self, name: &str) -> Result<KeyTemplate, KeysetError>;

    /// All recognized names, sorted.
    fn names(&self) -> Vec<String>;
}

/// Produces fresh key material for a template.
pub trait KeyMaterialGenerator {
    fn generate(&self, template: &KeyTemplate) -> Result<KeyMaterial, KeysetError>;
}
