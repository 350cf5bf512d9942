use crate::domain::keyset::OutputPrefixKind;

/// Shape of the key material a template asks for.
///
/// Only the key material factory reads this; the lifecycle engine never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    /// Uniformly random key bytes of the given size.
    Symmetric { key_size: usize },
    /// A NIST P-256 secret scalar.
    EcdsaP256,
}

/// Descriptor of how to generate a new key, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    name: String,
    type_identifier: String,
    output_prefix_kind: OutputPrefixKind,
    spec: KeySpec,
}

impl KeyTemplate {
    pub fn new(
        name: impl Into<String>,
        type_identifier: impl Into<String>,
        output_prefix_kind: OutputPrefixKind,
        spec: KeySpec,
    ) -> Self {
        Self {
            name: name.into(),
            type_identifier: type_identifier.into(),
            output_prefix_kind,
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_identifier(&self) -> &str {
        &self.type_identifier
    }

    pub fn output_prefix_kind(&self) -> OutputPrefixKind {
        self.output_prefix_kind
    }

    pub fn spec(&self) -> KeySpec {
        self.spec
    }
}
