pub mod container;
pub mod envelope;
pub mod error;
pub mod keyset;
pub mod template;

pub use container::{KeyInfo, KeysetInfo, ProtectedContainer};
pub use envelope::{Aead, AeadError, EnvelopeCodec, PlaintextAead};
pub use error::{ErrorKind, KeysetError};
pub use keyset::{
    KeyEntry, KeyId, KeyIdGenerator, KeyMaterial, KeyMaterialType, KeyRow, KeyStatus, Keyset,
    KeysetEvent, OutputPrefixKind, PublicKeyData, PublicKeyDeriver,
};
pub use template::{KeySpec, KeyTemplate};
