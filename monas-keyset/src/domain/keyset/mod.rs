pub mod key_entry;
pub mod key_id;
#[allow(clippy::module_inception)]
pub mod keyset;
pub mod lifecycle;
pub mod public_view;

pub use key_entry::{KeyEntry, KeyMaterial, KeyMaterialType, KeyStatus, OutputPrefixKind};
pub use key_id::KeyId;
pub use keyset::{KeyRow, Keyset};
pub use lifecycle::{KeyIdGenerator, KeysetEvent};
pub use public_view::{PublicKeyData, PublicKeyDeriver};
