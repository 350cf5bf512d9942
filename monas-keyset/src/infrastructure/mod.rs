pub mod crypto;
pub mod key_id_generator;
pub mod key_manager;
pub mod keyset_file;
pub mod kms;
pub mod template_catalog;
pub mod wire;

pub use key_id_generator::RandomKeyIdGenerator;
pub use key_manager::BuiltinKeyManager;
pub use kms::{KmsClient, KmsResolver};
pub use template_catalog::BuiltinTemplateCatalog;
pub use wire::{BinaryWireCodec, TextWireCodec, WireFormat};
