pub mod command;
pub mod port;
pub mod protected;
pub mod service;

pub use command::{AddKeyResult, CreateKeysetResult};
pub use port::{KeyMaterialGenerator, KeysetWireCodec, TemplateCatalog};
pub use protected::ProtectedKeysetCodec;
pub use service::KeysetService;
