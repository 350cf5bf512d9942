//! Keyset management: a lifecycle engine for Tink-style keysets, their
//! envelope protection under a key-encryption-key, and the binary and JSON
//! wire formats they are stored in.

pub mod application_service;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application_service::keyset_service::{KeysetService, ProtectedKeysetCodec};
pub use config::KeysetConfig;
pub use domain::{ErrorKind, KeyId, Keyset, KeysetError};
