//! Resolution of master key URIs to key-encryption-key capabilities.

pub mod fake_kms;
pub mod local_kms;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::domain::{Aead, KeysetError, PlaintextAead};

pub use fake_kms::FakeKmsClient;
pub use local_kms::LocalKmsClient;

/// A provider of AEAD capabilities for one URI scheme.
pub trait KmsClient: Send + Sync {
    fn supports(&self, uri: &str) -> bool;

    /// Returns the capability for the master key at `uri`.
    ///
    /// Network-backed clients may block here; timeouts are theirs to enforce.
    fn get_aead(&self, uri: &str, credential: Option<&Path>) -> Result<Box<dyn Aead>, KeysetError>;
}

/// Registry of KMS clients keyed by URI scheme (`fake-kms`, `local-kms`, ...).
pub struct KmsResolver(RwLock<HashMap<&'static str, Arc<dyn KmsClient>>>);

impl Default for KmsResolver {
    fn default() -> Self {
        Self::with_builtin_clients()
    }
}

impl KmsResolver {
    /// A resolver that knows no schemes.
    pub fn new() -> Self {
        Self(RwLock::new(HashMap::new()))
    }

    pub fn with_builtin_clients() -> Self {
        let resolver = Self::new();
        resolver.register(fake_kms::SCHEME, FakeKmsClient);
        resolver.register(local_kms::SCHEME, LocalKmsClient);
        resolver
    }

    /// Registers `client` for `scheme`, replacing any earlier client.
    pub fn register(&self, scheme: &'static str, client: impl KmsClient + 'static) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scheme, Arc::new(client));
    }

    /// Resolves the key-encryption-key for `master_key_uri`.
    ///
    /// Without a URI the keyset is stored unencrypted and the pass-through
    /// capability is returned.
    pub fn resolve(
        &self,
        master_key_uri: Option<&str>,
        credential: Option<&Path>,
    ) -> Result<Box<dyn Aead>, KeysetError> {
        let Some(uri) = master_key_uri else {
            if let Some(path) = credential {
                return Err(KeysetError::KmsResolutionFailed(format!(
                    "credential {} given without a master key URI",
                    path.display()
                )));
            }
            debug!("no master key URI, using cleartext keyset");
            return Ok(Box::new(PlaintextAead));
        };

        if uri.is_empty() {
            return Err(KeysetError::KmsResolutionFailed(
                "master key URI is empty".to_string(),
            ));
        }

        let client = uri
            .split_once("://")
            .and_then(|(scheme, _)| {
                self.0
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(scheme)
                    .cloned()
            })
            .filter(|client| client.supports(uri))
            .ok_or_else(|| {
                KeysetError::KmsResolutionFailed(format!("unsupported KMS provider for URI: {uri}"))
            })?;

        debug!(scheme = uri.split("://").next(), "resolved KMS client");
        client.get_aead(uri, credential)
    }
}

pub(crate) fn decode_key(encoded: &str, source: &str) -> Result<Box<dyn Aead>, KeysetError> {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    use crate::infrastructure::crypto::AesGcmAead;

    let mut key = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| KeysetError::KmsResolutionFailed(format!("{source}: invalid key encoding: {e}")))?;
    let aead = AesGcmAead::from_slice(&key)
        .map_err(|e| KeysetError::KmsResolutionFailed(format!("{source}: {e}")));
    key.fill(0);
    Ok(Box::new(aead?))
}

pub(crate) fn reject_credential(scheme: &str, credential: Option<&Path>) -> Result<(), KeysetError> {
    match credential {
        Some(path) => Err(KeysetError::KmsResolutionFailed(format!(
            "{scheme} does not take credentials, got {}",
            path.display()
        ))),
        None => Ok(()),
    }
}
