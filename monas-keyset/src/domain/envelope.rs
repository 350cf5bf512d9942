use crate::domain::error::KeysetError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AeadError {
    #[error("encryption failed: {0}")]
    Encrypt(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// Authenticated encryption capability used as the key-encryption-key.
///
/// - KMS-backed implementations may block on network I/O; timeouts and retries
///   are their own concern.
/// - When no protection is configured, [`PlaintextAead`] stands in so that the
///   envelope has a single code path.
pub trait Aead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError>;

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError>;
}

impl<A: Aead + ?Sized> Aead for Box<A> {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        (**self).encrypt(plaintext, associated_data)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        (**self).decrypt(ciphertext, associated_data)
    }
}

/// Pass-through capability: encrypt and decrypt are the identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextAead;

impl Aead for PlaintextAead {
    fn encrypt(&self, plaintext: &[u8], _associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, ciphertext: &[u8], _associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        if ciphertext.is_empty() {
            return Err(AeadError::Decrypt("ciphertext is empty".to_string()));
        }
        Ok(ciphertext.to_vec())
    }
}

/// Wraps and unwraps serialized keysets under a KEK.
///
/// The associated data is fixed at construction and must be the same for the
/// wrap and the later unwrap of the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopeCodec {
    associated_data: Vec<u8>,
}

impl EnvelopeCodec {
    /// Envelope with empty associated data.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_associated_data(associated_data: impl Into<Vec<u8>>) -> Self {
        Self {
            associated_data: associated_data.into(),
        }
    }

    pub fn associated_data(&self) -> &[u8] {
        &self.associated_data
    }

    /// Encrypts `plaintext` under `kek`.
    ///
    /// An empty ciphertext can never be unwrapped, so producing one is an error.
    /// Under [`PlaintextAead`] this means an empty plaintext cannot be wrapped
    /// at all: the wrap/unwrap round trip holds for every plaintext under a real
    /// AEAD, but only for non-empty plaintexts under the identity capability.
    pub fn wrap<K>(&self, plaintext: &[u8], kek: &K) -> Result<Vec<u8>, KeysetError>
    where
        K: Aead + ?Sized,
    {
        let ciphertext = kek
            .encrypt(plaintext, &self.associated_data)
            .map_err(|e| KeysetError::corrupted(e.to_string()))?;
        if ciphertext.is_empty() {
            return Err(KeysetError::corrupted(
                "refusing to produce an empty ciphertext",
            ));
        }
        Ok(ciphertext)
    }

    /// Decrypts `ciphertext` under `kek`. An empty ciphertext is always rejected.
    pub fn unwrap<K>(&self, ciphertext: &[u8], kek: &K) -> Result<Vec<u8>, KeysetError>
    where
        K: Aead + ?Sized,
    {
        if ciphertext.is_empty() {
            return Err(KeysetError::corrupted("encrypted keyset is empty"));
        }
        kek.decrypt(ciphertext, &self.associated_data)
            .map_err(|e| KeysetError::corrupted(e.to_string()))
    }
}
