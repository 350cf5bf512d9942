use crate::domain::envelope::{Aead, AeadError};
use aes_gcm::{
    aead::{Aead as _, AeadCore, KeyInit, OsRng, Payload},
    Aes256Gcm, Key, Nonce,
};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-256-GCM key-encryption-key. Output is `nonce || ciphertext || tag`.
pub struct AesGcmAead {
    key: [u8; 32],
}

impl AesGcmAead {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub fn from_slice(key: &[u8]) -> Result<Self, AeadError> {
        let key: [u8; 32] = key.try_into().map_err(|_| {
            AeadError::Encrypt(format!("expected a 32-byte key, got {} bytes", key.len()))
        })?;
        Ok(Self::new(key))
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    #[cfg(test)]
    fn key_for_test(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Aead for AesGcmAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher()
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|_| AeadError::Encrypt("AES-GCM seal failed".to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, AeadError> {
        if ciphertext.len() < NONCE_LEN + TAG_LEN {
            return Err(AeadError::Decrypt(format!(
                "ciphertext too short: {} bytes",
                ciphertext.len()
            )));
        }
        let (nonce, sealed) = ciphertext.split_at(NONCE_LEN);
        self.cipher()
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: associated_data,
                },
            )
            .map_err(|_| AeadError::Decrypt("AES-GCM authentication failed".to_string()))
    }
}

impl std::fmt::Debug for AesGcmAead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmAead").finish_non_exhaustive()
    }
}

impl Drop for AesGcmAead {
    fn drop(&mut self) {
        for byte in self.key.iter_mut() {
            *byte = 0;
        }
    }
}
