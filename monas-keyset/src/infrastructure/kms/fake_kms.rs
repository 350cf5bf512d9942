use std::path::Path;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use super::{decode_key, reject_credential, KmsClient};
use crate::domain::{Aead, KeysetError};

pub const SCHEME: &str = "fake-kms";
const PREFIX: &str = "fake-kms://";

/// Test-only KMS whose URI carries the AES-256 key itself, base64url encoded.
///
/// Not interchangeable with Tink's `fakekms`: there the same scheme carries a
/// serialized keyset, and such URIs fail here with `KmsResolutionFailed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeKmsClient;

impl FakeKmsClient {
    /// Mints a URI for a fresh random key.
    pub fn new_key_uri() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        let uri = format!("{PREFIX}{}", URL_SAFE_NO_PAD.encode(key));
        key.fill(0);
        uri
    }
}

impl KmsClient for FakeKmsClient {
    fn supports(&self, uri: &str) -> bool {
        uri.starts_with(PREFIX)
    }

    fn get_aead(&self, uri: &str, credential: Option<&Path>) -> Result<Box<dyn Aead>, KeysetError> {
        reject_credential(SCHEME, credential)?;
        let encoded = uri.strip_prefix(PREFIX).ok_or_else(|| {
            KeysetError::KmsResolutionFailed(format!("not a {SCHEME} URI: {uri}"))
        })?;
        decode_key(encoded, SCHEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn minted_uri_is_supported() {
        let uri = FakeKmsClient::new_key_uri();
        assert!(FakeKmsClient.supports(&uri));
        assert!(!FakeKmsClient.supports("local-kms:///tmp/key"));
        assert!(FakeKmsClient.get_aead(&uri, None).is_ok());
    }

    #[test]
    fn different_uris_do_not_share_keys() {
        let a = FakeKmsClient
            .get_aead(&FakeKmsClient::new_key_uri(), None)
            .unwrap();
        let b = FakeKmsClient
            .get_aead(&FakeKmsClient::new_key_uri(), None)
            .unwrap();

        let ciphertext = a.encrypt(b"x", b"").unwrap();
        assert!(b.decrypt(&ciphertext, b"").is_err());
    }

    #[test]
    fn rejects_bad_key_material() {
        for uri in ["fake-kms://", "fake-kms://AAAA", "fake-kms://***"] {
            assert!(matches!(
                FakeKmsClient.get_aead(uri, None),
                Err(KeysetError::KmsResolutionFailed(_))
            ));
        }
    }

    #[test]
    fn rejects_serialized_keyset_uris() {
        let uri = "fake-kms://CM2b3_MDElQKSAowdHlwZS5nb29nbGVhcGlzLmNvbS9nb29nbGUuY3J5cHRvLnRpbmsuQWVzR2NtS2V5EhIaEIK75t5L-adlUwVhWvRuWUwYARABGM2b3_MDIAE";
        assert!(FakeKmsClient.supports(uri));
        assert!(matches!(
            FakeKmsClient.get_aead(uri, None),
            Err(KeysetError::KmsResolutionFailed(_))
        ));
    }

    #[test]
    fn rejects_credentials() {
        let path = PathBuf::from("creds.json");
        assert!(FakeKmsClient
            .get_aead(&FakeKmsClient::new_key_uri(), Some(&path))
            .is_err());
    }
}
