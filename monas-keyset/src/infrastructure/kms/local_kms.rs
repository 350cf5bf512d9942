use std::fs;
use std::path::Path;

use tracing::debug;

use super::{decode_key, reject_credential, KmsClient};
use crate::domain::{Aead, KeysetError};

pub const SCHEME: &str = "local-kms";
const PREFIX: &str = "local-kms://";

/// KMS backed by a local file holding a base64url AES-256 key.
///
/// `local-kms:///etc/keys/master.key` reads `/etc/keys/master.key`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalKmsClient;

impl KmsClient for LocalKmsClient {
    fn supports(&self, uri: &str) -> bool {
        uri.starts_with(PREFIX)
    }

    fn get_aead(&self, uri: &str, credential: Option<&Path>) -> Result<Box<dyn Aead>, KeysetError> {
        reject_credential(SCHEME, credential)?;
        let path = uri
            .strip_prefix(PREFIX)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| KeysetError::KmsResolutionFailed(format!("no key path in {uri}")))?;

        debug!(path, "reading local master key");
        let encoded = fs::read_to_string(path).map_err(|e| {
            KeysetError::KmsResolutionFailed(format!("cannot read master key {path}: {e}"))
        })?;
        decode_key(&encoded, SCHEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn key_file(key: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", URL_SAFE_NO_PAD.encode(key)).unwrap();
        file
    }

    fn uri_for(file: &NamedTempFile) -> String {
        format!("{PREFIX}{}", file.path().display())
    }

    #[test]
    fn reads_key_from_file() {
        let file = key_file(&[0x42; 32]);
        let aead = LocalKmsClient.get_aead(&uri_for(&file), None).unwrap();

        let ciphertext = aead.encrypt(b"secret", b"").unwrap();
        let again = LocalKmsClient.get_aead(&uri_for(&file), None).unwrap();
        assert_eq!(again.decrypt(&ciphertext, b"").unwrap(), b"secret");
    }

    #[test]
    fn missing_file_fails() {
        let err = LocalKmsClient
            .get_aead("local-kms:///nonexistent/dir/master.key", None)
            .err()
            .expect("missing key file");
        assert!(matches!(err, KeysetError::KmsResolutionFailed(_)));
    }

    #[test]
    fn short_key_fails() {
        let file = key_file(&[1; 16]);
        assert!(LocalKmsClient.get_aead(&uri_for(&file), None).is_err());
    }

    #[test]
    fn empty_path_fails() {
        assert!(LocalKmsClient.get_aead("local-kms://", None).is_err());
    }
}
