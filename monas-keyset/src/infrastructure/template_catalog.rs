use crate::application_service::keyset_service::TemplateCatalog;
use crate::domain::{KeySpec, KeyTemplate, KeysetError, OutputPrefixKind};

pub const AES_GCM_KEY: &str = "type.googleapis.com/google.crypto.tink.AesGcmKey";
pub const AES_CTR_HMAC_AEAD_KEY: &str = "type.googleapis.com/google.crypto.tink.AesCtrHmacAeadKey";
pub const AES_GCM_SIV_KEY: &str = "type.googleapis.com/google.crypto.tink.AesGcmSivKey";
pub const CHACHA20_POLY1305_KEY: &str = "type.googleapis.com/google.crypto.tink.ChaCha20Poly1305Key";
pub const XCHACHA20_POLY1305_KEY: &str =
    "type.googleapis.com/google.crypto.tink.XChaCha20Poly1305Key";
pub const AES_SIV_KEY: &str = "type.googleapis.com/google.crypto.tink.AesSivKey";
pub const AES_CMAC_KEY: &str = "type.googleapis.com/google.crypto.tink.AesCmacKey";
pub const HMAC_KEY: &str = "type.googleapis.com/google.crypto.tink.HmacKey";
pub const HMAC_PRF_KEY: &str = "type.googleapis.com/google.crypto.tink.HmacPrfKey";
pub const AES_CMAC_PRF_KEY: &str = "type.googleapis.com/google.crypto.tink.AesCmacPrfKey";
pub const HKDF_PRF_KEY: &str = "type.googleapis.com/google.crypto.tink.HkdfPrfKey";
pub const AES_GCM_HKDF_STREAMING_KEY: &str =
    "type.googleapis.com/google.crypto.tink.AesGcmHkdfStreamingKey";
pub const AES_CTR_HMAC_STREAMING_KEY: &str =
    "type.googleapis.com/google.crypto.tink.AesCtrHmacStreamingKey";
pub const ECDSA_PRIVATE_KEY: &str = "type.googleapis.com/google.crypto.tink.EcdsaPrivateKey";
pub const ECDSA_PUBLIC_KEY: &str = "type.googleapis.com/google.crypto.tink.EcdsaPublicKey";
pub const ECIES_PRIVATE_KEY: &str =
    "type.googleapis.com/google.crypto.tink.EciesAeadHkdfPrivateKey";
pub const ECIES_PUBLIC_KEY: &str = "type.googleapis.com/google.crypto.tink.EciesAeadHkdfPublicKey";
pub const JWT_ECDSA_PRIVATE_KEY: &str = "type.googleapis.com/google.crypto.tink.JwtEcdsaPrivateKey";
pub const JWT_ECDSA_PUBLIC_KEY: &str = "type.googleapis.com/google.crypto.tink.JwtEcdsaPublicKey";
pub const JWT_HMAC_KEY: &str = "type.googleapis.com/google.crypto.tink.JwtHmacKey";

use crate::domain::OutputPrefixKind::{Raw, Tink};

const fn sym(key_size: usize) -> KeySpec {
    KeySpec::Symmetric { key_size }
}

const P256: KeySpec = KeySpec::EcdsaP256;

static TEMPLATES: &[(&str, &str, OutputPrefixKind, KeySpec)] = &[
    // AEAD
    ("AES128_GCM", AES_GCM_KEY, Tink, sym(16)),
    ("AES256_GCM", AES_GCM_KEY, Tink, sym(32)),
    ("AES256_GCM_RAW", AES_GCM_KEY, Raw, sym(32)),
    // AES key followed by a 32-byte HMAC key.
    ("AES128_CTR_HMAC_SHA256", AES_CTR_HMAC_AEAD_KEY, Tink, sym(16 + 32)),
    ("AES256_CTR_HMAC_SHA256", AES_CTR_HMAC_AEAD_KEY, Tink, sym(32 + 32)),
    ("AES128_GCM_SIV", AES_GCM_SIV_KEY, Tink, sym(16)),
    ("AES256_GCM_SIV", AES_GCM_SIV_KEY, Tink, sym(32)),
    ("AES256_GCM_SIV_RAW", AES_GCM_SIV_KEY, Raw, sym(32)),
    ("CHACHA20_POLY1305", CHACHA20_POLY1305_KEY, Tink, sym(32)),
    ("XCHACHA20_POLY1305", XCHACHA20_POLY1305_KEY, Tink, sym(32)),
    // Deterministic AEAD
    ("AES_SIV", AES_SIV_KEY, Tink, sym(64)),
    // MAC
    ("AES_CMAC", AES_CMAC_KEY, Tink, sym(32)),
    ("HMAC_SHA256_128BITTAG", HMAC_KEY, Tink, sym(32)),
    ("HMAC_SHA256_256BITTAG", HMAC_KEY, Tink, sym(32)),
    ("HMAC_SHA512_256BITTAG", HMAC_KEY, Tink, sym(64)),
    ("HMAC_SHA512_512BITTAG", HMAC_KEY, Tink, sym(64)),
    // PRF
    ("HMAC_SHA256_PRF", HMAC_PRF_KEY, Raw, sym(32)),
    ("HMAC_SHA512_PRF", HMAC_PRF_KEY, Raw, sym(64)),
    ("AES_CMAC_PRF", AES_CMAC_PRF_KEY, Raw, sym(32)),
    ("HKDF_SHA256", HKDF_PRF_KEY, Raw, sym(32)),
    // Streaming AEAD
    ("AES128_GCM_HKDF_4KB", AES_GCM_HKDF_STREAMING_KEY, Raw, sym(16)),
    ("AES256_GCM_HKDF_4KB", AES_GCM_HKDF_STREAMING_KEY, Raw, sym(32)),
    ("AES128_GCM_HKDF_1MB", AES_GCM_HKDF_STREAMING_KEY, Raw, sym(16)),
    ("AES256_GCM_HKDF_1MB", AES_GCM_HKDF_STREAMING_KEY, Raw, sym(32)),
    ("AES128_CTR_HMAC_SHA256_4KB", AES_CTR_HMAC_STREAMING_KEY, Raw, sym(16)),
    ("AES256_CTR_HMAC_SHA256_4KB", AES_CTR_HMAC_STREAMING_KEY, Raw, sym(32)),
    ("AES128_CTR_HMAC_SHA256_1MB", AES_CTR_HMAC_STREAMING_KEY, Raw, sym(16)),
    ("AES256_CTR_HMAC_SHA256_1MB", AES_CTR_HMAC_STREAMING_KEY, Raw, sym(32)),
    // Digital signatures
    ("ECDSA_P256", ECDSA_PRIVATE_KEY, Tink, P256),
    ("ECDSA_P256_NO_PREFIX", ECDSA_PRIVATE_KEY, Raw, P256),
    ("ECDSA_P256_RAW", ECDSA_PRIVATE_KEY, Raw, P256),
    // Hybrid encryption
    ("ECIES_P256_HKDF_HMAC_SHA256_AES128_GCM", ECIES_PRIVATE_KEY, Tink, P256),
    (
        "ECIES_P256_HKDF_HMAC_SHA256_AES128_CTR_HMAC_SHA256",
        ECIES_PRIVATE_KEY,
        Tink,
        P256,
    ),
    // JWT
    ("ES256", JWT_ECDSA_PRIVATE_KEY, Tink, P256),
    ("ES256_RAW", JWT_ECDSA_PRIVATE_KEY, Raw, P256),
    ("HS256", JWT_HMAC_KEY, Tink, sym(32)),
    ("HS384", JWT_HMAC_KEY, Tink, sym(48)),
    ("HS512", JWT_HMAC_KEY, Tink, sym(64)),
    ("HS256_RAW", JWT_HMAC_KEY, Raw, sym(32)),
    ("HS384_RAW", JWT_HMAC_KEY, Raw, sym(48)),
    ("HS512_RAW", JWT_HMAC_KEY, Raw, sym(64)),
];

/// The fixed set of templates this tool can generate keys for.
///
/// Curves other than P-256, Ed25519 and RSA templates are not offered: their
/// names resolve to `TemplateNotFound`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTemplateCatalog;

impl TemplateCatalog for BuiltinTemplateCatalog {
    fn lookup(&self, name: &str) -> Result<KeyTemplate, KeysetError> {
        TEMPLATES
            .iter()
            .find(|(n, ..)| *n == name)
            .map(|(n, type_url, prefix, spec)| KeyTemplate::new(*n, *type_url, *prefix, *spec))
            .ok_or_else(|| KeysetError::TemplateNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = TEMPLATES.iter().map(|(n, ..)| n.to_string()).collect();
        names.sort();
        names
    }
}
