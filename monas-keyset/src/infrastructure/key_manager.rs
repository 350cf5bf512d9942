//! Built-in key material factory.

use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::elliptic_curve::rand_core::OsRng;
use rand::RngCore;

use crate::application_service::keyset_service::KeyMaterialGenerator;
use crate::domain::{
    KeyMaterial, KeyMaterialType, KeySpec, KeyTemplate, KeysetError, PublicKeyData,
    PublicKeyDeriver,
};
use crate::infrastructure::template_catalog::{
    ECDSA_PRIVATE_KEY, ECDSA_PUBLIC_KEY, ECIES_PRIVATE_KEY, ECIES_PUBLIC_KEY,
    JWT_ECDSA_PRIVATE_KEY, JWT_ECDSA_PUBLIC_KEY,
};

/// Generates key material for built-in templates and derives public keys
/// for the P-256 based ones.
///
/// Symmetric material is raw random bytes. P-256 private material is the
/// 32-byte big-endian secret scalar; its public form is the uncompressed SEC1
/// point.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinKeyManager;

impl KeyMaterialGenerator for BuiltinKeyManager {
    fn generate(&self, template: &KeyTemplate) -> Result<KeyMaterial, KeysetError> {
        let (value, material_type) = match template.spec() {
            KeySpec::Symmetric { key_size } => {
                let mut key = vec![0u8; key_size];
                rand::rngs::OsRng.fill_bytes(&mut key);
                (key, KeyMaterialType::Symmetric)
            }
            KeySpec::EcdsaP256 => {
                let secret_key = SigningKey::random(&mut OsRng);
                (
                    secret_key.to_bytes().to_vec(),
                    KeyMaterialType::AsymmetricPrivate,
                )
            }
        };

        Ok(KeyMaterial::new(
            template.type_identifier(),
            value,
            material_type,
            template.output_prefix_kind(),
        ))
    }
}

impl PublicKeyDeriver for BuiltinKeyManager {
    fn derive_public(&self, material: &KeyMaterial) -> Result<PublicKeyData, KeysetError> {
        let public_type = public_type_for(material.type_identifier()).ok_or_else(|| {
            KeysetError::UnsupportedPrimitive(format!(
                "{} has no public key counterpart",
                material.type_identifier()
            ))
        })?;

        let secret_key = SigningKey::from_slice(material.value()).map_err(|_| {
            KeysetError::corrupted(format!(
                "{} material is not a valid P-256 secret key",
                material.type_identifier()
            ))
        })?;
        let public_key = VerifyingKey::from(&secret_key);

        Ok(PublicKeyData {
            type_identifier: public_type.to_string(),
            value: public_key.to_encoded_point(false).as_bytes().to_vec(),
        })
    }
}

fn public_type_for(private_type: &str) -> Option<&'static str> {
    match private_type {
        ECDSA_PRIVATE_KEY => Some(ECDSA_PUBLIC_KEY),
        ECIES_PRIVATE_KEY => Some(ECIES_PUBLIC_KEY),
        JWT_ECDSA_PRIVATE_KEY => Some(JWT_ECDSA_PUBLIC_KEY),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_service::keyset_service::TemplateCatalog;
    use crate::domain::OutputPrefixKind;
    use crate::infrastructure::template_catalog::{BuiltinTemplateCatalog, HMAC_KEY};

    fn generate(name: &str) -> KeyMaterial {
        let template = BuiltinTemplateCatalog.lookup(name).unwrap();
        BuiltinKeyManager.generate(&template).unwrap()
    }

    #[test]
    fn symmetric_material_has_template_size() {
        let material = generate("HMAC_SHA512_512BITTAG");
        assert_eq!(material.type_identifier(), HMAC_KEY);
        assert_eq!(material.value().len(), 64);
        assert_eq!(material.material_type(), KeyMaterialType::Symmetric);
        assert_ne!(generate("AES128_GCM").value(), generate("AES128_GCM").value());
    }

    #[test]
    fn ecdsa_material_is_a_scalar() {
        let material = generate("ECDSA_P256_RAW");
        assert_eq!(material.value().len(), 32);
        assert_eq!(material.material_type(), KeyMaterialType::AsymmetricPrivate);
        assert_eq!(material.output_prefix_kind(), OutputPrefixKind::Raw);
    }

    #[test]
    fn public_key_is_uncompressed_point() {
        let private = generate("ECIES_P256_HKDF_HMAC_SHA256_AES128_GCM");
        let public = BuiltinKeyManager.derive_public(&private).unwrap();

        assert_eq!(public.type_identifier, ECIES_PUBLIC_KEY);
        assert_eq!(public.value.len(), 65);
        assert_eq!(public.value[0], 0x04);
        assert!(VerifyingKey::from_sec1_bytes(&public.value).is_ok());
    }

    #[test]
    fn derivation_is_deterministic() {
        let private = generate("ES256");
        let a = BuiltinKeyManager.derive_public(&private).unwrap();
        let b = BuiltinKeyManager.derive_public(&private).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.type_identifier, JWT_ECDSA_PUBLIC_KEY);
    }

    #[test]
    fn symmetric_type_has_no_public_key() {
        let err = BuiltinKeyManager
            .derive_public(&generate("AES256_GCM"))
            .expect_err("AES has no public half");
        assert!(matches!(err, KeysetError::UnsupportedPrimitive(_)));
    }

    #[test]
    fn garbage_scalar_is_corruption() {
        let material = KeyMaterial::new(
            ECDSA_PRIVATE_KEY,
            vec![0u8; 32],
            KeyMaterialType::AsymmetricPrivate,
            OutputPrefixKind::Tink,
        );
        let err = BuiltinKeyManager
            .derive_public(&material)
            .expect_err("zero is not a valid scalar");
        assert!(matches!(err, KeysetError::KeysetCorrupted(_)));
    }
}
