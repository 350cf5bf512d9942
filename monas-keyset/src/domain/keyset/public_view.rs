use crate::domain::error::KeysetError;
use crate::domain::keyset::{KeyMaterial, KeyMaterialType, Keyset};

/// Public half of an asymmetric key, as produced by a [`PublicKeyDeriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyData {
    pub type_identifier: String,
    pub value: Vec<u8>,
}

/// Port that knows how to turn private key material into its public counterpart.
///
/// Implementations live with the primitive factory; the engine only asks for
/// the mapping and never interprets the bytes itself.
pub trait PublicKeyDeriver {
    fn derive_public(&self, material: &KeyMaterial) -> Result<PublicKeyData, KeysetError>;
}

impl Keyset {
    /// Projects every entry onto its public counterpart.
    ///
    /// Ids, statuses, output prefixes and the primary assignment are kept. If
    /// any entry has no public counterpart the whole projection fails, since a
    /// partially public keyset has no valid use.
    pub fn derive_public_view<D>(&self, deriver: &D) -> Result<Keyset, KeysetError>
    where
        D: PublicKeyDeriver + ?Sized,
    {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let material = entry.material();
                if material.material_type() != KeyMaterialType::AsymmetricPrivate {
                    return Err(KeysetError::UnsupportedPrimitive(format!(
                        "key {} ({}) has no public counterpart",
                        entry.id(),
                        material.type_identifier()
                    )));
                }

                let public = deriver.derive_public(material)?;
                Ok(entry.with_material(KeyMaterial::new(
                    public.type_identifier,
                    public.value,
                    KeyMaterialType::AsymmetricPublic,
                    material.output_prefix_kind(),
                )))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Keyset::from_parts(
            entries,
            self.primary_key_id,
            self.retired_key_ids.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keyset::{KeyEntry, KeyId, KeyStatus, OutputPrefixKind};
    use std::collections::BTreeSet;

    /// Reverses the private bytes and renames the type.
    struct ReversingDeriver;

    impl PublicKeyDeriver for ReversingDeriver {
        fn derive_public(&self, material: &KeyMaterial) -> Result<PublicKeyData, KeysetError> {
            Ok(PublicKeyData {
                type_identifier: material.type_identifier().replace("Private", "Public"),
                value: material.value().iter().rev().copied().collect(),
            })
        }
    }

    fn entry(id: u32, status: KeyStatus, material_type: KeyMaterialType) -> KeyEntry {
        KeyEntry::new(
            KeyId::new(id).unwrap(),
            status,
            KeyMaterial::new(
                "type.googleapis.com/google.crypto.tink.EcdsaPrivateKey",
                vec![1, 2, 3],
                material_type,
                OutputPrefixKind::Legacy,
            ),
        )
    }

    #[test]
    fn public_view_preserves_ids_statuses_and_primary() {
        let keyset = Keyset::from_parts(
            vec![
                entry(1, KeyStatus::Enabled, KeyMaterialType::AsymmetricPrivate),
                entry(2, KeyStatus::Disabled, KeyMaterialType::AsymmetricPrivate),
            ],
            KeyId::new(1),
            BTreeSet::new(),
        )
        .unwrap();

        let public = keyset.derive_public_view(&ReversingDeriver).unwrap();

        assert_eq!(public.primary_key_id(), keyset.primary_key_id());
        assert_eq!(public.rows(), keyset.rows());
        for entry in public.entries() {
            let material = entry.material();
            assert_eq!(material.material_type(), KeyMaterialType::AsymmetricPublic);
            assert_eq!(material.output_prefix_kind(), OutputPrefixKind::Legacy);
            assert_eq!(material.value(), &[3, 2, 1]);
            assert!(material.type_identifier().ends_with("EcdsaPublicKey"));
        }
    }

    #[test]
    fn symmetric_entry_fails_the_whole_projection() {
        let keyset = Keyset::from_parts(
            vec![
                entry(1, KeyStatus::Enabled, KeyMaterialType::AsymmetricPrivate),
                entry(2, KeyStatus::Enabled, KeyMaterialType::Symmetric),
            ],
            KeyId::new(1),
            BTreeSet::new(),
        )
        .unwrap();

        let err = keyset
            .derive_public_view(&ReversingDeriver)
            .expect_err("symmetric keys have no public view");
        assert!(matches!(err, KeysetError::UnsupportedPrimitive(_)));
    }

    #[test]
    fn already_public_entry_is_rejected() {
        let keyset = Keyset::from_parts(
            vec![entry(1, KeyStatus::Enabled, KeyMaterialType::AsymmetricPublic)],
            KeyId::new(1),
            BTreeSet::new(),
        )
        .unwrap();

        assert!(matches!(
            keyset.derive_public_view(&ReversingDeriver),
            Err(KeysetError::UnsupportedPrimitive(_))
        ));
    }
}
