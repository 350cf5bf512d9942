use tracing::info;

use crate::domain::{
    KeyId, KeyIdGenerator, KeyRow, Keyset, KeysetError, KeysetEvent, PublicKeyDeriver,
};

use super::{AddKeyResult, CreateKeysetResult, KeyMaterialGenerator, TemplateCatalog};

/// Operation surface over a keyset value.
///
/// Each operation takes the current keyset by reference and returns the next
/// one. Reading and writing the protected form is [`super::ProtectedKeysetCodec`]'s job.
pub struct KeysetService<T, F, G> {
    pub templates: T,
    pub key_factory: F,
    pub key_ids: G,
}

impl<T, F, G> KeysetService<T, F, G>
where
    T: TemplateCatalog,
    F: KeyMaterialGenerator,
    G: KeyIdGenerator,
{
    /// Creates a keyset holding one key from `template_name`, which becomes primary.
    pub fn create_keyset(&self, template_name: &str) -> Result<CreateKeysetResult, KeysetError> {
        let result = self.add_key(&Keyset::new(), template_name)?;
        Ok(CreateKeysetResult {
            keyset: result.keyset,
            key_id: result.key_id,
        })
    }

    pub fn add_key(&self, keyset: &Keyset, template_name: &str) -> Result<AddKeyResult, KeysetError> {
        let template = self.templates.lookup(template_name)?;
        let material = self.key_factory.generate(&template)?;

        let (keyset, event) = keyset.add(material, &self.key_ids)?;
        log_event(&event);

        Ok(AddKeyResult {
            keyset,
            key_id: event.key_id(),
        })
    }

    pub fn enable_key(&self, keyset: &Keyset, key_id: KeyId) -> Result<Keyset, KeysetError> {
        commit(keyset.enable(key_id)?)
    }

    pub fn disable_key(&self, keyset: &Keyset, key_id: KeyId) -> Result<Keyset, KeysetError> {
        commit(keyset.disable(key_id)?)
    }

    pub fn delete_key(&self, keyset: &Keyset, key_id: KeyId) -> Result<Keyset, KeysetError> {
        commit(keyset.delete(key_id)?)
    }

    pub fn promote_key(&self, keyset: &Keyset, key_id: KeyId) -> Result<Keyset, KeysetError> {
        commit(keyset.promote(key_id)?)
    }

    pub fn list_keyset(&self, keyset: &Keyset) -> Vec<KeyRow> {
        keyset.rows()
    }

    pub fn template_names(&self) -> Vec<String> {
        self.templates.names()
    }
}

impl<T, F, G> KeysetService<T, F, G>
where
    F: PublicKeyDeriver,
{
    /// Public view of a keyset of private asymmetric keys.
    pub fn create_public_keyset(&self, keyset: &Keyset) -> Result<Keyset, KeysetError> {
        let public = keyset.derive_public_view(&self.key_factory)?;
        info!(keys = public.len(), "derived public keyset");
        Ok(public)
    }
}

fn commit((keyset, event): (Keyset, KeysetEvent)) -> Result<Keyset, KeysetError> {
    log_event(&event);
    Ok(keyset)
}

fn log_event(event: &KeysetEvent) {
    match event {
        KeysetEvent::KeyAdded {
            key_id,
            became_primary,
        } => info!(key_id = key_id.value(), became_primary, "key added"),
        KeysetEvent::KeyEnabled { key_id } => info!(key_id = key_id.value(), "key enabled"),
        KeysetEvent::KeyDisabled { key_id } => info!(key_id = key_id.value(), "key disabled"),
        KeysetEvent::KeyDeleted { key_id } => info!(key_id = key_id.value(), "key deleted"),
        KeysetEvent::PrimaryPromoted { key_id, previous } => info!(
            key_id = key_id.value(),
            previous = previous.map(|id| id.value()),
            "primary promoted"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        KeyMaterial, KeyMaterialType, KeySpec, KeyStatus, KeyTemplate, OutputPrefixKind,
        PublicKeyData,
    };
    use std::cell::Cell;

    struct OneTemplate;

    impl TemplateCatalog for OneTemplate {
        fn lookup(&self, name: &str) -> Result<KeyTemplate, KeysetError> {
            match name {
                "SIGN" => Ok(KeyTemplate::new(
                    "SIGN",
                    "test.PrivateKey",
                    OutputPrefixKind::Tink,
                    KeySpec::EcdsaP256,
                )),
                "MAC" => Ok(KeyTemplate::new(
                    "MAC",
                    "test.MacKey",
                    OutputPrefixKind::Raw,
                    KeySpec::Symmetric { key_size: 4 },
                )),
                other => Err(KeysetError::TemplateNotFound(other.to_string())),
            }
        }

        fn names(&self) -> Vec<String> {
            vec!["MAC".to_string(), "SIGN".to_string()]
        }
    }

    struct CountingFactory {
        calls: Cell<u8>,
    }

    impl KeyMaterialGenerator for CountingFactory {
        fn generate(&self, template: &KeyTemplate) -> Result<KeyMaterial, KeysetError> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            let material_type = match template.spec() {
                KeySpec::EcdsaP256 => KeyMaterialType::AsymmetricPrivate,
                KeySpec::Symmetric { .. } => KeyMaterialType::Symmetric,
            };
            Ok(KeyMaterial::new(
                template.type_identifier(),
                vec![n],
                material_type,
                template.output_prefix_kind(),
            ))
        }
    }

    impl PublicKeyDeriver for CountingFactory {
        fn derive_public(&self, material: &KeyMaterial) -> Result<PublicKeyData, KeysetError> {
            Ok(PublicKeyData {
                type_identifier: "test.PublicKey".to_string(),
                value: material.value().iter().map(|b| b ^ 0xFF).collect(),
            })
        }
    }

    struct SequentialIds {
        next: Cell<u32>,
    }

    impl KeyIdGenerator for SequentialIds {
        fn next_key_id(&self) -> u32 {
            let id = self.next.get();
            self.next.set(id + 1);
            id
        }
    }

    fn service() -> KeysetService<OneTemplate, CountingFactory, SequentialIds> {
        KeysetService {
            templates: OneTemplate,
            key_factory: CountingFactory {
                calls: Cell::new(0),
            },
            key_ids: SequentialIds {
                next: Cell::new(100),
            },
        }
    }

    fn id(value: u32) -> KeyId {
        KeyId::new(value).unwrap()
    }

    #[test]
    fn create_then_rotate() {
        let service = service();

        let created = service.create_keyset("MAC").unwrap();
        assert_eq!(created.key_id, id(100));
        assert_eq!(created.keyset.primary_key_id(), Some(id(100)));

        let added = service.add_key(&created.keyset, "MAC").unwrap();
        assert_eq!(added.key_id, id(101));
        assert_eq!(added.keyset.primary_key_id(), Some(id(100)));

        let keyset = service.promote_key(&added.keyset, id(101)).unwrap();
        let keyset = service.disable_key(&keyset, id(100)).unwrap();
        let keyset = service.delete_key(&keyset, id(100)).unwrap();

        let rows = service.list_keyset(&keyset);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key_id, id(101));
        assert_eq!(rows[0].status, KeyStatus::Enabled);
        assert!(rows[0].is_primary);
    }

    #[test]
    fn unknown_template_generates_nothing() {
        let service = service();

        let err = service.create_keyset("NOPE").expect_err("unknown template");
        assert_eq!(err, KeysetError::TemplateNotFound("NOPE".to_string()));
        assert_eq!(service.key_factory.calls.get(), 0);
    }

    #[test]
    fn failed_transition_leaves_input_untouched() {
        let service = service();
        let created = service.create_keyset("MAC").unwrap();
        let before = created.keyset.clone();

        let err = service
            .disable_key(&created.keyset, created.key_id)
            .expect_err("primary cannot be disabled");
        assert!(matches!(err, KeysetError::InvalidTransition(_)));
        assert_eq!(created.keyset, before);

        let err = service
            .enable_key(&created.keyset, id(9))
            .expect_err("unknown key");
        assert_eq!(err, KeysetError::KeyNotFound(id(9)));
    }

    #[test]
    fn public_keyset_keeps_ids_and_primary() {
        let service = service();
        let created = service.create_keyset("SIGN").unwrap();
        let added = service.add_key(&created.keyset, "SIGN").unwrap();

        let public = service.create_public_keyset(&added.keyset).unwrap();

        assert_eq!(public.primary_key_id(), Some(id(100)));
        assert_eq!(public.len(), 2);
        for entry in public.entries() {
            assert_eq!(entry.material().type_identifier(), "test.PublicKey");
            assert_eq!(
                entry.material().material_type(),
                KeyMaterialType::AsymmetricPublic
            );
        }
    }

    #[test]
    fn public_keyset_of_symmetric_key_is_unsupported() {
        let service = service();
        let created = service.create_keyset("SIGN").unwrap();
        let mixed = service.add_key(&created.keyset, "MAC").unwrap();

        let err = service
            .create_public_keyset(&mixed.keyset)
            .expect_err("symmetric keys have no public half");
        assert!(matches!(err, KeysetError::UnsupportedPrimitive(_)));
    }
}
