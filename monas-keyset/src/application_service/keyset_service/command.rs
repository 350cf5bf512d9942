use crate::domain::{KeyId, Keyset};

/// Output of the create-keyset use case.
#[derive(Debug)]
pub struct CreateKeysetResult {
    pub keyset: Keyset,
    /// Id of the first key, which is also the primary.
    pub key_id: KeyId,
}

/// Output of the add-key use case.
#[derive(Debug)]
pub struct AddKeyResult {
    pub keyset: Keyset,
    pub key_id: KeyId,
}
