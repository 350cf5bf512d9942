use crate::domain::keyset::KeyId;

/// Errors produced by keyset operations.
///
/// Every operation of the engine either succeeds or fails with exactly one of
/// these kinds; none of them leaves a keyset partially modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeysetError {
    #[error("key template not found: {0}")]
    TemplateNotFound(String),

    #[error("KMS resolution failed: {0}")]
    KmsResolutionFailed(String),

    #[error("keyset corrupted: {0}")]
    KeysetCorrupted(String),

    #[error("malformed wire data: {0}")]
    MalformedWireData(String),

    #[error("key not found: {0}")]
    KeyNotFound(KeyId),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("unsupported primitive: {0}")]
    UnsupportedPrimitive(String),
}

/// Fieldless view of [`KeysetError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TemplateNotFound,
    KmsResolutionFailed,
    KeysetCorrupted,
    MalformedWireData,
    KeyNotFound,
    InvalidTransition,
    UnsupportedPrimitive,
}

impl KeysetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeysetError::TemplateNotFound(_) => ErrorKind::TemplateNotFound,
            KeysetError::KmsResolutionFailed(_) => ErrorKind::KmsResolutionFailed,
            KeysetError::KeysetCorrupted(_) => ErrorKind::KeysetCorrupted,
            KeysetError::MalformedWireData(_) => ErrorKind::MalformedWireData,
            KeysetError::KeyNotFound(_) => ErrorKind::KeyNotFound,
            KeysetError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            KeysetError::UnsupportedPrimitive(_) => ErrorKind::UnsupportedPrimitive,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        KeysetError::MalformedWireData(reason.into())
    }

    pub(crate) fn corrupted(reason: impl Into<String>) -> Self {
        KeysetError::KeysetCorrupted(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let id = KeyId::new(7).expect("non-zero id");
        assert_eq!(KeysetError::KeyNotFound(id).kind(), ErrorKind::KeyNotFound);
        assert_eq!(
            KeysetError::corrupted("bad tag").kind(),
            ErrorKind::KeysetCorrupted
        );
        assert_eq!(
            KeysetError::malformed("truncated").kind(),
            ErrorKind::MalformedWireData
        );
    }

    #[test]
    fn display_includes_cause() {
        let err = KeysetError::InvalidTransition("key 5 is the primary".into());
        assert_eq!(err.to_string(), "invalid transition: key 5 is the primary");
    }
}
