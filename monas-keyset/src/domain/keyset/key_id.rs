use std::fmt;

/// Identifier of a key entry inside a keyset.
///
/// - Drawn from the 32-bit unsigned space; `0` is reserved and never a valid id.
/// - Unique within a keyset and never reissued once the entry is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u32);

impl KeyId {
    /// Returns `None` for the reserved value `0`.
    pub fn new(value: u32) -> Option<Self> {
        (value != 0).then_some(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
