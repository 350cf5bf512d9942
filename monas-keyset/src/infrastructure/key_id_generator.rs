use rand::{rngs::OsRng, RngCore};

use crate::domain::KeyIdGenerator;

/// Draws candidate key ids uniformly from the OS random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyIdGenerator;

impl KeyIdGenerator for RandomKeyIdGenerator {
    fn next_key_id(&self) -> u32 {
        OsRng.next_u32()
    }
}
