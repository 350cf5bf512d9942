pub mod aes_gcm_aead;

pub use aes_gcm_aead::AesGcmAead;
