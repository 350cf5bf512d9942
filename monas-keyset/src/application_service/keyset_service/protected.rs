use tracing::{debug, warn};

use crate::domain::{
    Aead, EnvelopeCodec, ErrorKind, Keyset, KeysetError, KeysetInfo, ProtectedContainer,
};

use super::KeysetWireCodec;

/// Reads and writes keysets in their protected on-disk form.
///
/// The encrypted payload is always encoded with `payload_codec`, whatever
/// format the surrounding container uses. Every write carries a cleartext
/// [`KeysetInfo`] summary, and every read checks it against the payload.
pub struct ProtectedKeysetCodec<P> {
    pub payload_codec: P,
    pub envelope: EnvelopeCodec,
}

impl<P> ProtectedKeysetCodec<P>
where
    P: KeysetWireCodec,
{
    pub fn new(payload_codec: P, envelope: EnvelopeCodec) -> Self {
        Self {
            payload_codec,
            envelope,
        }
    }

    /// Decodes the container, decrypts the payload and returns the keyset.
    ///
    /// Any failure past the container framing means the stored keyset cannot be
    /// trusted and is reported as `KeysetCorrupted`.
    pub fn read<C, K>(
        &self,
        bytes: &[u8],
        container_codec: &C,
        kek: &K,
    ) -> Result<Keyset, KeysetError>
    where
        C: KeysetWireCodec + ?Sized,
        K: Aead + ?Sized,
    {
        let container = container_codec.decode_container(bytes)?;
        debug!(
            container_len = bytes.len(),
            payload_len = container.encrypted_keyset().len(),
            "decoded keyset container"
        );

        let plaintext = self.envelope.unwrap(container.encrypted_keyset(), kek)?;
        let keyset = self
            .payload_codec
            .decode_keyset(&plaintext)
            .map_err(|e| match e.kind() {
                ErrorKind::MalformedWireData => {
                    KeysetError::corrupted(format!("decrypted payload is not a keyset: {e}"))
                }
                _ => e,
            })?;
        keyset
            .ensure_operational()
            .map_err(|e| KeysetError::corrupted(format!("stored keyset is unusable: {e}")))?;

        if let Some(info) = container.keyset_info() {
            if let Err(e) = info.verify_matches(&keyset) {
                warn!(error = %e, "keyset info disagrees with the encrypted payload");
                return Err(e);
            }
        }

        Ok(keyset)
    }

    /// Encrypts `keyset` and encodes it as a container in `container_codec`'s format.
    ///
    /// Only operational keysets are written.
    pub fn write<C, K>(
        &self,
        keyset: &Keyset,
        container_codec: &C,
        kek: &K,
    ) -> Result<Vec<u8>, KeysetError>
    where
        C: KeysetWireCodec + ?Sized,
        K: Aead + ?Sized,
    {
        keyset.ensure_operational()?;

        let plaintext = self.payload_codec.encode_keyset(keyset)?;
        let ciphertext = self.envelope.wrap(&plaintext, kek)?;
        let container = ProtectedContainer::new(ciphertext, Some(KeysetInfo::from_keyset(keyset)));

        let bytes = container_codec.encode_container(&container)?;
        debug!(
            payload_len = container.encrypted_keyset().len(),
            container_len = bytes.len(),
            "encoded keyset container"
        );
        Ok(bytes)
    }
}
