//! Ed25519 over raw messages.

use super::{unsupported_encoding, SignatureScheme, SignatureVerifier, SignedData};
use crate::error::{ProviderError, Result};
use crate::keys::PublicKeyMaterial;
use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};

pub(super) struct Ed25519Verifier {
    key: VerifyingKey,
}

pub(super) fn parse(scheme: SignatureScheme, material: PublicKeyMaterial<'_>) -> Result<Ed25519Verifier> {
    let PublicKeyMaterial::Raw(raw) = material else {
        return Err(unsupported_encoding(scheme, &material));
    };
    let bytes: [u8; PUBLIC_KEY_LENGTH] =
        raw.try_into().map_err(|_| ProviderError::InvalidKeyLength(raw.len()))?;
    let key = VerifyingKey::from_bytes(&bytes).map_err(|e| ProviderError::InvalidKey(e.to_string()))?;
    Ok(Ed25519Verifier { key })
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, data: SignedData<'_>, signature: &[u8]) -> Result<bool> {
        let SignedData::Message(message) = data else {
            return Err(ProviderError::Unsupported("Ed25519 signs the message itself".to_string()));
        };
        let signature =
            Signature::from_slice(signature).map_err(|e| ProviderError::InvalidSignature(e.to_string()))?;
        Ok(self.key.verify(message, &signature).is_ok())
    }
}
