//! DSA with DER-encoded `(r, s)` signatures.

use super::{expect_prehashed, invalid_key, unsupported_encoding, SignatureScheme, SignatureVerifier, SignedData};
use crate::error::{ProviderError, Result};
use crate::keys::PublicKeyMaterial;
use dsa::signature::hazmat::PrehashVerifier;
use dsa::{BigUint, Components, Signature, VerifyingKey};
use pkcs8::DecodePublicKey;

pub(super) struct DsaVerifier {
    key: VerifyingKey,
}

pub(super) fn parse(scheme: SignatureScheme, material: PublicKeyMaterial<'_>) -> Result<DsaVerifier> {
    let key = match material {
        PublicKeyMaterial::DsaComponents { p, q, g, y } => {
            let components = Components::from_components(
                BigUint::from_bytes_be(p),
                BigUint::from_bytes_be(q),
                BigUint::from_bytes_be(g),
            )
            .map_err(invalid_key)?;
            VerifyingKey::from_components(components, BigUint::from_bytes_be(y)).map_err(invalid_key)?
        }
        PublicKeyMaterial::Der(der) => VerifyingKey::from_public_key_der(der).map_err(invalid_key)?,
        PublicKeyMaterial::Pem(pem) => VerifyingKey::from_public_key_pem(pem).map_err(invalid_key)?,
        other => return Err(unsupported_encoding(scheme, &other)),
    };
    Ok(DsaVerifier { key })
}

impl SignatureVerifier for DsaVerifier {
    fn verify(&self, data: SignedData<'_>, signature: &[u8]) -> Result<bool> {
        let (_, hash) = expect_prehashed(data)?;
        let signature = Signature::try_from(signature)
            .map_err(|e| ProviderError::InvalidSignature(e.to_string()))?;
        Ok(self.key.verify_prehash(hash, &signature).is_ok())
    }
}
