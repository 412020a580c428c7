// JUSTIFICATION: nonce and tag sizes are type parameters of the RustCrypto
// CCM type, so each supported combination is spelled out by the dispatch
// macros below.
#![allow(clippy::too_many_lines)]

//! One-shot AEAD implementations selected by key, nonce and tag length.
//!
//! AES-GCM lives in [`super::gcm`] because it takes IVs of any length.

use super::gcm;
use crate::aead::AeadAlgorithm;
use crate::error::{ProviderError, Result};
use aes::{Aes128, Aes192, Aes256};
use ccm::aead::consts::{U4, U6, U7, U8, U9, U10, U11, U12, U13, U14, U16};
use ccm::aead::generic_array::GenericArray;
use ccm::aead::{AeadCore, AeadInPlace, KeyInit, Nonce};
use ccm::Ccm;
use chacha20poly1305::{ChaCha20Poly1305, XChaCha20Poly1305};

fn seal_detached<A>(key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)>
where
    A: AeadInPlace + KeyInit,
{
    let cipher = A::new_from_slice(key).map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
    let nonce: Nonce<A> = GenericArray::from_exact_iter(nonce.iter().copied())
        .ok_or(ProviderError::InvalidNonceLength(nonce.len()))?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, aad, &mut buffer)
        .map_err(|_| ProviderError::EncryptionFailed("message or associated data too long".to_string()))?;
    Ok((buffer, tag.to_vec()))
}

fn open_detached<A>(key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>>
where
    A: AeadInPlace + KeyInit,
{
    let cipher = A::new_from_slice(key).map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
    let nonce: Nonce<A> = GenericArray::from_exact_iter(nonce.iter().copied())
        .ok_or(ProviderError::InvalidNonceLength(nonce.len()))?;
    let tag: GenericArray<u8, <A as AeadCore>::TagSize> =
        GenericArray::from_exact_iter(tag.iter().copied())
            .ok_or(ProviderError::InvalidTagLength(tag.len()))?;
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(&nonce, aad, &mut buffer, &tag)
        .map_err(|_| ProviderError::AuthenticationFailed)?;
    Ok(buffer)
}

macro_rules! ccm_with_nonce {
    ($aes:ty, $tag:ty, $nonce_len:expr, $op:ident $args:tt) => {
        match $nonce_len {
            7 => $op::<Ccm<$aes, $tag, U7>> $args,
            8 => $op::<Ccm<$aes, $tag, U8>> $args,
            9 => $op::<Ccm<$aes, $tag, U9>> $args,
            10 => $op::<Ccm<$aes, $tag, U10>> $args,
            11 => $op::<Ccm<$aes, $tag, U11>> $args,
            12 => $op::<Ccm<$aes, $tag, U12>> $args,
            13 => $op::<Ccm<$aes, $tag, U13>> $args,
            other => Err(ProviderError::InvalidNonceLength(other)),
        }
    };
}

macro_rules! ccm_with_tag {
    ($aes:ty, $tag_len:expr, $nonce_len:expr, $op:ident $args:tt) => {
        match $tag_len {
            4 => ccm_with_nonce!($aes, U4, $nonce_len, $op $args),
            6 => ccm_with_nonce!($aes, U6, $nonce_len, $op $args),
            8 => ccm_with_nonce!($aes, U8, $nonce_len, $op $args),
            10 => ccm_with_nonce!($aes, U10, $nonce_len, $op $args),
            12 => ccm_with_nonce!($aes, U12, $nonce_len, $op $args),
            14 => ccm_with_nonce!($aes, U14, $nonce_len, $op $args),
            16 => ccm_with_nonce!($aes, U16, $nonce_len, $op $args),
            other => Err(ProviderError::InvalidTagLength(other)),
        }
    };
}

macro_rules! ccm_dispatch {
    ($key_len:expr, $nonce_len:expr, $tag_len:expr, $op:ident $args:tt) => {
        match $key_len {
            16 => ccm_with_tag!(Aes128, $tag_len, $nonce_len, $op $args),
            24 => ccm_with_tag!(Aes192, $tag_len, $nonce_len, $op $args),
            32 => ccm_with_tag!(Aes256, $tag_len, $nonce_len, $op $args),
            other => Err(ProviderError::InvalidKeyLength(other)),
        }
    };
}

fn require_tag_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual { Ok(()) } else { Err(ProviderError::InvalidTagLength(actual)) }
}

/// Encrypts and returns `(ciphertext, tag)`.
pub(crate) fn seal(
    algorithm: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    tag_len: usize,
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
    match algorithm {
        AeadAlgorithm::AesGcm => gcm::seal(key, nonce, tag_len, aad, plaintext),
        AeadAlgorithm::AesCcm => {
            ccm_dispatch!(key.len(), nonce.len(), tag_len, seal_detached(key, nonce, aad, plaintext))
        }
        AeadAlgorithm::ChaCha20Poly1305 => {
            require_tag_len(16, tag_len)?;
            seal_detached::<ChaCha20Poly1305>(key, nonce, aad, plaintext)
        }
        AeadAlgorithm::XChaCha20Poly1305 => {
            require_tag_len(16, tag_len)?;
            seal_detached::<XChaCha20Poly1305>(key, nonce, aad, plaintext)
        }
    }
}

/// Verifies `tag` and decrypts.
pub(crate) fn open(
    algorithm: AeadAlgorithm,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    match algorithm {
        AeadAlgorithm::AesGcm => gcm::open(key, nonce, aad, ciphertext, tag),
        AeadAlgorithm::AesCcm => ccm_dispatch!(
            key.len(),
            nonce.len(),
            tag.len(),
            open_detached(key, nonce, aad, ciphertext, tag)
        ),
        AeadAlgorithm::ChaCha20Poly1305 => {
            open_detached::<ChaCha20Poly1305>(key, nonce, aad, ciphertext, tag)
        }
        AeadAlgorithm::XChaCha20Poly1305 => {
            open_detached::<XChaCha20Poly1305>(key, nonce, aad, ciphertext, tag)
        }
    }
}
