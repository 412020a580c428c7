//! AES-CBC with PKCS#7 padding.

use crate::error::{ProviderError, Result};
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::AES_BLOCK_LEN;

fn encrypt_with<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyIvInit + BlockEncryptMut,
{
    let cipher = C::new_from_slices(key, iv)
        .map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyIvInit + BlockDecryptMut,
{
    let cipher = C::new_from_slices(key, iv)
        .map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| ProviderError::AuthenticationFailed)
}

pub(super) fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    match key.len() {
        16 => encrypt_with::<cbc::Encryptor<Aes128>>(key, iv, plaintext),
        24 => encrypt_with::<cbc::Encryptor<Aes192>>(key, iv, plaintext),
        32 => encrypt_with::<cbc::Encryptor<Aes256>>(key, iv, plaintext),
        other => Err(ProviderError::InvalidKeyLength(other)),
    }
}

pub(super) fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_LEN != 0 {
        return Err(ProviderError::DecryptionFailed(format!(
            "ciphertext length {} is not a positive multiple of the block size",
            ciphertext.len()
        )));
    }
    match key.len() {
        16 => decrypt_with::<cbc::Decryptor<Aes128>>(key, iv, ciphertext),
        24 => decrypt_with::<cbc::Decryptor<Aes192>>(key, iv, ciphertext),
        32 => decrypt_with::<cbc::Decryptor<Aes256>>(key, iv, ciphertext),
        other => Err(ProviderError::InvalidKeyLength(other)),
    }
}
