//! AES-GCM over IVs of any non-zero length (SP 800-38D).
//!
//! The RustCrypto `AesGcm` type fixes the nonce size at compile time, which
//! cannot cover the odd IV lengths found in conformance corpora. Here the
//! pre-counter block is derived directly: a 96-bit IV is used as is, every
//! other length is hashed with GHASH. The counter wraps modulo 2^32 as the
//! mode requires.

use crate::error::{ProviderError, Result};
use aes::cipher::consts::U16;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, BlockSizeUser, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use ghash::universal_hash::{KeyInit as _, UniversalHash};
use ghash::GHash;
use subtle::ConstantTimeEq;

type Block = GenericArray<u8, U16>;

/// Length of a full GCM tag.
pub(crate) const FULL_TAG_LEN: usize = 16;

const DIRECT_IV_LEN: usize = 12;

struct GcmKey<C> {
    cipher: C,
    hash_key: Block,
}

impl<C> GcmKey<C>
where
    C: BlockEncrypt + KeyInit + BlockSizeUser<BlockSize = U16>,
{
    fn new(key: &[u8]) -> Result<Self> {
        let cipher =
            C::new_from_slice(key).map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
        let mut hash_key = Block::default();
        cipher.encrypt_block(&mut hash_key);
        Ok(Self { cipher, hash_key })
    }

    fn pre_counter_block(&self, iv: &[u8]) -> Block {
        let mut j0 = Block::default();
        if iv.len() == DIRECT_IV_LEN {
            j0.iter_mut().zip(iv).for_each(|(b, v)| *b = *v);
            j0[15] = 1;
            return j0;
        }
        let mut ghash = GHash::new(&self.hash_key);
        ghash.update_padded(iv);
        ghash.update_padded(&lengths_block(0, iv.len()));
        ghash.finalize()
    }

    fn apply_keystream(&self, j0: &Block, data: &mut [u8]) {
        let mut counter = *j0;
        for chunk in data.chunks_mut(FULL_TAG_LEN) {
            inc32(&mut counter);
            let mut keystream = counter;
            self.cipher.encrypt_block(&mut keystream);
            chunk.iter_mut().zip(keystream.iter()).for_each(|(b, k)| *b ^= k);
        }
    }

    fn full_tag(&self, j0: &Block, aad: &[u8], ciphertext: &[u8]) -> Block {
        let mut ghash = GHash::new(&self.hash_key);
        ghash.update_padded(aad);
        ghash.update_padded(ciphertext);
        ghash.update_padded(&lengths_block(aad.len(), ciphertext.len()));
        let mut tag = ghash.finalize();
        let mut mask = *j0;
        self.cipher.encrypt_block(&mut mask);
        tag.iter_mut().zip(mask.iter()).for_each(|(t, m)| *t ^= m);
        tag
    }

    fn seal(&self, iv: &[u8], tag_len: usize, aad: &[u8], plaintext: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let j0 = self.pre_counter_block(iv);
        let mut ciphertext = plaintext.to_vec();
        self.apply_keystream(&j0, &mut ciphertext);
        let tag = self.full_tag(&j0, aad, &ciphertext);
        let tag = tag.get(..tag_len).unwrap_or(tag.as_slice()).to_vec();
        (ciphertext, tag)
    }

    fn open(&self, iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
        let j0 = self.pre_counter_block(iv);
        let computed = self.full_tag(&j0, aad, ciphertext);
        let computed = computed.get(..tag.len()).ok_or(ProviderError::InvalidTagLength(tag.len()))?;
        if !bool::from(computed.ct_eq(tag)) {
            return Err(ProviderError::AuthenticationFailed);
        }
        let mut plaintext = ciphertext.to_vec();
        self.apply_keystream(&j0, &mut plaintext);
        Ok(plaintext)
    }
}

fn inc32(block: &mut Block) {
    let mut low = [0u8; 4];
    low.iter_mut().zip(block.iter().skip(12)).for_each(|(l, b)| *l = *b);
    let next = u32::from_be_bytes(low).wrapping_add(1);
    block.iter_mut().skip(12).zip(next.to_be_bytes()).for_each(|(b, n)| *b = n);
}

fn lengths_block(aad_len: usize, ciphertext_len: usize) -> Block {
    let bits = |len: usize| u64::try_from(len).unwrap_or(u64::MAX).wrapping_mul(8).to_be_bytes();
    let mut block = Block::default();
    block
        .iter_mut()
        .zip(bits(aad_len).into_iter().chain(bits(ciphertext_len)))
        .for_each(|(b, v)| *b = v);
    block
}

fn check_lengths(iv_len: usize, tag_len: usize) -> Result<()> {
    if iv_len == 0 {
        return Err(ProviderError::InvalidNonceLength(iv_len));
    }
    if tag_len == 0 || tag_len > FULL_TAG_LEN {
        return Err(ProviderError::InvalidTagLength(tag_len));
    }
    Ok(())
}

macro_rules! with_gcm_key {
    ($key:expr, |$gcm:ident| $body:expr) => {
        match $key.len() {
            16 => {
                let $gcm = GcmKey::<Aes128>::new($key)?;
                $body
            }
            24 => {
                let $gcm = GcmKey::<Aes192>::new($key)?;
                $body
            }
            32 => {
                let $gcm = GcmKey::<Aes256>::new($key)?;
                $body
            }
            other => return Err(ProviderError::InvalidKeyLength(other)),
        }
    };
}

/// Encrypts and returns `(ciphertext, tag)` with the tag truncated to `tag_len`.
pub(crate) fn seal(
    key: &[u8],
    iv: &[u8],
    tag_len: usize,
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
    check_lengths(iv.len(), tag_len)?;
    Ok(with_gcm_key!(key, |gcm| gcm.seal(iv, tag_len, aad, plaintext)))
}

/// Verifies a possibly truncated `tag` and decrypts.
pub(crate) fn open(key: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
    check_lengths(iv.len(), tag.len())?;
    with_gcm_key!(key, |gcm| gcm.open(iv, aad, ciphertext, tag))
}
