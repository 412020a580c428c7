#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Streaming cipher contexts.
//!
//! A [`CipherContext`] mirrors the control-driven interface of a classic
//! cipher API: lengths and tags are configured through control calls, the
//! context is initialised with key and IV, associated data is supplied before
//! the payload, and output is collected from `update` and `finalize`.
//!
//! The standard provider implements every mode with [`BufferedCipher`], which
//! records the configuration, buffers the payload and runs the one-shot
//! RustCrypto implementation in `finalize`. Control calls validate their
//! arguments eagerly so that an unsupported nonce or tag length is reported at
//! the step that configured it.

mod aead_modes;
mod cbc;
mod gcm;

use crate::aead::AeadAlgorithm;
use crate::error::{ProviderError, Result};
use zeroize::Zeroizing;

/// Shortest IV (bytes) accepted for AES-GCM; there is no upper bound.
pub const GCM_MIN_NONCE_LEN: usize = 1;

/// AES block size, which is also the CBC IV length.
pub const AES_BLOCK_LEN: usize = 16;

/// Cipher selected when a context is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    /// AES in CBC mode with PKCS#7 (PKCS#5) padding.
    AesCbcPkcs5,
    /// One of the AEAD modes.
    Aead(AeadAlgorithm),
}

impl std::fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AesCbcPkcs5 => f.write_str("AES-CBC-PKCS5"),
            Self::Aead(aead) => write!(f, "{aead}"),
        }
    }
}

/// Direction a context is initialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Encrypt or seal.
    Encrypt,
    /// Decrypt or open.
    Decrypt,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encrypt => f.write_str("encrypt"),
            Self::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// A single-use, control-driven cipher context.
pub trait CipherContext: Send {
    /// Configures the IV or nonce length before `init`.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidNonceLength`] when the mode cannot use `len`.
    fn set_iv_len(&mut self, len: usize) -> Result<()>;

    /// Configures the tag length produced on encryption.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidTagLength`] when the mode cannot use `len`.
    fn set_tag_len(&mut self, len: usize) -> Result<()>;

    /// Supplies the expected tag for decryption; also fixes the tag length.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidTagLength`] when the mode cannot use the tag's length.
    fn set_tag(&mut self, tag: &[u8]) -> Result<()>;

    /// Sets key, IV and direction.
    ///
    /// # Errors
    /// Fails when the key or IV length does not fit the mode or the configured IV length.
    fn init(&mut self, key: &[u8], iv: &[u8], direction: Direction) -> Result<()>;

    /// Supplies associated data. Must precede any payload.
    ///
    /// # Errors
    /// Fails for modes without associated data or when called after `update`.
    fn update_aad(&mut self, aad: &[u8]) -> Result<()>;

    /// Feeds payload and returns whatever output is already available.
    ///
    /// # Errors
    /// Fails when the context has not been initialised.
    fn update(&mut self, input: &[u8]) -> Result<Vec<u8>>;

    /// Completes the operation and returns the remaining output.
    ///
    /// # Errors
    /// Fails on padding or tag verification errors during decryption.
    fn finalize(&mut self) -> Result<Vec<u8>>;

    /// Tag computed by a finished encryption.
    ///
    /// # Errors
    /// Fails before `finalize` or for a decrypting context.
    fn tag(&self) -> Result<Vec<u8>>;
}

/// Provider capability: creates cipher contexts.
pub trait CipherProvider {
    /// Creates a fresh context for `algorithm`.
    ///
    /// # Errors
    /// Returns [`ProviderError::Unsupported`] when the algorithm is not available.
    fn cipher(&self, algorithm: CipherAlgorithm) -> Result<Box<dyn CipherContext>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Configuring,
    Initialised,
    Streaming,
    Finished,
}

/// Context that buffers input and runs a one-shot implementation on `finalize`.
pub struct BufferedCipher {
    algorithm: CipherAlgorithm,
    iv_len: Option<usize>,
    tag_len: Option<usize>,
    expected_tag: Option<Vec<u8>>,
    key: Zeroizing<Vec<u8>>,
    iv: Vec<u8>,
    direction: Direction,
    aad: Vec<u8>,
    input: Zeroizing<Vec<u8>>,
    computed_tag: Option<Vec<u8>>,
    stage: Stage,
}

impl std::fmt::Debug for BufferedCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedCipher")
            .field("algorithm", &self.algorithm)
            .field("iv_len", &self.iv_len)
            .field("tag_len", &self.tag_len)
            .field("direction", &self.direction)
            .field("stage", &self.stage)
            .field("key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl BufferedCipher {
    /// Creates an unconfigured context.
    #[must_use]
    pub fn new(algorithm: CipherAlgorithm) -> Self {
        Self {
            algorithm,
            iv_len: None,
            tag_len: None,
            expected_tag: None,
            key: Zeroizing::new(Vec::new()),
            iv: Vec::new(),
            direction: Direction::Encrypt,
            aad: Vec::new(),
            input: Zeroizing::new(Vec::new()),
            computed_tag: None,
            stage: Stage::Configuring,
        }
    }

    fn default_iv_len(&self) -> usize {
        match self.algorithm {
            CipherAlgorithm::AesCbcPkcs5 => AES_BLOCK_LEN,
            CipherAlgorithm::Aead(aead) => aead.default_nonce_len(),
        }
    }

    fn check_iv_len(&self, len: usize) -> Result<()> {
        let supported = match self.algorithm {
            CipherAlgorithm::AesCbcPkcs5 => len == AES_BLOCK_LEN,
            CipherAlgorithm::Aead(AeadAlgorithm::AesGcm) => len >= GCM_MIN_NONCE_LEN,
            CipherAlgorithm::Aead(AeadAlgorithm::AesCcm) => (7..=13).contains(&len),
            CipherAlgorithm::Aead(AeadAlgorithm::ChaCha20Poly1305) => len == 12,
            CipherAlgorithm::Aead(AeadAlgorithm::XChaCha20Poly1305) => len == 24,
        };
        if supported { Ok(()) } else { Err(ProviderError::InvalidNonceLength(len)) }
    }

    fn check_tag_len(&self, len: usize) -> Result<()> {
        let supported = match self.algorithm {
            CipherAlgorithm::AesCbcPkcs5 => {
                return Err(ProviderError::Unsupported("tags are not used by CBC".to_string()));
            }
            CipherAlgorithm::Aead(AeadAlgorithm::AesGcm) => (12..=16).contains(&len),
            CipherAlgorithm::Aead(AeadAlgorithm::AesCcm) => {
                (4..=16).contains(&len) && len % 2 == 0
            }
            CipherAlgorithm::Aead(
                AeadAlgorithm::ChaCha20Poly1305 | AeadAlgorithm::XChaCha20Poly1305,
            ) => len == 16,
        };
        if supported { Ok(()) } else { Err(ProviderError::InvalidTagLength(len)) }
    }

    fn require_configuring(&self) -> Result<()> {
        if self.stage == Stage::Configuring {
            Ok(())
        } else {
            Err(ProviderError::InvalidState("control call after init"))
        }
    }

    fn run_aead(&mut self, aead: AeadAlgorithm) -> Result<Vec<u8>> {
        let tag_len = self.tag_len.unwrap_or(aead.default_tag_len());
        match self.direction {
            Direction::Encrypt => {
                let (ciphertext, tag) =
                    aead_modes::seal(aead, &self.key, &self.iv, tag_len, &self.aad, &self.input)?;
                self.computed_tag = Some(tag);
                Ok(ciphertext)
            }
            Direction::Decrypt => {
                let tag = self
                    .expected_tag
                    .as_deref()
                    .ok_or(ProviderError::InvalidState("decryption requires a tag"))?;
                aead_modes::open(aead, &self.key, &self.iv, &self.aad, &self.input, tag)
            }
        }
    }
}

impl CipherContext for BufferedCipher {
    fn set_iv_len(&mut self, len: usize) -> Result<()> {
        self.require_configuring()?;
        self.check_iv_len(len)?;
        self.iv_len = Some(len);
        Ok(())
    }

    fn set_tag_len(&mut self, len: usize) -> Result<()> {
        self.require_configuring()?;
        self.check_tag_len(len)?;
        self.tag_len = Some(len);
        Ok(())
    }

    fn set_tag(&mut self, tag: &[u8]) -> Result<()> {
        self.require_configuring()?;
        self.check_tag_len(tag.len())?;
        self.tag_len = Some(tag.len());
        self.expected_tag = Some(tag.to_vec());
        Ok(())
    }

    fn init(&mut self, key: &[u8], iv: &[u8], direction: Direction) -> Result<()> {
        self.require_configuring()?;
        let expected_iv_len = self.iv_len.unwrap_or_else(|| self.default_iv_len());
        if iv.len() != expected_iv_len {
            return Err(ProviderError::InvalidNonceLength(iv.len()));
        }
        let key_ok = match self.algorithm {
            CipherAlgorithm::AesCbcPkcs5
            | CipherAlgorithm::Aead(AeadAlgorithm::AesGcm | AeadAlgorithm::AesCcm) => {
                matches!(key.len(), 16 | 24 | 32)
            }
            CipherAlgorithm::Aead(
                AeadAlgorithm::ChaCha20Poly1305 | AeadAlgorithm::XChaCha20Poly1305,
            ) => key.len() == 32,
        };
        if !key_ok {
            return Err(ProviderError::InvalidKeyLength(key.len()));
        }
        self.key = Zeroizing::new(key.to_vec());
        self.iv = iv.to_vec();
        self.direction = direction;
        self.stage = Stage::Initialised;
        Ok(())
    }

    fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        if matches!(self.algorithm, CipherAlgorithm::AesCbcPkcs5) {
            return Err(ProviderError::Unsupported(
                "associated data is not used by CBC".to_string(),
            ));
        }
        if self.stage != Stage::Initialised {
            return Err(ProviderError::InvalidState("associated data must precede the payload"));
        }
        self.aad.extend_from_slice(aad);
        Ok(())
    }

    fn update(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        match self.stage {
            Stage::Initialised | Stage::Streaming => {
                self.input.extend_from_slice(input);
                self.stage = Stage::Streaming;
                Ok(Vec::new())
            }
            Stage::Configuring => Err(ProviderError::InvalidState("update before init")),
            Stage::Finished => Err(ProviderError::InvalidState("update after finalize")),
        }
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        if matches!(self.stage, Stage::Configuring | Stage::Finished) {
            return Err(ProviderError::InvalidState("finalize without an active operation"));
        }
        self.stage = Stage::Finished;
        match self.algorithm {
            CipherAlgorithm::AesCbcPkcs5 => match self.direction {
                Direction::Encrypt => cbc::encrypt(&self.key, &self.iv, &self.input),
                Direction::Decrypt => cbc::decrypt(&self.key, &self.iv, &self.input),
            },
            CipherAlgorithm::Aead(aead) => self.run_aead(aead),
        }
    }

    fn tag(&self) -> Result<Vec<u8>> {
        match (&self.computed_tag, self.direction) {
            (Some(tag), Direction::Encrypt) => Ok(tag.clone()),
            (None, Direction::Encrypt) => Err(ProviderError::InvalidState("tag before finalize")),
            (_, Direction::Decrypt) => {
                Err(ProviderError::InvalidState("tag is only produced by encryption"))
            }
        }
    }
}
