//! The Ninja2 text cipher.
//!
//! Every plaintext byte becomes four characters: two base-30 digits of
//! `byte + salt + key[i % key.len()]` followed by two digits of the salt.
//! The salt is drawn per byte from `[33, 98]`.

use rand::Rng;
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::cipher::base30;

/// Key baked into the legacy client.
pub const DEFAULT_KEY: &str = "ZorbakOwnsYou";

/// Range of the per-byte salt.
pub const SALT_RANGE: RangeInclusive<u8> = 33..=98;

/// Characters emitted per plaintext byte.
pub const CHUNK_LEN: usize = 4;

/// Errors raised by the cipher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Key is empty.
    #[error("Invalid cipher key: {0}")]
    InvalidKey(String),

    /// Ciphertext length is not a multiple of four.
    #[error("Ciphertext length {0} is not a multiple of 4")]
    InvalidLength(usize),

    /// A character outside `0-9a-t`.
    #[error("Invalid base-30 digit at offset {offset}")]
    InvalidDigit { offset: usize },

    /// The recovered value is not a byte.
    #[error("Chunk {chunk} decodes outside the byte range")]
    OutOfRange { chunk: usize },
}

/// Ninja2 cipher bound to a repeating key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ninja2Cipher {
    key: Vec<u8>,
}

impl Ninja2Cipher {
    /// Create a cipher for `key`, cycled byte by byte.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, CipherError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CipherError::InvalidKey("key is empty".to_string()));
        }
        Ok(Self { key })
    }

    /// The key bytes this cipher cycles through.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    fn key_byte(&self, index: usize) -> u32 {
        self.key[index % self.key.len()] as u32
    }

    /// Encrypt with salts drawn from the thread-local RNG.
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut rng = rand::thread_rng();
        self.encrypt_with(plaintext, || rng.gen_range(SALT_RANGE))
    }

    /// Encrypt with salts supplied by `salt`.
    ///
    /// Callers outside tests should use [`Ninja2Cipher::encrypt`]; salts
    /// outside [`SALT_RANGE`] still decode but do not match legacy output.
    pub fn encrypt_with(&self, plaintext: &[u8], mut salt: impl FnMut() -> u8) -> String {
        let mut out = String::with_capacity(plaintext.len() * CHUNK_LEN);
        for (i, byte) in plaintext.iter().enumerate() {
            let salt = salt() as u32;
            let value = *byte as u32 + salt + self.key_byte(i);
            let (Some(value), Some(salt)) = (base30::encode_pair(value), base30::encode_pair(salt))
            else {
                unreachable!("three bytes sum below 900 and always fit in two digits");
            };
            for symbol in value.into_iter().chain(salt) {
                out.push(symbol as char);
            }
        }
        out
    }

    /// Decrypt ciphertext produced by [`Ninja2Cipher::encrypt`].
    pub fn decrypt(&self, text: &str) -> Result<Vec<u8>, CipherError> {
        let raw = text.as_bytes();
        if raw.len() % CHUNK_LEN != 0 {
            return Err(CipherError::InvalidLength(raw.len()));
        }

        let mut plaintext = Vec::with_capacity(raw.len() / CHUNK_LEN);
        for (chunk_index, chunk) in raw.chunks_exact(CHUNK_LEN).enumerate() {
            let offset = chunk_index * CHUNK_LEN;
            let value = base30::decode_pair(&chunk[0..2]).ok_or_else(|| CipherError::InvalidDigit {
                offset: offset + first_bad(&chunk[0..2]),
            })?;
            let salt = base30::decode_pair(&chunk[2..4]).ok_or_else(|| CipherError::InvalidDigit {
                offset: offset + 2 + first_bad(&chunk[2..4]),
            })?;

            let byte = value as i64 - salt as i64 - self.key_byte(chunk_index) as i64;
            let byte =
                u8::try_from(byte).map_err(|_| CipherError::OutOfRange { chunk: chunk_index })?;
            plaintext.push(byte);
        }
        Ok(plaintext)
    }
}

impl Default for Ninja2Cipher {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.as_bytes().to_vec(),
        }
    }
}

fn first_bad(pair: &[u8]) -> usize {
    pair.iter()
        .position(|symbol| base30::digit_value(*symbol).is_none())
        .unwrap_or(0)
}
