//! AES-256-GCM envelope backend

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use crate::error::{CrfError, Result};

use super::key::CrfKey;
use super::Envelope;

/// Leading token byte identifying this envelope layout
pub const ENVELOPE_VERSION: u8 = 0x01;

/// GCM nonce length
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM with a fresh random nonce per token
pub struct AesGcmEnvelope {
    cipher: Aes256Gcm,
}

impl AesGcmEnvelope {
    pub fn new(key: &CrfKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }
}

impl std::fmt::Debug for AesGcmEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesGcmEnvelope")
    }
}

impl Envelope for AesGcmEnvelope {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let aad = [ENVELOPE_VERSION];

        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: &aad,
                },
            )
            .map_err(|_| CrfError::Encryption("AES-GCM encryption failed".to_string()))?;

        let mut token = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
        token.push(ENVELOPE_VERSION);
        token.extend_from_slice(nonce.as_slice());
        token.extend_from_slice(&ciphertext);
        Ok(token)
    }

    fn open(&self, token: &[u8]) -> Result<Vec<u8>> {
        let min_len = 1 + NONCE_SIZE + TAG_SIZE;
        if token.len() < min_len {
            return Err(CrfError::Decryption(format!(
                "token of {} bytes is shorter than {}",
                token.len(),
                min_len
            )));
        }
        if token[0] != ENVELOPE_VERSION {
            return Err(CrfError::Decryption(format!(
                "unknown envelope version 0x{:02x}",
                token[0]
            )));
        }

        let nonce = Nonce::from_slice(&token[1..1 + NONCE_SIZE]);
        self.cipher
            .decrypt(
                nonce,
                Payload {
                    msg: &token[1 + NONCE_SIZE..],
                    aad: &token[..1],
                },
            )
            .map_err(|_| {
                CrfError::Decryption("invalid key or corrupted file".to_string())
            })
    }
}
