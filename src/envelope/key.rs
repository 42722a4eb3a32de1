//! Envelope keys
//!
//! Keys are supplied by the caller. Nothing in the crate stores a key.

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CrfError, Result};

/// AES-256 key length in bytes
pub const KEY_SIZE: usize = 32;

/// Symmetric key for the file envelope, wiped from memory on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CrfKey([u8; KEY_SIZE]);

impl CrfKey {
    /// Generate a fresh random key from the OS RNG
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(OsRng);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(key.as_slice());
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            CrfError::Key(format!(
                "expected {} key bytes, got {}",
                KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Decode a URL-safe base64 key (surrounding whitespace ignored)
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let mut decoded = URL_SAFE
            .decode(encoded.trim())
            .map_err(|e| CrfError::Key(format!("invalid base64: {}", e)))?;
        let key = Self::from_slice(&decoded);
        decoded.zeroize();
        key
    }

    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for CrfKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CrfKey(<redacted>)")
    }
}

/// Capability that supplies the envelope key to a store
pub trait KeySource {
    fn load_key(&self) -> Result<CrfKey>;
}

impl KeySource for CrfKey {
    fn load_key(&self) -> Result<CrfKey> {
        Ok(self.clone())
    }
}

/// Reads a base64 key from an environment variable at load time
#[derive(Debug, Clone)]
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    pub const DEFAULT_VAR: &'static str = "CRF_KEY";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl KeySource for EnvKeySource {
    fn load_key(&self) -> Result<CrfKey> {
        let value = std::env::var(&self.var)
            .map_err(|e| CrfError::Key(format!("{}: {}", self.var, e)))?;
        CrfKey::from_base64(&value)
    }
}
