//! Encryption Envelope Module
//!
//! Whole-file authenticated encryption applied to the assembled plaintext
//! container. The envelope is a `bytes → bytes` stage; the container codec
//! never sees ciphertext.
//!
//! ## Token Format (AES-256-GCM backend)
//! ```text
//! ┌──────────────┬──────────────┬──────────────────────────────┐
//! │ Version (1)  │ Nonce (12)   │ Ciphertext ‖ Tag (16)        │
//! └──────────────┴──────────────┴──────────────────────────────┘
//! ```
//! The version byte is bound as associated data.

mod gcm;
mod key;

pub use gcm::{AesGcmEnvelope, ENVELOPE_VERSION, NONCE_SIZE, TAG_SIZE};
pub use key::{CrfKey, EnvKeySource, KeySource, KEY_SIZE};

use crate::error::Result;

/// Authenticated whole-file encryption transform
pub trait Envelope {
    /// Encrypt a complete plaintext container into an opaque token
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt a token produced by [`Envelope::seal`].
    ///
    /// Any wrong key or altered byte must fail with `CrfError::Decryption`.
    fn open(&self, token: &[u8]) -> Result<Vec<u8>>;
}
