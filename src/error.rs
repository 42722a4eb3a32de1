//! Error types for crfile
//!
//! Provides a unified error type for all container operations.

use thiserror::Error;

/// Result type alias using CrfError
pub type Result<T> = std::result::Result<T, CrfError>;

/// Unified error type for CRF operations
#[derive(Debug, Error)]
pub enum CrfError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Envelope Errors
    // -------------------------------------------------------------------------
    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Invalid key: {0}")]
    Key(String),

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("Invalid container format: {0}")]
    Format(String),

    #[error("Truncated {context}: needed {needed} bytes, {available} available")]
    Truncation {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid UTF-8 in {context}: {source}")]
    Encoding {
        context: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Integrity check failed: {0}")]
    Integrity(IntegrityFailure),

    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Which integrity check rejected the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFailure {
    ChecksumMismatch { stored: u32, computed: u32 },
    RecordCountMismatch { header: u32, footer: u32 },
}

impl std::fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch (stored 0x{:08x}, computed 0x{:08x})",
                stored, computed
            ),
            Self::RecordCountMismatch { header, footer } => write!(
                f,
                "record count mismatch (header {}, footer {})",
                header, footer
            ),
        }
    }
}

/// Coarse classification of a [`CrfError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Decryption,
    Format,
    Truncation,
    Encoding,
    Integrity,
    Other,
}

impl CrfError {
    /// Classify this error for callers that only care about the failure kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrfError::Io(_) => ErrorKind::Io,
            CrfError::Decryption(_) => ErrorKind::Decryption,
            CrfError::Format(_) => ErrorKind::Format,
            CrfError::Truncation { .. } => ErrorKind::Truncation,
            CrfError::Encoding { .. } => ErrorKind::Encoding,
            CrfError::Integrity(_) => ErrorKind::Integrity,
            CrfError::Encryption(_)
            | CrfError::Key(_)
            | CrfError::Capacity(_)
            | CrfError::Serialization(_)
            | CrfError::Config(_) => ErrorKind::Other,
        }
    }

    pub(crate) fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        CrfError::Truncation {
            context,
            needed,
            available,
        }
    }
}
