//! # crfile
//!
//! Encrypted, integrity-checked binary container for credit records:
//! - Deterministic little-endian record codec
//! - Identifier privacy: only SHA-256 hashes of identifiers are persisted
//! - Offset index for single-record lookup
//! - CRC32 footer check with header/footer record count cross-validation
//! - Whole-file AES-256-GCM envelope
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CrfStore (file I/O)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Envelope (AES-256-GCM seal/open)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ plaintext container
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Container  │          │  Container  │
//!   │   Writer    │          │   Reader    │──► integrity
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │IndexBuilder │─────────►│    Codec    │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod index;
pub mod container;
pub mod envelope;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CrfError, ErrorKind, IntegrityFailure, Result};
pub use config::Config;
pub use container::ContainerMetadata;
pub use envelope::{CrfKey, Envelope, KeySource};
pub use record::{identifier_hash, PersistedRecord, PlaintextRecord, SubAccount};
pub use store::{generate_key, read_file, read_file_metadata, write_file, CrfStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of crfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
