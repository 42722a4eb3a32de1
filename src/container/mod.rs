//! Container Module
//!
//! Plaintext CRF container: header, index block, record block, footer and
//! checksum. Encryption is applied on top of these bytes by the envelope.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (13 bytes)                                       │
//! │   Magic: "CRF" (3) | Version: u16 (2) | Count: u32 (4)  │
//! │   IndexSize: u32 (4)                                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Index Block (IndexSize bytes)                           │
//! │   [Count: u32] then [IdHash: text][Offset: u32] ...     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Record Block (variable)                                 │
//! │   Count records back to back, no length prefix          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (11 bytes)                                       │
//! │   Marker: "CRF_END" (7) | Count: u32 (4)                │
//! ├─────────────────────────────────────────────────────────┤
//! │ Checksum: u32 (4), CRC32 over the footer only           │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod integrity;
mod reader;
mod writer;

use serde::{Deserialize, Serialize};

pub use integrity::{checksum, footer_bytes, read_trailer, verify, Footer};
pub use reader::{read_metadata, ContainerReader};
pub use writer::ContainerWriter;

// =============================================================================
// Shared Constants (used by writer, reader, integrity)
// =============================================================================

/// Magic bytes identifying a CRF container
pub const MAGIC: &[u8; 3] = b"CRF";

/// Marker opening the footer
pub const FOOTER_MARKER: &[u8; 7] = b"CRF_END";

/// Format version written by default
pub const CURRENT_VERSION: u16 = 2;

/// Oldest format version readers accept
pub const MIN_SUPPORTED_VERSION: u16 = 1;

/// Header size: Magic (3) + Version (2) + RecordCount (4) + IndexSize (4) = 13 bytes
pub const HEADER_SIZE: usize = 13;

/// Footer size: Marker (7) + RecordCount (4) = 11 bytes
pub const FOOTER_SIZE: usize = 11;

/// Trailing checksum size
pub const CHECKSUM_SIZE: usize = 4;

/// Smallest possible encoded record: three empty texts plus three u32 fields
pub(crate) const MIN_RECORD_SIZE: usize = 3 * 4 + 3 * 4;

pub fn is_supported_version(version: u16) -> bool {
    (MIN_SUPPORTED_VERSION..=CURRENT_VERSION).contains(&version)
}

/// Header fields readable without decoding any record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    pub format_version: u16,
    pub record_count: u32,
}
