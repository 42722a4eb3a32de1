//! Container Writer
//!
//! Assembles the complete plaintext container in memory.

use bytes::BufMut;

use crate::error::{CrfError, Result};
use crate::index::IndexBuilder;
use crate::record::PlaintextRecord;

use super::integrity::{checksum, footer_bytes};
use super::{is_supported_version, CHECKSUM_SIZE, CURRENT_VERSION, FOOTER_SIZE, HEADER_SIZE, MAGIC};

/// Builds plaintext containers for a fixed format version
#[derive(Debug, Clone, Copy)]
pub struct ContainerWriter {
    format_version: u16,
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self {
            format_version: CURRENT_VERSION,
        }
    }
}

impl ContainerWriter {
    /// Create a writer stamping `format_version` into the header
    pub fn new(format_version: u16) -> Result<Self> {
        if !is_supported_version(format_version) {
            return Err(CrfError::Format(format!(
                "Unsupported file version: {}",
                format_version
            )));
        }
        Ok(Self { format_version })
    }

    pub fn format_version(&self) -> u16 {
        self.format_version
    }

    /// Lay out header, index, records, footer and checksum
    pub fn assemble(&self, records: &[PlaintextRecord]) -> Result<Vec<u8>> {
        let mut builder = IndexBuilder::new();
        for record in records {
            builder.add(record)?;
        }
        let built = builder.finish()?;

        let index_block_size = u32::try_from(built.index_block.len()).map_err(|_| {
            CrfError::Capacity(format!(
                "index block of {} bytes exceeds u32 size",
                built.index_block.len()
            ))
        })?;

        let total = HEADER_SIZE
            + built.index_block.len()
            + built.record_block.len()
            + FOOTER_SIZE
            + CHECKSUM_SIZE;
        let mut buf = Vec::with_capacity(total);

        // Header
        buf.put_slice(MAGIC);
        buf.put_u16_le(self.format_version);
        buf.put_u32_le(built.record_count);
        buf.put_u32_le(index_block_size);

        // Index + records
        buf.put_slice(&built.index_block);
        buf.put_slice(&built.record_block);

        // Footer + checksum over the footer only
        let footer = footer_bytes(built.record_count);
        buf.put_slice(&footer);
        buf.put_u32_le(checksum(&footer));

        debug_assert_eq!(buf.len(), total);
        tracing::debug!(
            "Assembled v{} container: {} records, {} bytes",
            self.format_version,
            built.record_count,
            buf.len()
        );

        Ok(buf)
    }
}
