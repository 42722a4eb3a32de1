//! Container Reader
//!
//! Parses plaintext containers: full sequential decode, metadata-only access,
//! and random-access lookup through the index block.

use crate::codec::{decode_record, read_u16, read_u32};
use crate::error::{CrfError, Result};
use crate::index::ContainerIndex;
use crate::record::{identifier_hash, PersistedRecord};

use super::integrity::{read_trailer, verify, Footer};
use super::{
    is_supported_version, ContainerMetadata, CHECKSUM_SIZE, FOOTER_MARKER, FOOTER_SIZE,
    HEADER_SIZE, MAGIC, MIN_RECORD_SIZE,
};

/// Validate magic and version, returning the metadata and the rest of the input
fn parse_metadata(bytes: &[u8]) -> Result<(ContainerMetadata, &[u8])> {
    if bytes.len() < MAGIC.len() {
        return Err(CrfError::truncated("magic", MAGIC.len(), bytes.len()));
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(CrfError::Format(format!(
            "invalid magic: expected CRF, got {:?}",
            &bytes[..MAGIC.len()]
        )));
    }

    let mut cursor = &bytes[MAGIC.len()..];
    let format_version = read_u16(&mut cursor, "format version")?;
    if !is_supported_version(format_version) {
        return Err(CrfError::Format(format!(
            "Unsupported file version: {}",
            format_version
        )));
    }
    let record_count = read_u32(&mut cursor, "record count")?;

    Ok((
        ContainerMetadata {
            format_version,
            record_count,
        },
        cursor,
    ))
}

/// Read only magic, version and record count
pub fn read_metadata(bytes: &[u8]) -> Result<ContainerMetadata> {
    parse_metadata(bytes).map(|(metadata, _)| metadata)
}

/// Parsed view over a plaintext container
#[derive(Debug, Clone, Copy)]
pub struct ContainerReader<'a> {
    bytes: &'a [u8],
    metadata: ContainerMetadata,
    index_block: &'a [u8],
    /// Offset of the record block within `bytes`
    records_start: usize,
}

impl<'a> ContainerReader<'a> {
    /// Parse the header and locate the index and record blocks
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let (metadata, mut cursor) = parse_metadata(bytes)?;
        let index_block_size = read_u32(&mut cursor, "index block size")? as usize;

        if cursor.len() < index_block_size {
            return Err(CrfError::truncated("index block", index_block_size, cursor.len()));
        }

        let index_start = HEADER_SIZE;
        let records_start = index_start + index_block_size;

        Ok(Self {
            bytes,
            metadata,
            index_block: &bytes[index_start..records_start],
            records_start,
        })
    }

    pub fn metadata(&self) -> ContainerMetadata {
        self.metadata
    }

    /// Decode the index block
    pub fn index(&self) -> Result<ContainerIndex> {
        ContainerIndex::decode(self.index_block)
    }

    /// Decode every record in order, then verify the footer.
    ///
    /// The index block is skipped by length without being decoded.
    pub fn read_records(&self) -> Result<Vec<PersistedRecord>> {
        let record_count = self.metadata.record_count;
        let mut cursor = &self.bytes[self.records_start..];

        let mut records =
            Vec::with_capacity((record_count as usize).min(cursor.len() / MIN_RECORD_SIZE));
        for _ in 0..record_count {
            records.push(decode_record(&mut cursor)?);
        }
        tracing::trace!("Decoded {} records", records.len());

        let footer = read_footer(&mut cursor)?;
        verify(self.bytes, record_count, &footer)?;

        if !cursor.is_empty() {
            return Err(CrfError::Format(format!(
                "{} trailing bytes after checksum",
                cursor.len()
            )));
        }

        Ok(records)
    }

    /// Look up a record by its plaintext identifier
    pub fn lookup(&self, identifier: &str) -> Result<Option<PersistedRecord>> {
        self.lookup_hash(&identifier_hash(identifier))
    }

    /// Look up a record by identifier hash, decoding only that record.
    ///
    /// The footer is verified first so a lookup never trusts a container a
    /// full read would reject on integrity grounds.
    pub fn lookup_hash(&self, hash: &str) -> Result<Option<PersistedRecord>> {
        let footer = read_trailer(self.bytes)?;
        verify(self.bytes, self.metadata.record_count, &footer)?;

        let index = self.index()?;
        let Some(offset) = index.get(hash) else {
            return Ok(None);
        };

        let records_end = self.bytes.len() - FOOTER_SIZE - CHECKSUM_SIZE;
        let start = self.records_start + offset as usize;
        if self.records_start > records_end || start >= records_end {
            return Err(CrfError::Format(format!(
                "index offset {} outside record block",
                offset
            )));
        }

        let mut cursor = &self.bytes[start..records_end];
        let record = decode_record(&mut cursor)?;
        if record.identifier_hash != hash {
            return Err(CrfError::Format(format!(
                "index offset {} points at a different record",
                offset
            )));
        }

        Ok(Some(record))
    }
}

/// Read footer marker, repeated count and checksum during the forward pass
fn read_footer(cursor: &mut &[u8]) -> Result<Footer> {
    if cursor.len() < FOOTER_MARKER.len() {
        return Err(CrfError::truncated("footer marker", FOOTER_MARKER.len(), cursor.len()));
    }
    let mut marker = [0u8; 7];
    marker.copy_from_slice(&cursor[..FOOTER_MARKER.len()]);
    *cursor = &cursor[FOOTER_MARKER.len()..];

    let record_count = read_u32(cursor, "footer record count")?;
    let checksum = read_u32(cursor, "checksum")?;

    Ok(Footer {
        marker,
        record_count,
        checksum,
    })
}
