//! Offset index
//!
//! Maps identifier hashes to the byte offset of their record, measured from
//! the start of the record block.
//!
//! ## Index Block Format
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ EntryCount: u32                          │
//! ├──────────────────────────────────────────┤
//! │ [IdHash: text][Offset: u32]              │
//! │ ... repeated, ascending by IdHash ...    │
//! └──────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use bytes::BufMut;

use crate::codec::{encode_record, read_text, read_u32, write_text};
use crate::error::{CrfError, Result};
use crate::record::PlaintextRecord;

/// In-memory index: identifier hash → record-block offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerIndex {
    entries: BTreeMap<String, u32>,
}

impl ContainerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. A repeated hash replaces the earlier offset.
    pub fn insert(&mut self, identifier_hash: String, offset: u32) -> Option<u32> {
        self.entries.insert(identifier_hash, offset)
    }

    /// Offset of the record stored under `identifier_hash`
    pub fn get(&self, identifier_hash: &str) -> Option<u32> {
        self.entries.get(identifier_hash).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Serialize as an index block
    pub fn encode(&self) -> Result<Vec<u8>> {
        let count = u32::try_from(self.entries.len()).map_err(|_| {
            CrfError::Capacity(format!("{} index entries exceed u32 count", self.entries.len()))
        })?;

        let mut buf = Vec::with_capacity(4 + self.entries.len() * (4 + 64 + 4));
        buf.put_u32_le(count);
        for (hash, offset) in &self.entries {
            write_text(&mut buf, hash)?;
            buf.put_u32_le(*offset);
        }
        Ok(buf)
    }

    /// Parse an index block. The block must be consumed exactly.
    pub fn decode(block: &[u8]) -> Result<Self> {
        let mut cursor = block;
        let count = read_u32(&mut cursor, "index entry count")?;

        let mut index = Self::new();
        for _ in 0..count {
            let hash = read_text(&mut cursor)?
                .ok_or_else(|| CrfError::truncated("index entry hash", 4, 0))?;
            let offset = read_u32(&mut cursor, "index entry offset")?;
            index.insert(hash, offset);
        }

        if !cursor.is_empty() {
            return Err(CrfError::Format(format!(
                "{} trailing bytes after {} index entries",
                cursor.len(),
                count
            )));
        }

        Ok(index)
    }
}

/// Everything the index builder produces for the container assembler
#[derive(Debug)]
pub struct BuiltIndex {
    pub index: ContainerIndex,
    pub index_block: Vec<u8>,
    pub record_block: Vec<u8>,
    pub record_count: u32,
}

/// Serializes records into a scratch buffer while recording their offsets
#[derive(Debug, Default)]
pub struct IndexBuilder {
    /// Scratch buffer holding the record block
    records: Vec<u8>,
    index: ContainerIndex,
    record_count: u32,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `record` into the record block, returning its offset
    pub fn add(&mut self, record: &PlaintextRecord) -> Result<u32> {
        let offset = u32::try_from(self.records.len()).map_err(|_| {
            CrfError::Capacity(format!(
                "record block of {} bytes exceeds u32 offsets",
                self.records.len()
            ))
        })?;
        let record_count = self.record_count.checked_add(1).ok_or_else(|| {
            CrfError::Capacity("record count exceeds u32".to_string())
        })?;

        let hash = record.identifier_hash();
        encode_record(&mut self.records, record, Some(&hash))?;

        if let Some(previous) = self.index.insert(hash, offset) {
            tracing::debug!(
                "Index entry at offset {} replaced by offset {} (duplicate identifier)",
                previous,
                offset
            );
        }
        self.record_count = record_count;

        Ok(offset)
    }

    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Current size of the record block in bytes
    pub fn record_block_len(&self) -> usize {
        self.records.len()
    }

    pub fn finish(self) -> Result<BuiltIndex> {
        let index_block = self.index.encode()?;
        tracing::trace!(
            "Built index: {} entries, {} byte block, {} byte record block",
            self.index.len(),
            index_block.len(),
            self.records.len()
        );

        Ok(BuiltIndex {
            index: self.index,
            index_block,
            record_block: self.records,
            record_count: self.record_count,
        })
    }
}
