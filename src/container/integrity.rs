//! Integrity verification
//!
//! The checksum covers the footer (marker + repeated record count) only.
//! Verification re-reads those bytes from their fixed position at the end of
//! the plaintext instead of trusting what the forward parse buffered.

use crate::error::{CrfError, IntegrityFailure, Result};

use super::{CHECKSUM_SIZE, FOOTER_MARKER, FOOTER_SIZE};

/// Footer fields as read by a parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    pub marker: [u8; 7],
    pub record_count: u32,
    /// Checksum stored after the footer
    pub checksum: u32,
}

/// CRC32 (IEEE, zlib-compatible)
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Footer bytes for a container holding `record_count` records
pub fn footer_bytes(record_count: u32) -> [u8; FOOTER_SIZE] {
    let mut footer = [0u8; FOOTER_SIZE];
    footer[..FOOTER_MARKER.len()].copy_from_slice(FOOTER_MARKER);
    footer[FOOTER_MARKER.len()..].copy_from_slice(&record_count.to_le_bytes());
    footer
}

/// Footer region and stored checksum, located from the end of `plaintext`
fn trailing_regions(plaintext: &[u8]) -> Result<(&[u8], u32)> {
    let trailer_len = FOOTER_SIZE + CHECKSUM_SIZE;
    if plaintext.len() < trailer_len {
        return Err(CrfError::truncated("footer", trailer_len, plaintext.len()));
    }

    let footer_start = plaintext.len() - trailer_len;
    let footer = &plaintext[footer_start..footer_start + FOOTER_SIZE];
    let mut stored = [0u8; CHECKSUM_SIZE];
    stored.copy_from_slice(&plaintext[footer_start + FOOTER_SIZE..]);
    Ok((footer, u32::from_le_bytes(stored)))
}

/// Read the footer and checksum directly from the end of the plaintext.
///
/// Used by paths that do not walk the record block (index lookups).
pub fn read_trailer(plaintext: &[u8]) -> Result<Footer> {
    let (footer, checksum) = trailing_regions(plaintext)?;

    let mut marker = [0u8; 7];
    marker.copy_from_slice(&footer[..FOOTER_MARKER.len()]);
    let mut count = [0u8; 4];
    count.copy_from_slice(&footer[FOOTER_MARKER.len()..]);

    Ok(Footer {
        marker,
        record_count: u32::from_le_bytes(count),
        checksum,
    })
}

/// Validate a parsed footer against the plaintext and the header count.
///
/// Checks run in a fixed order: checksum, footer marker, record count.
pub fn verify(plaintext: &[u8], header_record_count: u32, footer: &Footer) -> Result<()> {
    let (footer_region, _) = trailing_regions(plaintext)?;
    let computed = checksum(footer_region);

    if computed != footer.checksum {
        return Err(CrfError::Integrity(IntegrityFailure::ChecksumMismatch {
            stored: footer.checksum,
            computed,
        }));
    }

    if &footer.marker != FOOTER_MARKER {
        return Err(CrfError::Format(format!(
            "invalid footer marker {:?}",
            String::from_utf8_lossy(&footer.marker)
        )));
    }

    if footer.record_count != header_record_count {
        return Err(CrfError::Integrity(IntegrityFailure::RecordCountMismatch {
            header: header_record_count,
            footer: footer.record_count,
        }));
    }

    Ok(())
}
