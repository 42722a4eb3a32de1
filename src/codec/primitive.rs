//! Primitive codec
//!
//! Length-prefixed text and fixed-width little-endian integers.

use bytes::{Buf, BufMut};

use crate::error::{CrfError, Result};

/// Size of the length prefix in front of every text field
pub const TEXT_LEN_SIZE: usize = 4;

/// Write `s` as `[len: u32 LE][utf-8 bytes]`
pub fn write_text<B: BufMut>(buf: &mut B, s: &str) -> Result<()> {
    let len = u32::try_from(s.len()).map_err(|_| {
        CrfError::Capacity(format!("text field of {} bytes exceeds u32 length", s.len()))
    })?;
    buf.put_u32_le(len);
    buf.put_slice(s.as_bytes());
    Ok(())
}

/// Read a length-prefixed text field.
///
/// Returns `Ok(None)` when the cursor is already exhausted, so callers can
/// probe for a trailing region. A partially present field is a truncation.
pub fn read_text<B: Buf>(buf: &mut B) -> Result<Option<String>> {
    if !buf.has_remaining() {
        return Ok(None);
    }
    if buf.remaining() < TEXT_LEN_SIZE {
        return Err(CrfError::truncated("text length", TEXT_LEN_SIZE, buf.remaining()));
    }

    let len = buf.get_u32_le() as usize;
    if buf.remaining() < len {
        return Err(CrfError::truncated("text body", len, buf.remaining()));
    }

    let mut raw = vec![0u8; len];
    buf.copy_to_slice(&mut raw);

    String::from_utf8(raw)
        .map(Some)
        .map_err(|e| CrfError::Encoding {
            context: "text field",
            source: e.utf8_error(),
        })
}

fn ensure<B: Buf>(buf: &B, needed: usize, context: &'static str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(CrfError::truncated(context, needed, buf.remaining()));
    }
    Ok(())
}

pub fn read_u16<B: Buf>(buf: &mut B, context: &'static str) -> Result<u16> {
    ensure(buf, 2, context)?;
    Ok(buf.get_u16_le())
}

pub fn read_u32<B: Buf>(buf: &mut B, context: &'static str) -> Result<u32> {
    ensure(buf, 4, context)?;
    Ok(buf.get_u32_le())
}

pub fn read_i32<B: Buf>(buf: &mut B, context: &'static str) -> Result<i32> {
    ensure(buf, 4, context)?;
    Ok(buf.get_i32_le())
}
