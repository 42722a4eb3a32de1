//! Record codec
//!
//! Encodes one record into a byte buffer and decodes it back from a cursor.
//! Records carry no outer length prefix; boundaries come from walking the
//! fields in fixed order.

use bytes::{Buf, BufMut};

use crate::error::{CrfError, Result};
use crate::record::{identifier_hash, PersistedRecord, PlaintextRecord, SubAccount};

use super::primitive::{read_i32, read_text, read_u32, write_text};

/// Encode `record` onto the end of `buf`, returning the number of bytes written.
///
/// The identifier is always written as its hash: `identifier_hash_hint` when the
/// caller already computed it, otherwise `sha256_hex(record.identifier)`.
pub fn encode_record(
    buf: &mut Vec<u8>,
    record: &PlaintextRecord,
    identifier_hash_hint: Option<&str>,
) -> Result<usize> {
    let start = buf.len();

    let sub_account_count = u32::try_from(record.sub_accounts.len()).map_err(|_| {
        CrfError::Capacity(format!(
            "{} sub-accounts exceed u32 count",
            record.sub_accounts.len()
        ))
    })?;

    match identifier_hash_hint {
        Some(hash) => write_text(buf, hash)?,
        None => write_text(buf, &identifier_hash(&record.identifier))?,
    }
    write_text(buf, &record.name)?;
    write_text(buf, &record.address)?;
    buf.put_u32_le(record.credit_score);
    buf.put_u32_le(sub_account_count);
    buf.put_u32_le(record.flags);

    for account in &record.sub_accounts {
        write_text(buf, &account.name)?;
        buf.put_i32_le(account.balance);
    }

    Ok(buf.len() - start)
}

/// Decode one record from the cursor, advancing it past the record.
///
/// Exactly `sub_account_count` sub-accounts are read.
pub fn decode_record<B: Buf>(buf: &mut B) -> Result<PersistedRecord> {
    let identifier_hash = required_text(buf, "record identifier")?;
    let name = required_text(buf, "record name")?;
    let address = required_text(buf, "record address")?;
    let credit_score = read_u32(buf, "credit score")?;
    let sub_account_count = read_u32(buf, "sub-account count")?;
    let flags = read_u32(buf, "record flags")?;

    // Each sub-account is at least 8 bytes; a forged count must not drive the allocation
    let mut sub_accounts =
        Vec::with_capacity((sub_account_count as usize).min(buf.remaining() / 8));
    for _ in 0..sub_account_count {
        let name = required_text(buf, "sub-account name")?;
        let balance = read_i32(buf, "sub-account balance")?;
        sub_accounts.push(SubAccount { name, balance });
    }

    Ok(PersistedRecord {
        identifier_hash,
        name,
        address,
        credit_score,
        flags,
        sub_accounts,
    })
}

/// Inside a record, end-of-data is a truncation rather than a clean stop
fn required_text<B: Buf>(buf: &mut B, context: &'static str) -> Result<String> {
    read_text(buf)?.ok_or_else(|| CrfError::truncated(context, 4, 0))
}
