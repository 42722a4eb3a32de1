//! Codec Module
//!
//! Byte-level encoding shared by the container writer and reader.
//!
//! ## Record Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ IdHash: text | Name: text | Address: text                    │
//! │ CreditScore: u32 | SubAccountCount: u32 | Flags: u32         │
//! ├──────────────────────────────────────────────────────────────┤
//! │ SubAccount × SubAccountCount                                 │
//! │   Name: text | Balance: i32                                  │
//! └──────────────────────────────────────────────────────────────┘
//!
//! text = [Len: u32][UTF-8 bytes]    (all integers little-endian)
//! ```

mod primitive;
mod record;

pub use primitive::{read_i32, read_text, read_u16, read_u32, write_text};
pub use record::{decode_record, encode_record};
