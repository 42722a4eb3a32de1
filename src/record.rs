//! Record types
//!
//! A record exists in two forms. [`PlaintextRecord`] is what callers build and
//! hand to the writer; it carries the real identifier. [`PersistedRecord`] is
//! what comes back from a container; its identifier has been replaced by the
//! hex SHA-256 digest and the original value cannot be recovered.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a plaintext identifier.
///
/// This is the only form of an identifier that ever reaches persisted bytes.
pub fn identifier_hash(identifier: &str) -> String {
    hex::encode(Sha256::digest(identifier.as_bytes()))
}

/// A named balance held under a record (chequing, line of credit, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccount {
    pub name: String,
    /// Negative values are liabilities or overdrawn balances
    pub balance: i32,
}

impl SubAccount {
    pub fn new(name: impl Into<String>, balance: i32) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }
}

/// A record as supplied by the caller, identifier in the clear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextRecord {
    pub identifier: String,
    pub name: String,
    pub address: String,
    pub credit_score: u32,
    /// Opaque bitmask
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub sub_accounts: Vec<SubAccount>,
}

impl PlaintextRecord {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        credit_score: u32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            address: address.into(),
            credit_score,
            flags: 0,
            sub_accounts: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_sub_account(mut self, name: impl Into<String>, balance: i32) -> Self {
        self.sub_accounts.push(SubAccount::new(name, balance));
        self
    }

    /// Number of sub-accounts written into the record's count field
    pub fn sub_account_count(&self) -> usize {
        self.sub_accounts.len()
    }

    /// The hash this record is stored and indexed under
    pub fn identifier_hash(&self) -> String {
        identifier_hash(&self.identifier)
    }
}

/// A record decoded from a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub identifier_hash: String,
    pub name: String,
    pub address: String,
    pub credit_score: u32,
    pub flags: u32,
    pub sub_accounts: Vec<SubAccount>,
}

impl PersistedRecord {
    pub fn sub_account_count(&self) -> usize {
        self.sub_accounts.len()
    }

    /// Whether this record was written from a plaintext record with `identifier`
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.identifier_hash == identifier_hash(identifier)
    }
}
