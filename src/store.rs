//! Store Module
//!
//! File-level entry points that join the container codec to an envelope.
//!
//! ## Pipeline
//! ```text
//! write: records → ContainerWriter → Envelope::seal → file
//! read:  file → Envelope::open → ContainerReader → records
//! ```
//! Every call reads or writes the whole file; nothing is cached between calls.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::config::Config;
use crate::container::{read_metadata, ContainerMetadata, ContainerReader, ContainerWriter};
use crate::envelope::{AesGcmEnvelope, CrfKey, Envelope, KeySource};
use crate::error::{CrfError, Result};
use crate::record::{PersistedRecord, PlaintextRecord};

/// Reads and writes encrypted CRF files through one envelope
#[derive(Debug)]
pub struct CrfStore<E: Envelope = AesGcmEnvelope> {
    config: Config,
    writer: ContainerWriter,
    envelope: E,
}

impl CrfStore<AesGcmEnvelope> {
    /// Store using AES-256-GCM under `key`
    pub fn with_key(config: Config, key: &CrfKey) -> Result<Self> {
        Self::with_envelope(config, AesGcmEnvelope::new(key))
    }

    /// Store whose key is obtained from a caller-supplied source
    pub fn from_key_source(config: Config, source: &dyn KeySource) -> Result<Self> {
        let key = source.load_key()?;
        Self::with_key(config, &key)
    }
}

impl<E: Envelope> CrfStore<E> {
    /// Store using any envelope backend
    pub fn with_envelope(config: Config, envelope: E) -> Result<Self> {
        config.validate()?;
        let writer = ContainerWriter::new(config.format_version)?;
        Ok(Self {
            config,
            writer,
            envelope,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Assemble, encrypt and write `records` to `path`, replacing any file there
    pub fn write(&self, path: &Path, records: &[PlaintextRecord]) -> Result<()> {
        let plaintext = self.writer.assemble(records)?;
        let token = self.envelope.seal(&plaintext)?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(&token)?;
        if self.config.sync_on_write {
            file.sync_all()?;
        }

        tracing::debug!(
            "Wrote {} records to {} ({} plaintext bytes, {} encrypted)",
            records.len(),
            path.display(),
            plaintext.len(),
            token.len()
        );
        Ok(())
    }

    // =========================================================================
    // Read Paths
    // =========================================================================

    /// Decrypt and decode every record in the file
    pub fn read(&self, path: &Path) -> Result<Vec<PersistedRecord>> {
        let plaintext = self.decrypt_file(path)?;
        let records = ContainerReader::open(&plaintext)
            .and_then(|reader| reader.read_records())
            .map_err(|e| rejected(path, e))?;

        tracing::debug!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Header metadata only. The whole file is still decrypted.
    pub fn read_metadata(&self, path: &Path) -> Result<ContainerMetadata> {
        let plaintext = self.decrypt_file(path)?;
        read_metadata(&plaintext).map_err(|e| rejected(path, e))
    }

    /// Find a single record through the index by its plaintext identifier
    pub fn lookup(&self, path: &Path, identifier: &str) -> Result<Option<PersistedRecord>> {
        let plaintext = self.decrypt_file(path)?;
        ContainerReader::open(&plaintext)
            .and_then(|reader| reader.lookup(identifier))
            .map_err(|e| rejected(path, e))
    }

    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        let size = fs::metadata(path)?.len();
        if size > self.config.max_file_size {
            return Err(CrfError::Capacity(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                self.config.max_file_size
            )));
        }

        let mut token = Vec::with_capacity(size as usize);
        File::open(path)?.read_to_end(&mut token)?;

        self.envelope.open(&token).map_err(|e| rejected(path, e))
    }
}

fn rejected(path: &Path, err: CrfError) -> CrfError {
    tracing::warn!("Rejected {}: {}", path.display(), err);
    err
}

// =============================================================================
// Convenience Functions (default config, AES-256-GCM)
// =============================================================================

/// Generate a fresh envelope key. The caller is responsible for storing it.
pub fn generate_key() -> CrfKey {
    CrfKey::generate()
}

/// Write `records` to `path` encrypted under `key`
pub fn write_file(path: &Path, records: &[PlaintextRecord], key: &CrfKey) -> Result<()> {
    CrfStore::with_key(Config::default(), key)?.write(path, records)
}

/// Read every record from `path`
pub fn read_file(path: &Path, key: &CrfKey) -> Result<Vec<PersistedRecord>> {
    CrfStore::with_key(Config::default(), key)?.read(path)
}

/// Read only the header metadata of `path`
pub fn read_file_metadata(path: &Path, key: &CrfKey) -> Result<ContainerMetadata> {
    CrfStore::with_key(Config::default(), key)?.read_metadata(path)
}
