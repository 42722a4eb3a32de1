//! Configuration for crfile
//!
//! Centralized configuration with sensible defaults.

use crate::container::{is_supported_version, CURRENT_VERSION};
use crate::error::{CrfError, Result};

/// Main configuration for reading and writing CRF files
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Format version stamped into the header of written containers.
    /// Must be one of the versions readers accept.
    pub format_version: u16,

    /// fsync the file after writing
    pub sync_on_write: bool,

    // -------------------------------------------------------------------------
    // Reader Configuration
    // -------------------------------------------------------------------------
    /// Largest encrypted file (in bytes) a reader will load into memory
    pub max_file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format_version: CURRENT_VERSION,
            sync_on_write: true,
            max_file_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the container codec cannot honor
    pub fn validate(&self) -> Result<()> {
        if !is_supported_version(self.format_version) {
            return Err(CrfError::Config(format!(
                "unsupported format version {}",
                self.format_version
            )));
        }
        if self.max_file_size == 0 {
            return Err(CrfError::Config(
                "max_file_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the format version written into new containers
    pub fn format_version(mut self, version: u16) -> Self {
        self.config.format_version = version;
        self
    }

    /// Enable or disable fsync after writes
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.config.sync_on_write = sync;
        self
    }

    /// Set the maximum encrypted file size accepted by readers (in bytes)
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
