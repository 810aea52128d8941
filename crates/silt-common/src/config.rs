//! Configuration for Silt store files.

use crate::error::{Result, SiltError};
use crate::page::PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// Largest usable value-length bound.
///
/// A leaf page spends 11 bytes on its header and `value_max_len + 10`
/// bytes per entry slot; beyond this bound a leaf could not hold a single
/// entry.
pub const MAX_VALUE_LEN: u16 = (PAGE_SIZE - 21) as u16;

/// Configuration for creating and opening a store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum value length in bytes. Fixed at file creation and persisted
    /// in the meta page; when an existing file is opened the persisted
    /// value wins.
    pub value_max_len: u16,
    /// Call fsync after writing the meta page at creation and after
    /// `flush_all`.
    pub sync_on_flush: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            value_max_len: 299,
            sync_on_flush: true,
        }
    }
}

impl StoreConfig {
    /// Checks that the configuration can produce a usable file.
    pub fn validate(&self) -> Result<()> {
        if self.value_max_len > MAX_VALUE_LEN {
            return Err(SiltError::Config(format!(
                "value_max_len {} exceeds {}",
                self.value_max_len, MAX_VALUE_LEN
            )));
        }
        Ok(())
    }
}
