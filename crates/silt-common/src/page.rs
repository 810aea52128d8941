//! Page addressing for Silt store files.

use serde::{Deserialize, Serialize};

/// Page size in bytes. Every page, including the meta page, is exactly
/// this long, and the file length is always a positive multiple of it.
pub const PAGE_SIZE: usize = 4096;

/// Position of a page within a store file.
///
/// Page 0 holds the meta record and is never assigned to a tree node, so
/// the zero value doubles as "absent": a child pointer of 0 in an internal
/// node means no child, and a leaf `next` of 0 means no successor leaf.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PageNum(i64);

impl PageNum {
    /// The absent page: meta page 0, never a tree node.
    pub const NULL: PageNum = PageNum(0);

    /// Creates a page number.
    pub fn new(n: i64) -> Self {
        Self(n)
    }

    /// Returns the raw page index.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Returns true for the reserved page 0.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Byte offset of this page within the file.
    pub fn offset(self) -> u64 {
        self.0 as u64 * PAGE_SIZE as u64
    }

    /// The page number as big-endian bytes, as stored on disk.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Reads a page number from big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }
}

impl std::fmt::Display for PageNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
