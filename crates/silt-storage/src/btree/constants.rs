//! Structural constants and on-disk layout offsets for B+ tree nodes.

use silt_common::page::PAGE_SIZE;

/// Maximum number of children of an internal node.
///
/// Chosen so a full internal page fits exactly: 3-byte header,
/// `INTERNAL_ORDER - 1` 8-byte keys, `INTERNAL_ORDER` 8-byte children.
pub const INTERNAL_ORDER: usize = (PAGE_SIZE + 5) / 16;

/// Maximum number of keys of an internal node.
pub const INTERNAL_KEY_CAP: usize = INTERNAL_ORDER - 1;

/// Offset of the key slot array in an internal page (after the 1-byte tag
/// and 2-byte key count).
pub(crate) const INTERNAL_KEYS_OFFSET: usize = 3;

/// Offset of the child slot array in an internal page (after the full key
/// slot array, whether or not every slot is in use).
pub(crate) const INTERNAL_CHILDREN_OFFSET: usize = 3 + 8 * (INTERNAL_ORDER - 1);

/// Offset of the key slot array in a leaf page (after the 1-byte tag,
/// 8-byte next pointer, and 2-byte key count).
pub(crate) const LEAF_KEYS_OFFSET: usize = 11;
