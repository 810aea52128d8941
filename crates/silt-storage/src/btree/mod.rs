//! Disk-resident B+ tree.
//!
//! The tree maps `i64` keys to byte-string values bounded by the store's
//! `value_max_len`. Internal nodes route by separator keys; leaves hold
//! the entries and chain to their successor for ordered scans. Every
//! node occupies exactly one page; the pager owns the decoded nodes and
//! the tree addresses them by page number.

pub mod constants;
pub mod iter;
pub mod node;
pub mod tree;
pub mod types;

pub use constants::{INTERNAL_KEY_CAP, INTERNAL_ORDER};
pub use iter::Iter;
pub use node::{InternalNode, LeafNode, Node};
pub use tree::BPlusTree;
pub use types::{Entry, Key, Value};
