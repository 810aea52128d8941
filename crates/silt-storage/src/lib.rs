//! Storage engine for Silt.
//!
//! This crate provides:
//! - Pager for page-level file I/O with an in-memory resident set
//! - Meta record describing the file (root, value bound, free pages)
//! - B+ tree node representation and page codec
//! - B+ tree operations and the public tree facade
//! - Forward iteration over the leaf chain
//!
//! The engine is single-threaded; durability is the caller's
//! responsibility through an explicit flush before orderly shutdown.

pub mod btree;
pub mod buffer;
pub mod meta;
pub mod pager;

pub use btree::{
    BPlusTree, Entry, InternalNode, Iter, Key, LeafNode, Node, Value, INTERNAL_KEY_CAP,
    INTERNAL_ORDER,
};
pub use buffer::PageBuf;
pub use meta::{Meta, MAX_FREE_PAGES};
pub use pager::Pager;
