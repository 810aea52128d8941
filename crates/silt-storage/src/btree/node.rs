//! In-memory B+ tree nodes and their on-disk page codec.
//!
//! Both node flavors occupy exactly one page. All integers are big-endian
//! and slot arrays sit at fixed offsets, so keys and children are
//! addressable without scanning prior entries.
//!
//! Internal page (tag 0x00):
//!
//! | Offset | Size    | Field                                  |
//! |--------|---------|----------------------------------------|
//! | 0      | 1       | 0x00                                   |
//! | 1      | 2       | key count `k`                          |
//! | 3      | 8 * 255 | key slots (first `k` in use)           |
//! | 2043   | 8 * 256 | child page numbers (first `k+1` in use)|
//!
//! Leaf page (tag 0x01):
//!
//! | Offset | Size            | Field                               |
//! |--------|-----------------|-------------------------------------|
//! | 0      | 1               | 0x01                                |
//! | 1      | 8               | next-leaf page number (0 = none)    |
//! | 9      | 2               | key count `k`                       |
//! | 11     | 8 * (order - 1) | key slots                           |
//! | ...    | variable        | `k` value slots: u16 length + bytes |
//!
//! Bytes past the last value slot are undefined and ignored on decode.

use bytes::Bytes;

use silt_common::page::PageNum;
use silt_common::{Result, SiltError};

use super::constants::{
    INTERNAL_CHILDREN_OFFSET, INTERNAL_KEYS_OFFSET, INTERNAL_KEY_CAP, INTERNAL_ORDER,
    LEAF_KEYS_OFFSET,
};
use super::types::{Key, Value};

/// A decoded tree node, resident in the pager's cache.
#[derive(Debug, Clone)]
pub enum Node {
    /// Routing node: separator keys and child page numbers.
    Internal(InternalNode),
    /// Entry-bearing node, linked to its successor in key order.
    Leaf(LeafNode),
}

/// Internal node with `keys.len() + 1` children.
#[derive(Debug, Clone)]
pub struct InternalNode {
    /// Page this node occupies.
    pub page_num: PageNum,
    /// Separator keys in ascending order.
    pub keys: Vec<Key>,
    /// Child page numbers; `children[i]` routes keys below `keys[i]`.
    pub children: Vec<PageNum>,
}

/// Leaf node holding the store's entries.
#[derive(Debug, Clone)]
pub struct LeafNode {
    /// Page this node occupies.
    pub page_num: PageNum,
    /// Entry keys in ascending order.
    pub keys: Vec<Key>,
    /// Value bytes, parallel to `keys`.
    pub values: Vec<Value>,
    /// Next leaf in key order, 0 for the rightmost leaf.
    pub next: PageNum,
}

impl Node {
    /// Decodes a node from a raw page.
    ///
    /// `leaf_order` is the file's leaf order, which fixes the position of
    /// the leaf value area.
    pub fn decode(page_num: PageNum, buf: &[u8], leaf_order: usize) -> Result<Self> {
        match buf[0] {
            0x00 => Self::decode_internal(page_num, buf),
            0x01 => Self::decode_leaf(page_num, buf, leaf_order),
            tag => Err(SiltError::Format(format!(
                "page {page_num} has unknown node tag {tag:#04x}"
            ))),
        }
    }

    fn decode_internal(page_num: PageNum, buf: &[u8]) -> Result<Self> {
        let key_count = u16::from_be_bytes([buf[1], buf[2]]) as usize;
        if key_count > INTERNAL_KEY_CAP {
            return Err(SiltError::Format(format!(
                "internal page {page_num} claims {key_count} keys (max {INTERNAL_KEY_CAP})"
            )));
        }

        let mut keys = Vec::with_capacity(INTERNAL_KEY_CAP);
        let mut offset = INTERNAL_KEYS_OFFSET;
        for _ in 0..key_count {
            keys.push(Key::from_be_bytes(buf[offset..offset + 8].try_into().unwrap()));
            offset += 8;
        }

        let mut children = Vec::with_capacity(INTERNAL_ORDER);
        let mut offset = INTERNAL_CHILDREN_OFFSET;
        for _ in 0..key_count + 1 {
            children.push(PageNum::from_be_bytes(
                buf[offset..offset + 8].try_into().unwrap(),
            ));
            offset += 8;
        }

        Ok(Node::Internal(InternalNode {
            page_num,
            keys,
            children,
        }))
    }

    fn decode_leaf(page_num: PageNum, buf: &[u8], leaf_order: usize) -> Result<Self> {
        let next = PageNum::from_be_bytes(buf[1..9].try_into().unwrap());
        let key_count = u16::from_be_bytes([buf[9], buf[10]]) as usize;
        if key_count > leaf_order - 1 {
            return Err(SiltError::Format(format!(
                "leaf page {page_num} claims {key_count} keys (max {})",
                leaf_order - 1
            )));
        }

        let mut keys = Vec::with_capacity(leaf_order - 1);
        let mut offset = LEAF_KEYS_OFFSET;
        for _ in 0..key_count {
            keys.push(Key::from_be_bytes(buf[offset..offset + 8].try_into().unwrap()));
            offset += 8;
        }

        let mut values = Vec::with_capacity(leaf_order - 1);
        let mut offset = LEAF_KEYS_OFFSET + 8 * (leaf_order - 1);
        for _ in 0..key_count {
            if offset + 2 > buf.len() {
                return Err(SiltError::Format(format!(
                    "leaf page {page_num} value slot runs past the page end"
                )));
            }
            let len = u16::from_be_bytes([buf[offset], buf[offset + 1]]) as usize;
            offset += 2;
            if offset + len > buf.len() {
                return Err(SiltError::Format(format!(
                    "leaf page {page_num} value slot runs past the page end"
                )));
            }
            values.push(Bytes::copy_from_slice(&buf[offset..offset + len]));
            offset += len;
        }

        Ok(Node::Leaf(LeafNode {
            page_num,
            keys,
            values,
            next,
        }))
    }

    /// Encodes the node into a zeroed page buffer.
    pub fn encode(&self, buf: &mut [u8], leaf_order: usize) {
        match self {
            Node::Internal(node) => {
                debug_assert!(node.keys.len() <= INTERNAL_KEY_CAP);
                debug_assert_eq!(node.children.len(), node.keys.len() + 1);

                buf[0] = 0x00;
                buf[1..3].copy_from_slice(&(node.keys.len() as u16).to_be_bytes());

                let mut offset = INTERNAL_KEYS_OFFSET;
                for key in &node.keys {
                    buf[offset..offset + 8].copy_from_slice(&key.to_be_bytes());
                    offset += 8;
                }

                let mut offset = INTERNAL_CHILDREN_OFFSET;
                for child in &node.children {
                    buf[offset..offset + 8].copy_from_slice(&child.to_be_bytes());
                    offset += 8;
                }
            }
            Node::Leaf(node) => {
                debug_assert!(node.keys.len() <= leaf_order - 1);
                debug_assert_eq!(node.values.len(), node.keys.len());

                buf[0] = 0x01;
                buf[1..9].copy_from_slice(&node.next.to_be_bytes());
                buf[9..11].copy_from_slice(&(node.keys.len() as u16).to_be_bytes());

                let mut offset = LEAF_KEYS_OFFSET;
                for key in &node.keys {
                    buf[offset..offset + 8].copy_from_slice(&key.to_be_bytes());
                    offset += 8;
                }

                let mut offset = LEAF_KEYS_OFFSET + 8 * (leaf_order - 1);
                for value in &node.values {
                    buf[offset..offset + 2].copy_from_slice(&(value.len() as u16).to_be_bytes());
                    offset += 2;
                    buf[offset..offset + value.len()].copy_from_slice(value);
                    offset += value.len();
                }
            }
        }
    }

    /// Page this node occupies.
    pub fn page_num(&self) -> PageNum {
        match self {
            Node::Internal(n) => n.page_num,
            Node::Leaf(n) => n.page_num,
        }
    }

    /// True for leaf nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of keys currently held.
    pub fn key_count(&self) -> usize {
        match self {
            Node::Internal(n) => n.keys.len(),
            Node::Leaf(n) => n.keys.len(),
        }
    }

    /// Key capacity of this node's flavor; leaves depend on the file's
    /// leaf order.
    pub fn capacity(&self, leaf_order: usize) -> usize {
        match self {
            Node::Internal(_) => INTERNAL_KEY_CAP,
            Node::Leaf(_) => leaf_order - 1,
        }
    }

    /// True when a non-root node has fallen below half capacity and needs
    /// rebalancing.
    pub fn is_underflow(&self, leaf_order: usize) -> bool {
        self.key_count() < self.capacity(leaf_order) / 2
    }

    /// True when the node can give up a key to a sibling without itself
    /// underflowing.
    pub fn can_spare(&self, leaf_order: usize) -> bool {
        self.key_count() > self.capacity(leaf_order) / 2
    }

    /// Borrows the leaf variant. Panics on an internal node.
    pub fn as_leaf(&self) -> &LeafNode {
        match self {
            Node::Leaf(n) => n,
            Node::Internal(n) => panic!("page {} is not a leaf", n.page_num),
        }
    }

    /// Mutably borrows the leaf variant. Panics on an internal node.
    pub fn as_leaf_mut(&mut self) -> &mut LeafNode {
        match self {
            Node::Leaf(n) => n,
            Node::Internal(n) => panic!("page {} is not a leaf", n.page_num),
        }
    }

    /// Borrows the internal variant. Panics on a leaf.
    pub fn as_internal(&self) -> &InternalNode {
        match self {
            Node::Internal(n) => n,
            Node::Leaf(n) => panic!("page {} is not an internal node", n.page_num),
        }
    }

    /// Mutably borrows the internal variant. Panics on a leaf.
    pub fn as_internal_mut(&mut self) -> &mut InternalNode {
        match self {
            Node::Internal(n) => n,
            Node::Leaf(n) => panic!("page {} is not an internal node", n.page_num),
        }
    }
}
