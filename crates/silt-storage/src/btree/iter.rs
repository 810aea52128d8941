//! Forward iteration over the leaf chain.

use silt_common::page::PageNum;
use silt_common::{Result, SiltError};

use crate::pager::Pager;

use super::node::Node;
use super::types::Entry;

/// Cursor over the leaf chain, yielding entries in ascending key order.
///
/// Yields `Result<Entry>` because advancing to the next leaf may read
/// from disk. Any error exhausts the iterator.
pub struct Iter<'a> {
    pager: &'a mut Pager,
    leaf: PageNum,
    offset: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(pager: &'a mut Pager, start: PageNum) -> Self {
        Self {
            pager,
            leaf: start,
            offset: 0,
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.leaf.is_null() {
                return None;
            }
            if let Err(e) = self.pager.load_page(self.leaf) {
                self.leaf = PageNum::NULL;
                return Some(Err(e));
            }
            let leaf = match self.pager.node(self.leaf) {
                Node::Leaf(leaf) => leaf,
                Node::Internal(_) => {
                    let page = self.leaf;
                    self.leaf = PageNum::NULL;
                    return Some(Err(SiltError::Format(format!(
                        "leaf chain reaches internal page {page}"
                    ))));
                }
            };
            if self.offset < leaf.keys.len() {
                let entry = Entry::new(leaf.keys[self.offset], leaf.values[self.offset].clone());
                self.offset += 1;
                return Some(Ok(entry));
            }
            self.leaf = leaf.next;
            self.offset = 0;
        }
    }
}
