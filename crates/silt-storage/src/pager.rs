//! Pager: page-level file I/O, node cache, and page allocation.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use silt_common::config::{StoreConfig, MAX_VALUE_LEN};
use silt_common::page::{PageNum, PAGE_SIZE};
use silt_common::{Result, SiltError};

use crate::btree::constants::{INTERNAL_KEY_CAP, INTERNAL_ORDER};
use crate::btree::node::{InternalNode, LeafNode, Node};
use crate::buffer::PageBuf;
use crate::meta::Meta;

/// Owns a store file and the decoded nodes resident in memory.
///
/// Pages are read lazily and cached without bound; a page leaves the
/// cache only when it is freed. Mutations touch the resident nodes only;
/// nothing reaches the file until [`Pager::flush_all`].
#[derive(Debug)]
pub struct Pager {
    file: File,
    meta: Meta,
    /// Count of tree pages; the file holds `num_page + 1` pages including
    /// the meta page.
    num_page: i64,
    /// Resident set: decoded nodes by page number.
    pages: HashMap<PageNum, Node>,
    sync_on_flush: bool,
}

impl Pager {
    /// Creates a fresh store file holding a single meta page (empty tree,
    /// empty free list). Truncates any existing file at `path`.
    pub fn create(path: impl AsRef<Path>, config: &StoreConfig) -> Result<()> {
        config.validate()?;

        let mut file = File::create(path)?;
        let meta = Meta::new(config.value_max_len);
        let mut buf = PageBuf::acquire();
        meta.encode(&mut buf[..]);
        file.write_all(&buf[..])?;
        if config.sync_on_flush {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Opens an existing store file.
    ///
    /// The file length must be a positive multiple of the page size. The
    /// config supplies runtime behavior only; the value-length bound comes
    /// from the persisted meta record.
    pub fn load(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let file_len = file.metadata()?.len();
        if file_len == 0 {
            return Err(SiltError::format("empty file"));
        }
        if file_len % PAGE_SIZE as u64 != 0 {
            return Err(SiltError::Format(format!(
                "file length {file_len} is not a multiple of {PAGE_SIZE}"
            )));
        }

        let mut buf = PageBuf::acquire();
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut buf[..])?;
        let meta = Meta::decode(&buf[..])?;
        if meta.value_max_len() > MAX_VALUE_LEN {
            return Err(SiltError::Format(format!(
                "stored value_max_len {} exceeds {MAX_VALUE_LEN}",
                meta.value_max_len()
            )));
        }

        Ok(Self {
            file,
            meta,
            num_page: (file_len / PAGE_SIZE as u64) as i64 - 1,
            pages: HashMap::new(),
            sync_on_flush: config.sync_on_flush,
        })
    }

    /// Ensures the page is resident, reading and decoding it on a miss.
    pub fn load_page(&mut self, page_num: PageNum) -> Result<()> {
        if self.pages.contains_key(&page_num) {
            return Ok(());
        }
        if page_num.get() < 1 || page_num.get() > self.num_page {
            return Err(SiltError::Format(format!(
                "page number {page_num} out of range (file has {} tree pages)",
                self.num_page
            )));
        }

        let mut buf = PageBuf::acquire();
        self.file.seek(SeekFrom::Start(page_num.offset()))?;
        self.file.read_exact(&mut buf[..]).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                SiltError::Format(format!("partial page read at page {page_num}"))
            } else {
                SiltError::Io(e)
            }
        })?;

        let node = Node::decode(page_num, &buf[..], self.meta.leaf_order())?;
        self.pages.insert(page_num, node);
        Ok(())
    }

    /// Fetches a page, loading it if needed. Repeated calls with the same
    /// page number return the same mutable node.
    pub fn get_page(&mut self, page_num: PageNum) -> Result<&mut Node> {
        self.load_page(page_num)?;
        Ok(self.node_mut(page_num))
    }

    /// Borrows a resident node. Panics if the page was never loaded;
    /// callers must go through [`Pager::load_page`] first.
    pub fn node(&self, page_num: PageNum) -> &Node {
        self.pages
            .get(&page_num)
            .unwrap_or_else(|| panic!("page {page_num} is not resident"))
    }

    /// Mutably borrows a resident node. Panics if the page was never
    /// loaded.
    pub fn node_mut(&mut self, page_num: PageNum) -> &mut Node {
        self.pages
            .get_mut(&page_num)
            .unwrap_or_else(|| panic!("page {page_num} is not resident"))
    }

    /// Allocates a page and makes an empty leaf node resident on it.
    pub fn new_leaf_node(&mut self) -> PageNum {
        let page_num = self.alloc_page_num();
        let cap = self.leaf_order() - 1;
        self.pages.insert(
            page_num,
            Node::Leaf(LeafNode {
                page_num,
                keys: Vec::with_capacity(cap),
                values: Vec::with_capacity(cap),
                next: PageNum::NULL,
            }),
        );
        page_num
    }

    /// Allocates a page and makes an empty internal node resident on it.
    pub fn new_internal_node(&mut self) -> PageNum {
        let page_num = self.alloc_page_num();
        self.pages.insert(
            page_num,
            Node::Internal(InternalNode {
                page_num,
                keys: Vec::with_capacity(INTERNAL_KEY_CAP),
                children: Vec::with_capacity(INTERNAL_ORDER),
            }),
        );
        page_num
    }

    /// Reuses the oldest freed page number, or extends the file by one
    /// page.
    fn alloc_page_num(&mut self) -> PageNum {
        match self.meta.allocate() {
            Some(n) => n,
            None => {
                self.num_page += 1;
                PageNum::new(self.num_page)
            }
        }
    }

    /// Drops a node from the resident set, records its page as free, and
    /// immediately rewrites the meta page.
    pub fn free_page(&mut self, page_num: PageNum) -> Result<()> {
        self.pages.remove(&page_num);
        self.meta.release(page_num);
        self.write_meta()
    }

    /// Writes the meta record, then re-encodes and writes every resident
    /// node. This is the only durability primitive: callers must invoke
    /// it before orderly shutdown or lose every mutation since `load`.
    pub fn flush_all(&mut self) -> Result<()> {
        self.write_meta()?;

        // Freed-then-never-written trailing pages would otherwise leave
        // the file short of its accounted length.
        self.file
            .set_len((self.num_page as u64 + 1) * PAGE_SIZE as u64)?;

        let mut buf = PageBuf::acquire();
        for (page_num, node) in &self.pages {
            buf.fill(0);
            node.encode(&mut buf[..], self.meta.leaf_order());
            self.file.seek(SeekFrom::Start(page_num.offset()))?;
            self.file.write_all(&buf[..])?;
        }

        if self.sync_on_flush {
            self.file.sync_all()?;
        }
        Ok(())
    }

    fn write_meta(&mut self) -> Result<()> {
        let mut buf = PageBuf::acquire();
        self.meta.encode(&mut buf[..]);
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&buf[..])?;
        Ok(())
    }

    /// Root page number, 0 for an empty tree.
    pub fn root(&self) -> PageNum {
        self.meta.root()
    }

    /// Updates the in-memory root; persisted at the next flush.
    pub fn set_root(&mut self, root: PageNum) {
        self.meta.set_root(root);
    }

    /// Declared maximum value length.
    pub fn value_max_len(&self) -> u16 {
        self.meta.value_max_len()
    }

    /// Leaf order of this file; a leaf holds up to `leaf_order() - 1`
    /// entries.
    pub fn leaf_order(&self) -> usize {
        self.meta.leaf_order()
    }

    /// Number of tree pages the file accounts for.
    pub fn num_pages(&self) -> i64 {
        self.num_page
    }

    /// Freed page numbers awaiting reuse, oldest first.
    pub fn free_page_list(&self) -> Vec<PageNum> {
        self.meta.free_page_nums().collect()
    }

    /// True if the page is in the resident set.
    pub fn is_resident(&self, page_num: PageNum) -> bool {
        self.pages.contains_key(&page_num)
    }

    /// Page numbers of every resident node.
    pub fn resident_pages(&self) -> impl Iterator<Item = PageNum> + '_ {
        self.pages.keys().copied()
    }
}
