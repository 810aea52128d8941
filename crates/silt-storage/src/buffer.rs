//! Pooled scratch buffers for page encoding and decoding.

use parking_lot::Mutex;
use silt_common::page::PAGE_SIZE;

/// Process-wide pool of page-sized scratch buffers.
static POOL: Mutex<Vec<Box<[u8; PAGE_SIZE]>>> = Mutex::new(Vec::new());

/// A page-sized scratch buffer borrowed from the process-wide pool.
///
/// Dropping the guard returns the buffer to the pool. Buffers are zeroed
/// on acquisition, so a freshly acquired buffer encodes as a zero-padded
/// page.
pub struct PageBuf {
    buf: Option<Box<[u8; PAGE_SIZE]>>,
}

impl PageBuf {
    /// Takes a zeroed buffer from the pool, allocating if the pool is
    /// empty.
    pub fn acquire() -> Self {
        let buf = match POOL.lock().pop() {
            Some(mut buf) => {
                buf.fill(0);
                buf
            }
            None => Box::new([0u8; PAGE_SIZE]),
        };
        Self { buf: Some(buf) }
    }
}

impl std::ops::Deref for PageBuf {
    type Target = [u8; PAGE_SIZE];

    fn deref(&self) -> &Self::Target {
        self.buf.as_ref().unwrap()
    }
}

impl std::ops::DerefMut for PageBuf {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buf.as_mut().unwrap()
    }
}

impl Drop for PageBuf {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            POOL.lock().push(buf);
        }
    }
}
