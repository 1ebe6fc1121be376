//! Fixed-size block source

use std::io::{self, ErrorKind, Read};

use super::BlockId;

/// Number of blocks a stream of `len` bytes splits into
///
/// The final short block counts as a block.
pub fn block_count(len: u64, block_bytes: usize) -> u64 {
    if block_bytes == 0 {
        return 0;
    }
    len.div_ceil(block_bytes as u64)
}

/// Iterator splitting a byte stream into fixed-size blocks
///
/// Every block is `block_bytes` long except possibly the last one, which is
/// yielded as long as it is non-empty.
///
/// # Example
///
/// ```
/// use blockfreq::block::{BlockId, BlockReader};
///
/// let data = [0u8, 0, 0, 1, 0, 2];
/// let blocks: Vec<BlockId> = BlockReader::new(&data[..], 4)
///     .collect::<std::io::Result<_>>()
///     .unwrap();
///
/// assert_eq!(blocks, [BlockId::from(1u64), BlockId::from(2u64)]);
/// ```
#[derive(Debug)]
pub struct BlockReader<R> {
    inner: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> BlockReader<R> {
    /// Wrap `inner`, reading `block_bytes` at a time
    ///
    /// # Panics
    ///
    /// Panics if `block_bytes` is 0
    pub fn new(inner: R, block_bytes: usize) -> Self {
        assert!(block_bytes > 0, "block_bytes must be positive");

        Self {
            inner,
            buf: vec![0u8; block_bytes],
            done: false,
        }
    }

    /// Fill the buffer as far as the stream allows, returning bytes read
    fn fill(&mut self) -> io::Result<usize> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for BlockReader<R> {
    type Item = io::Result<BlockId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.fill() {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(n) => {
                if n < self.buf.len() {
                    self.done = true;
                }
                Some(Ok(BlockId::from_be_bytes(&self.buf[..n])))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
