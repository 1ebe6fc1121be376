//! Blocks: the unit of repetition analysis
//!
//! A stream is cut into fixed-size blocks, and each block is reduced to a
//! [`BlockId`], the unsigned big-endian integer its bytes spell.
//!
//! # Example
//!
//! ```
//! use blockfreq::block::{block_count, BlockReader};
//!
//! let data = vec![0u8; 20];
//! assert_eq!(block_count(data.len() as u64, 8), 3);
//!
//! let blocks: Vec<_> = BlockReader::new(&data[..], 8).collect();
//! assert_eq!(blocks.len(), 3);
//! ```

mod id;
mod reader;

pub use id::{BlockId, ParseBlockIdError};
pub use reader::{block_count, BlockReader};
