//! A fixed-size block store: a flat array of uniformly sized blocks with a
//! bitmap tracking which of them are allocated.

pub mod bitmap;
pub mod block;
pub mod error;

pub use bitmap::Bitmap;
pub use block::{AVAIL_BLOCKS, BLOCK_SIZE, Block, BlockId, store::BlockStore};
pub use error::{Error, Result};
