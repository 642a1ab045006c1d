pub mod store;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::bitmap::Bitmap;

/// An identifier of a block, its index in the store.
pub type BlockId = usize;

/// Block size in bytes.
pub const BLOCK_SIZE: usize = 256;

/// Number of blocks tracked by the bitmap, including reserved ones.
pub const BLOCK_COUNT: usize = 256;

/// Number of bitmap slots that are never handed out.
/// They stand in for the bitmap's own footprint in the store.
pub const RESERVED_BLOCKS: usize = 1;

/// Number of blocks that can be allocated, read and written.
pub const AVAIL_BLOCKS: usize = BLOCK_COUNT - RESERVED_BLOCKS;

/// The reserved sentinel slot, directly past the usable range.
pub const RESERVED_BLOCK: BlockId = AVAIL_BLOCKS;

/// Size of the packed bitmap in bytes.
pub const BITMAP_SIZE: usize = Bitmap::byte_len(BLOCK_COUNT);

/// Size of a serialized store image in bytes.
pub const IMAGE_SIZE: usize = AVAIL_BLOCKS * BLOCK_SIZE + BITMAP_SIZE;

/// Fixed-sized byte sequence.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[derive(FromBytes, IntoBytes, Immutable, Unaligned, KnownLayout)]
pub struct Block {
    pub data: [u8; BLOCK_SIZE],
}

impl Block {
    /// Constructs a `Block` filled with `byte`.
    pub fn filled(byte: u8) -> Self {
        Self {
            data: [byte; BLOCK_SIZE],
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block([u8; {}])", BLOCK_SIZE)
    }
}
