mod image;


use log::trace;

use crate::{
    bitmap::Bitmap,
    block::{AVAIL_BLOCKS, BLOCK_COUNT, BLOCK_SIZE, Block, BlockId, RESERVED_BLOCKS},
    error::{Error, Result},
};

/// An in-memory array of blocks with a bitmap of the allocated ones.
///
/// Bit `i` of the bitmap is set exactly when block `i` is allocated. The slot
/// at [`RESERVED_BLOCK`](crate::block::RESERVED_BLOCK) is never allocated.
/// Block contents are not touched by allocation or release.
pub struct BlockStore {
    bitmap: Bitmap,
    blocks: Box<[Block]>,
}

impl BlockStore {
    /// Constructs a store with every block free and zeroed.
    pub fn new() -> Result<Self> {
        let bitmap = Bitmap::new(BLOCK_COUNT).ok_or(Error::OutOfMemory)?;

        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(BLOCK_COUNT)
            .map_err(|_| Error::OutOfMemory)?;
        blocks.resize(BLOCK_COUNT, Block::default());

        Ok(Self {
            bitmap,
            blocks: blocks.into_boxed_slice(),
        })
    }

    /// Number of usable blocks in any store.
    pub const fn total_blocks() -> usize {
        AVAIL_BLOCKS
    }

    /// Allocates the lowest free block.
    pub fn allocate(&mut self) -> Result<BlockId> {
        let id = self
            .bitmap
            .first_zero()
            .filter(|&id| id < AVAIL_BLOCKS)
            .ok_or(Error::NoSpace)?;
        self.bitmap.set(id);
        trace!("allocated block {}", id);
        Ok(id)
    }

    /// Allocates block `id` specifically.
    /// Returns `false` without changes if `id` is not usable or already allocated.
    pub fn request(&mut self, id: BlockId) -> bool {
        if id >= AVAIL_BLOCKS || self.bitmap.test(id) {
            trace!("request for block {} refused", id);
            return false;
        }
        self.bitmap.set(id);
        trace!("granted block {}", id);
        true
    }

    /// Returns block `id` to the free pool. Free or unusable ids are ignored.
    pub fn release(&mut self, id: BlockId) {
        if self.is_allocated(id) {
            self.bitmap.reset(id);
            trace!("released block {}", id);
        }
    }

    /// Returns whether usable block `id` is allocated.
    pub fn is_allocated(&self, id: BlockId) -> bool {
        id < AVAIL_BLOCKS && self.bitmap.test(id)
    }

    pub fn used_count(&self) -> usize {
        self.bitmap.total_set()
    }

    pub fn free_count(&self) -> usize {
        self.bitmap.bit_count() - self.used_count() - RESERVED_BLOCKS
    }

    /// Copies block `id` into the start of `buf`, returning the number of bytes copied.
    /// Copies nothing if `id` is not usable or `buf` is shorter than a block.
    ///
    /// The allocation state of `id` is not checked.
    pub fn read(&self, id: BlockId, buf: &mut [u8]) -> usize {
        if id >= AVAIL_BLOCKS || buf.len() < BLOCK_SIZE {
            return 0;
        }
        buf[..BLOCK_SIZE].copy_from_slice(&self.blocks[id].data);
        BLOCK_SIZE
    }

    /// Copies the start of `buf` into block `id`, returning the number of bytes copied.
    /// Copies nothing if `id` is not usable or `buf` is shorter than a block.
    ///
    /// The allocation state of `id` is not checked.
    pub fn write(&mut self, id: BlockId, buf: &[u8]) -> usize {
        if id >= AVAIL_BLOCKS || buf.len() < BLOCK_SIZE {
            return 0;
        }
        self.blocks[id].data.copy_from_slice(&buf[..BLOCK_SIZE]);
        BLOCK_SIZE
    }
}

impl std::fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockStore")
            .field("used", &self.used_count())
            .field("free", &self.free_count())
            .finish_non_exhaustive()
    }
}
