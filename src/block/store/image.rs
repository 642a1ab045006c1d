//! Whole-store images.
//!
//! An image is the raw contents of the usable blocks in ascending id order,
//! followed by the packed bitmap. There is no header.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use log::{debug, warn};
use zerocopy::IntoBytes;

use crate::{
    bitmap::Bitmap,
    block::{AVAIL_BLOCKS, BITMAP_SIZE, BLOCK_COUNT, IMAGE_SIZE, RESERVED_BLOCK, store::BlockStore},
    error::{Error, Result},
};

impl BlockStore {
    /// Writes the image of the store to a created or truncated file at `path`.
    /// Returns the number of bytes written.
    pub fn serialize(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();

        let mut image = Vec::new();
        image
            .try_reserve_exact(IMAGE_SIZE)
            .map_err(|_| Error::OutOfMemory)?;
        image.extend_from_slice(self.blocks[..AVAIL_BLOCKS].as_bytes());
        image.extend_from_slice(self.bitmap.as_bytes());

        let mut file = File::create(path)?;
        file.write_all(&image)?;

        debug!(
            "serialized {} blocks ({} used) to {}",
            AVAIL_BLOCKS,
            self.used_count(),
            path.display()
        );
        Ok(image.len())
    }

    /// Reads a store back from an image written by [`BlockStore::serialize`].
    ///
    /// Fails if the file is not exactly one image long, or if the image
    /// allocates the reserved slot.
    pub fn deserialize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .inspect_err(|err| warn!("failed to open image {}: {}", path.display(), err))?;
        let mut store = Self::new()?;

        let mut bitmap = [0u8; BITMAP_SIZE];
        file.read_exact(store.blocks[..AVAIL_BLOCKS].as_mut_bytes())
            .and_then(|()| file.read_exact(&mut bitmap))
            .inspect_err(|err| warn!("failed to read image {}: {}", path.display(), err))?;

        let mut tail = Vec::new();
        if file.take(1).read_to_end(&mut tail)? != 0 {
            warn!("image {} is longer than {} bytes", path.display(), IMAGE_SIZE);
            return Err(Error::Uninterpretable);
        }

        store.bitmap = Bitmap::from_bytes(BLOCK_COUNT, &bitmap).ok_or(Error::Uninterpretable)?;
        if store.bitmap.test(RESERVED_BLOCK) {
            warn!("image {} allocates the reserved block", path.display());
            return Err(Error::Uninterpretable);
        }

        debug!(
            "deserialized {} blocks ({} used) from {}",
            AVAIL_BLOCKS,
            store.used_count(),
            path.display()
        );
        Ok(store)
    }
}
