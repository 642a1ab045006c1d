use bitvec::prelude::*;

/// A fixed-length bit vector.
///
/// Bits are packed least-significant-first into bytes, which is also the
/// layout returned by [`Bitmap::as_bytes`] and accepted by
/// [`Bitmap::from_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    bits: BitBox<u8, Lsb0>,
}

impl Bitmap {
    /// Constructs a bitmap of `bit_count` clear bits.
    /// Returns `None` if `bit_count` is zero or the backing memory cannot be reserved.
    pub fn new(bit_count: usize) -> Option<Self> {
        if bit_count == 0 {
            return None;
        }
        let len = Self::byte_len(bit_count);
        let mut raw = Vec::new();
        raw.try_reserve_exact(len).ok()?;
        raw.resize(len, 0);
        Some(Self::from_raw(raw, bit_count))
    }

    /// Reconstructs a bitmap of `bit_count` bits from its packed bytes.
    /// Returns `None` if `bytes` is not exactly `ceil(bit_count / 8)` long.
    pub fn from_bytes(bit_count: usize, bytes: &[u8]) -> Option<Self> {
        if bit_count == 0 || bytes.len() != Self::byte_len(bit_count) {
            return None;
        }
        let mut raw = Vec::new();
        raw.try_reserve_exact(bytes.len()).ok()?;
        raw.extend_from_slice(bytes);
        Some(Self::from_raw(raw, bit_count))
    }

    fn from_raw(raw: Vec<u8>, bit_count: usize) -> Self {
        let mut bits = BitVec::<u8, Lsb0>::from_vec(raw);
        // Padding past `bit_count` is never addressable and must not leak into `as_bytes`.
        bits[bit_count..].fill(false);
        bits.truncate(bit_count);
        Self {
            bits: bits.into_boxed_bitslice(),
        }
    }

    /// Number of bytes needed to pack `bit_count` bits.
    pub const fn byte_len(bit_count: usize) -> usize {
        bit_count.div_ceil(8)
    }

    /// Packed bit storage.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Returns whether bit `index` is set. Out of range bits read as clear.
    pub fn test(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|bit| *bit)
    }

    /// Sets bit `index`. Does nothing if `index` is out of range.
    pub fn set(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    /// Clears bit `index`. Does nothing if `index` is out of range.
    pub fn reset(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, false);
        }
    }

    /// Returns the lowest index of a clear bit, or `None` if every bit is set.
    pub fn first_zero(&self) -> Option<usize> {
        self.bits.first_zero()
    }

    /// Returns the number of set bits.
    pub fn total_set(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }
}
