use crate::bit_block::{smart_entry_size, BitBlock, Variant};
use crate::error::{Error, Result};
use crate::fixed_block::FixedBlock;
use crate::traits::Block;
use log::debug;
use std::fmt;
use std::mem;

/// The storage family an [`InflatableBlock`] chooses from: byte-aligned
/// fixed-width blocks or a packed [`BitBlock`] of any variant.
#[derive(Clone, PartialEq)]
pub enum Storage {
    Fixed8(FixedBlock<i8>),
    Fixed16(FixedBlock<i16>),
    Fixed32(FixedBlock<i32>),
    Fixed64(FixedBlock<i64>),
    Bits(BitBlock),
}

macro_rules! on_inner {
    ($storage:expr, $block:ident => $body:expr) => {
        match $storage {
            Storage::Fixed8($block) => $body,
            Storage::Fixed16($block) => $body,
            Storage::Fixed32($block) => $body,
            Storage::Fixed64($block) => $body,
            Storage::Bits($block) => $body,
        }
    };
}

impl Storage {
    pub fn bits_per_entry(&self) -> u32 {
        on_inner!(self, b => b.bits_per_entry())
    }
}

impl Block for Storage {
    #[inline]
    fn len(&self) -> usize {
        on_inner!(self, b => b.len())
    }

    #[inline]
    fn get(&self, index: usize) -> i64 {
        on_inner!(self, b => b.get(index))
    }

    #[inline]
    fn set(&mut self, index: usize, value: i64) -> Result<()> {
        on_inner!(self, b => b.set(index, value))
    }

    fn accommodate(&mut self, index: usize) {
        on_inner!(self, b => b.accommodate(index))
    }

    fn shrinkwrap(&mut self, room_pct: u32) {
        on_inner!(self, b => b.shrinkwrap(room_pct))
    }

    fn clear(&mut self) {
        on_inner!(self, b => b.clear())
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Bits(b) => b.fmt(f),
            other => write!(
                f,
                "FixedBlock[w{}, len {}]",
                other.bits_per_entry(),
                other.len()
            ),
        }
    }
}

/// Chooses a successor storage wide enough for `value`, pre-sized for
/// `capacity` entries.
pub type StorageFactory = fn(value: i64, capacity: usize) -> Storage;

/// Default factory: an `UnsignedOrNull` [`BitBlock`] at the next
/// space-neutral width while 32 bits or fewer suffice, then a 64-bit
/// [`FixedBlock`]. Keeps entry widths in the 1..=21 range while the stored
/// values are small, which is what makes tree child columns cheap.
pub fn bitwise_growth(value: i64, capacity: usize) -> Storage {
    match Variant::UnsignedOrNull.bits_required_for(value) {
        Some(bits) if bits <= 32 => Storage::Bits(BitBlock::with_capacity(
            smart_entry_size(bits),
            Variant::UnsignedOrNull,
            capacity,
        )),
        _ => Storage::Fixed64(FixedBlock::with_capacity(capacity)),
    }
}

/// Byte-aligned alternative: the narrowest of the four fixed widths whose
/// signed range holds `value`.
pub fn byte_aligned(value: i64, capacity: usize) -> Storage {
    if i8::try_from(value).is_ok() {
        Storage::Fixed8(FixedBlock::with_capacity(capacity))
    } else if i16::try_from(value).is_ok() {
        Storage::Fixed16(FixedBlock::with_capacity(capacity))
    } else if i32::try_from(value).is_ok() {
        Storage::Fixed32(FixedBlock::with_capacity(capacity))
    } else {
        Storage::Fixed64(FixedBlock::with_capacity(capacity))
    }
}

/// Adapter owning one [`Storage`] and replacing it with a wider one
/// whenever a `set` is rejected, so the external contract is total over
/// 64-bit values.
///
/// Inflation streams every existing entry into the successor block in
/// order, then writes the offending value; the old storage is dropped
/// once the swap completes. The factory must produce a block wide enough
/// for both, and a factory that does not is a fatal programmer error.
#[derive(Clone)]
pub struct InflatableBlock {
    inner: Storage,
    factory: StorageFactory,
}

impl InflatableBlock {
    pub fn new(capacity: usize) -> Self {
        Self::with_factory(capacity, bitwise_growth)
    }

    pub fn with_factory(capacity: usize, factory: StorageFactory) -> Self {
        InflatableBlock {
            inner: factory(0, capacity),
            factory,
        }
    }

    /// The current inner storage.
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.inner
    }

    fn inflate(&mut self, index: usize, value: i64) {
        let mut wider = (self.factory)(value, self.inner.len() + 1);
        for v in self.inner.entries() {
            if wider.add(v).is_err() {
                panic!("inflation factory produced {wider:?}, too narrow for existing value {v}");
            }
        }
        if wider.set(index, value).is_err() {
            panic!("inflation factory produced {wider:?}, too narrow for {value}");
        }
        debug!("inflated {:?} into {:?} to admit {}", self.inner, wider, value);
        self.inner = wider;
    }

    /// Re-narrow a bit-packed inner storage to the observed value range
    /// (see [`BitBlock::snug`]); fixed-width storage is shrinkwrapped.
    pub fn snug(&mut self, room_pct: u32) {
        let inner = mem::replace(&mut self.inner, Storage::Fixed64(FixedBlock::new()));
        self.inner = match inner {
            Storage::Bits(bits) => Storage::Bits(bits.snug(room_pct)),
            mut fixed => {
                fixed.shrinkwrap(room_pct);
                fixed
            }
        };
    }
}

impl Block for InflatableBlock {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    fn get(&self, index: usize) -> i64 {
        self.inner.get(index)
    }

    /// Never rejects a value; an out-of-range set triggers inflation.
    fn set(&mut self, index: usize, value: i64) -> Result<()> {
        match self.inner.set(index, value) {
            Err(Error::ValueBeyondLimit(_)) => {
                self.inflate(index, value);
                Ok(())
            }
            result => result,
        }
    }

    fn accommodate(&mut self, index: usize) {
        self.inner.accommodate(index)
    }

    fn shrinkwrap(&mut self, room_pct: u32) {
        self.inner.shrinkwrap(room_pct)
    }

    fn clear(&mut self) {
        self.inner.clear()
    }
}

impl fmt::Debug for InflatableBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InflatableBlock[{:?}]", self.inner)
    }
}

#[cfg(test)]
mod tests;
