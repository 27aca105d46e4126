use crate::fixed_block::FixedBlock;
use crate::traits::Block;

/// Interpretation of the `k` bits of a [`BitBlock`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Legal range `[0, 2^k - 1]`.
    Unsigned,
    /// Two's-complement, legal range `[-2^(k-1), 2^(k-1) - 1]`.
    Signed,
    /// Legal range `[-1, 2^k - 2]`; the all-ones pattern encodes -1, which
    /// makes it the natural store for child indexes with a null sentinel.
    UnsignedOrNull,
}

impl Variant {
    /// Encode `value` into the low `width` bits. `value` must be valid for
    /// this variant at `width`.
    #[inline]
    pub fn bits_for_value(self, width: u32, value: i64) -> u64 {
        let mask = entry_mask(width);
        match self {
            Variant::Unsigned => value as u64,
            Variant::Signed => value as u64 & mask,
            Variant::UnsignedOrNull => {
                if value == -1 {
                    mask
                } else {
                    value as u64
                }
            }
        }
    }

    /// Decode the low `width` bits back into a value.
    #[inline]
    pub fn value_for_bits(self, width: u32, bits: u64) -> i64 {
        let mask = entry_mask(width);
        match self {
            Variant::Unsigned => bits as i64,
            Variant::Signed => ((bits << (64 - width)) as i64) >> (64 - width),
            Variant::UnsignedOrNull => {
                if bits == mask {
                    -1
                } else {
                    bits as i64
                }
            }
        }
    }

    /// Whether `value` is in this variant's legal range at `width`.
    #[inline]
    pub fn is_valid(self, width: u32, value: i64) -> bool {
        let mask = entry_mask(width);
        match self {
            // A negative value has high bits set and fails the mask test.
            Variant::Unsigned => value as u64 & !mask == 0,
            Variant::Signed => ((value << (64 - width)) >> (64 - width)) == value,
            Variant::UnsignedOrNull => value == -1 || (value >= 0 && (value as u64) < mask),
        }
    }

    /// Narrowest entry width able to hold `value` under this
    /// interpretation, unclamped (zero is possible for `0` resp. `-1`).
    /// `None` when no width up to 64 bits can hold it.
    pub fn bits_required_for(self, value: i64) -> Option<u32> {
        match self {
            Variant::Unsigned => {
                if value < 0 {
                    None
                } else {
                    Some(64 - (value as u64).leading_zeros())
                }
            }
            Variant::Signed => {
                let magnitude = if value >= 0 { value } else { !value };
                Some(1 + (64 - (magnitude as u64).leading_zeros()))
            }
            // The wrap of +1 at value = -1 (to 0, needing 0 bits) is
            // intentional; the sentinel fits any width.
            Variant::UnsignedOrNull => Variant::Unsigned.bits_required_for(value.wrapping_add(1)),
        }
    }

    /// Width needed for every value in `[min, max]`, at least 1 bit.
    /// `None` when the range is outside this variant's domain.
    fn width_for_range(self, min: i64, max: i64) -> Option<u32> {
        let bits = match self {
            Variant::Unsigned => {
                if min < 0 {
                    return None;
                }
                self.bits_required_for(max)?
            }
            Variant::Signed => self
                .bits_required_for(min)?
                .max(self.bits_required_for(max)?),
            Variant::UnsignedOrNull => {
                if min < -1 {
                    return None;
                }
                self.bits_required_for(max)?
            }
        };
        Some(bits.max(1))
    }
}

#[inline]
fn entry_mask(width: u32) -> u64 {
    (1 << width) - 1
}

/// Snap `min_bits` up to the next width that divides a 64-bit container
/// without wasting additional space: `64 / (64 / min_bits)`. The realized
/// widths are 1..=10, 12, 16, 21 and 32.
pub fn smart_entry_size(min_bits: u32) -> u32 {
    let bits = min_bits.clamp(1, 64);
    64 / (64 / bits)
}

/// Growable sequence of entries of arbitrary width 1..=32 bits, packed
/// into 64-bit containers held in a [`FixedBlock<i64>`].
///
/// Each container holds `64 / k` entries (integer division; for widths
/// that do not divide 64 the remainder bits per container are wasted, by
/// design). Entry `i` occupies `k` bits of container `i / epc` starting at
/// bit `(i % epc) * k`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitBlock {
    containers: FixedBlock<i64>,
    width: u32,
    variant: Variant,
    len: usize,
}

impl BitBlock {
    // CONSTRUCTORS

    /// # Panics
    /// If `width` is outside `1..=32`.
    pub fn new(width: u32, variant: Variant) -> Self {
        Self::with_capacity(width, variant, 0)
    }

    /// # Panics
    /// If `width` is outside `1..=32`.
    pub fn with_capacity(width: u32, variant: Variant, capacity: usize) -> Self {
        assert!(
            (1..=32).contains(&width),
            "entry width {width} outside 1..=32"
        );
        let epc = (64 / width) as usize;
        BitBlock {
            containers: FixedBlock::with_capacity((capacity + epc - 1) / epc),
            width,
            variant,
            len: 0,
        }
    }

    // SHAPE

    #[inline]
    pub fn bits_per_entry(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub(crate) fn entries_per_container(&self) -> usize {
        (64 / self.width) as usize
    }

    // SNUG

    /// Replace this block with the narrowest variant-and-width combination
    /// that still holds its contents, then shrinkwrap it.
    ///
    /// One pass computes the observed min and max; each variant's required
    /// width follows from those (variants whose domain cannot cover the
    /// range, or which would need more than 32 bits, are out). Fewest bits
    /// wins; ties prefer `UnsignedOrNull`, then `Unsigned`, then `Signed`.
    /// When the winner matches the current shape, or the block is empty,
    /// the block is returned unchanged.
    pub fn snug(self, room_pct: u32) -> BitBlock {
        if self.is_empty() {
            return self;
        }
        let mut min = i64::MAX;
        let mut max = i64::MIN;
        for v in self.entries() {
            min = min.min(v);
            max = max.max(v);
        }
        let mut choice = (self.width, self.variant);
        let mut fewest = u32::MAX;
        for variant in [Variant::UnsignedOrNull, Variant::Unsigned, Variant::Signed] {
            if let Some(width) = variant.width_for_range(min, max) {
                if width <= 32 && width < fewest {
                    fewest = width;
                    choice = (width, variant);
                }
            }
        }
        if choice == (self.width, self.variant) {
            return self;
        }
        let (width, variant) = choice;
        let mut snugged = BitBlock::with_capacity(width, variant, self.len);
        for v in self.entries() {
            snugged
                .add(v)
                .expect("snug target must hold every existing entry");
        }
        snugged.shrinkwrap(room_pct);
        snugged
    }
}

mod trait_impls;
