/// Primitive storage word of a [`FixedBlock`](crate::FixedBlock). Sensible
/// widths are the byte-aligned signed integers, 8 through 64 bits.
pub trait Word: Copy + Default + 'static {
    const BITS: u32;

    /// Checked narrowing; `None` when `value` is outside the signed
    /// `Self::BITS`-bit range.
    fn narrow(value: i64) -> Option<Self>;

    /// Widening back to the block interface type.
    fn widen(self) -> i64;
}

impl Word for i8 {
    const BITS: u32 = 8;

    #[inline]
    fn narrow(value: i64) -> Option<Self> {
        i8::try_from(value).ok()
    }

    #[inline]
    fn widen(self) -> i64 {
        self as i64
    }
}

impl Word for i16 {
    const BITS: u32 = 16;

    #[inline]
    fn narrow(value: i64) -> Option<Self> {
        i16::try_from(value).ok()
    }

    #[inline]
    fn widen(self) -> i64 {
        self as i64
    }
}

impl Word for i32 {
    const BITS: u32 = 32;

    #[inline]
    fn narrow(value: i64) -> Option<Self> {
        i32::try_from(value).ok()
    }

    #[inline]
    fn widen(self) -> i64 {
        self as i64
    }
}

impl Word for i64 {
    const BITS: u32 = 64;

    #[inline]
    fn narrow(value: i64) -> Option<Self> {
        Some(value)
    }

    #[inline]
    fn widen(self) -> i64 {
        self
    }
}
