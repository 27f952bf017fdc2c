//! Element type constraints for serialized row stores
//!
//! This module defines the trait that constrains what types can be
//! written into a block with a fixed per-element width.

use crate::IndexedEntry;

/// Trait for types with a fixed little-endian binary encoding
///
/// Implementors must write and read exactly [`FixedElement::WIDTH`] bytes.
/// Both methods expect a buffer of at least `WIDTH` bytes; callers slice
/// payloads with `chunks_exact(WIDTH)` so this always holds.
pub trait FixedElement: Copy + Sized {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write `self` into the first `WIDTH` bytes of `out`
    fn write_le(&self, out: &mut [u8]);

    /// Read a value from the first `WIDTH` bytes of `bytes`
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_element {
    ($($ty:ty),*) => { $(
        impl FixedElement for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn write_le(&self, out: &mut [u8]) {
                out[..Self::WIDTH].copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::WIDTH]);
                <$ty>::from_le_bytes(raw)
            }
        }
    )* }
}

impl_fixed_element!(u8, u16, u32, u64, u128);
impl_fixed_element!(i8, i16, i32, i64, i128);
impl_fixed_element!(f32, f64);

// Index first, then payload, with no padding between them.
impl<T: FixedElement> FixedElement for IndexedEntry<T> {
    const WIDTH: usize = 4 + T::WIDTH;

    #[inline]
    fn write_le(&self, out: &mut [u8]) {
        self.index.write_le(&mut out[..4]);
        self.data.write_le(&mut out[4..Self::WIDTH]);
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        IndexedEntry {
            index: i32::read_le(&bytes[..4]),
            data: T::read_le(&bytes[4..Self::WIDTH]),
        }
    }
}
