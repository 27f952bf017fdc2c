//! One sparse cell: a target index plus a payload

use core::cmp::Ordering;

use crate::format::constants::UNASSIGNED;
use crate::traits::HasIndex;

/// A payload addressed to a target row or column.
///
/// Orders primarily by `data` and breaks ties by `index`, so value-sorted
/// rows (nearest-neighbour lists, scored candidates) remain totally ordered.
/// An `index` of `-1` means the entry has no target.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedEntry<T> {
    /// Target row/column, or `-1`
    pub index: i32,
    /// Payload
    pub data: T,
}

impl<T> IndexedEntry<T> {
    /// Create an entry pointing at `index`
    pub const fn new(index: i32, data: T) -> Self {
        Self { index, data }
    }

    /// Create an entry with no target
    pub const fn unassigned(data: T) -> Self {
        Self {
            index: UNASSIGNED,
            data,
        }
    }

    pub const fn is_assigned(&self) -> bool {
        self.index != UNASSIGNED
    }
}

impl<T: Default> Default for IndexedEntry<T> {
    fn default() -> Self {
        Self::unassigned(T::default())
    }
}

impl<T: Clone> HasIndex for IndexedEntry<T> {
    #[inline]
    fn index(&self) -> i32 {
        self.index
    }

    #[inline]
    fn with_index(&self, index: i32) -> Self {
        Self {
            index,
            data: self.data.clone(),
        }
    }
}

impl<T: PartialOrd> PartialOrd for IndexedEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.data.partial_cmp(&other.data)? {
            Ordering::Equal => Some(self.index.cmp(&other.index)),
            ord => Some(ord),
        }
    }
}

impl<T: Ord> Ord for IndexedEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.data
            .cmp(&other.data)
            .then_with(|| self.index.cmp(&other.index))
    }
}

// SAFETY: `#[repr(C)]` with an `i32` followed by a 4-byte plain-old-data
// payload has no padding and every bit pattern is valid.
macro_rules! impl_pod_entry {
    ($($ty:ty),*) => { $(
        unsafe impl bytemuck::Zeroable for IndexedEntry<$ty> {}
        unsafe impl bytemuck::Pod for IndexedEntry<$ty> {}
    )* }
}

impl_pod_entry!(f32, i32, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_data_then_index() {
        let a = IndexedEntry::new(3, 1.0f32);
        let b = IndexedEntry::new(1, 2.0f32);
        let c = IndexedEntry::new(0, 1.0f32);

        assert!(a < b);
        assert!(c < a);
        assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));
        assert_eq!(
            IndexedEntry::new(0, f32::NAN).partial_cmp(&IndexedEntry::new(0, 1.0)),
            None
        );
    }

    #[test]
    fn test_total_order_for_ord_payloads() {
        let mut entries = [
            IndexedEntry::new(2, 5u32),
            IndexedEntry::new(1, 5),
            IndexedEntry::new(9, 1),
        ];
        entries.sort();
        let expected = [
            IndexedEntry::new(9, 1),
            IndexedEntry::new(1, 5),
            IndexedEntry::new(2, 5),
        ];
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_default_is_unassigned() {
        let entry = IndexedEntry::<f32>::default();
        assert_eq!(entry.index, UNASSIGNED);
        assert!(!entry.is_assigned());
        assert!(IndexedEntry::new(0, 0.0f32).is_assigned());
        let moved = IndexedEntry::new(0, 4u8).with_index(6);
        assert_eq!(moved, IndexedEntry::new(6, 4));
    }

    #[test]
    fn test_pod_layout() {
        assert_eq!(core::mem::size_of::<IndexedEntry<f32>>(), 8);
        let entry = IndexedEntry::new(1, 2u32);
        let bytes = bytemuck::bytes_of(&entry);
        assert_eq!(bytes.len(), 8);
    }
}
