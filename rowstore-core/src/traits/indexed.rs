//! Elements that name a target row or column

use crate::format::constants::UNASSIGNED;

/// An element carrying an `index` that addresses another row or column.
///
/// `-1` means "no target" and is skipped by bucket-sort construction and by
/// remapping.
pub trait HasIndex {
    /// The target index, or `-1`
    fn index(&self) -> i32;

    /// A copy of `self` pointing at `index` instead
    fn with_index(&self, index: i32) -> Self
    where
        Self: Sized;

    /// Whether the element points at a target
    fn is_assigned(&self) -> bool {
        self.index() != UNASSIGNED
    }
}
