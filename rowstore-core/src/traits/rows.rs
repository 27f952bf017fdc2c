//! Read-only row access shared by owning stores and borrowed views
//!
//! Both sides expose the same compressed-sparse-row layout: an offsets
//! array of length `rows + 1` and one flat element buffer. Row `i` is
//! `flat[offsets[i]..offsets[i + 1]]`.

use core::ops::Range;

use super::indexed::HasIndex;

/// Read-only capability over a compressed-sparse-row layout
pub trait RowAccess<T> {
    /// Row boundary offsets, `rows + 1` entries
    fn row_offsets(&self) -> &[u32];

    /// All elements of all rows, contiguous
    fn flat(&self) -> &[T];

    /// Number of sealed rows
    fn row_count(&self) -> usize {
        self.row_offsets().len().saturating_sub(1)
    }

    /// Number of elements across all rows
    fn element_count(&self) -> usize {
        self.flat().len()
    }

    /// Element range of `row` within the flat buffer
    ///
    /// Returns `None` if `row` is out of range.
    fn row_range(&self, row: usize) -> Option<Range<usize>> {
        if row >= self.row_count() {
            return None;
        }
        let offsets = self.row_offsets();
        Some(offsets[row] as usize..offsets[row + 1] as usize)
    }

    /// Elements of `row`, or `None` if `row` is out of range
    fn row_slice(&self, row: usize) -> Option<&[T]> {
        self.row_range(row).map(|range| &self.flat()[range])
    }

    /// Whether `row` holds no elements
    ///
    /// Rows past the end are reported empty.
    fn is_empty_row(&self, row: usize) -> bool {
        self.row_range(row).is_none_or(|range| range.is_empty())
    }

    /// `1 + max(index)` over all elements, or 0 when nothing is assigned
    fn num_cols(&self) -> usize
    where
        T: HasIndex,
    {
        let max = self.flat().iter().map(HasIndex::index).max().unwrap_or(-1);
        (max as i64 + 1).max(0) as usize
    }
}
