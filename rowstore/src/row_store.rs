//! Owning compressed-sparse-row container
//!
//! A [`RowStore`] keeps every row in one flat buffer plus a `rows + 1`
//! offsets array. Rows are appended item by item and sealed with
//! [`RowStore::end_row`]; between an `add_row_item` and the next `end_row`
//! the trailing elements form an open row that is not yet counted.

use std::cmp::Ordering;
use std::ops::Range;

use rowstore_core::validation::{offset_for, validate_row_offsets};
use rowstore_core::{CoreError, HasIndex, RowAccess};

use crate::config::{AccessMode, StoreConfig};
use crate::error::{Error, Result};
use crate::row_view::{RowView, RowViewMut};
use crate::span::{Span, SpanMut};

/// Row-major sparse matrix that owns its elements
#[derive(Debug, Clone)]
pub struct RowStore<T> {
    pub(crate) offsets: Vec<u32>,
    pub(crate) flat: Vec<T>,
    pub(crate) access_mode: AccessMode,
}

impl<T> Default for RowStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RowStore<T> {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Create an empty store, reserving what `config` asks for
    ///
    /// Capacities are hints: a reservation that cannot be made is skipped.
    pub fn with_config(config: &StoreConfig) -> Self {
        let mut offsets = Vec::new();
        let _ = offsets.try_reserve(config.row_capacity.saturating_add(1));
        offsets.push(0);
        let mut flat = Vec::new();
        let _ = flat.try_reserve(config.element_capacity);
        Self {
            offsets,
            flat,
            access_mode: config.access_mode,
        }
    }

    /// Build a store from raw parts, validating the offsets invariant
    pub fn from_parts(offsets: Vec<u32>, flat: Vec<T>) -> Result<Self> {
        validate_row_offsets(&offsets, flat.len())?;
        let access_mode = AccessMode::default();
        Ok(Self::from_parts_unchecked(offsets, flat, access_mode))
    }

    pub(crate) fn from_parts_unchecked(
        offsets: Vec<u32>,
        flat: Vec<T>,
        access_mode: AccessMode,
    ) -> Self {
        Self {
            offsets,
            flat,
            access_mode,
        }
    }

    /// Split into the offsets array and the flat buffer
    pub fn into_parts(self) -> (Vec<u32>, Vec<T>) {
        (self.offsets, self.flat)
    }

    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    pub fn set_access_mode(&mut self, access_mode: AccessMode) {
        self.access_mode = access_mode;
    }

    /// Reserve room for `rows` more rows and `elements` more elements
    pub fn reserve(&mut self, rows: usize, elements: usize) {
        self.offsets.reserve(rows);
        self.flat.reserve(elements);
    }

    /// Remove every row, keeping capacity
    pub fn clear(&mut self) {
        self.offsets.clear();
        self.offsets.push(0);
        self.flat.clear();
    }

    /// Append an element to the open row
    pub fn add_row_item(&mut self, value: T) {
        self.flat.push(value);
    }

    /// Seal the open row; the next item starts a new row
    ///
    /// # Panics
    ///
    /// Panics if the store would hold more than `u32::MAX` elements.
    pub fn end_row(&mut self) {
        let end = self.flat.len();
        assert!(
            end <= u32::MAX as usize,
            "row store exceeds {} elements",
            u32::MAX
        );
        self.offsets.push(end as u32);
    }

    /// Append a complete row
    pub fn push_row<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.flat.extend(items);
        self.end_row();
    }

    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn element_count(&self) -> usize {
        self.flat.len()
    }

    /// Whether the store has no sealed rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn is_empty_row(&self, row: usize) -> bool {
        RowAccess::is_empty_row(self, row)
    }

    /// Number of elements appended since the last `end_row`
    pub fn open_row_len(&self) -> usize {
        self.flat.len() - self.sealed_len()
    }

    pub(crate) fn sealed_len(&self) -> usize {
        self.offsets.last().map_or(0, |&end| end as usize)
    }

    /// Flat position where `row` starts
    pub fn row_offset(&self, row: usize) -> usize {
        self.bounds(row).start
    }

    fn bounds(&self, row: usize) -> Range<usize> {
        if self.access_mode.is_checked() {
            let rows = self.row_count();
            assert!(row < rows, "{}", Error::RowOutOfRange { row, rows });
        }
        self.offsets[row] as usize..self.offsets[row + 1] as usize
    }

    fn checked_bounds(&self, row: usize) -> Result<Range<usize>> {
        let rows = self.row_count();
        RowAccess::row_range(self, row).ok_or(Error::RowOutOfRange { row, rows })
    }

    /// Elements of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> Span<'_, T> {
        Span::new(&self.flat[self.bounds(row)])
    }

    pub fn try_row(&self, row: usize) -> Result<Span<'_, T>> {
        let range = self.checked_bounds(row)?;
        Ok(Span::new(&self.flat[range]))
    }

    /// Mutable elements of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row_mut(&mut self, row: usize) -> SpanMut<'_, T> {
        let range = self.bounds(row);
        SpanMut::new(&mut self.flat[range])
    }

    pub fn try_row_mut(&mut self, row: usize) -> Result<SpanMut<'_, T>> {
        let range = self.checked_bounds(row)?;
        Ok(SpanMut::new(&mut self.flat[range]))
    }

    /// Iterate over the sealed rows in order
    pub fn rows(&self) -> impl Iterator<Item = Span<'_, T>> + '_ {
        (0..self.row_count()).map(move |row| self.row(row))
    }

    /// The whole buffer as one view, across all rows
    pub fn flat_data(&self) -> Span<'_, T> {
        Span::new(&self.flat)
    }

    pub fn flat_data_mut(&mut self) -> SpanMut<'_, T> {
        SpanMut::new(&mut self.flat)
    }

    /// Borrow the sealed rows as a read-only view
    pub fn view(&self) -> RowView<'_, T> {
        let sealed = self.sealed_len();
        RowView::from_trusted(&self.offsets, &self.flat[..sealed], self.access_mode)
    }

    /// Borrow the sealed rows as a view with editable elements
    pub fn view_mut(&mut self) -> RowViewMut<'_, T> {
        let sealed = self.sealed_len();
        RowViewMut::from_trusted(&self.offsets, &mut self.flat[..sealed], self.access_mode)
    }

    /// Sort every row independently by the elements' natural order
    ///
    /// Incomparable pairs (such as NaN payloads) keep their relative order.
    pub fn sort_columns(&mut self)
    where
        T: PartialOrd,
    {
        self.sort_columns_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    }

    /// Sort every row independently with `compare`
    pub fn sort_columns_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        for pair in self.offsets.windows(2) {
            let row = &mut self.flat[pair[0] as usize..pair[1] as usize];
            row.sort_by(&mut compare);
        }
    }

    /// Truncate every row to at most `limit` leading elements
    ///
    /// Compacts the buffer in a single forward pass. Elements of an open
    /// row are discarded.
    pub fn clip_rows(&mut self, limit: usize) {
        let mut head = 0;
        let mut tail = 0;
        for row in 0..self.row_count() {
            let end = self.offsets[row + 1] as usize;
            let keep = (end - head).min(limit);
            for _ in 0..keep {
                self.flat.swap(tail, head);
                tail += 1;
                head += 1;
            }
            head = end;
            self.offsets[row + 1] = tail as u32;
        }
        self.flat.truncate(tail);
    }

    /// Copy the row boundaries of `other` and fill every slot with `default`
    pub fn set_shape<U, R>(&mut self, other: &R, default: T)
    where
        R: RowAccess<U> + ?Sized,
        T: Clone,
    {
        self.offsets.clear();
        self.offsets.extend_from_slice(other.row_offsets());
        if self.offsets.is_empty() {
            self.offsets.push(0);
        }
        let len = self.sealed_len();
        self.flat.clear();
        self.flat.resize(len, default);
    }

    /// Reshape to `rows` rows of exactly `cols` elements filled with `default`
    pub fn set_fixed_shape(&mut self, rows: usize, cols: usize, default: T) -> Result<()>
    where
        T: Clone,
    {
        let total = rows.checked_mul(cols).ok_or(CoreError::ArraySizeOverflow)?;
        offset_for(total)?;

        self.offsets.clear();
        let offsets = (0..=rows).map(|row| (row * cols) as u32);
        self.offsets.extend(offsets);
        self.flat.clear();
        self.flat.resize(total, default);
        Ok(())
    }

    /// `1 + max(index)` over all elements, or 0 if none is assigned
    pub fn num_cols(&self) -> usize
    where
        T: HasIndex,
    {
        RowAccess::num_cols(self)
    }

    /// Overwrite `target` with a deep copy of this store
    pub fn copy_to(&self, target: &mut RowStore<T>)
    where
        T: Clone,
    {
        target.offsets.clone_from(&self.offsets);
        target.flat.clone_from(&self.flat);
    }

    /// Check the offsets invariant; fails while a row is open
    pub fn validate(&self) -> Result<()> {
        validate_row_offsets(&self.offsets, self.flat.len())?;
        Ok(())
    }
}

impl<T> RowAccess<T> for RowStore<T> {
    fn row_offsets(&self) -> &[u32] {
        &self.offsets
    }

    fn flat(&self) -> &[T] {
        &self.flat[..self.sealed_len()]
    }
}

/// Content equality: same row boundaries and same elements.
impl<T: PartialEq> PartialEq for RowStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offsets == other.offsets && self.flat == other.flat
    }
}

impl<T: Eq> Eq for RowStore<T> {}

impl<T> FromIterator<Vec<T>> for RowStore<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(rows: I) -> Self {
        let mut store = RowStore::new();
        for row in rows {
            store.push_row(row);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use rowstore_core::IndexedEntry;

    use super::*;

    fn sample() -> RowStore<i32> {
        [vec![3, 1, 2], vec![], vec![9, 8]].into_iter().collect()
    }

    fn assert_invariant<T>(store: &RowStore<T>) {
        let offsets = store.row_offsets();
        assert_eq!(offsets[0], 0);
        assert_eq!(*offsets.last().unwrap() as usize, store.element_count());
        assert!(offsets.windows(2).all(|p| p[0] <= p[1]));
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RowStore::<u8>::new();
        assert_eq!(store.row_count(), 0);
        assert!(store.is_empty());
        assert_eq!(store.row_offsets(), &[0]);
        assert!(store.validate().is_ok());
    }

    #[test]
    fn test_append_and_read_rows() {
        let mut store = RowStore::new();
        store.reserve(2, 4);
        store.add_row_item(1);
        store.add_row_item(2);
        assert_eq!(store.open_row_len(), 2);
        assert_eq!(store.row_count(), 0);
        assert!(store.validate().is_err());
        store.end_row();
        store.end_row();
        store.push_row([5]);

        assert_eq!(store.row_count(), 3);
        assert_eq!(&*store.row(0), &[1, 2]);
        assert!(store.is_empty_row(1));
        assert_eq!(&*store.row(2), &[5]);
        assert_eq!(store.row_offset(2), 2);
        assert_eq!(&*store.flat_data(), &[1, 2, 5]);
        assert_invariant(&store);
    }

    #[test]
    fn test_try_row_out_of_range() {
        let store = sample();
        assert!(store.try_row(2).is_ok());
        assert!(matches!(
            store.try_row(3),
            Err(Error::RowOutOfRange { row: 3, rows: 3 })
        ));
    }

    #[test]
    #[should_panic(expected = "row 7 out of range for 3 rows")]
    fn test_checked_row_panics_with_range_error() {
        let mut store = sample();
        store.set_access_mode(AccessMode::Checked);
        let _ = store.row(7);
    }

    #[test]
    fn test_row_mut_edits_in_place() {
        let mut store = sample();
        store.row_mut(2).fill(0);
        store.flat_data_mut()[0] = 7;
        assert_eq!(&*store.row(2), &[0, 0]);
        assert_eq!(store.row(0)[0], 7);
    }

    #[test]
    fn test_sort_columns_per_row() {
        let mut store = sample();
        store.sort_columns();
        let rows: Vec<Vec<i32>> = store.rows().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![1, 2, 3], vec![], vec![8, 9]]);
    }

    #[test]
    fn test_sort_columns_indexed_entries_by_value() {
        let mut store = RowStore::new();
        store.push_row([
            IndexedEntry::new(4, 0.5f32),
            IndexedEntry::new(1, 0.25),
            IndexedEntry::new(0, 0.5),
        ]);
        store.sort_columns();
        let indices: Vec<i32> = store.row(0).iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 0, 4]);
    }

    #[test]
    fn test_clip_rows_keeps_leading_elements() {
        let rows = vec![vec![1, 2, 3, 4], vec![5, 6, 7], vec![8, 9, 10, 11, 12]];
        let mut store: RowStore<i32> = rows.into_iter().collect();
        store.clip_rows(2);
        assert_eq!(store.element_count(), 3 * 2);
        let rows: Vec<Vec<i32>> = store.rows().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![1, 2], vec![5, 6], vec![8, 9]]);
        assert_invariant(&store);
    }

    #[test]
    fn test_clip_rows_short_rows_untouched() {
        let mut store = sample();
        store.clip_rows(2);
        let rows: Vec<Vec<i32>> = store.rows().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![3, 1], vec![], vec![9, 8]]);

        store.clip_rows(0);
        assert_eq!(store.row_count(), 3);
        assert_eq!(store.element_count(), 0);
        assert_invariant(&store);
    }

    #[test]
    fn test_set_shape_copies_boundaries() {
        let source = sample();
        let mut shaped: RowStore<f32> = RowStore::new();
        shaped.set_shape(&source, 1.5);
        assert_eq!(shaped.row_offsets(), source.row_offsets());
        assert_eq!(shaped.element_count(), 5);
        assert!(shaped.flat_data().iter().all(|&v| v == 1.5));
    }

    #[test]
    fn test_set_fixed_shape() {
        let mut store = RowStore::new();
        store.set_fixed_shape(3, 2, 0u8).unwrap();
        assert_eq!(store.row_offsets(), &[0, 2, 4, 6]);
        assert_eq!(store.row(1).len(), 2);
        assert!(store.set_fixed_shape(usize::MAX, 2, 0u8).is_err());
    }

    #[test]
    fn test_num_cols() {
        let mut store = RowStore::new();
        assert_eq!(store.num_cols(), 0);
        store.push_row([IndexedEntry::new(2, 0u8), IndexedEntry::new(-1, 0)]);
        store.push_row([IndexedEntry::new(6, 0u8)]);
        assert_eq!(store.num_cols(), 7);
    }

    #[test]
    fn test_copy_to_and_equality() {
        let store = sample();
        let mut other = RowStore::new();
        other.push_row([1]);
        store.copy_to(&mut other);
        assert_eq!(other, store);
        other.row_mut(0)[0] = 100;
        assert_ne!(other, store);
    }

    #[test]
    fn test_from_parts_validates() {
        assert!(RowStore::from_parts(vec![0, 1, 3], vec![1, 2, 3]).is_ok());
        assert!(matches!(
            RowStore::from_parts(vec![0, 4], vec![1, 2, 3]),
            Err(Error::Format(CoreError::InvalidOffsets))
        ));
    }

    #[test]
    fn test_open_row_excluded_from_access() {
        let mut store = sample();
        store.add_row_item(42);
        assert_eq!(RowAccess::flat(&store).len(), 5);
        assert_eq!(store.view().element_count(), 5);
        assert_eq!(store.flat_data().len(), 6);
    }

    #[test]
    fn test_oversized_capacity_hint_is_ignored() {
        let config = StoreConfig::default()
            .with_row_capacity(usize::MAX)
            .with_element_capacity(usize::MAX);
        let mut store = RowStore::with_config(&config);
        assert_eq!(store.row_offsets(), &[0]);
        store.push_row([1u64, 2]);
        assert_eq!(&*store.row(0), &[1, 2]);
    }

    #[test]
    fn test_clear_resets() {
        let mut store = sample();
        store.clear();
        assert_eq!(store.row_count(), 0);
        assert_eq!(store.element_count(), 0);
        assert_invariant(&store);
    }
}
