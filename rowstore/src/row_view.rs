//! Borrowed row views over externally owned buffers
//!
//! A view never owns its offsets or elements. It lets callers wrap buffers
//! that live elsewhere, such as a memory-mapped file or a block handed over
//! by foreign code, and read them with the same row semantics as a
//! [`RowStore`].

use bytemuck::{cast_slice, try_cast_slice, try_cast_slice_mut, Pod, PodCastError};
use rowstore_core::validation::{validate_row_offsets, validate_typed_slice};
use rowstore_core::{CoreError, HasIndex, RowAccess};

use crate::config::AccessMode;
use crate::error::{Error, Result};
use crate::row_store::RowStore;
use crate::span::{Span, SpanMut};

fn row_bounds(offsets: &[u32], row: usize, access_mode: AccessMode) -> std::ops::Range<usize> {
    if access_mode.is_checked() {
        let rows = offsets.len().saturating_sub(1);
        assert!(row < rows, "{}", Error::RowOutOfRange { row, rows });
    }
    offsets[row] as usize..offsets[row + 1] as usize
}

/// Read-only view over borrowed offsets and elements
#[derive(Debug)]
pub struct RowView<'a, T> {
    offsets: &'a [u32],
    flat: &'a [T],
    access_mode: AccessMode,
}

impl<T> Clone for RowView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RowView<'_, T> {}

impl<'a, T> RowView<'a, T> {
    /// Wrap `offsets` and `flat`, checking the offsets invariant
    pub fn new(offsets: &'a [u32], flat: &'a [T]) -> Result<Self> {
        validate_row_offsets(offsets, flat.len())?;
        Ok(Self::from_trusted(offsets, flat, AccessMode::default()))
    }

    pub(crate) fn from_trusted(offsets: &'a [u32], flat: &'a [T], access_mode: AccessMode) -> Self {
        Self {
            offsets,
            flat,
            access_mode,
        }
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn element_count(&self) -> usize {
        self.flat.len()
    }

    /// Elements of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> Span<'a, T> {
        let flat: &'a [T] = self.flat;
        Span::new(&flat[row_bounds(self.offsets, row, self.access_mode)])
    }

    pub fn try_row(&self, row: usize) -> Result<Span<'a, T>> {
        let flat: &'a [T] = self.flat;
        let rows = self.row_count();
        let range = self
            .row_range(row)
            .ok_or(Error::RowOutOfRange { row, rows })?;
        Ok(Span::new(&flat[range]))
    }

    pub fn is_empty_row(&self, row: usize) -> bool {
        RowAccess::is_empty_row(self, row)
    }

    pub fn rows(&self) -> impl Iterator<Item = Span<'a, T>> + 'a {
        let view = *self;
        (0..self.row_count()).map(move |row| view.row(row))
    }

    pub fn flat_data(&self) -> Span<'a, T> {
        Span::new(self.flat)
    }

    pub fn num_cols(&self) -> usize
    where
        T: HasIndex,
    {
        RowAccess::num_cols(self)
    }

    /// Overwrite `target` with an owned copy of the viewed rows
    pub fn copy_to(&self, target: &mut RowStore<T>)
    where
        T: Clone,
    {
        target.offsets.clear();
        target.offsets.extend_from_slice(self.offsets);
        target.flat.clear();
        target.flat.extend_from_slice(self.flat);
    }

    /// Owned copy of the viewed rows
    pub fn to_store(&self) -> RowStore<T>
    where
        T: Clone,
    {
        RowStore::from_parts_unchecked(self.offsets.to_vec(), self.flat.to_vec(), self.access_mode)
    }
}

fn cast_error(err: PodCastError) -> Error {
    let err = match err {
        PodCastError::TargetAlignmentGreaterAndInputNotAligned => CoreError::MisalignedBuffer,
        _ => CoreError::CorruptedData,
    };
    err.into()
}

impl<'a, T: Pod> RowView<'a, T> {
    /// Reinterpret native-endian byte blocks as a view without copying
    ///
    /// `offset_bytes` must hold `rows + 1` `u32` values and `flat_bytes`
    /// whole elements, both suitably aligned.
    pub fn from_bytes(offset_bytes: &'a [u8], flat_bytes: &'a [u8]) -> Result<Self> {
        validate_typed_slice::<u32>(offset_bytes)?;
        validate_typed_slice::<T>(flat_bytes)?;
        let offsets: &'a [u32] = try_cast_slice(offset_bytes).map_err(cast_error)?;
        let flat: &'a [T] = try_cast_slice(flat_bytes).map_err(cast_error)?;
        Self::new(offsets, flat)
    }

    /// The offsets and element buffers as raw native-endian bytes
    pub fn byte_blocks(&self) -> (&'a [u8], &'a [u8]) {
        (cast_slice(self.offsets), cast_slice(self.flat))
    }
}

impl<T> RowAccess<T> for RowView<'_, T> {
    fn row_offsets(&self) -> &[u32] {
        self.offsets
    }

    fn flat(&self) -> &[T] {
        self.flat
    }
}

/// View over borrowed offsets with editable elements
///
/// Row boundaries are fixed; only element values can change.
#[derive(Debug)]
pub struct RowViewMut<'a, T> {
    offsets: &'a [u32],
    flat: &'a mut [T],
    access_mode: AccessMode,
}

impl<'a, T> RowViewMut<'a, T> {
    pub fn new(offsets: &'a [u32], flat: &'a mut [T]) -> Result<Self> {
        validate_row_offsets(offsets, flat.len())?;
        Ok(Self::from_trusted(offsets, flat, AccessMode::default()))
    }

    pub(crate) fn from_trusted(
        offsets: &'a [u32],
        flat: &'a mut [T],
        access_mode: AccessMode,
    ) -> Self {
        Self {
            offsets,
            flat,
            access_mode,
        }
    }

    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn row(&self, row: usize) -> Span<'_, T> {
        let range = row_bounds(self.offsets, row, self.access_mode);
        Span::new(&self.flat[range])
    }

    /// Mutable elements of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn edit_row(&mut self, row: usize) -> SpanMut<'_, T> {
        let range = row_bounds(self.offsets, row, self.access_mode);
        SpanMut::new(&mut self.flat[range])
    }

    pub fn try_edit_row(&mut self, row: usize) -> Result<SpanMut<'_, T>> {
        let rows = self.row_count();
        let range = self
            .row_range(row)
            .ok_or(Error::RowOutOfRange { row, rows })?;
        Ok(SpanMut::new(&mut self.flat[range]))
    }

    pub fn flat_data_mut(&mut self) -> SpanMut<'_, T> {
        SpanMut::new(self.flat)
    }

    /// Reborrow as a read-only view
    pub fn as_view(&self) -> RowView<'_, T> {
        RowView::from_trusted(self.offsets, self.flat, self.access_mode)
    }
}

impl<'a, T: Pod> RowViewMut<'a, T> {
    /// Mutable counterpart of [`RowView::from_bytes`]
    pub fn from_bytes(offset_bytes: &'a [u8], flat_bytes: &'a mut [u8]) -> Result<Self> {
        validate_typed_slice::<u32>(offset_bytes)?;
        validate_typed_slice::<T>(flat_bytes)?;
        let offsets: &'a [u32] = try_cast_slice(offset_bytes).map_err(cast_error)?;
        let flat: &'a mut [T] = try_cast_slice_mut(flat_bytes).map_err(cast_error)?;
        Self::new(offsets, flat)
    }
}

impl<T> RowAccess<T> for RowViewMut<'_, T> {
    fn row_offsets(&self) -> &[u32] {
        self.offsets
    }

    fn flat(&self) -> &[T] {
        self.flat
    }
}
