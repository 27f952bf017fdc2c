//! Rows addressable by key as well as by row number
//!
//! A [`KeyedRowStore`] pairs a [`RowStore`] with a [`SortedKeyIndex`]: row
//! `i` belongs to `keys()[i]`. Every change to keys or row contents draws a
//! fresh [`Version`], and `==` compares those versions only. Use
//! [`KeyedRowStore::deep_eq`] to compare contents.

use std::borrow::Borrow;

use rowstore_core::HasIndex;

use crate::config::{AccessMode, StoreConfig};
use crate::error::{Error, Result};
use crate::key_index::{Built, IndexState, SortedKeyIndex, Unbuilt};
use crate::logging::rowstore_log;
use crate::row_store::RowStore;
use crate::row_view::RowView;
use crate::span::{Span, SpanMut};
use crate::version::Version;

/// Row store with one key per row
#[derive(Debug, Clone)]
pub struct KeyedRowStore<K, T, S: IndexState = Built> {
    pub(crate) rows: RowStore<T>,
    pub(crate) index: SortedKeyIndex<K, S>,
    pub(crate) version: Version,
}

impl<K, T, S: IndexState> Default for KeyedRowStore<K, T, S> {
    fn default() -> Self {
        Self {
            rows: RowStore::new(),
            index: SortedKeyIndex::default(),
            version: Version::INITIAL,
        }
    }
}

impl<K, T, S: IndexState> KeyedRowStore<K, T, S> {
    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }

    pub fn element_count(&self) -> usize {
        self.rows.element_count()
    }

    /// Stamp of the current state; changes on every mutation
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn access_mode(&self) -> AccessMode {
        self.rows.access_mode()
    }

    /// The underlying rows
    pub fn rows(&self) -> &RowStore<T> {
        &self.rows
    }

    /// Keys in row order
    pub fn keys(&self) -> &[K] {
        self.index.keys()
    }

    /// Key of row `row`
    pub fn key_of(&self, row: usize) -> Option<&K> {
        self.index.key(row)
    }

    /// Elements of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> Span<'_, T> {
        self.rows.row(row)
    }

    pub fn try_row(&self, row: usize) -> Result<Span<'_, T>> {
        self.rows.try_row(row)
    }

    /// Mutable elements of `row`; draws a new version
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn edit_row(&mut self, row: usize) -> SpanMut<'_, T> {
        self.version = Version::next();
        self.rows.row_mut(row)
    }

    pub fn try_edit_row(&mut self, row: usize) -> Result<SpanMut<'_, T>> {
        let span = self.rows.try_row_mut(row)?;
        self.version = Version::next();
        Ok(span)
    }

    pub fn view(&self) -> RowView<'_, T> {
        self.rows.view()
    }

    /// Compare row boundaries, elements and keys
    pub fn deep_eq<S2: IndexState>(&self, other: &KeyedRowStore<K, T, S2>) -> bool
    where
        K: PartialEq,
        T: PartialEq,
    {
        self.rows == other.rows && self.index.keys() == other.index.keys()
    }
}

impl<K: Ord, T> KeyedRowStore<K, T, Unbuilt> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        let mut index = SortedKeyIndex::new();
        index.reserve_hint(config.row_capacity);
        Self {
            rows: RowStore::with_config(config),
            index,
            version: Version::INITIAL,
        }
    }

    pub fn reserve(&mut self, rows: usize, elements: usize) {
        self.rows.reserve(rows, elements);
    }

    /// Remove every key and row
    pub fn clear(&mut self) {
        self.rows.clear();
        self.index.clear();
        self.version = Version::next();
    }

    /// Key for the next row to be sealed
    pub fn add_key(&mut self, key: K) {
        self.index.add_key(key);
        self.version = Version::next();
    }

    /// Append an element to the open row
    pub fn add_row_item(&mut self, value: T) {
        self.rows.add_row_item(value);
        self.version = Version::next();
    }

    pub fn end_row(&mut self) {
        self.rows.end_row();
        self.version = Version::next();
    }

    /// Add `key` with a complete row
    pub fn add_row<I>(&mut self, key: K, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.index.add_key(key);
        self.rows.push_row(items);
        self.version = Version::next();
    }

    /// Add `key` with a copy of `values` as its row
    pub fn add_fixed_row(&mut self, key: K, values: &[T])
    where
        T: Clone,
    {
        self.add_row(key, values.iter().cloned());
    }

    /// Add `key` with a row of `len` copies of `value`
    pub fn add_filled_row(&mut self, key: K, len: usize, value: T)
    where
        T: Clone,
    {
        self.add_row(key, std::iter::repeat_n(value, len));
    }

    /// Sort the key index and enable lookups
    ///
    /// Fails if the number of sealed rows differs from the number of keys.
    pub fn build_index(self) -> Result<KeyedRowStore<K, T, Built>> {
        let rows = self.rows.row_count();
        let keys = self.index.len();
        if rows != keys {
            return Err(Error::KeyCountMismatch { rows, keys });
        }
        Ok(KeyedRowStore {
            rows: self.rows,
            index: self.index.build(),
            version: self.version,
        })
    }
}

impl<K: Ord, T> KeyedRowStore<K, T, Built> {
    /// Keyed store over existing rows, one key per row
    pub fn from_parts(rows: RowStore<T>, keys: Vec<K>) -> Result<Self> {
        if rows.row_count() != keys.len() {
            return Err(Error::KeyCountMismatch {
                rows: rows.row_count(),
                keys: keys.len(),
            });
        }
        Ok(Self {
            rows,
            index: SortedKeyIndex::from_keys(keys),
            version: Version::next(),
        })
    }

    pub fn index(&self) -> &SortedKeyIndex<K> {
        &self.index
    }

    /// Reopen for appending keys and rows
    pub fn into_unbuilt(self) -> KeyedRowStore<K, T, Unbuilt> {
        KeyedRowStore {
            rows: self.rows,
            index: self.index.into_unbuilt(),
            version: self.version,
        }
    }

    /// Row number holding `key`
    pub fn row_number_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index.index_of(key)
    }

    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index.has_key(key)
    }

    /// Every row number holding `key`
    pub fn indices_of<Q>(&self, key: &Q) -> Span<'_, u32>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index.indices_of(key)
    }

    /// Row of `key`, or `None` when the key is absent
    pub fn row_by_key<Q>(&self, key: &Q) -> Option<Span<'_, T>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let row = self.index.index_of(key)?;
        Some(self.rows.row(row))
    }

    /// Mutable row of `key`; draws a new version when the key exists
    pub fn edit_row_by_key<Q>(&mut self, key: &Q) -> Option<SpanMut<'_, T>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let row = self.index.index_of(key)?;
        Some(self.edit_row(row))
    }

    /// Extract the rows of `keys` and renumber their cross-references
    ///
    /// Element indices are read as row numbers of this store. In the
    /// result they point at the new row of the same key; elements whose
    /// target key is not in `keys` (or that are unassigned) are dropped.
    /// Rows are ordered by their old row number, and keys absent from this
    /// store come last, in key order, with empty rows. Repeated keys are
    /// kept once.
    pub fn subset_and_remap(&self, keys: &[K]) -> KeyedRowStore<K, T, Built>
    where
        K: Clone,
        T: HasIndex,
    {
        let mut subset: Vec<(usize, &K)> = keys
            .iter()
            .map(|key| (self.index.index_of(key).unwrap_or(usize::MAX), key))
            .collect();
        subset.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        subset.dedup_by(|a, b| a.1 == b.1);

        let mut index = SortedKeyIndex::<K, Unbuilt>::with_capacity(subset.len());
        for &(_, key) in &subset {
            index.add_key(key.clone());
        }
        let index = index.build();

        let mode = self.rows.access_mode();
        let config = StoreConfig::with_access_mode(mode).with_row_capacity(subset.len());
        let mut rows = RowStore::with_config(&config);
        let source_keys = self.index.keys();
        let mut kept = 0usize;
        let mut dropped = 0usize;

        for &(old_row, _) in &subset {
            if old_row != usize::MAX {
                for value in self.rows.row(old_row).iter() {
                    let new_row = usize::try_from(value.index())
                        .ok()
                        .and_then(|target| source_keys.get(target))
                        .and_then(|key| index.index_of(key));
                    match new_row {
                        Some(new_row) => {
                            rows.add_row_item(value.with_index(new_row as i32));
                            kept += 1;
                        }
                        None => dropped += 1,
                    }
                }
            }
            rows.end_row();
        }

        rowstore_log!(
            log::Level::Debug,
            "subset_remap",
            "rows={} kept={} dropped={}",
            subset.len(),
            kept,
            dropped
        );

        KeyedRowStore {
            rows,
            index,
            version: Version::next(),
        }
    }
}

/// Logical equality: same version lineage, contents are not compared.
impl<K, T, S: IndexState> PartialEq for KeyedRowStore<K, T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl<K, T, S: IndexState> Eq for KeyedRowStore<K, T, S> {}
