//! Bucket-sort builders: reference indexes and transposes
//!
//! Both builders run in `O(entries + size)` with a counting pass, a prefix
//! sum over the bucket counts and a placement pass. Entries whose index is
//! `-1` are unassigned and skipped. Any other index outside `0..size`
//! rejects the whole build before the target store is touched.

use rowstore_core::format::UNASSIGNED;
use rowstore_core::{CoreError, HasIndex, RowAccess};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::logging::rowstore_log;
use crate::row_store::RowStore;

/// Bucket of `entry`, `None` when it is unassigned
fn target_of<E: HasIndex>(entry: &E, size: usize) -> Result<Option<usize>> {
    let index = entry.index();
    if index == UNASSIGNED {
        return Ok(None);
    }
    if index < 0 || index as usize >= size {
        rowstore_log!(
            log::Level::Debug,
            "bucket_sort_rejected",
            "index={} size={}",
            index,
            size
        );
        return Err(Error::TargetOutOfRange { index, size });
    }
    Ok(Some(index as usize))
}

/// Zeroed offsets for `size` buckets
fn bucket_offsets(size: usize) -> Result<Vec<u32>> {
    let len = size.checked_add(1).ok_or(CoreError::ArraySizeOverflow)?;
    let mut offsets = Vec::new();
    offsets
        .try_reserve_exact(len)
        .map_err(|_| CoreError::ArraySizeOverflow)?;
    offsets.resize(len, 0);
    Ok(offsets)
}

fn check_u32_len(len: usize) -> Result<()> {
    if len > u32::MAX as usize {
        return Err(CoreError::ArraySizeOverflow.into());
    }
    Ok(())
}

impl RowStore<u32> {
    /// Group the positions of `entries` by target index
    ///
    /// Row `k` of the result lists, in ascending order, every position `p`
    /// with `entries[p].index() == k`.
    pub fn build_reference_index<E: HasIndex>(entries: &[E], size: usize) -> Result<Self> {
        let mut store = RowStore::new();
        store.make_reference_index(entries, size)?;
        Ok(store)
    }

    /// In-place form of [`RowStore::build_reference_index`], reusing capacity
    ///
    /// On error `self` is left unchanged.
    pub fn make_reference_index<E: HasIndex>(&mut self, entries: &[E], size: usize) -> Result<()> {
        check_u32_len(entries.len())?;

        let mut offsets = bucket_offsets(size)?;
        for entry in entries {
            if let Some(target) = target_of(entry, size)? {
                offsets[target] += 1;
            }
        }

        // inclusive prefix: offsets[k] becomes the end of bucket k
        let mut total = 0u32;
        for offset in offsets.iter_mut() {
            total += *offset;
            *offset = total;
        }

        let mut flat = std::mem::take(&mut self.flat);
        flat.clear();
        flat.resize(total as usize, 0);

        // walking backwards leaves each bucket ascending and offsets[k] at its start
        for (position, entry) in entries.iter().enumerate().rev() {
            if let Ok(Some(target)) = target_of(entry, size) {
                offsets[target] -= 1;
                flat[offsets[target] as usize] = position as u32;
            }
        }

        self.offsets = offsets;
        self.flat = flat;
        Ok(())
    }
}

impl<E: HasIndex> RowStore<E> {
    /// Transpose `source`: each entry `(row r, index k)` lands in row `k`
    /// of the result with its index replaced by `r`
    ///
    /// Within a result row, entries keep the order in which they appear
    /// when `source` is scanned row by row.
    pub fn build_transpose<R>(source: &R, size: usize) -> Result<Self>
    where
        R: RowAccess<E> + ?Sized,
    {
        let mut store = RowStore::new();
        store.make_transpose(source, size)?;
        Ok(store)
    }

    /// In-place form of [`RowStore::build_transpose`]
    ///
    /// On error `self` is left unchanged.
    pub fn make_transpose<R>(&mut self, source: &R, size: usize) -> Result<()>
    where
        R: RowAccess<E> + ?Sized,
    {
        let rows = source.row_count();
        if rows > i32::MAX as usize {
            return Err(CoreError::ArraySizeOverflow.into());
        }
        let flat = source.flat();
        check_u32_len(flat.len())?;

        let mut offsets = bucket_offsets(size)?;
        for entry in flat {
            if let Some(target) = target_of(entry, size)? {
                offsets[target + 1] += 1;
            }
        }

        // exclusive prefix: offsets[k + 1] becomes the start of bucket k
        let mut total = 0u32;
        for offset in offsets.iter_mut() {
            std::mem::swap(&mut total, offset);
            total += *offset;
        }

        // (source position, source row) for every output slot
        let mut slots = vec![(0u32, 0u32); total as usize];
        for row in 0..rows {
            let Some(range) = source.row_range(row) else {
                continue;
            };
            for position in range {
                if let Ok(Some(target)) = target_of(&flat[position], size) {
                    let cursor = &mut offsets[target + 1];
                    slots[*cursor as usize] = (position as u32, row as u32);
                    *cursor += 1;
                }
            }
        }

        self.flat.clear();
        self.flat.reserve(slots.len());
        for &(position, row) in &slots {
            let entry = flat[position as usize].with_index(row as i32);
            self.flat.push(entry);
        }
        self.offsets = offsets;
        Ok(())
    }

    /// Transpose of this store, see [`RowStore::build_transpose`]
    pub fn transpose(&self, size: usize) -> Result<Self> {
        let config = StoreConfig::with_access_mode(self.access_mode);
        let mut store = RowStore::with_config(&config);
        store.make_transpose(self, size)?;
        Ok(store)
    }

    /// Reference index over this store's sealed elements
    pub fn reference_index(&self, size: usize) -> Result<RowStore<u32>> {
        RowStore::<u32>::build_reference_index(RowAccess::flat(self), size)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rowstore_core::IndexedEntry;

    use super::*;

    fn entry(index: i32, data: char) -> IndexedEntry<u32> {
        IndexedEntry::new(index, data as u32)
    }

    fn rows_of<T: Clone>(store: &RowStore<T>) -> Vec<Vec<T>> {
        store.rows().map(|row| row.to_vec()).collect()
    }

    fn source() -> RowStore<IndexedEntry<u32>> {
        vec![
            vec![entry(0, 'a')],
            vec![entry(1, 'b'), entry(1, 'c')],
            vec![entry(-1, 'd')],
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_reference_index_groups_positions() {
        let source = source();
        let reference = source.reference_index(2).unwrap();
        assert_eq!(reference.row_count(), 2);
        assert_eq!(rows_of(&reference), vec![vec![0], vec![1, 2]]);
        reference.validate().unwrap();
    }

    #[test]
    fn test_reference_index_empty_buckets() {
        let entries = [3, -1, 0, 3].map(|index| entry(index, 'x'));
        let reference = RowStore::<u32>::build_reference_index(&entries, 5).unwrap();
        assert_eq!(
            rows_of(&reference),
            vec![vec![2], vec![], vec![], vec![0, 3], vec![]]
        );
    }

    #[test]
    fn test_transpose_swaps_rows_and_indices() {
        let transposed = source().transpose(2).unwrap();
        assert_eq!(
            rows_of(&transposed),
            vec![vec![entry(0, 'a')], vec![entry(1, 'b'), entry(1, 'c')]]
        );
        transposed.validate().unwrap();
    }

    #[test]
    fn test_transpose_keeps_scan_order() {
        let source: RowStore<IndexedEntry<u32>> = vec![
            vec![entry(1, 'p'), entry(0, 'q')],
            vec![],
            vec![entry(1, 'r')],
        ]
        .into_iter()
        .collect();
        let transposed = RowStore::build_transpose(&source, 2).unwrap();
        assert_eq!(
            rows_of(&transposed),
            vec![vec![entry(0, 'q')], vec![entry(0, 'p'), entry(2, 'r')]]
        );
    }

    #[test]
    fn test_out_of_range_target_rejected_without_mutation() {
        let mut reference = RowStore::<u32>::build_reference_index(&[entry(0, 'a')], 1).unwrap();
        let before = reference.clone();
        let err = reference
            .make_reference_index(&[entry(0, 'a'), entry(4, 'b')], 2)
            .unwrap_err();
        assert!(matches!(err, Error::TargetOutOfRange { index: 4, .. }));
        assert_eq!(err.to_string(), "target index 4 outside 0..2");
        assert_eq!(reference, before);

        let bad: RowStore<IndexedEntry<u32>> = vec![vec![entry(-3, 'z')]].into_iter().collect();
        assert!(matches!(
            bad.transpose(4),
            Err(Error::TargetOutOfRange { index: -3, .. })
        ));
    }

    #[test]
    fn test_huge_size_reports_overflow() {
        let entries = [entry(-1, 'a')];
        for size in [usize::MAX, usize::MAX - 1] {
            assert!(matches!(
                RowStore::<u32>::build_reference_index(&entries, size),
                Err(Error::Format(CoreError::ArraySizeOverflow))
            ));
            assert!(matches!(
                source().transpose(size),
                Err(Error::Format(CoreError::ArraySizeOverflow))
            ));
        }

        let mut reference = RowStore::<u32>::build_reference_index(&entries, 1).unwrap();
        let before = reference.clone();
        let result = reference.make_reference_index(&entries, usize::MAX);
        assert!(result.is_err());
        assert_eq!(reference, before);
    }

    #[test]
    fn test_zero_size_with_only_unassigned() {
        let reference = RowStore::<u32>::build_reference_index(&[entry(-1, 'a')], 0).unwrap();
        assert_eq!(reference.row_count(), 0);
        assert_eq!(reference.element_count(), 0);
    }

    #[test]
    fn test_transpose_twice_restores_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = 40;
        let cols = 25;
        let mut source = RowStore::new();
        for _ in 0..rows {
            let mut row: Vec<IndexedEntry<u32>> = (0..rng.gen_range(0..8))
                .map(|_| IndexedEntry::new(rng.gen_range(0..cols), rng.gen()))
                .collect();
            row.sort_by_key(|e| e.index);
            source.push_row(row);
        }

        let transposed = source.transpose(cols as usize).unwrap();
        assert_eq!(transposed.element_count(), source.element_count());
        let back = transposed.transpose(rows).unwrap();
        assert_eq!(back, source);
    }

    #[test]
    fn test_reference_index_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(11);
        let entries: Vec<IndexedEntry<u32>> = (0..500)
            .map(|_| IndexedEntry::new(rng.gen_range(-1..30), 0))
            .collect();
        let reference = RowStore::<u32>::build_reference_index(&entries, 30).unwrap();
        for target in 0..30 {
            let expected: Vec<u32> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.index == target)
                .map(|(p, _)| p as u32)
                .collect();
            assert_eq!(reference.row(target as usize).to_vec(), expected);
        }
    }
}
