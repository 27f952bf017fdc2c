//! Sorted permutation over an unsorted key array
//!
//! Keys stay in insertion order, which is the row order of a keyed store.
//! The index keeps a separate permutation that visits the keys in
//! ascending order, so lookups are binary searches without reordering the
//! keys themselves.
//!
//! Whether the permutation is current is tracked in the type:
//! [`SortedKeyIndex<K, Unbuilt>`] accepts new keys, and
//! [`SortedKeyIndex<K, Built>`] answers lookups. Converting between the
//! two consumes the index.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::span::Span;

/// Marker: keys were added since the permutation was last sorted
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbuilt;

/// Marker: the permutation orders every key
#[derive(Debug, Clone, Copy, Default)]
pub struct Built;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Unbuilt {}
    impl Sealed for super::Built {}
}

/// Build state of a key index
pub trait IndexState: sealed::Sealed {}

impl IndexState for Unbuilt {}
impl IndexState for Built {}

/// Keys in insertion order plus a permutation sorting them
#[derive(Debug, Clone)]
pub struct SortedKeyIndex<K, S: IndexState = Built> {
    keys: Vec<K>,
    order: Vec<u32>,
    state: PhantomData<S>,
}

impl<K, S: IndexState> Default for SortedKeyIndex<K, S> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            order: Vec::new(),
            state: PhantomData,
        }
    }
}

impl<K, S: IndexState> SortedKeyIndex<K, S> {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Key at insertion position `i`
    pub fn key(&self, i: usize) -> Option<&K> {
        self.keys.get(i)
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }

    fn with_state<T: IndexState>(self) -> SortedKeyIndex<K, T> {
        SortedKeyIndex {
            keys: self.keys,
            order: self.order,
            state: PhantomData,
        }
    }
}

impl<K: Ord> SortedKeyIndex<K, Unbuilt> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            state: PhantomData,
        }
    }

    /// Reserve room for `additional` keys when memory allows
    pub(crate) fn reserve_hint(&mut self, additional: usize) {
        let _ = self.keys.try_reserve(additional);
        let _ = self.order.try_reserve(additional);
    }

    /// Append `key`; it becomes the entry for the next row
    ///
    /// # Panics
    ///
    /// Panics if the index already holds `u32::MAX` keys.
    pub fn add_key(&mut self, key: K) {
        let position = self.keys.len();
        assert!(
            position < u32::MAX as usize,
            "key index exceeds {} keys",
            u32::MAX
        );
        self.keys.push(key);
        self.order.push(position as u32);
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.keys.clear();
        self.order.clear();
    }

    /// Sort the permutation
    ///
    /// The sort is stable and starts from the previous permutation, so
    /// equal keys keep the relative order they had before.
    pub fn build(mut self) -> SortedKeyIndex<K, Built> {
        let keys = &self.keys;
        self.order
            .sort_by(|&a, &b| keys[a as usize].cmp(&keys[b as usize]));
        self.with_state()
    }
}

impl<K: Ord> SortedKeyIndex<K, Built> {
    /// Index over `keys`, built in one step
    pub fn from_keys(keys: Vec<K>) -> Self {
        let mut index = SortedKeyIndex::<K, Unbuilt>::with_capacity(keys.len());
        for key in keys {
            index.add_key(key);
        }
        index.build()
    }

    /// Insertion positions in ascending key order
    pub fn permutation(&self) -> &[u32] {
        &self.order
    }

    /// Reopen for additions, keeping the current permutation as the base
    pub fn into_unbuilt(self) -> SortedKeyIndex<K, Unbuilt> {
        self.with_state()
    }

    /// Reopen and append `key` in one step
    pub fn add_key(self, key: K) -> SortedKeyIndex<K, Unbuilt> {
        let mut index = self.into_unbuilt();
        index.add_key(key);
        index
    }

    fn compare<Q>(&self, position: u32, key: &Q) -> Ordering
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.keys[position as usize].borrow().cmp(key)
    }

    /// Insertion position of some key equal to `key`
    ///
    /// With duplicates, the one reached first by the permutation wins.
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let start = self
            .order
            .partition_point(|&p| self.compare(p, key) == Ordering::Less);
        let position = *self.order.get(start)?;
        (self.compare(position, key) == Ordering::Equal).then_some(position as usize)
    }

    /// Every insertion position holding a key equal to `key`
    ///
    /// The span is a window of [`permutation`](Self::permutation) and is
    /// empty when the key is absent.
    pub fn indices_of<Q>(&self, key: &Q) -> Span<'_, u32>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let start = self
            .order
            .partition_point(|&p| self.compare(p, key) == Ordering::Less);
        let rest = &self.order[start..];
        let len = rest.partition_point(|&p| self.compare(p, key) == Ordering::Equal);
        Span::new(&rest[..len])
    }

    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index_of(key).is_some()
    }

    /// Keys in ascending order
    pub fn sorted_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter().map(move |&p| &self.keys[p as usize])
    }
}
