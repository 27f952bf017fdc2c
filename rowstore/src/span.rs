//! Non-owning views over contiguous runs of elements
//!
//! A [`Span`] or [`SpanMut`] is what a row accessor hands out. Both borrow
//! the owner's buffer, so the borrow checker ends their life at the owner's
//! next mutating call. Shrinking a view (`pop_back`, `remove_if`) narrows
//! the view only; the owner's storage keeps its length.

use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};

/// Read-only view over a run of elements
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Span<'a, T> {
    items: &'a [T],
}

impl<T> Clone for Span<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Span<'_, T> {}

impl<T> Default for Span<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> Span<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self { items: &[] }
    }

    /// The viewed elements with the owner's lifetime
    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }

    pub fn back(&self) -> Option<&'a T> {
        self.items.last()
    }

    /// Drop the last element from the view and return it
    pub fn pop_back(&mut self) -> Option<&'a T> {
        let items: &'a [T] = self.items;
        let (last, rest) = items.split_last()?;
        self.items = rest;
        Some(last)
    }

    /// Replace the contents of `out` with a copy of the view
    pub fn copy_to(&self, out: &mut Vec<T>)
    where
        T: Clone,
    {
        out.clear();
        out.extend_from_slice(self.items);
    }

    /// Position of `element` inside the view, by address
    pub fn index_of(&self, element: &T) -> Result<usize> {
        position_of(self.items, element)
    }
}

impl<T> Deref for Span<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.items
    }
}

impl<'a, T> From<&'a [T]> for Span<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Self::new(items)
    }
}

impl<'a, T> From<&'a Vec<T>> for Span<'a, T> {
    fn from(items: &'a Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<'a, T> IntoIterator for Span<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Mutable view over a run of elements
#[derive(Debug)]
pub struct SpanMut<'a, T> {
    items: &'a mut [T],
}

impl<T> Default for SpanMut<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> SpanMut<'a, T> {
    pub fn new(items: &'a mut [T]) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self {
            items: Default::default(),
        }
    }

    /// Reborrow as a read-only view
    pub fn as_span(&self) -> Span<'_, T> {
        Span::new(self.items)
    }

    /// Give up the view and keep the mutable borrow
    pub fn into_slice(self) -> &'a mut [T] {
        self.items
    }

    pub fn back(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Drop the last element from the view and return it
    pub fn pop_back(&mut self) -> Option<&'a mut T> {
        let items = std::mem::take(&mut self.items);
        let (last, rest) = items.split_last_mut()?;
        self.items = rest;
        Some(last)
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.items.fill(value);
    }

    /// Overwrite the view with `other`, which must have the same length
    pub fn copy_from(&mut self, other: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if self.items.len() != other.len() {
            return Err(Error::SizeMismatch {
                expected: self.items.len(),
                found: other.len(),
            });
        }
        self.items.clone_from_slice(other);
        Ok(())
    }

    /// Replace the contents of `out` with a copy of the view
    pub fn copy_to(&self, out: &mut Vec<T>)
    where
        T: Clone,
    {
        out.clear();
        out.extend_from_slice(self.items);
    }

    /// Move every element matching `pred` to the tail and shrink the view
    /// past them. Order of the kept elements is not preserved.
    ///
    /// Returns the number of elements removed from the view.
    pub fn remove_if<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut end = self.items.len();
        let mut i = 0;
        while i < end {
            if pred(&self.items[i]) {
                end -= 1;
                self.items.swap(i, end);
            } else {
                i += 1;
            }
        }

        let removed = self.items.len() - end;
        let items = std::mem::take(&mut self.items);
        let (kept, _) = items.split_at_mut(end);
        self.items = kept;
        removed
    }

    /// Position of `element` inside the view, by address
    pub fn index_of(&self, element: &T) -> Result<usize> {
        position_of(self.items, element)
    }
}

impl<T> Deref for SpanMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.items
    }
}

impl<T> DerefMut for SpanMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.items
    }
}

impl<'a, T> From<&'a mut [T]> for SpanMut<'a, T> {
    fn from(items: &'a mut [T]) -> Self {
        Self::new(items)
    }
}

impl<'a, T> IntoIterator for SpanMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

fn position_of<T>(items: &[T], element: &T) -> Result<usize> {
    let size = std::mem::size_of::<T>();
    let base = items.as_ptr() as usize;
    let addr = element as *const T as usize;

    if size == 0 {
        return if addr == base && !items.is_empty() {
            Ok(0)
        } else {
            Err(Error::NotInSpan)
        };
    }

    let offset = addr.checked_sub(base).ok_or(Error::NotInSpan)?;
    if !offset.is_multiple_of(size) {
        return Err(Error::NotInSpan);
    }

    let index = offset / size;
    if index < items.len() {
        Ok(index)
    } else {
        Err(Error::NotInSpan)
    }
}
