use core::fmt;
use core::iter::FusedIterator;

use super::{Iter, NullableSortedMap};
use crate::comparator::Comparator;
use crate::error::{Error, Result};

/// A collection that can be counted, iterated and probed by key, with the absent key
/// represented as `None`.
///
/// [`Keys`] and [`Values`] read through this trait; they never own a copy of the entries.
pub trait EntrySource {
    type Key;
    type Value;
    type Iter<'a>: Iterator<Item = (Option<&'a Self::Key>, &'a Self::Value)>
    where
        Self: 'a;

    /// Returns the number of entries, counting the absent key if it is set.
    fn entry_count(&self) -> usize;

    /// Returns a fresh iterator over the current entries.
    fn entries(&self) -> Self::Iter<'_>;

    /// Returns `true` if an entry exists for `key`.
    fn has_key(&self, key: Option<&Self::Key>) -> bool;
}

impl<K, V, C: Comparator<K>> EntrySource for NullableSortedMap<K, V, C> {
    type Key = K;
    type Value = V;
    type Iter<'a>
        = Iter<'a, K, V>
    where
        Self: 'a;

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn entries(&self) -> Iter<'_, K, V> {
        self.iter()
    }

    fn has_key(&self, key: Option<&K>) -> bool {
        self.contains_key(key)
    }
}

/// Validates a `copy_to` destination before anything is written.
fn check_copy_target(target_len: usize, start: usize, count: usize) -> Result<()> {
    if start > target_len {
        return Err(Error::OutOfRange {
            index: start,
            len: target_len,
        });
    }
    if target_len - start < count {
        return Err(Error::InvalidArgument(
            "destination slice is too small to hold every entry from the start index",
        ));
    }
    Ok(())
}

/// A live, read-only view of a map's keys.
///
/// The view holds only a borrow of its map: every call observes the map's current contents.
///
/// This `struct` is created by the [`keys`] method on [`NullableSortedMap`].
///
/// # Examples
///
/// ```
/// use nullable_sorted_map::NullableSortedMap;
///
/// let map = NullableSortedMap::from([(Some(2), "b"), (None, "n"), (Some(1), "a")]);
/// let keys = map.keys();
/// assert_eq!(keys.len(), 3);
/// assert!(keys.contains(None));
///
/// let mut target = [None; 4];
/// keys.copy_to(&mut target, 1).unwrap();
/// assert_eq!(target, [None, None, Some(1), Some(2)]);
/// ```
///
/// [`keys`]: NullableSortedMap::keys
pub struct Keys<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: EntrySource + ?Sized> Keys<'a, S> {
    pub(super) fn new(source: &'a S) -> Self {
        Keys { source }
    }

    /// Returns the number of keys, including the absent key if it is set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a fresh iterator over the keys, the absent key first.
    pub fn iter(&self) -> KeysIter<'a, S> {
        KeysIter {
            inner: self.source.entries(),
        }
    }

    #[must_use]
    pub fn contains(&self, key: Option<&S::Key>) -> bool {
        self.source.has_key(key)
    }

    /// Copies every key into `target`, starting at `start`.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] if `start` is past the end of `target`.
    /// - [`Error::InvalidArgument`] if fewer than [`len`](Keys::len) slots remain after `start`.
    ///
    /// Nothing is written when an error is returned.
    pub fn copy_to(&self, target: &mut [Option<S::Key>], start: usize) -> Result<()>
    where
        S::Key: Clone,
    {
        check_copy_target(target.len(), start, self.len())?;
        for (slot, key) in target[start..].iter_mut().zip(self.iter()) {
            *slot = key.cloned();
        }
        Ok(())
    }
}

impl<S: ?Sized> Clone for Keys<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Keys<'_, S> {}

impl<'a, S: EntrySource + ?Sized> IntoIterator for Keys<'a, S> {
    type Item = Option<&'a S::Key>;
    type IntoIter = KeysIter<'a, S>;

    fn into_iter(self) -> KeysIter<'a, S> {
        self.iter()
    }
}

impl<S> fmt::Debug for Keys<'_, S>
where
    S: EntrySource + ?Sized,
    S::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// An iterator over the keys of a [`Keys`] view.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct KeysIter<'a, S: EntrySource + ?Sized + 'a> {
    inner: S::Iter<'a>,
}

impl<'a, S: EntrySource + ?Sized + 'a> Iterator for KeysIter<'a, S> {
    type Item = Option<&'a S::Key>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, S> FusedIterator for KeysIter<'a, S>
where
    S: EntrySource + ?Sized + 'a,
    S::Iter<'a>: FusedIterator,
{
}

/// A live, read-only view of a map's values, in key order.
///
/// This `struct` is created by the [`values`] method on [`NullableSortedMap`].
///
/// # Examples
///
/// ```
/// use nullable_sorted_map::{Error, NullableSortedMap};
///
/// let map = NullableSortedMap::from([(Some(1), 10), (Some(2), 20)]);
/// let values = map.values();
/// assert!(values.contains(&20));
///
/// let mut target = [0; 2];
/// assert!(matches!(values.copy_to(&mut target, 1), Err(Error::InvalidArgument(_))));
/// assert_eq!(target, [0, 0]);
/// ```
///
/// [`values`]: NullableSortedMap::values
pub struct Values<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: EntrySource + ?Sized> Values<'a, S> {
    pub(super) fn new(source: &'a S) -> Self {
        Values { source }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.source.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a fresh iterator over the values, the absent key's value first.
    pub fn iter(&self) -> ValuesIter<'a, S> {
        ValuesIter {
            inner: self.source.entries(),
        }
    }

    /// Returns `true` if any entry holds `value`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn contains(&self, value: &S::Value) -> bool
    where
        S::Value: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Copies every value into `target`, starting at `start`.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] if `start` is past the end of `target`.
    /// - [`Error::InvalidArgument`] if fewer than [`len`](Values::len) slots remain after `start`.
    ///
    /// Nothing is written when an error is returned.
    pub fn copy_to(&self, target: &mut [S::Value], start: usize) -> Result<()>
    where
        S::Value: Clone,
    {
        check_copy_target(target.len(), start, self.len())?;
        for (slot, value) in target[start..].iter_mut().zip(self.iter()) {
            slot.clone_from(value);
        }
        Ok(())
    }
}

impl<S: ?Sized> Clone for Values<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Values<'_, S> {}

impl<'a, S: EntrySource + ?Sized> IntoIterator for Values<'a, S> {
    type Item = &'a S::Value;
    type IntoIter = ValuesIter<'a, S>;

    fn into_iter(self) -> ValuesIter<'a, S> {
        self.iter()
    }
}

impl<S> fmt::Debug for Values<'_, S>
where
    S: EntrySource + ?Sized,
    S::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// An iterator over the values of a [`Values`] view.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesIter<'a, S: EntrySource + ?Sized + 'a> {
    inner: S::Iter<'a>,
}

impl<'a, S: EntrySource + ?Sized + 'a> Iterator for ValuesIter<'a, S> {
    type Item = &'a S::Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, S> FusedIterator for ValuesIter<'a, S>
where
    S: EntrySource + ?Sized + 'a,
    S::Iter<'a>: FusedIterator,
{
}
