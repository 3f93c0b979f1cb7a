use alloc::sync::Arc;
use alloc::vec::Vec;
use core::slice;

use crate::comparator::Comparator;
use crate::error::{Error, Restriction, Result};

/// Result of searching for a key in the list.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted.
    NotFound(usize),
}

/// The ordered-list primitive backing `NullableSortedMap`.
///
/// Entries are kept in a single `Vec`, sorted by the comparator, with unique keys.
/// Positioning is a binary search; growth is delegated to `Vec`.
pub(crate) struct RawSortedList<K, V, C> {
    /// Sorted entries. Invariant: strictly ascending under `comparator`.
    entries: Vec<(K, V)>,
    /// Shared so that clones keep the same comparator instance.
    comparator: Arc<C>,
    read_only: bool,
    fixed_size: bool,
}

impl<K, V, C> RawSortedList<K, V, C> {
    /// Creates a new, empty list.
    pub(crate) fn new(comparator: Arc<C>) -> Self {
        Self {
            entries: Vec::new(),
            comparator,
            read_only: false,
            fixed_size: false,
        }
    }

    /// Creates a new list with the specified capacity.
    pub(crate) fn with_capacity(capacity: usize, comparator: Arc<C>) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            comparator,
            read_only: false,
            fixed_size: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    pub(crate) fn comparator(&self) -> &Arc<C> {
        &self.comparator
    }

    pub(crate) fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn is_fixed_size(&self) -> bool {
        self.fixed_size
    }

    pub(crate) fn set_read_only(&mut self) {
        self.read_only = true;
    }

    pub(crate) fn set_fixed_size(&mut self) {
        self.fixed_size = true;
    }

    /// Fails with `Unsupported` if the list may not be written at all.
    pub(crate) fn check_writable(&self, operation: &'static str) -> Result<()> {
        if self.read_only {
            return Err(Error::unsupported(operation, Restriction::ReadOnly));
        }
        Ok(())
    }

    /// Fails with `Unsupported` if the list may not change length.
    pub(crate) fn check_resizable(&self, operation: &'static str) -> Result<()> {
        self.check_writable(operation)?;
        if self.fixed_size {
            return Err(Error::unsupported(operation, Restriction::FixedSize));
        }
        Ok(())
    }

    /// Removes every entry.
    pub(crate) fn clear(&mut self) -> Result<()> {
        self.check_resizable("clear")?;
        self.entries.clear();
        Ok(())
    }

    /// Returns all entries in ascending key order.
    pub(crate) fn entries(&self) -> &[(K, V)] {
        &self.entries
    }

    pub(crate) fn iter(&self) -> slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }

    pub(crate) fn first(&self) -> Option<&(K, V)> {
        self.entries.first()
    }

    pub(crate) fn last(&self) -> Option<&(K, V)> {
        self.entries.last()
    }

    /// Returns a positional cursor in the before-first state.
    pub(crate) fn cursor(&self) -> RawCursor<'_, K, V> {
        RawCursor::new(&self.entries)
    }

    pub(crate) fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.iter().any(|(_, v)| v == value)
    }

    /// Keeps only the entries for which `f` returns `true`.
    ///
    /// The caller is responsible for checking the flags first.
    pub(crate) fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.entries.retain_mut(|(k, v)| f(k, v));
    }
}

impl<K, V, C: Comparator<K>> RawSortedList<K, V, C> {
    /// Binary searches for `key`.
    #[inline]
    pub(crate) fn search(&self, key: &K) -> SearchResult {
        match self.entries.binary_search_by(|(k, _)| C::compare(&self.comparator, k, key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub(crate) fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match self.search(key) {
            SearchResult::Found(index) => {
                let (k, v) = &self.entries[index];
                Some((k, v))
            }
            SearchResult::NotFound(_) => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.search(key) {
            SearchResult::Found(index) => Some(&mut self.entries[index].1),
            SearchResult::NotFound(_) => None,
        }
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        matches!(self.search(key), SearchResult::Found(_))
    }

    /// Inserts a new entry. Fails with `DuplicateKey` if the key is already present, before the
    /// flags are consulted.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<()> {
        match self.search(&key) {
            SearchResult::Found(_) => Err(Error::DuplicateKey),
            SearchResult::NotFound(index) => {
                self.check_resizable("add")?;
                self.entries.insert(index, (key, value));
                Ok(())
            }
        }
    }

    /// Inserts or replaces an entry, returning the replaced value.
    ///
    /// Replacing is allowed on a fixed-size list; adding a new key is not.
    pub(crate) fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.check_writable("insert")?;
        match self.search(&key) {
            SearchResult::Found(index) => Ok(Some(core::mem::replace(&mut self.entries[index].1, value))),
            SearchResult::NotFound(index) => {
                self.check_resizable("insert")?;
                self.entries.insert(index, (key, value));
                Ok(None)
            }
        }
    }

    /// Inserts or replaces an entry without consulting the flags.
    ///
    /// Only used while building a fresh list.
    pub(crate) fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            SearchResult::Found(index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            SearchResult::NotFound(index) => {
                self.entries.insert(index, (key, value));
                None
            }
        }
    }

    /// Removes an entry. Removing a missing key is a no-op, even on a frozen list.
    pub(crate) fn remove(&mut self, key: &K) -> Result<Option<(K, V)>> {
        match self.search(key) {
            SearchResult::Found(index) => {
                self.check_resizable("remove")?;
                Ok(Some(self.entries.remove(index)))
            }
            SearchResult::NotFound(_) => Ok(None),
        }
    }
}

impl<K: Clone, V: Clone, C> Clone for RawSortedList<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            comparator: Arc::clone(&self.comparator),
            read_only: self.read_only,
            fixed_size: self.fixed_size,
        }
    }
}

/// Position of a [`RawCursor`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Position {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// Positional enumerator over the primitive's entries, in ascending key order.
pub(crate) struct RawCursor<'a, K, V> {
    entries: &'a [(K, V)],
    position: Position,
}

impl<'a, K, V> RawCursor<'a, K, V> {
    fn new(entries: &'a [(K, V)]) -> Self {
        Self {
            entries,
            position: Position::BeforeFirst,
        }
    }

    /// Advances to the next entry. Returns `false` once the cursor is after the last entry.
    pub(crate) fn move_next(&mut self) -> bool {
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::At(index) => index + 1,
            Position::AfterLast => return false,
        };
        if next < self.entries.len() {
            self.position = Position::At(next);
            true
        } else {
            self.position = Position::AfterLast;
            false
        }
    }

    /// Returns the cursor to the before-first position.
    pub(crate) fn reset(&mut self) {
        self.position = Position::BeforeFirst;
    }

    /// Returns the current entry, or `None` outside of an entry.
    pub(crate) fn current(&self) -> Option<&'a (K, V)> {
        match self.position {
            Position::At(index) => self.entries.get(index),
            Position::BeforeFirst | Position::AfterLast => None,
        }
    }
}

impl<K, V> Clone for RawCursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries,
            position: self.position,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    extern crate std;

    use super::*;
    use crate::comparator::NaturalOrder;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn list() -> RawSortedList<i32, u32, NaturalOrder> {
        RawSortedList::new(Arc::new(NaturalOrder))
    }

    #[test]
    fn list_capacity() {
        let list: RawSortedList<i32, u32, NaturalOrder> = RawSortedList::with_capacity(10, Arc::new(NaturalOrder));
        assert!(list.capacity() >= 10);
        assert!(list.is_empty());
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut list = list();
        list.insert(1, 10).unwrap();
        assert_eq!(list.insert(1, 11), Err(Error::DuplicateKey));
        assert_eq!(list.get(&1), Some(&10));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn fixed_size_allows_replacement_only() {
        let mut list = list();
        list.insert(1, 10).unwrap();
        list.set_fixed_size();

        assert_eq!(list.set(1, 20), Ok(Some(10)));
        assert!(matches!(
            list.set(2, 20),
            Err(Error::Unsupported {
                restriction: Restriction::FixedSize,
                ..
            })
        ));
        assert!(list.remove(&1).is_err());
        assert!(list.clear().is_err());
        assert_eq!(list.entries(), &[(1, 20)]);
    }

    #[test]
    fn read_only_rejects_everything() {
        let mut list = list();
        list.insert(1, 10).unwrap();
        list.set_read_only();

        assert!(list.set(1, 20).is_err());
        assert!(list.insert(2, 20).is_err());
        assert!(list.remove(&1).is_err());
        assert!(list.clear().is_err());
        assert_eq!(list.entries(), &[(1, 10)]);
    }

    #[test]
    fn frozen_list_reports_duplicates_and_missing_keys() {
        let mut list = list();
        list.insert(1, 10).unwrap();
        list.set_read_only();

        assert_eq!(list.insert(1, 11), Err(Error::DuplicateKey));
        assert_eq!(list.remove(&2), Ok(None));
        assert_eq!(list.entries(), &[(1, 10)]);
    }

    #[test]
    fn cursor_walks_then_stops() {
        let mut list = list();
        for k in [3, 1, 2] {
            list.insert(k, 0).unwrap();
        }

        let mut cursor = list.cursor();
        assert!(cursor.current().is_none());
        let mut seen = std::vec::Vec::new();
        while cursor.move_next() {
            seen.push(cursor.current().unwrap().0);
        }
        assert_eq!(seen, [1, 2, 3]);
        assert!(cursor.current().is_none());
        assert!(!cursor.move_next());

        cursor.reset();
        assert!(cursor.move_next());
        assert_eq!(cursor.current().unwrap().0, 1);
    }

    #[test]
    fn clone_shares_comparator() {
        let mut list = list();
        list.insert(1, 1).unwrap();
        let copy = list.clone();
        assert!(Arc::ptr_eq(list.comparator(), copy.comparator()));
        assert_eq!(copy.entries(), list.entries());
    }

    proptest! {
        #[test]
        fn list_behaves_like_btreemap(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: BTreeMap<i32, u32> = BTreeMap::new();
            let mut list = list();

            for operation in operations {
                match operation {
                    Operation::Insert(key, value) => {
                        let result = list.insert(key, value);
                        if model.contains_key(&key) {
                            prop_assert_eq!(result, Err(Error::DuplicateKey));
                        } else {
                            prop_assert_eq!(result, Ok(()));
                            model.insert(key, value);
                        }
                    }
                    Operation::Set(key, value) => {
                        prop_assert_eq!(list.set(key, value), Ok(model.insert(key, value)));
                    }
                    Operation::Remove(key) => {
                        let removed = list.remove(&key).unwrap().map(|(_, v)| v);
                        prop_assert_eq!(removed, model.remove(&key));
                    }
                    Operation::Get(key) => {
                        prop_assert_eq!(list.get(&key), model.get(&key));
                    }
                }

                prop_assert_eq!(list.len(), model.len());
            }

            let entries: std::vec::Vec<_> = list.iter().copied().collect();
            let expected: std::vec::Vec<_> = model.into_iter().collect();
            prop_assert_eq!(entries, expected);
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i32, u32),
        Set(i32, u32),
        Remove(i32),
        Get(i32),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            (-32..32i32, any::<u32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
            (-32..32i32, any::<u32>()).prop_map(|(k, v)| Operation::Set(k, v)),
            (-32..32i32).prop_map(Operation::Remove),
            (-32..32i32).prop_map(Operation::Get),
        ]
    }
}
