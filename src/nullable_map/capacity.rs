use alloc::sync::Arc;

use super::NullableSortedMap;
use crate::comparator::NaturalOrder;
use crate::raw::RawSortedList;

impl<K, V> NullableSortedMap<K, V, NaturalOrder> {
    /// Creates an empty map with capacity for at least `capacity` real entries.
    ///
    /// The absent-key slot never needs capacity of its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let map: NullableSortedMap<i32, i32> = NullableSortedMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<K, V, C> NullableSortedMap<K, V, C> {
    /// Creates an empty map ordered by `comparator` with capacity for at least `capacity`
    /// real entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        NullableSortedMap {
            raw: RawSortedList::with_capacity(capacity, Arc::new(comparator)),
            null: None,
        }
    }

    /// Returns the number of real entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves capacity for at least `additional` more real entries.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Shrinks the capacity of the map as much as possible.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::with_capacity(64);
    /// map.add(Some(1), 1).unwrap();
    /// map.shrink_to_fit();
    /// assert!(map.capacity() < 64);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.raw.shrink_to_fit();
    }
}
