use alloc::sync::Arc;
use alloc::vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::slice;

use rustc_hash::FxHasher;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{Error, Result};
use crate::raw::RawSortedList;

mod capacity;
mod cursor;
#[cfg(feature = "serde")]
mod serialization;
mod views;

pub use cursor::{Cursor, CursorPosition};
pub use views::{EntrySource, Keys, KeysIter, Values, ValuesIter};

/// Odd multiplier applied to each key hash before it is mixed with its value hash.
const KEY_HASH_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// A sorted map whose key space has one extra, reserved member: the absent key `None`.
///
/// Real keys (`Some(k)`) are kept in ascending order under a [`Comparator`], which defaults to
/// the natural [`Ord`] order of `K`. The absent key lives in a dedicated slot next to the sorted
/// entries and is never compared against real keys. By convention it sorts before every real
/// key, so iteration always yields it first.
///
/// Keys and values can be observed through live, read-only views ([`keys`], [`values`]) that
/// hold nothing but a borrow of the map, and through a positional [`Cursor`] with explicit
/// before-first and after-last states.
///
/// Mutating operations return [`Result`]: a map frozen with [`into_read_only`] rejects every
/// mutation, and one frozen with [`into_fixed_size`] rejects every change of length. A rejected
/// operation leaves the map untouched.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to
/// any other key changes while it is in the map. The behavior resulting from such a logic error
/// is not specified, but will be encapsulated to the map that observed it.
///
/// # Examples
///
/// ```
/// use nullable_sorted_map::NullableSortedMap;
///
/// let mut map = NullableSortedMap::new();
/// map.add(None, "x").unwrap();
/// map.add(Some("b"), "2").unwrap();
/// map.add(Some("a"), "1").unwrap();
///
/// let entries: Vec<_> = map.iter().collect();
/// assert_eq!(entries, [(None, &"x"), (Some(&"a"), &"1"), (Some(&"b"), &"2")]);
/// assert_eq!(map.len(), 3);
///
/// // Adding the absent key twice is a duplicate like any other.
/// assert!(map.add(None, "y").is_err());
/// ```
///
/// [`keys`]: NullableSortedMap::keys
/// [`values`]: NullableSortedMap::values
/// [`into_read_only`]: NullableSortedMap::into_read_only
/// [`into_fixed_size`]: NullableSortedMap::into_fixed_size
pub struct NullableSortedMap<K, V, C = NaturalOrder> {
    raw: RawSortedList<K, V, C>,
    /// Value stored under the absent key. `None` means the slot is unset.
    null: Option<V>,
}

/// An iterator over the entries of a `NullableSortedMap`.
///
/// The entry stored under the absent key, if any, comes first; the remaining entries follow
/// in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`NullableSortedMap`].
///
/// [`iter`]: NullableSortedMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    null: Option<&'a V>,
    inner: slice::Iter<'a, (K, V)>,
}

/// An owning iterator over the entries of a `NullableSortedMap`.
///
/// This `struct` is created by the [`into_iter`] method on [`NullableSortedMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    null: Option<V>,
    inner: vec::IntoIter<(K, V)>,
}

impl<K, V> NullableSortedMap<K, V, NaturalOrder> {
    /// Makes a new, empty `NullableSortedMap` ordered by the natural order of `K`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::new();
    /// map.add(Some(1), "a").unwrap();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C> NullableSortedMap<K, V, C> {
    /// Makes a new, empty `NullableSortedMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// map.add(Some("ccc"), 3).unwrap();
    /// map.add(Some("a"), 1).unwrap();
    /// assert_eq!(map.first_key_value(), Some((Some(&"a"), &1)));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            raw: RawSortedList::new(Arc::new(comparator)),
            null: None,
        }
    }

    /// Returns the comparator ordering this map.
    #[must_use]
    pub fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns `true` if both maps are ordered by the very same comparator instance.
    ///
    /// Clones share their original's comparator.
    #[must_use]
    pub fn same_comparator(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.raw.comparator(), other.raw.comparator())
    }

    /// Returns the number of entries in the map, counting the absent key if it is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut a = NullableSortedMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.add(Some(1), "a").unwrap();
    /// a.add(None, "b").unwrap();
    /// assert_eq!(a.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len() + usize::from(self.null.is_some())
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.null.is_none() && self.raw.is_empty()
    }

    /// Returns `true` if every mutation of this map is rejected.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.raw.is_read_only()
    }

    /// Returns `true` if every change of length of this map is rejected.
    #[must_use]
    pub fn is_fixed_size(&self) -> bool {
        self.raw.is_fixed_size()
    }

    /// Freezes the map: every later mutation fails with [`Error::Unsupported`].
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::from([(Some(1), "a")]).into_read_only();
    /// assert!(map.insert(Some(1), "b").is_err());
    /// assert_eq!(map.get(Some(&1)), Some(&"a"));
    /// ```
    #[must_use]
    pub fn into_read_only(mut self) -> Self {
        log::trace!("map frozen as read-only with {} entries", self.len());
        self.raw.set_read_only();
        self
    }

    /// Freezes the map's length: values may still be replaced, but entries can no longer be
    /// added or removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::from([(None, 0), (Some(1), 1)]).into_fixed_size();
    /// assert_eq!(map.insert(None, 10), Ok(Some(0)));
    /// assert!(map.insert(Some(2), 2).is_err());
    /// assert!(map.remove(None).is_err());
    /// ```
    #[must_use]
    pub fn into_fixed_size(mut self) -> Self {
        log::trace!("map frozen as fixed-size with {} entries", self.len());
        self.raw.set_fixed_size();
        self
    }

    /// Clears the map, removing all entries including the absent key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] on a read-only or fixed-size map.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut a = NullableSortedMap::new();
    /// a.add(None, "a").unwrap();
    /// a.add(Some(1), "b").unwrap();
    /// a.clear().unwrap();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) -> Result<()> {
        self.raw.clear()?;
        self.null = None;
        log::trace!("map cleared");
        Ok(())
    }

    /// Returns `true` if the absent-key slot or any real entry holds `value`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.null.as_ref() == Some(value) || self.raw.contains_value(value)
    }

    /// Returns the first entry in iteration order: the absent key if set, otherwise the
    /// smallest real key.
    pub fn first_key_value(&self) -> Option<(Option<&K>, &V)> {
        match &self.null {
            Some(value) => Some((None, value)),
            None => self.raw.first().map(|(k, v)| (Some(k), v)),
        }
    }

    /// Returns the last entry in iteration order.
    pub fn last_key_value(&self) -> Option<(Option<&K>, &V)> {
        match self.raw.last() {
            Some((k, v)) => Some((Some(k), v)),
            None => self.null.as_ref().map(|value| (None, value)),
        }
    }

    /// Gets an iterator over the entries of the map: the absent key first, then the real keys
    /// in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let map = NullableSortedMap::from([(Some(3), "c"), (None, "n"), (Some(1), "a")]);
    /// let keys: Vec<_> = map.iter().map(|(k, _)| k.copied()).collect();
    /// assert_eq!(keys, [None, Some(1), Some(3)]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) per iteration step.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            null: self.null.as_ref(),
            inner: self.raw.iter(),
        }
    }

    /// Returns a positional cursor over the entries, placed before the first entry.
    ///
    /// See [`Cursor`] for the state machine it follows.
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.null.as_ref(), self.raw.cursor())
    }
}

impl<K, V, C: Comparator<K>> NullableSortedMap<K, V, C> {
    /// Creates a writable, resizable copy of `other` ordered by the same comparator instance.
    ///
    /// Unlike [`Clone`], the copy never inherits `other`'s read-only or fixed-size flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let frozen = NullableSortedMap::from([(None, 0), (Some(1), 1)]).into_read_only();
    /// let mut copy = NullableSortedMap::from_map(&frozen);
    /// copy.add(Some(2), 2).unwrap();
    /// assert!(copy.same_comparator(&frozen));
    /// assert_eq!(copy.len(), 3);
    /// ```
    #[must_use]
    pub fn from_map(other: &Self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let mut raw = RawSortedList::with_capacity(other.raw.len(), Arc::clone(other.raw.comparator()));
        for (key, value) in other.raw.iter() {
            raw.upsert(key.clone(), value.clone());
        }
        Self {
            raw,
            null: other.null.clone(),
        }
    }

    /// Creates a writable, resizable copy of `other` re-sorted under `comparator`.
    ///
    /// If `comparator` considers two of `other`'s keys equal, the later one in `other`'s order
    /// wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let ascending = NullableSortedMap::from([(Some(1), "a"), (Some(2), "b")]);
    /// let descending = NullableSortedMap::from_map_with_comparator(&ascending, |a: &i32, b: &i32| b.cmp(a));
    /// let keys: Vec<_> = descending.keys().iter().collect();
    /// assert_eq!(keys, [Some(&2), Some(&1)]);
    /// ```
    #[must_use]
    pub fn from_map_with_comparator<C2>(other: &NullableSortedMap<K, V, C2>, comparator: C) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let mut raw = RawSortedList::with_capacity(other.raw.len(), Arc::new(comparator));
        for (key, value) in other.raw.iter() {
            raw.upsert(key.clone(), value.clone());
        }
        Self {
            raw,
            null: other.null.clone(),
        }
    }

    /// Returns `true` if the map contains an entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::new();
    /// map.add(Some(1), "a").unwrap();
    /// assert!(map.contains_key(Some(&1)));
    /// assert!(!map.contains_key(None));
    /// map.add(None, "n").unwrap();
    /// assert!(map.contains_key(None));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key(&self, key: Option<&K>) -> bool {
        match key {
            Some(key) => self.raw.contains_key(key),
            None => self.null.is_some(),
        }
    }

    /// Returns a reference to the value stored under `key`, or `None` if `key` is missing.
    ///
    /// A missing key reads as `None`, never as an error. Because the stored value is wrapped
    /// in `Some`, a present key holding a "null-like" value stays distinguishable from a
    /// missing one.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map: NullableSortedMap<i32, Option<&str>> = NullableSortedMap::new();
    /// map.add(None, None).unwrap();
    /// assert_eq!(map.get(None), Some(&None));
    /// assert_eq!(map.get(Some(&1)), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, key: Option<&K>) -> Option<&V> {
        match key {
            Some(key) => self.raw.get(key),
            None => self.null.as_ref(),
        }
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: Option<&K>) -> Option<(Option<&K>, &V)> {
        match key {
            Some(key) => self.raw.get_key_value(key).map(|(k, v)| (Some(k), v)),
            None => self.null.as_ref().map(|value| (None, value)),
        }
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] on a read-only map.
    pub fn get_mut(&mut self, key: Option<&K>) -> Result<Option<&mut V>> {
        self.raw.check_writable("get_mut")?;
        Ok(match key {
            Some(key) => self.raw.get_mut(key),
            None => self.null.as_mut(),
        })
    }

    /// Adds a new entry.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateKey`] if an entry for `key` already exists. This applies to the
    ///   absent key exactly as it applies to real keys, and is reported even on a frozen map.
    /// - [`Error::Unsupported`] if the key is new and the map is read-only or fixed-size.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::{Error, NullableSortedMap};
    ///
    /// let mut map = NullableSortedMap::new();
    /// assert_eq!(map.add(None, 1), Ok(()));
    /// assert_eq!(map.add(None, 2), Err(Error::DuplicateKey));
    /// assert_eq!(map.add(Some("k"), 3), Ok(()));
    /// assert_eq!(map.add(Some("k"), 4), Err(Error::DuplicateKey));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) in the worst case, for shifting the sorted entries.
    pub fn add(&mut self, key: Option<K>, value: V) -> Result<()> {
        match key {
            Some(key) => self.raw.insert(key, value),
            None => {
                if self.null.is_some() {
                    return Err(Error::DuplicateKey);
                }
                self.raw.check_resizable("add")?;
                self.null = Some(value);
                Ok(())
            }
        }
    }

    /// Sets the value stored under `key`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] if the map is read-only, or if it is fixed-size and
    /// `key` is not already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::new();
    /// assert_eq!(map.insert(None, "a"), Ok(None));
    /// assert_eq!(map.insert(None, "b"), Ok(Some("a")));
    /// assert_eq!(map.insert(Some(37), "c"), Ok(None));
    /// assert_eq!(map.get(None), Some(&"b"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to replace, O(n) in the worst case to add.
    pub fn insert(&mut self, key: Option<K>, value: V) -> Result<Option<V>> {
        match key {
            Some(key) => self.raw.set(key, value),
            None => {
                self.raw.check_writable("insert")?;
                if self.null.is_none() {
                    self.raw.check_resizable("insert")?;
                }
                Ok(self.null.replace(value))
            }
        }
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// Removing a missing key, including an unset absent key, is a no-op.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] if `key` is present and the map is read-only or
    /// fixed-size.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::from([(Some(1), "a")]);
    /// assert_eq!(map.remove(None), Ok(None));
    /// assert_eq!(map.remove(Some(&1)), Ok(Some("a")));
    /// assert_eq!(map.remove(Some(&1)), Ok(None));
    /// ```
    pub fn remove(&mut self, key: Option<&K>) -> Result<Option<V>> {
        Ok(self.remove_entry(key)?.map(|(_, value)| value))
    }

    /// Removes `key` from the map, returning the stored key and value if it was present.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] if `key` is present and the map is read-only or
    /// fixed-size.
    pub fn remove_entry(&mut self, key: Option<&K>) -> Result<Option<(Option<K>, V)>> {
        match key {
            Some(key) => Ok(self.raw.remove(key)?.map(|(k, v)| (Some(k), v))),
            None => {
                if self.null.is_none() {
                    return Ok(None);
                }
                self.raw.check_resizable("remove")?;
                Ok(self.null.take().map(|value| (None, value)))
            }
        }
    }

    /// Retains only the entries for which `f` returns `true`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] on a read-only or fixed-size map.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map: NullableSortedMap<i32, i32> = (0..8).map(|x| (Some(x), x * 10)).collect();
    /// map.add(None, 1).unwrap();
    /// map.retain(|k, _| k.is_some_and(|k| k % 2 == 0)).unwrap();
    /// assert!(map.keys().iter().eq([Some(&0), Some(&2), Some(&4), Some(&6)]));
    /// ```
    pub fn retain<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(Option<&K>, &mut V) -> bool,
    {
        self.raw.check_resizable("retain")?;
        let drop_null = match self.null.as_mut() {
            Some(value) => !f(None, value),
            None => false,
        };
        if drop_null {
            self.null = None;
        }
        self.raw.retain(|k, v| f(Some(k), v));
        Ok(())
    }

    /// Returns a live view of the map's keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let mut map = NullableSortedMap::new();
    /// map.add(Some(2), "b").unwrap();
    /// map.add(None, "n").unwrap();
    /// let keys: Vec<_> = map.keys().iter().collect();
    /// assert_eq!(keys, [None, Some(&2)]);
    /// ```
    pub fn keys(&self) -> Keys<'_, Self> {
        Keys::new(self)
    }

    /// Returns a live view of the map's values, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let map = NullableSortedMap::from([(Some(1), "hello"), (None, "first")]);
    /// let values: Vec<_> = map.values().iter().copied().collect();
    /// assert_eq!(values, ["first", "hello"]);
    /// ```
    pub fn values(&self) -> Values<'_, Self> {
        Values::new(self)
    }

    /// Returns an order-independent hash of the map's contents.
    ///
    /// Every entry contributes `(key_hash * M) ^ value_hash` for a fixed odd multiplier `M`,
    /// the absent key hashing as `0`; contributions are summed with wrapping arithmetic. The
    /// result is stable across calls and processes.
    ///
    /// Equal maps produce equal hashes only if the comparator agrees with `K`'s [`Hash`]: two
    /// keys the comparator calls equal must hash alike. A case-insensitive comparator over
    /// `String` keys breaks this; normalize such keys before inserting them.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let a = NullableSortedMap::from([(None, 1), (Some(2), 2)]);
    /// let b = a.clone();
    /// assert_eq!(a.value_hash(), b.value_hash());
    /// ```
    pub fn value_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        self.iter().fold(0u64, |acc, (key, value)| {
            let key_hash = key.map_or(0, fx_hash);
            acc.wrapping_add(key_hash.wrapping_mul(KEY_HASH_MULTIPLIER) ^ fx_hash(value))
        })
    }
}

fn fx_hash<T: ?Sized + Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

impl<K: Clone, V: Clone, C> Clone for NullableSortedMap<K, V, C> {
    /// Copies every entry into new storage. Values are cloned, the comparator instance is
    /// shared, and the read-only and fixed-size flags carry over.
    fn clone(&self) -> Self {
        NullableSortedMap {
            raw: self.raw.clone(),
            null: self.null.clone(),
        }
    }
}

impl<K, V: PartialEq, C: Comparator<K>> PartialEq for NullableSortedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        // Each lookup tells "missing" apart from "present", so a key of `other` that is absent
        // here can never match a stored value.
        self.len() == other.len()
            && other.iter().all(|(key, value)| match self.get(key) {
                Some(mine) => mine == value,
                None => false,
            })
    }
}

impl<K, V: Eq, C: Comparator<K>> Eq for NullableSortedMap<K, V, C> {}

/// Feeds [`value_hash`](NullableSortedMap::value_hash) to the hasher. Agrees with [`PartialEq`]
/// under the same condition: the comparator must be consistent with `K`'s [`Hash`].
impl<K: Hash, V: Hash, C: Comparator<K>> Hash for NullableSortedMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.value_hash());
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for NullableSortedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for NullableSortedMap<K, V, C> {
    /// Writes every entry in iteration order, e.g. `{<null>: x, a: 1, b: 2}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match key {
                Some(key) => write!(f, "{key}: {value}")?,
                None => write!(f, "<null>: {value}")?,
            }
        }
        f.write_str("}")
    }
}

impl<K, V, C: Default> Default for NullableSortedMap<K, V, C> {
    fn default() -> Self {
        NullableSortedMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(Option<K>, V)> for NullableSortedMap<K, V, C> {
    /// Builds a map from key-value pairs. A repeated key keeps the last value.
    fn from_iter<T: IntoIterator<Item = (Option<K>, V)>>(iter: T) -> Self {
        let mut map = NullableSortedMap::default();
        for (key, value) in iter {
            match key {
                Some(key) => {
                    map.raw.upsert(key, value);
                }
                None => map.null = Some(value),
            }
        }
        map
    }
}

impl<K: Ord, V, const N: usize> From<[(Option<K>, V); N]> for NullableSortedMap<K, V> {
    fn from(arr: [(Option<K>, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, C> IntoIterator for &'a NullableSortedMap<K, V, C> {
    type Item = (Option<&'a K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for NullableSortedMap<K, V, C> {
    type Item = (Option<K>, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, absent key first.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    ///
    /// let map = NullableSortedMap::from([(Some(2), "b"), (None, "n")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((None, "n")));
    /// assert_eq!(iter.next(), Some((Some(2), "b")));
    /// assert_eq!(iter.next(), None);
    /// ```
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            null: self.null,
            inner: self.raw.into_entries().into_iter(),
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (Option<&'a K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.null.take() {
            return Some((None, value));
        }
        self.inner.next().map(|(k, v)| (Some(k), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.inner.next_back() {
            Some((k, v)) => Some((Some(k), v)),
            None => self.null.take().map(|value| (None, value)),
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len() + usize::from(self.null.is_some())
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            null: self.null,
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `nullable_sorted_map::Iter`.
    ///
    /// ```
    /// # use nullable_sorted_map::nullable_map::Iter;
    /// let iter: Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            null: None,
            inner: [].iter(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (Option<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.null.take() {
            return Some((None, value));
        }
        self.inner.next().map(|(k, v)| (Some(k), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.inner.next_back() {
            Some((k, v)) => Some((Some(k), v)),
            None => self.null.take().map(|value| (None, value)),
        }
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len() + usize::from(self.null.is_some())
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("null", &self.null)
            .field("remaining", &self.inner.as_slice())
            .finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    fn default() -> Self {
        IntoIter {
            null: None,
            inner: vec::IntoIter::default(),
        }
    }
}
