//! The boundary between a map's key set and an index-assisted filter.
//!
//! This module does not implement any filter. It fixes the narrow contract a filter must meet
//! when it is handed the keys of a [`NullableSortedMap`]:
//!
//! 1. [`IndexFilter::effectiveness`] estimates how many index lookups resolving the filter
//!    would take for the given indexes and candidates. `Some(1)` means a single lookup fully
//!    resolves it; `None` means the indexes cannot help.
//! 2. [`IndexFilter::apply`] prunes every candidate key the indexes definitively exclude, and
//!    returns either nothing (the remaining candidates are exactly the matches) or a residual
//!    predicate that must still be checked against each remaining entry.
//!
//! [`NullableSortedMap::select`] drives that protocol, falling back to plain iteration through
//! [`EntryPredicate::matches`] whenever pruning would cost at least as much as visiting every
//! entry.

use alloc::vec::Vec;
use core::fmt;

use crate::comparator::Comparator;
use crate::nullable_map::{EntrySource, Keys, NullableSortedMap};

/// A predicate over single entries, with the absent key represented as `None`.
pub trait EntryPredicate<K, V> {
    fn matches(&self, key: Option<&K>, value: &V) -> bool;
}

impl<K, V, F> EntryPredicate<K, V> for F
where
    F: Fn(Option<&K>, &V) -> bool,
{
    fn matches(&self, key: Option<&K>, value: &V) -> bool {
        self(key, value)
    }
}

/// A filter that may use external indexes to prune a map's candidate keys.
pub trait IndexFilter<K, V>: EntryPredicate<K, V> {
    /// The set of indexes available to the filter.
    type Indexes: ?Sized;
    /// What is left to check once the indexes have done their part.
    type Residual: EntryPredicate<K, V>;

    /// Estimated number of index lookups needed to resolve the filter over `candidates`.
    fn effectiveness(&self, indexes: &Self::Indexes, candidates: &CandidateKeys<'_, K>) -> Option<usize>;

    /// Removes every candidate the indexes exclude. Returns `None` when the remaining
    /// candidates are exactly the matches.
    fn apply(&self, indexes: &Self::Indexes, candidates: &mut CandidateKeys<'_, K>) -> Option<Self::Residual>;
}

/// A mutable set of candidate keys borrowed from a map.
///
/// Keys keep the map's iteration order: the absent key first, then real keys ascending. The
/// set does not carry the map's comparator, so [`contains`](CandidateKeys::contains) and
/// [`remove`](CandidateKeys::remove) compare real keys with `PartialEq` and take O(n); filters
/// pruning many keys should prefer a single [`retain`](CandidateKeys::retain) pass.
pub struct CandidateKeys<'a, K> {
    null: bool,
    keys: Vec<&'a K>,
}

impl<'a, K> CandidateKeys<'a, K> {
    /// Collects every key currently in `view`.
    pub fn from_view<S>(view: Keys<'a, S>) -> Self
    where
        S: EntrySource<Key = K> + ?Sized,
    {
        let mut null = false;
        let mut keys = Vec::with_capacity(view.len());
        for key in view.iter() {
            match key {
                Some(key) => keys.push(key),
                None => null = true,
            }
        }
        CandidateKeys { null, keys }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len() + usize::from(self.null)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.null && self.keys.is_empty()
    }

    /// Returns `true` if the absent key is still a candidate.
    #[must_use]
    pub fn contains_absent(&self) -> bool {
        self.null
    }

    /// Returns `true` if `key` is still a candidate.
    ///
    /// # Complexity
    ///
    /// O(n) for a real key, O(1) for the absent key.
    pub fn contains(&self, key: Option<&K>) -> bool
    where
        K: PartialEq,
    {
        match key {
            Some(key) => self.keys.iter().any(|candidate| *candidate == key),
            None => self.null,
        }
    }

    /// Iterates the remaining candidates.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'a K>> + '_ {
        self.null
            .then_some(None)
            .into_iter()
            .chain(self.keys.iter().map(|key| Some(*key)))
    }

    /// Removes `key`, returning `true` if it was a candidate.
    ///
    /// # Complexity
    ///
    /// O(n) for a real key, O(1) for the absent key.
    pub fn remove(&mut self, key: Option<&K>) -> bool
    where
        K: PartialEq,
    {
        match key {
            Some(key) => match self.keys.iter().position(|candidate| *candidate == key) {
                Some(index) => {
                    self.keys.remove(index);
                    true
                }
                None => false,
            },
            None => core::mem::replace(&mut self.null, false),
        }
    }

    /// Keeps only the candidates for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(Option<&K>) -> bool,
    {
        if self.null && !f(None) {
            self.null = false;
        }
        self.keys.retain(|key| f(Some(*key)));
    }
}

impl<K: fmt::Debug> fmt::Debug for CandidateKeys<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, V, C: Comparator<K>> NullableSortedMap<K, V, C> {
    /// Returns the entries accepted by `filter`, in iteration order.
    ///
    /// When the filter's [`effectiveness`](IndexFilter::effectiveness) is lower than the number
    /// of candidate keys, the map's keys are handed to [`apply`](IndexFilter::apply) for pruning
    /// and only the survivors are visited (and checked against the residual predicate, if any).
    /// Otherwise every entry is checked directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use nullable_sorted_map::NullableSortedMap;
    /// use nullable_sorted_map::filter::{CandidateKeys, EntryPredicate, IndexFilter};
    ///
    /// /// Matches one exact key, which an index over keys finds in a single lookup.
    /// struct KeyIs(i32);
    ///
    /// impl EntryPredicate<i32, i32> for KeyIs {
    ///     fn matches(&self, key: Option<&i32>, _: &i32) -> bool {
    ///         key == Some(&self.0)
    ///     }
    /// }
    ///
    /// impl IndexFilter<i32, i32> for KeyIs {
    ///     type Indexes = ();
    ///     type Residual = fn(Option<&i32>, &i32) -> bool;
    ///
    ///     fn effectiveness(&self, _: &(), _: &CandidateKeys<'_, i32>) -> Option<usize> {
    ///         Some(1)
    ///     }
    ///
    ///     fn apply(&self, _: &(), candidates: &mut CandidateKeys<'_, i32>) -> Option<Self::Residual> {
    ///         candidates.retain(|key| key == Some(&self.0));
    ///         None
    ///     }
    /// }
    ///
    /// let map = NullableSortedMap::from([(None, 0), (Some(1), 10), (Some(2), 20)]);
    /// assert_eq!(map.select(&KeyIs(2), &()), [(Some(&2), &20)]);
    /// ```
    pub fn select<F>(&self, filter: &F, indexes: &F::Indexes) -> Vec<(Option<&K>, &V)>
    where
        F: IndexFilter<K, V>,
    {
        let mut candidates = CandidateKeys::from_view(self.keys());
        match filter.effectiveness(indexes, &candidates) {
            Some(cost) if cost < candidates.len() => {
                log::trace!("pruning {} candidate keys with an estimated {cost} index lookups", candidates.len());
                let residual = filter.apply(indexes, &mut candidates);
                candidates
                    .iter()
                    .filter_map(|key| self.get_key_value(key))
                    .filter(|(key, value)| residual.as_ref().is_none_or(|residual| residual.matches(*key, value)))
                    .collect()
            }
            _ => self.iter().filter(|(key, value)| filter.matches(*key, value)).collect(),
        }
    }
}
