use core::cmp::Ordering;

/// A total order over keys.
///
/// Every `Fn(&K, &K) -> Ordering` closure is a comparator, so a map ordered in reverse can be
/// built without a named type:
///
/// ```
/// use nullable_sorted_map::NullableSortedMap;
///
/// let mut map = NullableSortedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// map.add(Some(1), "one").unwrap();
/// map.add(Some(2), "two").unwrap();
/// let keys: Vec<_> = map.keys().iter().collect();
/// assert_eq!(keys, [Some(&2), Some(&1)]);
/// ```
///
/// It is a logic error for a comparator to be inconsistent (not a total order) or to change its
/// answer while keys are in the map. The behavior is not specified but stays confined to the map.
///
/// Map hashing goes through `K`'s [`Hash`](core::hash::Hash), not through the comparator. Keys a
/// comparator orders as [`Ordering::Equal`] must therefore hash alike, or two maps that compare
/// equal may hash differently.
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The natural [`Ord`] ordering of the key type. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct NaturalOrder;

impl<K: ?Sized + Ord> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
