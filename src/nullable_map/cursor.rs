use core::fmt;

use crate::error::{Error, Result};
use crate::raw::RawCursor;

/// Where a [`Cursor`] currently stands.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CursorPosition {
    /// Initial state; no entry has been visited yet.
    BeforeFirst,
    /// On the entry stored under the absent key.
    AbsentKey,
    /// On a real entry, delegated to the sorted storage's own cursor.
    Sorted,
    /// Every entry has been visited. Terminal until [`Cursor::reset`].
    AfterLast,
}

/// A positional cursor over the entries of a `NullableSortedMap`.
///
/// The cursor is a small state machine:
///
/// ```text
/// BeforeFirst --move_next--> AbsentKey   (only if the absent key is set)
/// BeforeFirst --move_next--> Sorted      (otherwise, if any real entry exists)
/// AbsentKey   --move_next--> Sorted | AfterLast
/// Sorted      --move_next--> Sorted | AfterLast
/// any         --reset----->  BeforeFirst
/// ```
///
/// Reading the current entry outside of `AbsentKey`/`Sorted` fails with
/// [`Error::InvalidState`]. The key, value and pair accessors all read the entry captured by the
/// last successful [`move_next`](Cursor::move_next).
///
/// This `struct` is created by the [`cursor`] method on [`NullableSortedMap`].
///
/// # Examples
///
/// ```
/// use nullable_sorted_map::{CursorPosition, Error, NullableSortedMap};
///
/// let map = NullableSortedMap::from([(Some(1), "a"), (None, "n")]);
/// let mut cursor = map.cursor();
/// assert_eq!(cursor.current(), Err(Error::InvalidState));
///
/// assert!(cursor.move_next());
/// assert_eq!(cursor.position(), CursorPosition::AbsentKey);
/// assert_eq!(cursor.key(), Ok(None));
///
/// assert!(cursor.move_next());
/// assert_eq!(cursor.current(), Ok((Some(&1), &"a")));
///
/// assert!(!cursor.move_next());
/// assert_eq!(cursor.position(), CursorPosition::AfterLast);
/// ```
///
/// [`cursor`]: crate::NullableSortedMap::cursor
/// [`NullableSortedMap`]: crate::NullableSortedMap
pub struct Cursor<'a, K, V> {
    null: Option<&'a V>,
    sorted: RawCursor<'a, K, V>,
    position: CursorPosition,
    current: Option<(Option<&'a K>, &'a V)>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(super) fn new(null: Option<&'a V>, sorted: RawCursor<'a, K, V>) -> Self {
        Cursor {
            null,
            sorted,
            position: CursorPosition::BeforeFirst,
            current: None,
        }
    }

    /// Advances to the next entry. Returns `false` once every entry has been visited.
    pub fn move_next(&mut self) -> bool {
        match self.position {
            CursorPosition::BeforeFirst => match self.null {
                Some(value) => {
                    self.position = CursorPosition::AbsentKey;
                    self.current = Some((None, value));
                    true
                }
                None => self.advance_sorted(),
            },
            CursorPosition::AbsentKey | CursorPosition::Sorted => self.advance_sorted(),
            CursorPosition::AfterLast => false,
        }
    }

    fn advance_sorted(&mut self) -> bool {
        let entry = if self.sorted.move_next() {
            self.sorted.current()
        } else {
            None
        };
        match entry {
            Some((key, value)) => {
                self.position = CursorPosition::Sorted;
                self.current = Some((Some(key), value));
                true
            }
            None => {
                self.position = CursorPosition::AfterLast;
                self.current = None;
                false
            }
        }
    }

    /// Returns the cursor to [`CursorPosition::BeforeFirst`].
    pub fn reset(&mut self) {
        self.sorted.reset();
        self.position = CursorPosition::BeforeFirst;
        self.current = None;
    }

    /// Returns where the cursor currently stands.
    #[must_use]
    pub fn position(&self) -> CursorPosition {
        self.position
    }

    /// Returns the current entry.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidState`] before the first entry or after the last one.
    pub fn current(&self) -> Result<(Option<&'a K>, &'a V)> {
        self.current.ok_or(Error::InvalidState)
    }

    /// Returns the current key; `None` is the absent key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidState`] before the first entry or after the last one.
    pub fn key(&self) -> Result<Option<&'a K>> {
        self.current().map(|(key, _)| key)
    }

    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidState`] before the first entry or after the last one.
    pub fn value(&self) -> Result<&'a V> {
        self.current().map(|(_, value)| value)
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            null: self.null,
            sorted: self.sorted.clone(),
            position: self.position,
            current: self.current,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("current", &self.current)
            .finish()
    }
}
