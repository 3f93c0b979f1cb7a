use core::fmt;

use thiserror::Error as ThisError;

/// Result type used by every fallible operation in this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The reason a mutation was refused.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Restriction {
    /// The map has been frozen with [`into_read_only`](crate::NullableSortedMap::into_read_only).
    ReadOnly,
    /// The map has been frozen with [`into_fixed_size`](crate::NullableSortedMap::into_fixed_size)
    /// and the operation would change its length.
    FixedSize,
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::ReadOnly => f.write_str("read-only"),
            Restriction::FixedSize => f.write_str("fixed-size"),
        }
    }
}

/// Errors produced by [`NullableSortedMap`](crate::NullableSortedMap), its views and its cursor.
///
/// A failed operation never leaves the map partially mutated.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    /// An entry with the same key (reserved or not) is already present.
    #[error("an entry with the same key already exists")]
    DuplicateKey,

    /// A mutation was refused because the map is frozen.
    #[error("`{operation}` is not supported on a {restriction} map")]
    Unsupported {
        /// Name of the refused method, e.g. `"add"`.
        operation: &'static str,
        /// How the map is frozen.
        restriction: Restriction,
    },

    /// A cursor was read while not positioned on an entry.
    #[error("cursor is not positioned on an entry")]
    InvalidState,

    /// An argument was rejected before anything was written; the payload says which check
    /// failed.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A start index lies past the end of a destination slice.
    #[error("index {index} is out of range for a target of length {len}")]
    OutOfRange {
        /// The rejected start index.
        index: usize,
        /// Length of the destination slice.
        len: usize,
    },
}

impl Error {
    pub(crate) fn unsupported(operation: &'static str, restriction: Restriction) -> Self {
        log::debug!("rejected `{operation}` on {restriction} map");
        Error::Unsupported {
            operation,
            restriction,
        }
    }
}
