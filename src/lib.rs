//! A sorted map with room for one more key: the absent key.
//!
//! This crate provides [`NullableSortedMap`], an ordered, key-unique map whose key space is
//! `Option<K>`. Real keys (`Some(k)`) are kept sorted by a [`Comparator`]; the absent key
//! (`None`) is stored in a dedicated slot and always comes first in iteration order.
//!
//! - [`keys`](NullableSortedMap::keys) and [`values`](NullableSortedMap::values) - Live views
//!   that borrow the map and never copy it
//! - [`cursor`](NullableSortedMap::cursor) - A positional [`Cursor`] with explicit before-first
//!   and after-last states
//! - [`into_read_only`](NullableSortedMap::into_read_only) /
//!   [`into_fixed_size`](NullableSortedMap::into_fixed_size) - Freeze a map; rejected mutations
//!   return [`Error::Unsupported`] and leave the map untouched
//! - [`filter`] - The contract a map's key set follows when handed to an index-assisted filter
//!
//! # Example
//!
//! ```
//! use nullable_sorted_map::{Error, NullableSortedMap};
//!
//! let mut scores = NullableSortedMap::new();
//! scores.add(Some("Carol"), 92).unwrap();
//! scores.add(Some("Alice"), 100).unwrap();
//! scores.add(None, 0).unwrap(); // unassigned score
//!
//! // The absent key is a key like any other...
//! assert_eq!(scores.get(None), Some(&0));
//! assert_eq!(scores.add(None, 1), Err(Error::DuplicateKey));
//! assert_eq!(scores.len(), 3);
//!
//! // ...that always sorts first.
//! let names: Vec<_> = scores.keys().iter().collect();
//! assert_eq!(names, [None, Some(&"Alice"), Some(&"Carol")]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **`serde`** (default) - Serialization as `[entries, has_null, null value]`

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod comparator;
mod error;
mod raw;

pub mod filter;
pub mod nullable_map;

pub use comparator::{Comparator, NaturalOrder};
pub use error::{Error, Restriction, Result};
pub use nullable_map::{Cursor, CursorPosition, NullableSortedMap};
