//! Serde support.
//!
//! A map is written as a three-part sequence: the real entries as `[key, value]` pairs in
//! ascending key order, a flag telling whether the absent key is set, and the absent key's
//! value only when the flag is `true`. In JSON:
//!
//! ```text
//! [[["a",1],["b",2]],true,"x"]
//! [[["a",1]],false]
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::NullableSortedMap;
use crate::comparator::Comparator;

impl<K, V, C> Serialize for NullableSortedMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.null.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(self.raw.entries())?;
        seq.serialize_element(&self.null.is_some())?;
        if let Some(value) = &self.null {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct NullableSortedMapVisitor<K, V, C> {
    marker: PhantomData<fn() -> NullableSortedMap<K, V, C>>,
}

impl<K, V, C> NullableSortedMapVisitor<K, V, C> {
    const fn new() -> Self {
        Self { marker: PhantomData }
    }
}

impl<'de, K, V, C> Visitor<'de> for NullableSortedMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = NullableSortedMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of [entries, has_null, null value]")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let entries: Vec<(K, V)> = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let has_null: bool = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;

        // Entries go in in the order they were written; a repeated key is malformed input.
        let mut map = NullableSortedMap::with_capacity_and_comparator(entries.len(), C::default());
        for (key, value) in entries {
            map.raw.insert(key, value).map_err(de::Error::custom)?;
        }
        if has_null {
            let value: V = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(2, &self))?;
            map.null = Some(value);
        }

        log::trace!("deserialized map with {} entries", map.len());
        Ok(map)
    }
}

impl<'de, K, V, C> Deserialize<'de> for NullableSortedMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(NullableSortedMapVisitor::new())
    }
}
