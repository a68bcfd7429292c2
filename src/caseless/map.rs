//! The normalizing map
//!
//! [`NormalizingMap`] stores entries under the normalized form of their keys.
//! Every path that introduces or looks up a key (construction, item access,
//! membership, merge, default-insertion) first converts the raw key with
//! [`IntoKey`] and then runs it through the map's [`KeyNormalizer`].
//!
//! All writes funnel through one insertion routine, which is also where the
//! `keys_must_be_string` constraint is enforced. A rejected key never mutates
//! the map.
//!
//! Iteration follows insertion order of distinct normalized keys. Overwriting
//! an entry keeps its position; removing one keeps the order of the rest.

use super::cases::Case;
use super::error::MapError;
use super::key::{IntoKey, Key};
use super::normalizer::KeyNormalizer;
use super::settings::FlavorSettings;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use tracing::{debug, trace};

/// A map whose keys are stored and compared in normalized form
#[derive(Clone)]
pub struct NormalizingMap<V> {
    entries: IndexMap<Key, V>,
    normalizer: KeyNormalizer,
    keys_must_be_string: bool,
}

impl<V> NormalizingMap<V> {
    /// An empty map using `normalizer`
    pub fn new(normalizer: KeyNormalizer) -> Self {
        NormalizingMap {
            entries: IndexMap::new(),
            normalizer,
            keys_must_be_string: false,
        }
    }

    /// An empty map of the given case flavor
    pub fn with_case(case: Case) -> Self {
        Self::new(case.normalizer())
    }

    /// An empty map configured from settings
    pub fn from_settings(settings: &FlavorSettings) -> Self {
        Self::with_case(settings.case).keys_must_be_string(settings.keys_must_be_string)
    }

    pub fn case_fold() -> Self {
        Self::with_case(Case::Fold)
    }

    pub fn lower() -> Self {
        Self::with_case(Case::Lower)
    }

    pub fn upper() -> Self {
        Self::with_case(Case::Upper)
    }

    pub fn title() -> Self {
        Self::with_case(Case::Title)
    }

    pub fn snake() -> Self {
        Self::with_case(Case::Snake)
    }

    pub fn kebab() -> Self {
        Self::with_case(Case::Kebab)
    }

    pub fn constant() -> Self {
        Self::with_case(Case::Constant)
    }

    /// Builder-style toggle of the string-only constraint
    pub fn keys_must_be_string(mut self, enabled: bool) -> Self {
        self.keys_must_be_string = enabled;
        self
    }

    /// A map filled from pairs (or any existing mapping), in iteration order
    ///
    /// Keys that normalize to the same value collapse into one entry holding
    /// the last value seen.
    pub fn from_pairs<I, K>(normalizer: KeyNormalizer, pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoKey,
    {
        let mut map = Self::new(normalizer);
        map.update(pairs)?;
        Ok(map)
    }

    /// A map filled from named fields
    pub fn from_fields<F, S>(normalizer: KeyNormalizer, fields: F) -> Result<Self, MapError>
    where
        F: IntoIterator<Item = (S, V)>,
        S: Into<String>,
    {
        let mut map = Self::new(normalizer);
        map.update_fields(fields)?;
        Ok(map)
    }

    /// A map filled from a source of pairs followed by named fields
    pub fn from_parts<I, K, F, S>(
        normalizer: KeyNormalizer,
        source: I,
        fields: F,
    ) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoKey,
        F: IntoIterator<Item = (S, V)>,
        S: Into<String>,
    {
        let mut map = Self::new(normalizer);
        map.merge(source, fields)?;
        Ok(map)
    }

    /// A map with every key from `keys` mapped to a clone of `default`
    pub fn from_keys<I, K>(normalizer: KeyNormalizer, keys: I, default: V) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = K>,
        K: IntoKey,
        V: Clone,
    {
        Self::from_pairs(
            normalizer,
            keys.into_iter().map(|key| (key, default.clone())),
        )
    }

    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }

    pub fn is_keys_must_be_string(&self) -> bool {
        self.keys_must_be_string
    }

    /// Toggle the string-only constraint. Existing entries are kept as they are.
    pub fn set_keys_must_be_string(&mut self, enabled: bool) {
        self.keys_must_be_string = enabled;
    }

    /// The key an entry for `key` is (or would be) stored under
    pub fn normalize_key<K: IntoKey>(&self, key: K) -> Result<Key, MapError> {
        Ok(self.normalizer.normalize(key.into_key()?))
    }

    /// Value for `key`, failing with [`MapError::KeyNotFound`] when absent
    pub fn get_item<K: IntoKey>(&self, key: K) -> Result<&V, MapError> {
        let original = key.into_key()?;
        let normalized = self.normalizer.normalize(original.clone());
        self.entries
            .get(&normalized)
            .ok_or(MapError::KeyNotFound(original))
    }

    /// Value for `key`, if any. Unhashable keys are never present.
    pub fn get<K: IntoKey>(&self, key: K) -> Option<&V> {
        let normalized = self.normalize_key(key).ok()?;
        self.entries.get(&normalized)
    }

    pub fn get_mut<K: IntoKey>(&mut self, key: K) -> Option<&mut V> {
        let normalized = self.normalize_key(key).ok()?;
        self.entries.get_mut(&normalized)
    }

    /// Value for `key`, or `default` when absent. Never mutates the map.
    pub fn get_or<'a, K: IntoKey>(&'a self, key: K, default: &'a V) -> Result<&'a V, MapError> {
        let normalized = self.normalize_key(key)?;
        Ok(self.entries.get(&normalized).unwrap_or(default))
    }

    /// Insert or overwrite the entry for `key`, returning the previous value
    pub fn set_item<K: IntoKey>(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        let (_, previous) = self.insert_key(key.into_key()?, value)?;
        Ok(previous)
    }

    /// Remove the entry for `key`, failing with [`MapError::KeyNotFound`] when absent
    pub fn del_item<K: IntoKey>(&mut self, key: K) -> Result<V, MapError> {
        self.pop(key)
    }

    pub fn contains<K: IntoKey>(&self, key: K) -> Result<bool, MapError> {
        let normalized = self.normalize_key(key)?;
        Ok(self.entries.contains_key(&normalized))
    }

    /// Remove and return the entry for `key`
    pub fn pop<K: IntoKey>(&mut self, key: K) -> Result<V, MapError> {
        let original = key.into_key()?;
        let normalized = self.normalizer.normalize(original.clone());
        self.entries
            .shift_remove(&normalized)
            .ok_or(MapError::KeyNotFound(original))
    }

    /// Remove and return the entry for `key`, or `fallback` when absent
    pub fn pop_or<K: IntoKey>(&mut self, key: K, fallback: V) -> Result<V, MapError> {
        let normalized = self.normalize_key(key)?;
        Ok(self.entries.shift_remove(&normalized).unwrap_or(fallback))
    }

    /// Remove and return the most recently inserted entry
    pub fn popitem(&mut self) -> Result<(Key, V), MapError> {
        self.entries.pop().ok_or(MapError::EmptyMap)
    }

    /// Value for `key`, inserting `default` first when absent
    pub fn set_default<K: IntoKey>(&mut self, key: K, default: V) -> Result<&mut V, MapError> {
        let original = key.into_key()?;
        self.check_key(&original)?;
        let normalized = self.normalizer.normalize(original);
        Ok(self.entries.entry(normalized).or_insert(default))
    }

    /// Insert every pair from `source`, as if set one at a time
    ///
    /// Stops at the first rejected key; pairs before it stay applied.
    pub fn update<I, K>(&mut self, source: I) -> Result<(), MapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoKey,
    {
        for (key, value) in source {
            self.insert_bulk(key.into_key()?, value)?;
        }
        Ok(())
    }

    /// Insert every named field, as if set one at a time
    pub fn update_fields<F, S>(&mut self, fields: F) -> Result<(), MapError>
    where
        F: IntoIterator<Item = (S, V)>,
        S: Into<String>,
    {
        for (name, value) in fields {
            self.insert_bulk(Key::Str(name.into()), value)?;
        }
        Ok(())
    }

    /// Insert pairs from `source`, then the named `fields`
    pub fn merge<I, K, F, S>(&mut self, source: I, fields: F) -> Result<(), MapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoKey,
        F: IntoIterator<Item = (S, V)>,
        S: Into<String>,
    {
        self.update(source)?;
        self.update_fields(fields)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, V> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, Key, V> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Key, V> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, Key, V> {
        self.entries.values_mut()
    }

    /// A plain snapshot of the entries, keyed by normalized key
    pub fn to_hash_map(&self) -> HashMap<Key, V>
    where
        V: Clone,
    {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn check_key(&self, original: &Key) -> Result<(), MapError> {
        if self.keys_must_be_string && !original.is_str() {
            debug!(key = %original, kind = original.kind(), "rejected non-string key");
            return Err(MapError::TypeWildcardRejected(original.clone()));
        }
        Ok(())
    }

    /// The single write path: check, normalize, store
    fn insert_key(&mut self, original: Key, value: V) -> Result<(usize, Option<V>), MapError> {
        self.check_key(&original)?;
        let normalized = self.normalizer.normalize(original);
        Ok(self.entries.insert_full(normalized, value))
    }

    fn insert_bulk(&mut self, original: Key, value: V) -> Result<(), MapError> {
        let (index, previous) = self.insert_key(original, value)?;
        if previous.is_some() {
            if let Some((key, _)) = self.entries.get_index(index) {
                trace!(%key, "normalized key seen again; later value wins");
            }
        }
        Ok(())
    }
}

impl<V> Default for NormalizingMap<V> {
    fn default() -> Self {
        Self::new(KeyNormalizer::default())
    }
}

impl<V: fmt::Debug> fmt::Debug for NormalizingMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Maps are equal when they hold the same normalized entries, in any order
impl<V: PartialEq> PartialEq for NormalizingMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: PartialEq> PartialEq<HashMap<Key, V>> for NormalizingMap<V> {
    fn eq(&self, other: &HashMap<Key, V>) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |o| o == v))
    }
}

impl<V> Index<&str> for NormalizingMap<V> {
    type Output = V;

    /// Panics when no entry exists for the normalized key
    fn index(&self, key: &str) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", MapError::KeyNotFound(Key::Str(key.to_string()))),
        }
    }
}

impl<V> IntoIterator for NormalizingMap<V> {
    type Item = (Key, V);
    type IntoIter = indexmap::map::IntoIter<Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a NormalizingMap<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = indexmap::map::Iter<'a, Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V: Serialize> Serialize for NormalizingMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
