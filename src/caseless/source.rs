//! Dynamic construction sources
//!
//! A JSON document can feed a map the way a loosely typed caller would: an
//! object is a mapping, an array is a sequence of `[key, value]` pairs. Any
//! other document is refused with [`MapError::InvalidArgument`]. Booleans get
//! their own message because they are the scalar most often passed by mistake.
//!
//! The whole document is validated before the map is touched, so a malformed
//! source never leaves a map half-updated.

use super::error::MapError;
use super::key::{IntoKey, Key};
use super::map::NormalizingMap;
use super::normalizer::KeyNormalizer;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Split a JSON document into raw `(key, value)` entries
pub fn json_entries(source: Value) -> Result<Vec<(Key, Value)>, MapError> {
    match source {
        Value::Object(object) => Ok(object
            .into_iter()
            .map(|(key, value)| (Key::Str(key), value))
            .collect()),
        Value::Array(elements) => elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| pair(index, element))
            .collect(),
        Value::Bool(_) => Err(MapError::InvalidArgument(
            "a boolean is not a source of entries".to_string(),
        )),
        other => Err(MapError::InvalidArgument(format!(
            "expected an object or an array of pairs, got {}",
            kind(&other)
        ))),
    }
}

/// Raw keys of a JSON array
pub fn json_keys(keys: Value) -> Result<Vec<Key>, MapError> {
    match keys {
        Value::Array(elements) => elements.into_iter().map(IntoKey::into_key).collect(),
        Value::Bool(_) => Err(MapError::InvalidArgument(
            "a boolean is not a sequence of keys".to_string(),
        )),
        other => Err(MapError::InvalidArgument(format!(
            "expected an array of keys, got {}",
            kind(&other)
        ))),
    }
}

fn pair(index: usize, element: Value) -> Result<(Key, Value), MapError> {
    match element {
        Value::Array(items) if items.len() == 2 => {
            let mut items = items.into_iter();
            match (items.next(), items.next()) {
                (Some(key), Some(value)) => Ok((key.into_key()?, value)),
                _ => Err(MapError::MalformedEntry { index, len: 0 }),
            }
        }
        Value::Array(items) => Err(MapError::MalformedEntry {
            index,
            len: items.len(),
        }),
        // A non-sequence element has no length to report
        _ => Err(MapError::MalformedEntry { index, len: 1 }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn typed<V: DeserializeOwned>(entries: Vec<(Key, Value)>) -> Result<Vec<(Key, V)>, MapError> {
    entries
        .into_iter()
        .map(|(key, value)| -> Result<(Key, V), MapError> {
            Ok((key, serde_json::from_value(value)?))
        })
        .collect()
}

impl<V: DeserializeOwned> NormalizingMap<V> {
    /// A map filled from a JSON object or an array of `[key, value]` pairs
    pub fn from_json(normalizer: KeyNormalizer, source: Value) -> Result<Self, MapError> {
        let mut map = Self::new(normalizer);
        map.update_json(source)?;
        Ok(map)
    }

    /// Merge a JSON object or an array of `[key, value]` pairs into this map
    pub fn update_json(&mut self, source: Value) -> Result<(), MapError> {
        let entries = typed(json_entries(source)?)?;
        self.update(entries)
    }
}

impl<V: Clone> NormalizingMap<V> {
    /// A map with every key of a JSON array mapped to a clone of `default`
    pub fn from_keys_json(
        normalizer: KeyNormalizer,
        keys: Value,
        default: V,
    ) -> Result<Self, MapError> {
        Self::from_keys(normalizer, json_keys(keys)?, default)
    }
}
