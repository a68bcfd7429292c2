//! Attribute-style access to map entries
//!
//! [`AttrMap`] layers field access over a [`NormalizingMap`]. Reading,
//! assigning and deleting a field named `f` are exactly `get_item(f)`,
//! `set_item(f, ..)` and `del_item(f)` on the wrapped map, so field and item
//! access always observe the same entry.
//!
//! An entry is field-addressable when its normalized key is a string that
//! forms a valid field name (a letter or `_`, then letters, digits or `_`).
//!
//! # Reserved names
//!
//! Names in [`RESERVED_NAMES`] belong to the map's configuration, never to its
//! entries. Field access through one of them fails with
//! [`MapError::ReservedName`]; the configuration itself is read and written
//! by name with [`AttrMap::control`] and [`AttrMap::set_control`]. A name is
//! reserved when it, or its normalized form, matches a reserved name under
//! the map's normalizer. Item access on the wrapped map is not affected.

use super::cases::Case;
use super::error::MapError;
use super::key::Key;
use super::map::NormalizingMap;
use super::normalizer::KeyNormalizer;
use super::settings::FlavorSettings;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Configuration controls reachable by name
pub const RESERVED_NAMES: &[&str] = &["keys_must_be_string"];

static FIELD_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}]*$").unwrap()
});

/// Whether `name` can be used as a field name
pub fn is_field_name(name: &str) -> bool {
    FIELD_NAME_REGEX.is_match(name)
}

/// A normalizing map whose entries are also reachable as fields
#[derive(Clone, PartialEq)]
pub struct AttrMap<V> {
    map: NormalizingMap<V>,
}

impl<V> AttrMap<V> {
    pub fn new(normalizer: KeyNormalizer) -> Self {
        AttrMap {
            map: NormalizingMap::new(normalizer),
        }
    }

    pub fn with_case(case: Case) -> Self {
        Self::new(case.normalizer())
    }

    pub fn from_settings(settings: &FlavorSettings) -> Self {
        AttrMap {
            map: NormalizingMap::from_settings(settings),
        }
    }

    pub fn snake() -> Self {
        Self::with_case(Case::Snake)
    }

    pub fn constant() -> Self {
        Self::with_case(Case::Constant)
    }

    /// Field access over an existing map
    pub fn from_map(map: NormalizingMap<V>) -> Self {
        AttrMap { map }
    }

    pub fn into_map(self) -> NormalizingMap<V> {
        self.map
    }

    /// Item access to the underlying entries
    pub fn as_map(&self) -> &NormalizingMap<V> {
        &self.map
    }

    pub fn as_map_mut(&mut self) -> &mut NormalizingMap<V> {
        &mut self.map
    }

    /// Read field `name`
    pub fn get_attr(&self, name: &str) -> Result<&V, MapError> {
        self.check_reserved(name)?;
        let normalized = self.map.normalize_key(name)?;
        if !is_field_key(&normalized) {
            return Err(not_found(name));
        }
        self.map
            .get_item(name)
            .map_err(|err| MapError::AttributeNotFound(Box::new(err)))
    }

    /// Assign field `name`, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: V) -> Result<Option<V>, MapError> {
        self.check_reserved(name)?;
        let normalized = self.map.normalize_key(name)?;
        if !is_field_key(&normalized) {
            return Err(MapError::InvalidArgument(format!(
                "{} does not normalize to a field name",
                normalized
            )));
        }
        self.map.set_item(name, value)
    }

    /// Delete field `name`, returning its value
    pub fn del_attr(&mut self, name: &str) -> Result<V, MapError> {
        self.check_reserved(name)?;
        let normalized = self.map.normalize_key(name)?;
        if !is_field_key(&normalized) {
            return Err(not_found(name));
        }
        self.map
            .del_item(name)
            .map_err(|err| MapError::AttributeNotFound(Box::new(err)))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_ok()
    }

    /// Entries reachable as fields, as `(name, value)` in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &V)> {
        self.map.iter().filter_map(|(key, value)| match key {
            Key::Str(name) if is_field_name(name) => Some((name.as_str(), value)),
            _ => None,
        })
    }

    /// Read a configuration control by name
    pub fn control(&self, name: &str) -> Result<bool, MapError> {
        match self.control_name(name) {
            Some("keys_must_be_string") => Ok(self.map.is_keys_must_be_string()),
            _ => Err(MapError::UnknownControl(name.to_string())),
        }
    }

    /// Write a configuration control by name. Entries are never touched.
    pub fn set_control(&mut self, name: &str, enabled: bool) -> Result<(), MapError> {
        match self.control_name(name) {
            Some("keys_must_be_string") => {
                self.map.set_keys_must_be_string(enabled);
                Ok(())
            }
            _ => Err(MapError::UnknownControl(name.to_string())),
        }
    }

    fn control_name(&self, name: &str) -> Option<&'static str> {
        let normalizer = self.map.normalizer();
        let normalized = normalizer.normalize_str(name);
        RESERVED_NAMES
            .iter()
            .copied()
            .find(|reserved| *reserved == name || normalizer.normalize_str(reserved) == normalized)
    }

    fn check_reserved(&self, name: &str) -> Result<(), MapError> {
        match self.control_name(name) {
            Some(reserved) => Err(MapError::ReservedName(reserved.to_string())),
            None => Ok(()),
        }
    }
}

impl<V> Default for AttrMap<V> {
    fn default() -> Self {
        Self::snake()
    }
}

impl<V> From<NormalizingMap<V>> for AttrMap<V> {
    fn from(map: NormalizingMap<V>) -> Self {
        Self::from_map(map)
    }
}

impl<V: fmt::Debug> fmt::Debug for AttrMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.map, f)
    }
}

fn is_field_key(key: &Key) -> bool {
    key.as_str().map_or(false, is_field_name)
}

fn not_found(name: &str) -> MapError {
    MapError::AttributeNotFound(Box::new(MapError::KeyNotFound(Key::Str(name.to_string()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert!(is_field_name("some_word"));
        assert!(is_field_name("_private"));
        assert!(is_field_name("SOME_WORD2"));
        assert!(is_field_name("größe"));
        assert!(!is_field_name("some-word"));
        assert!(!is_field_name("2fast"));
        assert!(!is_field_name(""));
        assert!(!is_field_name("two words"));
    }

    #[test]
    fn test_attribute_and_item_share_storage() {
        let mut attrs = AttrMap::snake();
        attrs.set_attr("new_field", "v").unwrap();
        assert_eq!(attrs.as_map().get_item("New Field").unwrap(), &"v");

        attrs.as_map_mut().set_item(" Other Field ", "w").unwrap();
        assert_eq!(attrs.get_attr("other_field").unwrap(), &"w");
        assert_eq!(attrs.get_attr("OTHER_FIELD").unwrap(), &"w");
    }

    #[test]
    fn test_missing_attribute_wraps_key_error() {
        let attrs: AttrMap<i32> = AttrMap::snake();
        match attrs.get_attr("absent") {
            Err(MapError::AttributeNotFound(inner)) => {
                assert_eq!(*inner, MapError::KeyNotFound(Key::Str("absent".into())));
            }
            other => panic!("expected AttributeNotFound, got {:?}", other),
        }
        assert!(!attrs.has_attr("absent"));
    }

    #[test]
    fn test_delete_attribute() {
        let mut attrs = AttrMap::constant();
        attrs.set_attr("field", 1).unwrap();
        assert_eq!(attrs.del_attr("Field").unwrap(), 1);
        assert!(attrs.as_map().is_empty());
        assert!(matches!(
            attrs.del_attr("field"),
            Err(MapError::AttributeNotFound(_))
        ));
    }

    #[test]
    fn test_reserved_name_mutates_configuration_only() {
        let mut attrs = AttrMap::snake();
        assert_eq!(
            attrs.set_attr("keys_must_be_string", 1).unwrap_err(),
            MapError::ReservedName("keys_must_be_string".to_string())
        );
        assert!(attrs.as_map().is_empty());

        assert!(!attrs.control("keys_must_be_string").unwrap());
        attrs.set_control("Keys Must Be String", true).unwrap();
        assert!(attrs.control("keys_must_be_string").unwrap());
        assert!(attrs.as_map().is_empty());

        assert!(matches!(
            attrs.as_map_mut().set_item(1, 2),
            Err(MapError::TypeWildcardRejected(_))
        ));
    }

    #[test]
    fn test_unknown_control() {
        let mut attrs: AttrMap<i32> = AttrMap::snake();
        assert_eq!(
            attrs.set_control("verbose", true).unwrap_err(),
            MapError::UnknownControl("verbose".to_string())
        );
        assert!(attrs.control("verbose").is_err());
    }

    #[test]
    fn test_set_attr_requires_field_name() {
        let mut attrs = AttrMap::with_case(Case::Kebab);
        assert!(matches!(
            attrs.set_attr("some word", 1),
            Err(MapError::InvalidArgument(_))
        ));
        assert!(attrs.as_map().is_empty());
    }

    #[test]
    fn test_fields_skip_unaddressable_entries() {
        let mut attrs = AttrMap::snake();
        attrs.as_map_mut().set_item("Some Word", 1).unwrap();
        attrs.as_map_mut().set_item("with-dash", 2).unwrap();
        attrs.as_map_mut().set_item(3, 3).unwrap();

        let fields: Vec<_> = attrs.fields().collect();
        assert_eq!(fields, vec![("some_word", &1)]);
        assert!(attrs.get_attr("with-dash").is_err());
    }

    #[test]
    fn test_del_attr_leaves_unaddressable_entries() {
        let mut attrs = AttrMap::snake();
        attrs.as_map_mut().set_item("with-dash", 2).unwrap();

        assert!(matches!(
            attrs.del_attr("with-dash"),
            Err(MapError::AttributeNotFound(_))
        ));
        assert_eq!(attrs.as_map().get_item("with-dash"), Ok(&2));
        assert_eq!(attrs.as_map_mut().del_item("with-dash"), Ok(2));
    }
}
