//! Keys accepted by normalizing maps
//!
//! A map stores [`Key`] values. Only [`Key::Str`] is ever rewritten by a
//! normalizer; every other variant is used as-is for hashing and equality.
//!
//! Raw keys enter the map through [`IntoKey`]. The conversion is where
//! hashability is decided: values that behave like mutable containers (JSON
//! arrays and objects) are refused with [`MapError::UnhashableKey`] before any
//! normalization takes place.

use super::error::MapError;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::fmt;

/// A hashable map key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
    None,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`; smaller unsigned values are [`Key::Int`]
    UInt(u64),
    Float(FloatKey),
    Str(String),
    Tuple(Vec<Key>),
}

impl Key {
    /// Whether this is a string key (the only kind normalizers rewrite)
    pub fn is_str(&self) -> bool {
        matches!(self, Key::Str(_))
    }

    /// Integer key for an unsigned value, sharing [`Key::Int`] wherever it fits
    pub fn unsigned(value: u64) -> Key {
        match i64::try_from(value) {
            Ok(i) => Key::Int(i),
            Err(_) => Key::UInt(value),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the key's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Key::None => "none",
            Key::Bool(_) => "bool",
            Key::Int(_) | Key::UInt(_) => "int",
            Key::Float(_) => "float",
            Key::Str(_) => "str",
            Key::Tuple(_) => "tuple",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::None => write!(f, "None"),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::UInt(u) => write!(f, "{}", u),
            Key::Float(x) => write!(f, "{:?}", x.get()),
            Key::Str(s) => write!(f, "{:?}", s),
            Key::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

// Keys read better as literals than as enum variants, especially inside map output
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::None => serializer.serialize_unit(),
            Key::Bool(b) => serializer.serialize_bool(*b),
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::UInt(u) => serializer.serialize_u64(*u),
            Key::Float(x) => serializer.serialize_f64(x.get()),
            Key::Str(s) => serializer.serialize_str(s),
            Key::Tuple(items) => {
                let mut tuple = serializer.serialize_tuple(items.len())?;
                for item in items {
                    tuple.serialize_element(item)?;
                }
                tuple.end()
            }
        }
    }
}

/// An `f64` compared and hashed by bit pattern.
///
/// `-0.0` is stored as `0.0` and every NaN as the canonical NaN, so equal
/// floats always address the same entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn new(value: f64) -> Self {
        let value = if value == 0.0 {
            0.0
        } else if value.is_nan() {
            f64::NAN
        } else {
            value
        };
        FloatKey(value.to_bits())
    }

    pub fn get(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl fmt::Debug for FloatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.get())
    }
}

/// Conversion of a raw key into a hashable [`Key`].
pub trait IntoKey {
    fn into_key(self) -> Result<Key, MapError>;
}

impl IntoKey for Key {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(self)
    }
}

impl IntoKey for &Key {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(self.clone())
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Str(self.to_string()))
    }
}

impl IntoKey for String {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Str(self))
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Str(self.clone()))
    }
}

impl IntoKey for char {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Str(self.to_string()))
    }
}

impl IntoKey for bool {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Bool(self))
    }
}

impl IntoKey for () {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::None)
    }
}

macro_rules! int_into_key {
    ($($t:ty),*) => {
        $(
            impl IntoKey for $t {
                fn into_key(self) -> Result<Key, MapError> {
                    Ok(Key::Int(i64::from(self)))
                }
            }
        )*
    };
}

int_into_key!(i8, i16, i32, i64, u8, u16, u32);

impl IntoKey for u64 {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::unsigned(self))
    }
}

impl IntoKey for usize {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::unsigned(self as u64))
    }
}

impl IntoKey for isize {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Int(self as i64))
    }
}

impl IntoKey for f64 {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Float(FloatKey::new(self)))
    }
}

impl IntoKey for f32 {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Float(FloatKey::new(f64::from(self))))
    }
}

impl<T: IntoKey> IntoKey for Option<T> {
    fn into_key(self) -> Result<Key, MapError> {
        match self {
            Some(inner) => inner.into_key(),
            None => Ok(Key::None),
        }
    }
}

impl<A: IntoKey, B: IntoKey> IntoKey for (A, B) {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Tuple(vec![self.0.into_key()?, self.1.into_key()?]))
    }
}

impl<A: IntoKey, B: IntoKey, C: IntoKey> IntoKey for (A, B, C) {
    fn into_key(self) -> Result<Key, MapError> {
        Ok(Key::Tuple(vec![
            self.0.into_key()?,
            self.1.into_key()?,
            self.2.into_key()?,
        ]))
    }
}

impl IntoKey for serde_json::Value {
    fn into_key(self) -> Result<Key, MapError> {
        use serde_json::Value;
        match self {
            Value::Null => Ok(Key::None),
            Value::Bool(b) => Ok(Key::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Key::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Key::UInt(u))
                } else {
                    Ok(Key::Float(FloatKey::new(n.as_f64().unwrap_or(f64::NAN))))
                }
            }
            Value::String(s) => Ok(Key::Str(s)),
            Value::Array(_) => Err(MapError::UnhashableKey("array")),
            Value::Object(_) => Err(MapError::UnhashableKey("object")),
        }
    }
}

impl IntoKey for &serde_json::Value {
    fn into_key(self) -> Result<Key, MapError> {
        self.clone().into_key()
    }
}
