//! # caseless
//!
//! Maps whose keys are stored and compared under a normalized case.
//!
//! A [`NormalizingMap`] runs every key it sees through a [`KeyNormalizer`]
//! before hashing it, so `"  Hello World "`, `"hello world"` and `"HELLO WORLD"`
//! address the same entry of a case-folded map. String keys are stripped and
//! converted to one of the [`Case`] families; other keys (numbers, booleans,
//! tuples) are stored as given.
//!
//! Module layout:
//!
//! src/caseless
//!   ├── key          Dynamic keys and the hashability check
//!   ├── cases        The case transforms
//!   ├── normalizer   Transform chains applied to keys
//!   ├── map          The normalizing map
//!   ├── source       Construction from JSON documents
//!   ├── attr         Field-style access over a map
//!   ├── settings     Layered defaults
//!   └── error        Error taxonomy
//!
//! ```rust,ignore
//! use caseless::{Case, NormalizingMap};
//!
//! let mut map = NormalizingMap::with_case(Case::Snake);
//! map.set_item("  Hello World  ", 1)?;
//! assert_eq!(map.get_item("hello_world")?, &1);
//! ```

pub mod caseless;

pub use caseless::attr::{is_field_name, AttrMap, RESERVED_NAMES};
pub use caseless::cases::Case;
pub use caseless::error::MapError;
pub use caseless::key::{FloatKey, IntoKey, Key};
pub use caseless::map::NormalizingMap;
pub use caseless::normalizer::KeyNormalizer;
pub use caseless::settings::{load_defaults, Flavor, FlavorSettings, Loader, MapSettings};
