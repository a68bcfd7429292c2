//! Key normalizers
//!
//! A [`KeyNormalizer`] is an ordered chain of pure string transforms. Maps run
//! every incoming key through their normalizer before hashing it; non-string
//! keys pass through untouched.
//!
//! Chains are built by composition, the same way transform pipelines are:
//!
//! ```rust,ignore
//! let normalizer = KeyNormalizer::new(Case::Lower)
//!     .then_fn("dots", |s| s.replace('.', "_"));
//! ```
//!
//! A normalizer is cheap to clone and can be shared by any number of maps.
//! Pre-built normalizers for every [`Case`] live in statics such as
//! [`SNAKE`] and [`CONSTANT`].

use super::cases::Case;
use super::key::Key;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

type Stage = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// An ordered chain of string transforms applied to string keys
#[derive(Clone)]
pub struct KeyNormalizer {
    stages: Vec<(String, Stage)>,
}

impl KeyNormalizer {
    /// A normalizer applying a single case transform
    pub fn new(case: Case) -> Self {
        Self::identity().then(case)
    }

    /// A normalizer with no stages: every key is stored as given
    pub fn identity() -> Self {
        KeyNormalizer { stages: Vec::new() }
    }

    /// Append a case transform to the chain
    pub fn then(self, case: Case) -> Self {
        self.then_fn(case.name(), move |s| case.apply(s))
    }

    /// Append an arbitrary transform to the chain
    ///
    /// The function must be pure: its output may depend only on its input,
    /// otherwise keys stop addressing the entries they were stored under.
    pub fn then_fn<F>(mut self, label: &str, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.stages.push((label.to_string(), Arc::new(f)));
        self
    }

    /// Normalize a key. Only string keys are rewritten.
    pub fn normalize(&self, key: Key) -> Key {
        match key {
            Key::Str(s) => Key::Str(self.normalize_str(&s)),
            other => other,
        }
    }

    /// Run the chain over a string
    pub fn normalize_str(&self, value: &str) -> String {
        let mut stages = self.stages.iter();
        let mut current = match stages.next() {
            Some((_, stage)) => stage(value),
            None => return value.to_string(),
        };
        for (_, stage) in stages {
            current = stage(&current);
        }
        current
    }

    /// Labels of the stages, in application order
    pub fn labels(&self) -> Vec<&str> {
        self.stages.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        CASE_FOLD.clone()
    }
}

impl fmt::Debug for KeyNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyNormalizer").field(&self.labels()).finish()
    }
}

impl From<Case> for KeyNormalizer {
    fn from(case: Case) -> Self {
        case.normalizer()
    }
}

impl Case {
    /// The shared pre-built normalizer for this case
    pub fn normalizer(self) -> KeyNormalizer {
        match self {
            Case::Fold => CASE_FOLD.clone(),
            Case::Upper => UPPER.clone(),
            Case::Lower => LOWER.clone(),
            Case::Title => TITLE.clone(),
            Case::Snake => SNAKE.clone(),
            Case::Kebab => KEBAB.clone(),
            Case::Constant => CONSTANT.clone(),
        }
    }
}

pub static CASE_FOLD: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Fold));
pub static UPPER: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Upper));
pub static LOWER: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Lower));
pub static TITLE: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Title));
pub static SNAKE: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Snake));
pub static KEBAB: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Kebab));
pub static CONSTANT: Lazy<KeyNormalizer> = Lazy::new(|| KeyNormalizer::new(Case::Constant));
