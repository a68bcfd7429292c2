//! Property-based tests for key normalization and addressing
//!
//! Keys are drawn from printable text with surrounding whitespace so the
//! strip step is always exercised. ASCII keys drive the addressing checks
//! that flip letter case by hand; Unicode keys cover letters whose case
//! mappings expand or fold together.

use caseless::{Case, Key, NormalizingMap};
use proptest::prelude::*;

fn case_strategy() -> impl Strategy<Value = Case> {
    prop::sample::select(Case::ALL.to_vec())
}

/// Words of mixed-case letters and digits, padded with spaces
fn key_strategy() -> impl Strategy<Value = String> {
    (
        " {0,3}",
        prop::collection::vec("[a-zA-Z0-9_]{1,8}", 1..4),
        " {0,3}",
    )
        .prop_map(|(lead, words, trail)| format!("{}{}{}", lead, words.join(" "), trail))
}

/// Letters whose uppercase, lowercase or titlecase is more than a lookup
const EXPANDING_LETTERS: [&str; 9] = ["µ", "ŉ", "ß", "ǅ", "ᾼ", "İ", "ΐ", "ﬁ", "ς"];

/// Printable Unicode words, padded with whitespace and ASCII separators
fn unicode_key_strategy() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        3 => "\\PC{1,8}",
        1 => prop::sample::select(EXPANDING_LETTERS.to_vec()).prop_map(String::from),
        1 => prop::collection::vec(prop::sample::select(EXPANDING_LETTERS.to_vec()), 1..4)
            .prop_map(|letters| letters.concat()),
    ];
    (
        "[ \\x1c-\\x1f]{0,2}",
        prop::collection::vec(word, 1..4),
        "[ \\x1c-\\x1f]{0,2}",
    )
        .prop_map(|(lead, words, trail)| format!("{}{}{}", lead, words.join(" "), trail))
}

/// Words whose uppercase and lowercase forms fold to the same text
fn foldable_key_strategy() -> impl Strategy<Value = String> {
    let letters = vec![
        'a', 'Z', 'é', 'Ω', 'µ', 'Μ', 'ß', 'ẞ', 'ŉ', 'ǅ', 'ǆ', 'ᾼ', 'ᾳ', 'Σ', 'σ', 'ς', 'ſ',
        'ﬁ', 'İ', 'ΐ',
    ];
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(letters), 1..6)
            .prop_map(|cs| cs.into_iter().collect::<String>()),
        1..3,
    )
    .prop_map(|words| words.join(" "))
}

/// Flip the case of every other letter and change the padding
fn case_variant(key: &str) -> String {
    let body: String = key
        .trim()
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i % 2 == 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();
    format!("  {} ", body)
}

fn non_string_key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        any::<i64>().prop_map(Key::Int),
        any::<bool>().prop_map(Key::Bool),
        Just(Key::None),
        "[A-Z ]{0,6}".prop_map(|s| Key::Tuple(vec![Key::Str(s)])),
    ]
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_normalization_is_idempotent(case in case_strategy(), key in key_strategy()) {
            let normalizer = case.normalizer();
            let once = normalizer.normalize_str(&key);
            prop_assert_eq!(normalizer.normalize_str(&once), once);
        }

        #[test]
        fn test_unicode_normalization_is_idempotent(case in case_strategy(), key in unicode_key_strategy()) {
            let once = case.apply(&key);
            prop_assert_eq!(case.apply(&once), once);
        }

        #[test]
        fn test_upper_and_lower_forms_share_a_folded_entry(case in prop::sample::select(vec![Case::Fold, Case::Snake, Case::Kebab]), key in foldable_key_strategy(), value in any::<u32>()) {
            let mut map = NormalizingMap::with_case(case);
            map.set_item(key.as_str(), value).unwrap();

            prop_assert_eq!(map.get_item(key.to_uppercase()).unwrap(), &value);
            prop_assert_eq!(map.get_item(key.to_lowercase()).unwrap(), &value);
            map.set_item(key.to_uppercase(), value).unwrap();
            prop_assert_eq!(map.len(), 1);
        }

        #[test]
        fn test_non_string_keys_pass_through(case in case_strategy(), key in non_string_key_strategy()) {
            prop_assert_eq!(case.normalizer().normalize(key.clone()), key);
        }

        #[test]
        fn test_case_variants_address_the_same_entry(case in prop::sample::select(vec![Case::Fold, Case::Upper, Case::Lower, Case::Snake, Case::Kebab, Case::Constant]), key in key_strategy(), value in any::<u32>()) {
            let variant = case_variant(&key);
            let mut map = NormalizingMap::with_case(case);
            map.set_item(key.as_str(), value).unwrap();

            prop_assert_eq!(map.get_item(variant.as_str()).unwrap(), &value);
            prop_assert!(map.contains(variant.as_str()).unwrap());
            prop_assert_eq!(map.len(), 1);
        }

        #[test]
        fn test_construction_matches_one_at_a_time(case in case_strategy(), pairs in prop::collection::vec((key_strategy(), any::<u8>()), 0..12)) {
            let built = NormalizingMap::from_pairs(case.normalizer(), pairs.clone()).unwrap();

            let mut stepwise = NormalizingMap::with_case(case);
            for (key, value) in pairs.iter() {
                stepwise.set_item(key.as_str(), *value).unwrap();
            }
            prop_assert_eq!(&built, &stepwise);

            // Last write wins for each normalized key
            for (key, _) in pairs.iter() {
                let normalized = case.apply(key);
                let last = pairs
                    .iter()
                    .rev()
                    .find(|(k, _)| case.apply(k) == normalized)
                    .map(|(_, v)| *v);
                prop_assert_eq!(built.get_item(key.as_str()).ok().copied(), last);
            }
        }

        #[test]
        fn test_string_only_rejection_leaves_map_unchanged(pairs in prop::collection::vec((key_strategy(), any::<u8>()), 0..6), bad in any::<i64>()) {
            let mut map = NormalizingMap::from_pairs(Case::Snake.normalizer(), pairs).unwrap()
                .keys_must_be_string(true);
            let before = map.clone();

            prop_assert!(map.set_item(bad, 0).is_err());
            prop_assert_eq!(&map, &before);
        }
    }
}
