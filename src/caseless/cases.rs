//! Case transforms
//!
//! Every transform strips leading and trailing whitespace (including the
//! ASCII separators `\x1c`..`\x1f`) first, then applies its conversion.
//! They are pure and total: the result depends only on the input string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_case_mapping::to_titlecase;
use unicode_casefold::UnicodeCaseFold;

/// A named case family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Case {
    #[serde(rename = "case-fold", alias = "fold", alias = "casefold")]
    Fold,
    Upper,
    Lower,
    Title,
    Snake,
    Kebab,
    Constant,
}

impl Case {
    pub const ALL: [Case; 7] = [
        Case::Fold,
        Case::Upper,
        Case::Lower,
        Case::Title,
        Case::Snake,
        Case::Kebab,
        Case::Constant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Case::Fold => "case-fold",
            Case::Upper => "upper",
            Case::Lower => "lower",
            Case::Title => "title",
            Case::Snake => "snake",
            Case::Kebab => "kebab",
            Case::Constant => "constant",
        }
    }

    /// Strip `value` and convert it to this case
    pub fn apply(self, value: &str) -> String {
        match self {
            Case::Fold => case_fold(value),
            Case::Upper => upper(value),
            Case::Lower => lower(value),
            Case::Title => title(value),
            Case::Snake => snake_case(value),
            Case::Kebab => kebab_case(value),
            Case::Constant => constant_case(value),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Case {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "case-fold" | "fold" | "casefold" => Ok(Case::Fold),
            "upper" => Ok(Case::Upper),
            "lower" => Ok(Case::Lower),
            "title" => Ok(Case::Title),
            "snake" => Ok(Case::Snake),
            "kebab" => Ok(Case::Kebab),
            "constant" => Ok(Case::Constant),
            other => Err(format!("Unknown case '{}'", other)),
        }
    }
}

/// Strip then case-fold: `"  sOme WoRd "` → `"some word"`
pub fn case_fold(value: &str) -> String {
    fold(strip(value))
}

/// Strip then uppercase: `"  sOme WoRd "` → `"SOME WORD"`
pub fn upper(value: &str) -> String {
    strip(value).to_uppercase()
}

/// Strip then lowercase: `"  sOme WoRd "` → `"some word"`
pub fn lower(value: &str) -> String {
    strip(value).to_lowercase()
}

/// Strip then title-case: `" lower UPPER CamelCase "` → `"Lower Upper Camelcase"`
///
/// A word is a run of cased characters (lowercase, uppercase or titlecase
/// letters). Its first character takes its Unicode titlecase mapping and the
/// rest are lowercased, so `"they're"` becomes `"They'Re"` and `"a1b"` becomes
/// `"A1B"`. Combining marks do not end a word.
pub fn title(value: &str) -> String {
    let value = strip(value);
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if is_cased(c) {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                push_titlecase(&mut out, c);
            }
            in_word = true;
        } else {
            out.push(c);
            if !is_combining_mark(c) {
                in_word = false;
            }
        }
    }
    out
}

/// Strip, replace spaces with `_`, then case-fold: `" sOme WoRd "` → `"some_word"`
pub fn snake_case(value: &str) -> String {
    fold(&strip(value).replace(' ', "_"))
}

/// Strip, replace spaces with `-`, then case-fold: `" sOme WoRd "` → `"some-word"`
pub fn kebab_case(value: &str) -> String {
    fold(&strip(value).replace(' ', "-"))
}

/// Strip, replace spaces with `_`, then uppercase: `" sOme WoRd "` → `"SOME_WORD"`
pub fn constant_case(value: &str) -> String {
    strip(value).replace(' ', "_").to_uppercase()
}

/// Whitespace plus the ASCII information separators `\x1c`..`\x1f`
fn strip(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

static TITLECASE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lt}$").unwrap());
static COMBINING_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{Mn}\p{Me}]$").unwrap());

fn char_matches(regex: &Regex, c: char) -> bool {
    let mut buf = [0u8; 4];
    regex.is_match(c.encode_utf8(&mut buf))
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase() || char_matches(&TITLECASE_LETTER, c)
}

fn is_combining_mark(c: char) -> bool {
    char_matches(&COMBINING_MARK, c)
}

/// Push the titlecase mapping of `c`, which may expand (`ß` → `Ss`, `ŉ` → `ʼN`)
fn push_titlecase(out: &mut String, c: char) {
    let mapped = to_titlecase(c);
    if mapped[0] == 0 {
        out.push(c);
        return;
    }
    out.extend(
        mapped
            .iter()
            .take_while(|&&code| code != 0)
            .filter_map(|&code| char::from_u32(code)),
    );
}

/// Full Unicode case fold, locale independent
fn fold(value: &str) -> String {
    value.chars().case_fold().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_fold() {
        assert_eq!(case_fold("   sOme WoRd   "), "some word");
        assert_eq!(case_fold("Straße"), "strasse");
        assert_eq!(case_fold("ΣΊΣΥΦΟΣ"), case_fold("σίσυφος"));
    }

    #[test]
    fn test_case_fold_matches_full_unicode_folding() {
        // micro sign and Greek capital mu
        assert_eq!(case_fold("\u{b5}"), case_fold("\u{39c}"));
        assert_eq!(case_fold("ᾼ"), case_fold("ΑΙ"));
        assert_eq!(case_fold("ŉ"), "ʼn");
        assert_eq!(case_fold("ſ"), "s");
        assert_eq!(case_fold("ﬃ"), "ffi");
    }

    #[test]
    fn test_upper_and_lower() {
        assert_eq!(upper("   sOme WoRd   "), "SOME WORD");
        assert_eq!(lower("   sOme WoRd   "), "some word");
    }

    #[test]
    fn test_title() {
        assert_eq!(title("   lower UPPER CamelCase   "), "Lower Upper Camelcase");
        assert_eq!(title("they're bill's"), "They'Re Bill'S");
        assert_eq!(title("snake_case"), "Snake_Case");
        assert_eq!(title("abc1def"), "Abc1Def");
        assert_eq!(title("ﬁsh"), "Fish");
    }

    #[test]
    fn test_title_uses_titlecase_mapping() {
        assert_eq!(title("ŉ"), "ʼN");
        assert_eq!(title("ßa"), "Ssa");
        assert_eq!(title("ǆemal"), "ǅemal");
        // titlecase letters count as cased
        assert_eq!(title("ǅa"), "ǅa");
        assert_eq!(title("aǅ"), "aǆ");
    }

    #[test]
    fn test_title_is_idempotent_on_expanding_letters() {
        for input in ["ŉ", "ŉa", "ǅa", "aİb", "ΐx", "ﬁsh", "ßa"] {
            let once = title(input);
            assert_eq!(title(&once), once, "{}", input);
        }
    }

    #[test]
    fn test_snake_kebab_constant() {
        assert_eq!(snake_case("   sOme WoRd   "), "some_word");
        assert_eq!(kebab_case("   sOme WoRd   "), "some-word");
        assert_eq!(constant_case("   sOme WoRd   "), "SOME_WORD");
    }

    #[test]
    fn test_only_spaces_are_replaced() {
        assert_eq!(snake_case("a\tb c"), "a\tb_c");
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        for case in Case::ALL {
            assert_eq!(case.apply(" \t\n "), "", "{}", case);
        }
    }

    #[test]
    fn test_information_separators_are_stripped() {
        assert_eq!(lower("\x1cKey\x1f"), "key");
        assert_eq!(case_fold("\x1d\x1e name \x1f"), "name");
        // only at the edges
        assert_eq!(upper("a\x1cb"), "A\x1cB");
    }

    #[test]
    fn test_case_names_round_trip() {
        for case in Case::ALL {
            assert_eq!(case.name().parse::<Case>().unwrap(), case);
        }
        assert_eq!("fold".parse::<Case>().unwrap(), Case::Fold);
        assert!("camel".parse::<Case>().is_err());
    }
}
