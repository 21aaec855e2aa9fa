//! Identifier case detection and conversion.
//!
//! - "user_name" is detected as snake case and split into ["user", "name"]
//! - ["matsuoka", "yuka", "sato"] renders as "MatsuokaYukaSato" in pascal case

use crate::error::CaseParseError;
use std::fmt;
use std::str::FromStr;

/// Target (or detected) casing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseVariant {
    /// snake_case - all lowercase with underscores
    Snake,
    /// UPPER_SNAKE_CASE - all uppercase with underscores
    UpperSnake,
    /// PascalCase - all words capitalized
    Pascal,
    /// camelCase - first word lowercase, rest capitalized
    #[default]
    Camel,
    /// kebab-case - all lowercase with hyphens
    Kebab,
    /// Back to Japanese script
    Japanese,
}

impl CaseVariant {
    /// All variants, in the order they are offered to the user.
    pub const ALL: [CaseVariant; 6] = [
        CaseVariant::Snake,
        CaseVariant::UpperSnake,
        CaseVariant::Pascal,
        CaseVariant::Camel,
        CaseVariant::Kebab,
        CaseVariant::Japanese,
    ];

    /// Canonical name, accepted back by `from_str`.
    pub fn name(self) -> &'static str {
        match self {
            CaseVariant::Snake => "snake",
            CaseVariant::UpperSnake => "upper-snake",
            CaseVariant::Pascal => "pascal",
            CaseVariant::Camel => "camel",
            CaseVariant::Kebab => "kebab",
            CaseVariant::Japanese => "japanese",
        }
    }
}

impl fmt::Display for CaseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseVariant {
    type Err = CaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "snake" | "snake_case" => Self::Snake,
            "upper-snake" | "upper_snake" | "screaming" | "constant" => Self::UpperSnake,
            "pascal" | "pascalcase" => Self::Pascal,
            "camel" | "camelcase" => Self::Camel,
            "kebab" | "kebab-case" => Self::Kebab,
            "japanese" | "ja" | "reset" => Self::Japanese,
            _ => return Err(CaseParseError(s.to_string())),
        })
    }
}

/// Guesses the convention a piece of text is written in.
///
/// `_` means snake, `-` means kebab, a leading capital means pascal, and
/// anything else is taken as camel, including a single lowercase word.
pub fn detect_case(text: &str) -> CaseVariant {
    if text.contains('_') {
        CaseVariant::Snake
    } else if text.contains('-') {
        CaseVariant::Kebab
    } else if text.chars().next().is_some_and(char::is_uppercase) {
        CaseVariant::Pascal
    } else {
        CaseVariant::Camel
    }
}

/// Splits text written in `case` into its words.
///
/// Pascal and camel split before every uppercase letter, so "HTTPServer"
/// becomes single letters followed by "Server". Whitespace always separates.
pub fn to_words(text: &str, case: CaseVariant) -> Vec<String> {
    let spaced = match case {
        CaseVariant::Snake | CaseVariant::UpperSnake => text.replace('_', " "),
        CaseVariant::Kebab => text.replace('-', " "),
        CaseVariant::Pascal | CaseVariant::Camel => {
            let mut out = String::with_capacity(text.len() + 8);
            for c in text.chars() {
                if c.is_uppercase() {
                    out.push(' ');
                }
                out.push(c);
            }
            out
        }
        CaseVariant::Japanese => text.to_string(),
    };

    spaced.split_whitespace().map(str::to_string).collect()
}

/// Splits on whitespace, then splits each piece by its own detected case.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .flat_map(|piece| to_words(piece, detect_case(piece)))
        .collect()
}

/// Renders words in the given case.
///
/// Words are split on whitespace first and empty words are dropped, the
/// same way `to_words` reads them back. `Japanese` concatenates the words
/// untouched; producing kana is the pipeline's job since it needs the
/// cache and dictionary.
pub fn format<S: AsRef<str>>(words: &[S], case: CaseVariant) -> String {
    let words = words.iter().flat_map(|w| w.as_ref().split_whitespace());

    match case {
        CaseVariant::Snake => words.map(str::to_lowercase).collect::<Vec<_>>().join("_"),
        CaseVariant::UpperSnake => words.map(str::to_uppercase).collect::<Vec<_>>().join("_"),
        CaseVariant::Kebab => words.map(str::to_lowercase).collect::<Vec<_>>().join("-"),
        CaseVariant::Pascal => words.map(capitalize).collect(),
        CaseVariant::Camel => words
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
            .collect(),
        CaseVariant::Japanese => words.collect(),
    }
}

/// Detects, splits and renders free text in one go.
pub fn reformat(text: &str, case: CaseVariant) -> String {
    format(&split_words(text), case)
}

/// Capitalize first letter of a word, lowercase the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 3] = ["matsuoka", "yuka", "sato"];

    #[test]
    fn test_detect_case() {
        assert_eq!(detect_case("user_name"), CaseVariant::Snake);
        assert_eq!(detect_case("USER_NAME"), CaseVariant::Snake);
        assert_eq!(detect_case("user-name"), CaseVariant::Kebab);
        assert_eq!(detect_case("UserName"), CaseVariant::Pascal);
        assert_eq!(detect_case("userName"), CaseVariant::Camel);
    }

    #[test]
    fn test_single_lowercase_word_defaults_to_camel() {
        assert_eq!(detect_case("user"), CaseVariant::Camel);
        assert_eq!(detect_case(""), CaseVariant::Camel);
    }

    #[test]
    fn test_to_words() {
        assert_eq!(to_words("user_name_id", CaseVariant::Snake), ["user", "name", "id"]);
        assert_eq!(to_words("user-name", CaseVariant::Kebab), ["user", "name"]);
        assert_eq!(to_words("UserName", CaseVariant::Pascal), ["User", "Name"]);
        assert_eq!(to_words("userName", CaseVariant::Camel), ["user", "Name"]);
        assert_eq!(to_words("  a__b ", CaseVariant::Snake), ["a", "b"]);
    }

    #[test]
    fn test_to_words_splits_every_capital() {
        assert_eq!(to_words("getHTTP", CaseVariant::Camel), ["get", "H", "T", "T", "P"]);
    }

    #[test]
    fn test_format_each_case() {
        assert_eq!(format(&WORDS, CaseVariant::Snake), "matsuoka_yuka_sato");
        assert_eq!(format(&WORDS, CaseVariant::UpperSnake), "MATSUOKA_YUKA_SATO");
        assert_eq!(format(&WORDS, CaseVariant::Pascal), "MatsuokaYukaSato");
        assert_eq!(format(&WORDS, CaseVariant::Camel), "matsuokaYukaSato");
        assert_eq!(format(&WORDS, CaseVariant::Kebab), "matsuoka-yuka-sato");
        assert_eq!(format(&WORDS, CaseVariant::Japanese), "matsuokayukasato");
    }

    #[test]
    fn test_format_skips_blank_words() {
        assert_eq!(format(&["", "a"], CaseVariant::Snake), "a");
        assert_eq!(format(&["", "a"], CaseVariant::Camel), "a");
        assert_eq!(format(&["x", ""], CaseVariant::Kebab), "x");
        assert_eq!(format(&["a b"], CaseVariant::Snake), "a_b");
        assert_eq!(format(&["a b"], CaseVariant::Pascal), "AB");
    }

    #[test]
    fn test_format_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(format(&empty, CaseVariant::Pascal), "");
    }

    #[test]
    fn test_format_is_idempotent() {
        let inputs: [&[&str]; 6] = [
            &WORDS,
            &["User", "ID"],
            &["keisansho"],
            &["", "a"],
            &["x", ""],
            &["a b"],
        ];

        for words in inputs {
            for case in CaseVariant::ALL {
                if case == CaseVariant::Japanese {
                    continue;
                }
                let once = format(words, case);
                let twice = format(&to_words(&once, case), case);
                assert_eq!(once, twice, "case {} on {:?}", case, words);
            }
        }
    }

    #[test]
    fn test_reformat_between_cases() {
        assert_eq!(reformat("userName", CaseVariant::Snake), "user_name");
        assert_eq!(reformat("user_name", CaseVariant::Pascal), "UserName");
        assert_eq!(reformat("USER_NAME", CaseVariant::Kebab), "user-name");
        assert_eq!(reformat("matsuoka user_id", CaseVariant::Camel), "matsuokaUserId");
    }

    #[test]
    fn test_parse_case_names() {
        assert_eq!("snake".parse::<CaseVariant>().unwrap(), CaseVariant::Snake);
        assert_eq!("UPPER_SNAKE".parse::<CaseVariant>().unwrap(), CaseVariant::UpperSnake);
        assert_eq!("reset".parse::<CaseVariant>().unwrap(), CaseVariant::Japanese);
        assert!("title".parse::<CaseVariant>().is_err());

        for case in CaseVariant::ALL {
            assert_eq!(case.name().parse::<CaseVariant>().unwrap(), case);
        }
    }
}
