//! Hepburn romanization of kana.
//!
//! Conversion runs in two passes. The first is a plain table lookup that
//! prefers two-kana digraphs (きょ → kyo) over single kana. The second
//! rewrites the Latin output with the contextual rules of Hepburn as used
//! for Japanese names: long vowels collapse, `n` becomes `m` before labials
//! and the small tsu doubles the following consonant.
//!
//! The small tsu is deliberately absent from the table so that it survives
//! the first pass and can look at the consonant that follows it.

use crate::script::{katakana_to_hiragana_char, PROLONGED_SOUND_MARK};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Hiragana to Latin. Katakana is looked up through its hiragana form.
/// Order matters for the reverse table: the first kana listed for a
/// syllable is the one `to_kana` produces.
const KANA_TABLE: &[(&str, &str)] = &[
    // Vowels and plain syllables
    ("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o"),
    ("か", "ka"), ("き", "ki"), ("く", "ku"), ("け", "ke"), ("こ", "ko"),
    ("が", "ga"), ("ぎ", "gi"), ("ぐ", "gu"), ("げ", "ge"), ("ご", "go"),
    ("さ", "sa"), ("し", "shi"), ("す", "su"), ("せ", "se"), ("そ", "so"),
    ("ざ", "za"), ("じ", "ji"), ("ず", "zu"), ("ぜ", "ze"), ("ぞ", "zo"),
    ("た", "ta"), ("ち", "chi"), ("つ", "tsu"), ("て", "te"), ("と", "to"),
    ("だ", "da"), ("ぢ", "ji"), ("づ", "zu"), ("で", "de"), ("ど", "do"),
    ("な", "na"), ("に", "ni"), ("ぬ", "nu"), ("ね", "ne"), ("の", "no"),
    ("は", "ha"), ("ひ", "hi"), ("ふ", "fu"), ("へ", "he"), ("ほ", "ho"),
    ("ば", "ba"), ("び", "bi"), ("ぶ", "bu"), ("べ", "be"), ("ぼ", "bo"),
    ("ぱ", "pa"), ("ぴ", "pi"), ("ぷ", "pu"), ("ぺ", "pe"), ("ぽ", "po"),
    ("ま", "ma"), ("み", "mi"), ("む", "mu"), ("め", "me"), ("も", "mo"),
    ("や", "ya"), ("ゆ", "yu"), ("よ", "yo"),
    ("ら", "ra"), ("り", "ri"), ("る", "ru"), ("れ", "re"), ("ろ", "ro"),
    ("わ", "wa"), ("ゐ", "i"), ("ゑ", "e"), ("を", "o"), ("ん", "n"),
    ("ゔ", "vu"),
    // Small kana on their own
    ("ぁ", "a"), ("ぃ", "i"), ("ぅ", "u"), ("ぇ", "e"), ("ぉ", "o"),
    ("ゃ", "ya"), ("ゅ", "yu"), ("ょ", "yo"), ("ゎ", "wa"),
    ("ゕ", "ka"), ("ゖ", "ke"),
    // Palatalized digraphs
    ("きゃ", "kya"), ("きゅ", "kyu"), ("きょ", "kyo"),
    ("ぎゃ", "gya"), ("ぎゅ", "gyu"), ("ぎょ", "gyo"),
    ("しゃ", "sha"), ("しゅ", "shu"), ("しょ", "sho"), ("しぇ", "she"),
    ("じゃ", "ja"), ("じゅ", "ju"), ("じょ", "jo"), ("じぇ", "je"),
    ("ちゃ", "cha"), ("ちゅ", "chu"), ("ちょ", "cho"), ("ちぇ", "che"),
    ("ぢゃ", "ja"), ("ぢゅ", "ju"), ("ぢょ", "jo"),
    ("にゃ", "nya"), ("にゅ", "nyu"), ("にょ", "nyo"),
    ("ひゃ", "hya"), ("ひゅ", "hyu"), ("ひょ", "hyo"),
    ("びゃ", "bya"), ("びゅ", "byu"), ("びょ", "byo"),
    ("ぴゃ", "pya"), ("ぴゅ", "pyu"), ("ぴょ", "pyo"),
    ("みゃ", "mya"), ("みゅ", "myu"), ("みょ", "myo"),
    ("りゃ", "rya"), ("りゅ", "ryu"), ("りょ", "ryo"),
    // Loanword digraphs
    ("ふぁ", "fa"), ("ふぃ", "fi"), ("ふぇ", "fe"), ("ふぉ", "fo"),
    ("てぃ", "ti"), ("でぃ", "di"), ("とぅ", "tu"), ("どぅ", "du"),
    ("うぃ", "wi"), ("うぇ", "we"), ("うぉ", "wo"), ("いぇ", "ye"),
    ("つぁ", "tsa"), ("ゔぁ", "va"), ("ゔぃ", "vi"), ("ゔぇ", "ve"), ("ゔぉ", "vo"),
];

static ROMANIZATION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| KANA_TABLE.iter().copied().collect());

static KANA_BY_ROMAJI: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for &(kana, romaji) in KANA_TABLE {
        map.entry(romaji).or_insert(kana);
    }
    map
});

/// Readings that must survive the long-vowel rule (井上, 藤内 and friends).
const PROTECTED_READINGS: &[&str] = &["noue", "touchi"];

fn is_sokuon(c: char) -> bool {
    c == 'っ' || c == 'ッ'
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'i' | 'u' | 'e' | 'o')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c)
}

fn matches_at(rest: &[char], literal: &str) -> bool {
    let len = literal.chars().count();
    rest.len() >= len && rest.iter().zip(literal.chars()).all(|(&a, b)| a == b)
}

fn lookup(kana: &[char]) -> Option<&'static str> {
    let key: String = kana.iter().map(|&c| katakana_to_hiragana_char(c)).collect();
    ROMANIZATION_MAP.get(key.as_str()).copied()
}

/// Converts kana to Hepburn romaji.
///
/// The lookup pass leaves non-kana characters alone, but the contextual
/// pass runs over the whole result, so Latin input is rewritten too
/// ("book" becomes "bok"). Pass kana only.
pub fn to_hepburn(input: &str) -> String {
    let romaji: Vec<char> = lookup_pass(input).chars().collect();
    rewrite_pass(&romaji)
}

/// First pass: maximal-munch table lookup.
fn lookup_pass(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if i + 2 <= chars.len() {
            if let Some(romaji) = lookup(&chars[i..i + 2]) {
                out.push_str(romaji);
                i += 2;
                continue;
            }
        }

        if let Some(romaji) = lookup(&chars[i..i + 1]) {
            out.push_str(romaji);
        } else if chars[i] == PROLONGED_SOUND_MARK {
            // ー lengthens whatever vowel came before it
            match out.chars().last().filter(|&c| is_vowel(c)) {
                Some(vowel) => out.push(vowel),
                None => out.push(chars[i]),
            }
        } else {
            out.push(chars[i]);
        }
        i += 1;
    }

    out
}

/// Second pass: contextual rewrite. Rules are tried in priority order and
/// the first that matches consumes its span.
fn rewrite_pass(romaji: &[char]) -> String {
    let len = romaji.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    'scan: while i < len {
        let rest = &romaji[i..];

        for protected in PROTECTED_READINGS {
            if matches_at(rest, protected) {
                out.push_str(protected);
                i += protected.len();
                continue 'scan;
            }
        }

        if let [first, second, ..] = *rest {
            let long_vowel = matches!(
                (first, second),
                ('u', 'u') | ('e', 'e') | ('o', 'u') | ('o', 'o')
            );
            if long_vowel {
                // word-final "oo" stays long (せいのお → seinoo)
                if i + 2 == len && first == 'o' && second == 'o' {
                    out.push_str("oo");
                } else {
                    out.push(first);
                }
                i += 2;
                continue;
            }

            if first == 'n' && matches!(second, 'b' | 'm' | 'p') {
                out.push('m');
                i += 1;
                continue;
            }
        }

        if is_sokuon(rest[0]) {
            match (rest.get(1).copied(), rest.get(2).copied()) {
                (Some('c'), Some('h')) => out.push('t'),
                (Some(next), _) if is_consonant(next) => out.push(next),
                _ => out.push_str("tsu"),
            }
            i += 1;
            continue;
        }

        out.push(rest[0]);
        i += 1;
    }

    out
}

/// Converts romaji back to hiragana.
///
/// Long vowels that `to_hepburn` collapsed cannot be recovered, so this is
/// a best-effort reading rather than an inverse.
pub fn to_kana(input: &str) -> String {
    let chars: Vec<char> = input.to_lowercase().chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(input.len() * 3);
    let mut i = 0;

    'scan: while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c == 'm' && matches!(next, Some('b' | 'm' | 'p')) {
            out.push('ん');
            i += 1;
            continue;
        }

        if c == 'n' && next.is_none_or(|n| is_consonant(n) && n != 'y') {
            out.push('ん');
            i += 1;
            continue;
        }

        if is_consonant(c) && (next == Some(c) || (c == 't' && next == Some('c'))) {
            out.push('っ');
            i += 1;
            continue;
        }

        for width in (1..=3).rev() {
            if i + width > len {
                continue;
            }
            let key: String = chars[i..i + width].iter().collect();
            if let Some(kana) = KANA_BY_ROMAJI.get(key.as_str()) {
                out.push_str(kana);
                i += width;
                continue 'scan;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surnames() {
        let cases = [
            ("はっとり", "hattori"),
            ("しんばし", "shimbashi"),
            ("あおき", "aoki"),
            ("まつおか", "matsuoka"),
            ("ゆうか", "yuka"),
            ("さとう", "sato"),
            ("おおの", "ono"),
            ("おおおか", "ooka"),
            ("こおりやま", "koriyama"),
            ("じゅん", "jun"),
            ("みそのう", "misono"),
            ("たかとう", "takato"),
            ("ふじた", "fujita"),
            ("いけだ", "ikeda"),
            ("たかはし", "takahashi"),
            ("ふじもと", "fujimoto"),
            ("いしい", "ishii"),
            ("いわさき", "iwasaki"),
        ];

        for (input, expected) in cases {
            assert_eq!(to_hepburn(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_word_final_oo_preserved() {
        assert_eq!(to_hepburn("せいのお"), "seinoo");
    }

    #[test]
    fn test_nasal_assimilation_before_labials_only() {
        assert_eq!(to_hepburn("さんぺい"), "sampei");
        assert_eq!(to_hepburn("ほんま"), "homma");
        assert_eq!(to_hepburn("かんだ"), "kanda");
    }

    #[test]
    fn test_geminates() {
        assert_eq!(to_hepburn("はっとり"), "hattori");
        assert_eq!(to_hepburn("きっかわ"), "kikkawa");
        assert_eq!(to_hepburn("はっちょうぼり"), "hatchobori");
    }

    #[test]
    fn test_trailing_small_tsu_spelled_out() {
        assert_eq!(to_hepburn("あっ"), "atsu");
        assert_eq!(to_hepburn("ッ"), "tsu");
    }

    #[test]
    fn test_protected_readings() {
        assert_eq!(to_hepburn("いのうえ"), "inoue");
        assert_eq!(to_hepburn("のうえ"), "noue");
        assert_eq!(to_hepburn("ふじとうち"), "fujitouchi");
    }

    #[test]
    fn test_katakana_uses_same_rules() {
        assert_eq!(to_hepburn("サトウ"), "sato");
        assert_eq!(to_hepburn("ハットリ"), "hattori");
        assert_eq!(to_hepburn("ティッシュ"), "tisshu");
    }

    #[test]
    fn test_prolonged_sound_mark() {
        assert_eq!(to_hepburn("コード"), "kodo");
        assert_eq!(to_hepburn("ー"), "ー");
    }

    #[test]
    fn test_unmapped_text_is_identity() {
        for input in ["計算書", "123", "!?", "", "漢字、。"] {
            assert_eq!(to_hepburn(input), input);
        }
    }

    #[test]
    fn test_latin_input_goes_through_rewrite_rules() {
        assert_eq!(to_hepburn("book"), "bok");
        assert_eq!(to_hepburn("input"), "imput");
    }

    #[test]
    fn test_to_kana() {
        assert_eq!(to_kana("sato"), "さと");
        assert_eq!(to_kana("hattori"), "はっとり");
        assert_eq!(to_kana("homma"), "ほんま");
        assert_eq!(to_kana("kanda"), "かんだ");
        assert_eq!(to_kana("jun"), "じゅん");
        assert_eq!(to_kana("hatchobori"), "はっちょぼり");
        assert_eq!(to_kana("Shimbashi"), "しんばし");
        assert_eq!(to_kana("konnichiha"), "こんにちは");
    }

    #[test]
    fn test_to_kana_leaves_unknown_letters() {
        assert_eq!(to_kana("x1"), "x1");
    }
}
