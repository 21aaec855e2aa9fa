//! Character-level script classification for Japanese text.

/// The prolonged sound mark. Lives in the Katakana block but is also
/// written inside hiragana words like "らーめん".
pub const PROLONGED_SOUND_MARK: char = 'ー';

/// Kanji iteration mark, as in "佐々木".
const ITERATION_MARK: char = '々';

/// Script class of a token at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    Kana,
    Kanji,
    Other,
}

/// Full Hiragana block (U+3040..U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Full Katakana block (U+30A0..U+30FF), which includes ー.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

pub fn is_kanji(c: char) -> bool {
    c == ITERATION_MARK
        || ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

/// True when the text contains anything a Japanese reading is needed for.
pub fn has_japanese(text: &str) -> bool {
    text.chars().any(|c| is_kana(c) || is_kanji(c))
}

/// Classifies a whole token. Mixed tokens are `Other`.
pub fn classify(token: &str) -> ScriptClass {
    if token.is_empty() {
        ScriptClass::Other
    } else if token.chars().all(is_kana) {
        ScriptClass::Kana
    } else if token.chars().all(is_kanji) {
        ScriptClass::Kanji
    } else {
        ScriptClass::Other
    }
}

/// Maps a katakana character to its hiragana counterpart.
/// Characters outside the convertible range, including ー, are returned as-is.
pub fn katakana_to_hiragana_char(c: char) -> char {
    if ('\u{30A1}'..='\u{30F6}').contains(&c) {
        char::from_u32(c as u32 - 0x60).unwrap_or(c)
    } else {
        c
    }
}

/// Folds full-width ASCII to ASCII and the ideographic space to a space.
/// Kana and kanji are left alone.
pub fn standardize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}
