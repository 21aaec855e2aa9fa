//! Splitting a line into tokens.
//!
//! Real morphological analysis is out of scope; the pipeline only needs
//! tokens that never straddle two scripts and that concatenate back to the
//! original text.

use crate::script::{is_hiragana, is_kanji, is_katakana, PROLONGED_SOUND_MARK};

/// Anything that can split text into tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Hiragana,
    Katakana,
    Kanji,
    Latin,
    Space,
    Other,
}

fn run_of(c: char) -> Run {
    if is_hiragana(c) {
        Run::Hiragana
    } else if is_katakana(c) {
        Run::Katakana
    } else if is_kanji(c) {
        Run::Kanji
    } else if c.is_ascii_alphanumeric() {
        Run::Latin
    } else if c.is_whitespace() {
        Run::Space
    } else {
        Run::Other
    }
}

/// Splits wherever the script changes: hiragana, katakana, kanji, Latin
/// letters and digits, whitespace and everything else each form their own
/// runs. ー sticks to the kana run it follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTokenizer;

impl Tokenizer for ScriptTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut current_run: Option<Run> = None;

        for c in text.chars() {
            let mut run = run_of(c);
            if c == PROLONGED_SOUND_MARK && current_run == Some(Run::Hiragana) {
                run = Run::Hiragana;
            }

            if current_run.is_some_and(|r| r != run) {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(c);
            current_run = Some(run);
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }
}
