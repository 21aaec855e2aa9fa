//! Offline readings from a local dictionary.

use super::KanjiResolver;
use crate::error::ResolverError;
use crate::hepburn::to_hepburn;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Readings that ship with the binary. Mostly words that turn up in
/// business-domain identifiers.
const BUILTIN_READINGS: &[(&str, &str)] = &[
    ("計算", "けいさん"),
    ("書", "しょ"),
    ("受付", "うけつけ"),
    ("事件", "じけん"),
    ("番号", "ばんごう"),
    ("名前", "なまえ"),
    ("氏名", "しめい"),
    ("住所", "じゅうしょ"),
    ("電話", "でんわ"),
    ("日付", "ひづけ"),
    ("金額", "きんがく"),
    ("合計", "ごうけい"),
    ("顧客", "こきゃく"),
    ("会社", "かいしゃ"),
    ("社員", "しゃいん"),
    ("商品", "しょうひん"),
    ("注文", "ちゅうもん"),
    ("請求", "せいきゅう"),
    ("登録", "とうろく"),
    ("更新", "こうしん"),
    ("削除", "さくじょ"),
    ("検索", "けんさく"),
    ("一覧", "いちらん"),
    ("詳細", "しょうさい"),
    ("設定", "せってい"),
    ("情報", "じょうほう"),
    ("日本", "にほん"),
    ("東京", "とうきょう"),
    ("田中", "たなか"),
    ("山田", "やまだ"),
    ("佐藤", "さとう"),
    ("井上", "いのうえ"),
];

/// Resolves kanji by greedy longest match against a reading table, then
/// romanizes the joined reading.
pub struct OfflineResolver {
    readings: HashMap<String, String>,
    /// Length in chars of the longest key, bounds the match window.
    longest_key: usize,
}

impl Default for OfflineResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OfflineResolver {
    /// Resolver over the built-in table only.
    pub fn new() -> Self {
        Self::from_readings(HashMap::new())
    }

    /// Built-in table plus `extra`; entries in `extra` win.
    pub fn from_readings(extra: HashMap<String, String>) -> Self {
        let mut readings: HashMap<String, String> = BUILTIN_READINGS
            .iter()
            .map(|&(kanji, kana)| (kanji.to_string(), kana.to_string()))
            .collect();
        readings.extend(extra);

        let longest_key = readings.keys().map(|k| k.chars().count()).max().unwrap_or(0);

        Self {
            readings,
            longest_key,
        }
    }

    /// Built-in table plus a JSON object of kanji → kana read from `path`.
    pub fn with_readings_file(path: &Path) -> Result<Self, ResolverError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResolverError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let extra: HashMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            ResolverError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e))
        })?;

        Ok(Self::from_readings(extra))
    }

    /// Kana reading of `text`, segmenting longest match first.
    fn reading(&self, text: &str) -> Result<String, ResolverError> {
        let chars: Vec<char> = text.chars().collect();
        let mut reading = String::new();
        let mut i = 0;

        'segment: while i < chars.len() {
            let max = self.longest_key.min(chars.len() - i);
            for width in (1..=max).rev() {
                let key: String = chars[i..i + width].iter().collect();
                if let Some(kana) = self.readings.get(&key) {
                    reading.push_str(kana);
                    i += width;
                    continue 'segment;
                }
            }
            return Err(ResolverError::NoReading(chars[i..].iter().collect()));
        }

        Ok(reading)
    }
}

#[async_trait]
impl KanjiResolver for OfflineResolver {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn resolve(&self, text: &str) -> Result<String, ResolverError> {
        let reading = self.reading(text)?;
        Ok(to_hepburn(&reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_compound_from_builtin_table() {
        let resolver = OfflineResolver::new();
        assert_eq!(resolver.resolve("計算書").await.unwrap(), "keisansho");
        assert_eq!(resolver.resolve("井上").await.unwrap(), "inoue");
        assert_eq!(resolver.resolve("東京").await.unwrap(), "tokyo");
    }

    #[tokio::test]
    async fn test_longest_key_wins() {
        let mut extra = HashMap::new();
        extra.insert("計".to_string(), "はかり".to_string());
        let resolver = OfflineResolver::from_readings(extra);
        assert_eq!(resolver.resolve("計算").await.unwrap(), "keisan");
        assert_eq!(resolver.resolve("計").await.unwrap(), "hakari");
    }

    #[tokio::test]
    async fn test_unknown_kanji() {
        let resolver = OfflineResolver::new();
        let result = resolver.resolve("計算機").await;
        assert!(matches!(result, Err(ResolverError::NoReading(ref rest)) if rest == "機"));
    }

    #[tokio::test]
    async fn test_readings_file_overrides_builtin() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"日本": "ニッポン", "機": "き"}"#).unwrap();

        let resolver = OfflineResolver::with_readings_file(file.path()).unwrap();
        assert_eq!(resolver.resolve("日本").await.unwrap(), "nippon");
        assert_eq!(resolver.resolve("計算機").await.unwrap(), "keisanki");
    }

    #[test]
    fn test_bad_readings_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[]").unwrap();
        assert!(OfflineResolver::with_readings_file(file.path()).is_err());
    }
}
