//! The transformation pipeline.
//!
//! Each line of a selection goes through: standardize, dictionary
//! overrides, tokenize, per-token resolution, join, case formatting.
//! Tokens are resolved strictly in order, one resolver call at a time.

use crate::cache::{JsonCacheFile, TranslationCache};
use crate::case::{reformat, split_words, CaseVariant};
use crate::config::Config;
use crate::console::Console;
use crate::dictionary::Dictionary;
use crate::error::{PipelineError, ResolverError, Result};
use crate::hepburn::{to_hepburn, to_kana};
use crate::resolver::{build_resolver, KanjiResolver};
use crate::script::{classify, has_japanese, standardize, ScriptClass};
use crate::tokenize::{ScriptTokenizer, Tokenizer};
use crate::utils::{collapse_whitespace, split_lines};

/// Where a token's romaji came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Dictionary,
    Kana,
    Kanji,
    Unchanged,
}

impl Source {
    /// Whether the result is worth remembering in the cache.
    fn is_cacheable(self) -> bool {
        matches!(self, Source::Kana | Source::Kanji)
    }
}

/// A resolved token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub source: Source,
}

impl Resolution {
    fn new(text: impl Into<String>, source: Source) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Owns everything a transformation needs: the dictionary, the cache, the
/// configured kanji resolver and the tokenizer.
pub struct Pipeline {
    dictionary: Dictionary,
    cache: TranslationCache,
    resolver: Box<dyn KanjiResolver>,
    tokenizer: Box<dyn Tokenizer>,
    console: Console,
}

impl Pipeline {
    /// Create a new Pipeline with the script tokenizer and no log output.
    pub fn new(
        dictionary: Dictionary,
        cache: TranslationCache,
        resolver: Box<dyn KanjiResolver>,
    ) -> Self {
        Self {
            dictionary,
            cache,
            resolver,
            tokenizer: Box::new(ScriptTokenizer),
            console: Console::silent(),
        }
    }

    /// Loads the dictionary and cache named in `config` and builds its resolver.
    pub fn from_config(config: &Config, console: Console) -> Result<Self> {
        let dictionary =
            Dictionary::load(&config.dictionary_file()?).map_err(PipelineError::Dictionary)?;
        let cache = TranslationCache::load(
            Box::new(JsonCacheFile::new(config.cache_file()?)),
            config.cache.enabled,
        )
        .map_err(PipelineError::Cache)?;
        let resolver = build_resolver(config)?;

        console.info(&format!(
            "Using {} resolver, {} dictionary entries, {} cached tokens",
            resolver.name(),
            dictionary.len(),
            cache.len()
        ));
        if !cache.is_enabled() {
            console.info("Translation cache is disabled");
        }

        Ok(Self::new(dictionary, cache, resolver).with_console(console))
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Transforms a whole selection. Lines are processed independently and
    /// the output has as many lines as the input.
    pub async fn transform(
        &mut self,
        text: &str,
        case: CaseVariant,
    ) -> std::result::Result<String, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut output = Vec::new();
        for line in split_lines(text) {
            output.push(self.transform_line(line, case).await);
        }

        Ok(output.join("\n"))
    }

    async fn transform_line(&mut self, line: &str, case: CaseVariant) -> String {
        let standardized = standardize(line);

        if case == CaseVariant::Japanese {
            return self.to_japanese(&standardized);
        }

        let overridden = self.dictionary.apply(&standardized);

        // Already Latin, possibly thanks to the dictionary: just recase it.
        if !has_japanese(&overridden) {
            return reformat(&overridden, case);
        }

        let tokens = self.tokenizer.tokenize(&overridden);
        let mut resolved = Vec::with_capacity(tokens.len());

        for token in &tokens {
            match self.resolve_token(token, case).await {
                Ok(resolution) => {
                    if resolution.source != Source::Unchanged {
                        self.console.debug(&format!(
                            "{} -> {} ({:?})",
                            self.console.token(token),
                            resolution.text,
                            resolution.source
                        ));
                    }
                    if resolution.source.is_cacheable() {
                        if let Err(e) = self.cache.put(token, &resolution.text) {
                            self.console
                                .warning(&format!("Could not save translation cache: {}", e));
                        }
                    }
                    resolved.push(resolution.text);
                }
                Err(e) => {
                    self.console.warning(&format!(
                        "Could not resolve {} with {}: {}",
                        self.console.token(token),
                        self.resolver.name(),
                        e
                    ));
                    resolved.push(token.clone());
                }
            }
        }

        reformat(&collapse_whitespace(&resolved.join(" ")), case)
    }

    /// Resolves one token: cache, then dictionary, then by script.
    pub async fn resolve_token(
        &self,
        token: &str,
        case: CaseVariant,
    ) -> std::result::Result<Resolution, ResolverError> {
        if let Some(hit) = self.cache.get(token) {
            return Ok(Resolution::new(hit, Source::Cache));
        }

        if let Some(target) = self.dictionary.lookup(token) {
            return Ok(Resolution::new(reformat(target, case), Source::Dictionary));
        }

        match classify(token) {
            ScriptClass::Kana => Ok(Resolution::new(to_hepburn(token), Source::Kana)),
            ScriptClass::Kanji => {
                let romaji = self.resolver.resolve(token).await?;
                Ok(Resolution::new(romaji, Source::Kanji))
            }
            ScriptClass::Other => Ok(Resolution::new(token, Source::Unchanged)),
        }
    }

    /// Writes a line back in Japanese. Japanese already in the line stays;
    /// romaji goes through the cache and dictionary in reverse, and
    /// whatever is left is spelled out in hiragana.
    fn to_japanese(&self, line: &str) -> String {
        let mut out = String::new();
        let mut latin = String::new();

        for token in self.tokenizer.tokenize(line) {
            if classify(&token) == ScriptClass::Other {
                latin.push_str(&token);
            } else {
                self.push_kana(&mut out, &std::mem::take(&mut latin));
                out.push_str(&token);
            }
        }
        self.push_kana(&mut out, &latin);

        out
    }

    fn push_kana(&self, out: &mut String, latin: &str) {
        for piece in latin.split_whitespace() {
            if let Some(source) = self.reverse_lookup(piece) {
                out.push_str(&source);
                continue;
            }
            for word in split_words(piece) {
                match self.reverse_lookup(&word) {
                    Some(source) => out.push_str(&source),
                    None => out.push_str(&to_kana(&word)),
                }
            }
        }
    }

    fn reverse_lookup(&self, romaji: &str) -> Option<String> {
        self.cache
            .reverse_lookup(romaji)
            .or_else(|| self.dictionary.lookup_reverse(romaji))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::dictionary::DictionaryEntry;
    use crate::resolver::OfflineResolver;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Resolver that answers with a fixed reading and counts its calls.
    struct CountingResolver {
        calls: Arc<AtomicUsize>,
        answer: Option<&'static str>,
    }

    #[async_trait]
    impl KanjiResolver for CountingResolver {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn resolve(&self, text: &str) -> std::result::Result<String, ResolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .map(str::to_string)
                .ok_or_else(|| ResolverError::NoReading(text.to_string()))
        }
    }

    fn counting(answer: Option<&'static str>) -> (Box<dyn KanjiResolver>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = CountingResolver {
            calls: Arc::clone(&calls),
            answer,
        };
        (Box::new(resolver), calls)
    }

    /// Tokenizer that makes every character its own token.
    struct CharTokenizer;

    impl Tokenizer for CharTokenizer {
        fn tokenize(&self, text: &str) -> Vec<String> {
            text.chars().map(String::from).collect()
        }
    }

    fn cache_with(store: &MemoryCacheStore, enabled: bool) -> TranslationCache {
        TranslationCache::load(Box::new(store.clone()), enabled).unwrap()
    }

    fn offline_pipeline() -> Pipeline {
        Pipeline::new(
            Dictionary::in_memory(Vec::new()),
            cache_with(&MemoryCacheStore::new(), false),
            Box::new(OfflineResolver::new()),
        )
    }

    #[tokio::test]
    async fn test_names_in_every_case() {
        let mut pipeline = offline_pipeline();
        let cases = [
            ("はっとり しんばし あおき", CaseVariant::Snake, "hattori_shimbashi_aoki"),
            ("まつおか ゆうか さとう", CaseVariant::Snake, "matsuoka_yuka_sato"),
            ("おおの おおおか こおりやま", CaseVariant::Snake, "ono_ooka_koriyama"),
            ("さんぺい ほんま かんだ", CaseVariant::Snake, "sampei_homma_kanda"),
            ("まつおか ゆうか さとう", CaseVariant::Pascal, "MatsuokaYukaSato"),
            ("おおの おおおか こおりやま", CaseVariant::Pascal, "OnoOokaKoriyama"),
            ("おおの おおおか こおりやま", CaseVariant::Camel, "onoOokaKoriyama"),
            ("さんぺい ほんま かんだ", CaseVariant::Kebab, "sampei-homma-kanda"),
            ("まつおか ゆうか さとう", CaseVariant::UpperSnake, "MATSUOKA_YUKA_SATO"),
        ];

        for (input, case, expected) in cases {
            assert_eq!(pipeline.transform(input, case).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_kanji_through_offline_resolver() {
        let mut pipeline = offline_pipeline();
        assert_eq!(
            pipeline.transform("計算書", CaseVariant::Pascal).await.unwrap(),
            "Keisansho"
        );
        assert_eq!(
            pipeline
                .transform("受付事件コード", CaseVariant::UpperSnake)
                .await
                .unwrap(),
            "UKETSUKEJIKEN_KODO"
        );
    }

    #[tokio::test]
    async fn test_mixed_script_line() {
        let mut pipeline = offline_pipeline();
        assert_eq!(
            pipeline.transform("ほんまuserId", CaseVariant::Snake).await.unwrap(),
            "homma_user_id"
        );
    }

    #[tokio::test]
    async fn test_custom_tokenizer_decides_resolver_calls() {
        let (resolver, calls) = counting(Some("ji"));
        let mut pipeline = Pipeline::new(
            Dictionary::in_memory(Vec::new()),
            cache_with(&MemoryCacheStore::new(), false),
            resolver,
        )
        .with_tokenizer(Box::new(CharTokenizer));

        assert_eq!(
            pipeline.transform("計算", CaseVariant::Snake).await.unwrap(),
            "ji_ji"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut pipeline = offline_pipeline();
        assert!(matches!(
            pipeline.transform("", CaseVariant::Snake).await,
            Err(PipelineError::EmptyInput)
        ));
        assert!(matches!(
            pipeline.transform(" \n ", CaseVariant::Snake).await,
            Err(PipelineError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn test_lines_kept_in_order() {
        let mut pipeline = offline_pipeline();
        let output = pipeline
            .transform("さとう\r\n\n  userName  ", CaseVariant::Kebab)
            .await
            .unwrap();
        assert_eq!(output, "sato\n\nuser-name");
    }

    #[tokio::test]
    async fn test_latin_line_is_recased_without_resolving() {
        let (resolver, calls) = counting(Some("never"));
        let mut pipeline = Pipeline::new(
            Dictionary::in_memory(Vec::new()),
            cache_with(&MemoryCacheStore::new(), true),
            resolver,
        );

        assert_eq!(
            pipeline.transform("getUserName", CaseVariant::UpperSnake).await.unwrap(),
            "GET_USER_NAME"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dictionary_line_never_reaches_resolver() {
        let (resolver, calls) = counting(Some("never"));
        let dictionary = Dictionary::in_memory(vec![DictionaryEntry::new("計算書", "invoice_total")]);
        let mut pipeline = Pipeline::new(dictionary, cache_with(&MemoryCacheStore::new(), true), resolver);

        assert_eq!(
            pipeline.transform("計算書", CaseVariant::Pascal).await.unwrap(),
            "InvoiceTotal"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dictionary_phrase_inside_kana_line() {
        let dictionary = Dictionary::in_memory(vec![DictionaryEntry::new("ゆうか", "yuuka")]);
        let mut pipeline = Pipeline::new(
            dictionary,
            cache_with(&MemoryCacheStore::new(), false),
            Box::new(OfflineResolver::new()),
        );

        assert_eq!(
            pipeline.transform("まつおか ゆうか", CaseVariant::Snake).await.unwrap(),
            "matsuoka_yuuka"
        );
    }

    #[tokio::test]
    async fn test_resolver_failure_keeps_token() {
        let (resolver, calls) = counting(None);
        let mut pipeline = Pipeline::new(
            Dictionary::in_memory(Vec::new()),
            cache_with(&MemoryCacheStore::new(), true),
            resolver,
        );

        assert_eq!(
            pipeline.transform("計算 さとう", CaseVariant::Snake).await.unwrap(),
            "計算_sato"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(pipeline.cache().get("計算").is_none());
    }

    #[tokio::test]
    async fn test_cache_write_through_skips_second_resolve() {
        let (resolver, calls) = counting(Some("keisan"));
        let store = MemoryCacheStore::new();
        let mut pipeline = Pipeline::new(Dictionary::in_memory(Vec::new()), cache_with(&store, true), resolver);

        pipeline.transform("計算", CaseVariant::Snake).await.unwrap();
        assert_eq!(store.snapshot().get("計算").map(String::as_str), Some("keisan"));

        let second = pipeline.transform("計算", CaseVariant::Pascal).await.unwrap();
        assert_eq!(second, "Keisan");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_resolves_every_time() {
        let (resolver, calls) = counting(Some("keisan"));
        let store = MemoryCacheStore::new();
        let mut pipeline = Pipeline::new(Dictionary::in_memory(Vec::new()), cache_with(&store, false), resolver);

        pipeline.transform("計算", CaseVariant::Snake).await.unwrap();
        pipeline.transform("計算", CaseVariant::Snake).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_cache_save_failure_is_not_fatal() {
        let (resolver, calls) = counting(Some("keisan"));
        let cache = TranslationCache::load(Box::new(MemoryCacheStore::failing()), true).unwrap();
        let mut pipeline = Pipeline::new(Dictionary::in_memory(Vec::new()), cache, resolver);

        assert_eq!(
            pipeline.transform("計算 さとう", CaseVariant::Snake).await.unwrap(),
            "keisan_sato"
        );
        // the in-memory entry survived the failed save
        pipeline.transform("計算", CaseVariant::Snake).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_back_to_japanese() {
        let store = MemoryCacheStore::new();
        let mut cache = cache_with(&store, true);
        cache.put("計算", "keisan").unwrap();
        let dictionary = Dictionary::in_memory(vec![DictionaryEntry::new("受付", "uketsuke")]);
        let mut pipeline = Pipeline::new(dictionary, cache, Box::new(OfflineResolver::new()));

        let output = pipeline
            .transform("keisan_sho\nUketsukeSato\n計算id", CaseVariant::Japanese)
            .await
            .unwrap();
        assert_eq!(output, "計算しょ\n受付さと\n計算いd");
    }

    #[tokio::test]
    async fn test_from_config_with_temp_paths() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.cache_file = Some(temp_dir.path().join("cache.json"));
        config.paths.dictionary_file = Some(temp_dir.path().join("dictionary.json"));

        let mut pipeline = Pipeline::from_config(&config, Console::silent()).unwrap();
        assert_eq!(
            pipeline.transform("計算書", CaseVariant::Snake).await.unwrap(),
            "keisansho"
        );

        let saved = std::fs::read_to_string(temp_dir.path().join("cache.json")).unwrap();
        assert!(saved.contains("\"計算書\": \"keisansho\""));
    }

    #[tokio::test]
    async fn test_from_config_rejects_malformed_dictionary() {
        let temp_dir = TempDir::new().unwrap();
        let dictionary_file = temp_dir.path().join("dictionary.json");
        std::fs::write(&dictionary_file, "{").unwrap();

        let mut config = Config::default();
        config.paths.cache_file = Some(temp_dir.path().join("cache.json"));
        config.paths.dictionary_file = Some(dictionary_file);

        let err = Pipeline::from_config(&config, Console::silent()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Dictionary(_))
        ));
    }
}
