//! Romacase - Japanese text to romanized code identifiers.
//!
//! This library provides functionality for:
//! - Romanizing kana with modified Hepburn rules and resolving kanji readings
//! - Overriding readings with a user dictionary and a persistent cache
//! - Rendering the result in snake, upper-snake, pascal, camel or kebab case

pub mod cache;
pub mod case;
pub mod config;
pub mod console;
pub mod dictionary;
pub mod error;
pub mod hepburn;
pub mod pipeline;
pub mod resolver;
pub mod script;
pub mod tokenize;
pub mod utils;

// Re-export commonly used types
pub use cache::{CacheStore, JsonCacheFile, TranslationCache};
pub use case::CaseVariant;
pub use config::Config;
pub use console::Console;
pub use dictionary::{Dictionary, DictionaryEntry};
pub use error::{ConfigError, PipelineError, ResolverError, StoreError};
pub use pipeline::Pipeline;
pub use resolver::{build_resolver, KanjiResolver};
