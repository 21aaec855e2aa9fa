//! Kanji reading providers.
//!
//! Kanji have no fixed reading, so converting them needs either a
//! dictionary or a service. Every provider implements [`KanjiResolver`];
//! which one is used is decided once from the configuration by
//! [`build_resolver`].

mod goo;
mod llm;
mod offline;

pub use goo::GooLabsResolver;
pub use llm::LlmResolver;
pub use offline::OfflineResolver;

use crate::config::{Config, HttpConfig, Provider};
use crate::error::ResolverError;
use async_trait::async_trait;
use std::time::Duration;

/// Turns a kanji token into romaji.
///
/// Implementations make exactly one attempt per call; retry policy, if
/// any, belongs to the caller.
#[async_trait]
pub trait KanjiResolver: Send + Sync {
    /// Returns the human-readable name of this provider.
    fn name(&self) -> &'static str;

    /// Resolves `text` (a run of kanji) to lowercase romaji.
    async fn resolve(&self, text: &str) -> Result<String, ResolverError>;
}

/// Builds the provider selected in `config`.
pub fn build_resolver(config: &Config) -> Result<Box<dyn KanjiResolver>, ResolverError> {
    let resolver: Box<dyn KanjiResolver> = match config.resolver.provider {
        Provider::Offline => match &config.offline.readings_path {
            Some(path) => Box::new(OfflineResolver::with_readings_file(path)?),
            None => Box::new(OfflineResolver::new()),
        },
        Provider::Goo => Box::new(GooLabsResolver::new(
            create_http_client(&config.http)?,
            config.goo.clone(),
        )),
        Provider::Llm => Box::new(LlmResolver::new(
            create_http_client(&config.http)?,
            config.llm.clone(),
        )),
    };

    Ok(resolver)
}

/// Common HTTP client configuration for the remote providers.
pub fn create_http_client(http: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("romacase/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(http.timeout_sec));

    if let Some(proxy) = &http.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    builder.build()
}
