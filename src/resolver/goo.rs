//! goo labs katakana conversion API.

use super::KanjiResolver;
use crate::config::GooConfig;
use crate::error::ResolverError;
use crate::hepburn::to_hepburn;
use crate::utils::check_response_status;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Request body for the conversion endpoint.
#[derive(Debug, Serialize)]
struct ConvertRequest<'a> {
    app_id: &'a str,
    sentence: &'a str,
    output_type: &'a str,
}

/// Response from the conversion endpoint.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    converted: String,
}

/// Sends each token to goo labs for a katakana reading.
pub struct GooLabsResolver {
    /// HTTP client for API requests.
    client: Client,
    /// API configuration.
    config: GooConfig,
}

impl GooLabsResolver {
    pub fn new(client: Client, config: GooConfig) -> Self {
        Self { client, config }
    }

    fn request_body<'a>(&'a self, text: &'a str) -> ConvertRequest<'a> {
        ConvertRequest {
            app_id: &self.config.api_key,
            sentence: text,
            output_type: "katakana",
        }
    }
}

/// Romanizes the `converted` field of a response body.
fn parse_response(body: &str) -> Result<String, ResolverError> {
    let response: ConvertResponse =
        serde_json::from_str(body).map_err(|e| ResolverError::ParseError(e.to_string()))?;

    let converted = response.converted.trim();
    if converted.is_empty() {
        return Err(ResolverError::ParseError("Empty conversion".to_string()));
    }

    Ok(to_hepburn(converted))
}

#[async_trait]
impl KanjiResolver for GooLabsResolver {
    fn name(&self) -> &'static str {
        "goo labs"
    }

    async fn resolve(&self, text: &str) -> Result<String, ResolverError> {
        if !self.config.is_configured() {
            return Err(ResolverError::InvalidConfig(
                "goo labs application id is not set".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_body(text))
            .send()
            .await?;

        let body = check_response_status(response).await?.text().await?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let config = GooConfig {
            api_key: "app-id".to_string(),
            ..Default::default()
        };
        let resolver = GooLabsResolver::new(Client::new(), config);

        let json = serde_json::to_value(resolver.request_body("計算書")).unwrap();
        assert_eq!(json["app_id"], "app-id");
        assert_eq!(json["sentence"], "計算書");
        assert_eq!(json["output_type"], "katakana");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"request_id":"labs.goo.ne.jp\t1","output_type":"katakana","converted":"ケイサンショ"}"#;
        assert_eq!(parse_response(body).unwrap(), "keisansho");
    }

    #[test]
    fn test_parse_empty_or_invalid() {
        assert!(parse_response(r#"{"converted":"  "}"#).is_err());
        assert!(parse_response("<html>").is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_key_fails_without_request() {
        let resolver = GooLabsResolver::new(Client::new(), GooConfig::default());
        let result = resolver.resolve("計算").await;
        assert!(matches!(result, Err(ResolverError::InvalidConfig(_))));
    }
}
