//! Utility functions for common operations.

use crate::error::ResolverError;

/// Splits a selection into trimmed lines.
///
/// Both `\n` and `\r\n` end a line. Blank lines are kept so that the output
/// has exactly as many lines as the input.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).trim())
        .collect()
}

/// Collapses every run of whitespace into one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Checks if an HTTP response is successful, and if not, returns a detailed error.
///
/// This helper extracts both the status code and response body for better error messages.
pub async fn check_response_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ResolverError> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(ResolverError::ApiError(format!(
            "HTTP {}: {}",
            status, text
        )));
    }
    Ok(response)
}
