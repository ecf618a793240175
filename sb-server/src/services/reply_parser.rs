//! Structured reply extraction
//!
//! Models are asked to answer with a bare JSON object but often wrap it in a
//! Markdown code fence or in prose that may itself contain braces. Every `{`
//! is tried as the start of a complete JSON object; the first one that
//! deserializes into the requested type wins. No match is an
//! [`AiError::Protocol`].

use crate::services::anthropic_client::AiError;
use serde::de::DeserializeOwned;

/// Parse a reply into `T`, tolerating fences and surrounding prose
pub fn parse_structured_reply<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let mut first_error: Option<String> = None;

    for (start, _) in text.match_indices('{') {
        let mut values =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();

        let value = match values.next() {
            Some(Ok(value)) => value,
            _ => continue,
        };

        match serde_json::from_value::<T>(value) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e.to_string());
                }
            }
        }
    }

    Err(AiError::Protocol(
        first_error.unwrap_or_else(|| "Reply contains no JSON object".to_string()),
    ))
}
