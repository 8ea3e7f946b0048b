//! Pull structured data out of free-form LLM text.
//!
//! Models wrap JSON in prose or code fences often enough that we never feed
//! raw completions to `serde_json::from_str`. Instead we locate the first
//! well-formed JSON object in the text and deserialize that.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonExtractError {
    /// No `{...}` in the text parses as a JSON object
    #[error("no JSON object found in model output")]
    NoJsonObject,

    /// An object was found but does not have the expected shape
    #[error("JSON object has unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Find the first well-formed JSON object in `text` and deserialize it as `T`.
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> Result<T, JsonExtractError> {
    for (start, _) in text.match_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        if let Some(Ok(value @ Value::Object(_))) = stream.next() {
            return serde_json::from_value(value).map_err(JsonExtractError::from);
        }
    }
    Err(JsonExtractError::NoJsonObject)
}
