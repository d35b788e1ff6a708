//! Encoding of the stored admin permission list.

use thiserror::Error;

/// Failure to encode or decode a stored permission list.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored value is not a list of strings.
    #[error("Malformed permission list: {0}")]
    Malformed(String),

    /// The list could not be written.
    #[error("Failed to encode permission list: {0}")]
    Encode(String),
}

/// Converts between an ordered list of strings and its stored form.
pub trait StringListCodec: Send + Sync {
    /// Write `items` to their stored form.
    fn encode(&self, items: &[String]) -> Result<String, CodecError>;

    /// Read a stored value back into the list it encodes.
    fn decode(&self, encoded: &str) -> Result<Vec<String>, CodecError>;
}

/// Stores the list as a JSON array, e.g. `["user_approve","tag_manage"]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStringListCodec;

impl StringListCodec for JsonStringListCodec {
    fn encode(&self, items: &[String]) -> Result<String, CodecError> {
        serde_json::to_string(items).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, encoded: &str) -> Result<Vec<String>, CodecError> {
        serde_json::from_str(encoded).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}
