use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FormatError;

/// A serialization format for typed messages.
pub trait MessageFormat: Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Serialize a message into bytes.
    fn encode<M: Serialize>(&self, message: &M) -> Result<Vec<u8>, FormatError>;

    /// Deserialize a message from bytes.
    fn decode<M: DeserializeOwned>(&self, bytes: &[u8]) -> Result<M, FormatError>;
}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl MessageFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<M: Serialize>(&self, message: &M) -> Result<Vec<u8>, FormatError> {
        serde_json::to_vec(message).map_err(|err| FormatError::Encode {
            format: self.name(),
            source: Box::new(err),
        })
    }

    fn decode<M: DeserializeOwned>(&self, bytes: &[u8]) -> Result<M, FormatError> {
        serde_json::from_slice(bytes).map_err(|err| FormatError::Decode {
            format: self.name(),
            source: Box::new(err),
        })
    }
}
