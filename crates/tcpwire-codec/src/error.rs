use tcpwire_frame::{WireError, WireErrorKind};

/// A message could not be encoded or decoded by the active format.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The message could not be serialized.
    #[error("failed to encode {format} message: {source}")]
    Encode {
        format: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The bytes are not a valid encoding of the expected message.
    #[error("failed to decode {format} message: {source}")]
    Decode {
        format: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors returned by the typed codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The framing layer failed. Passed through unchanged.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] FormatError),
}

impl CodecError {
    /// Transport classification, if this is a wire failure.
    pub fn wire_kind(&self) -> Option<WireErrorKind> {
        match self {
            CodecError::Wire(err) => Some(err.kind()),
            CodecError::Serialization(_) => None,
        }
    }

    /// Whether this is a serialization failure.
    pub fn is_serialization(&self) -> bool {
        matches!(self, CodecError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
