use serde::de::DeserializeOwned;
use serde::Serialize;
use tcpwire_frame::Wire;
use tracing::trace;

use crate::error::Result;
use crate::format::{JsonFormat, MessageFormat};

/// Sends and receives typed messages over a [`Wire`].
///
/// Encoding failures surface as [`CodecError::Serialization`]; anything the
/// wire reports is returned as [`CodecError::Wire`] without being
/// reclassified.
///
/// [`CodecError::Serialization`]: crate::CodecError::Serialization
/// [`CodecError::Wire`]: crate::CodecError::Wire
pub struct MessageCodec<W, F = JsonFormat> {
    wire: W,
    format: F,
}

impl<W: Wire> MessageCodec<W, JsonFormat> {
    /// Create a codec using JSON.
    pub fn new(wire: W) -> Self {
        Self::with_format(wire, JsonFormat)
    }
}

impl<W: Wire, F: MessageFormat> MessageCodec<W, F> {
    /// Create a codec using an explicit format.
    pub fn with_format(wire: W, format: F) -> Self {
        Self { wire, format }
    }

    /// Serialize `message` and send it as one frame.
    pub fn send<M: Serialize>(&self, message: &M) -> Result<()> {
        let bytes = self.format.encode(message)?;
        trace!(format = self.format.name(), size = bytes.len(), "message encoded");
        self.wire.send(&bytes)?;
        Ok(())
    }

    /// Receive one frame and deserialize it.
    pub fn receive<M: DeserializeOwned>(&self) -> Result<M> {
        let bytes = self.wire.receive()?;
        let message = self.format.decode(&bytes)?;
        Ok(message)
    }

    /// Close the underlying wire.
    pub fn close(&self) {
        self.wire.close();
    }

    /// Borrow the underlying wire.
    pub fn wire(&self) -> &W {
        &self.wire
    }

    /// Borrow the active format.
    pub fn format(&self) -> &F {
        &self.format
    }
}

impl<W: std::fmt::Debug, F: std::fmt::Debug> std::fmt::Debug for MessageCodec<W, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCodec")
            .field("wire", &self.wire)
            .field("format", &self.format)
            .finish()
    }
}
