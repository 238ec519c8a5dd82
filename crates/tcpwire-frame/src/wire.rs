use bytes::Bytes;

use crate::error::Result;

/// A framed, message-oriented channel.
///
/// [`FrameTransport`](crate::FrameTransport) is the implementation shipped
/// with tcpwire; higher layers depend on this trait so they can be driven
/// over any framing.
pub trait Wire: Send + Sync {
    /// Send one message as a single frame.
    fn send(&self, payload: &[u8]) -> Result<()>;

    /// Receive the next complete message.
    fn receive(&self) -> Result<Bytes>;

    /// Close the channel. Safe to call more than once.
    fn close(&self);
}
