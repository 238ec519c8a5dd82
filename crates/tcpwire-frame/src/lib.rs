//! Length-prefixed message framing over a stream connection.
//!
//! This is the core value-add layer of tcpwire. Every message is framed with
//! a 4-byte big-endian payload length followed by the payload itself. There
//! is no magic number, version byte or checksum.
//!
//! Reads are all-or-nothing: callers get a complete payload or a
//! [`WireError`] whose [`WireErrorKind`] says what to do next.

pub mod codec;
pub mod error;
pub mod transport;
pub mod wire;

pub use codec::{
    decode_prefix, encode_frame, validate_length, FrameConfig, DEFAULT_MAX_MESSAGE_SIZE,
    PREFIX_SIZE,
};
pub use error::{Cause, Result, WireError, WireErrorKind};
pub use transport::{FrameTransport, MAX_WRITE_ATTEMPTS};
pub use wire::Wire;
