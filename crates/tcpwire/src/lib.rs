//! Length-prefixed request/response messaging over TCP.
//!
//! tcpwire turns a TCP connection into a channel of discrete, serialized
//! messages. Each message travels as one frame: a 4-byte big-endian length
//! followed by the payload. Every failure is classified into a
//! [`WireErrorKind`](frame::WireErrorKind) so callers can decide whether to
//! retry, reconnect or give up.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP connection primitive (dial, adopt, socket tuning)
//! - [`frame`] — Length-prefixed framing and the wire error taxonomy
//! - [`codec`] — Typed messages over frames with pluggable serialization
//! - [`endpoint`] — Client and server endpoints (behind `endpoint` feature)

/// Re-export transport types.
pub mod transport {
    pub use tcpwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use tcpwire_frame::*;
}

/// Re-export codec types.
pub mod codec {
    pub use tcpwire_codec::*;
}

/// Re-export endpoint types (requires `endpoint` feature).
#[cfg(feature = "endpoint")]
pub mod endpoint {
    pub use tcpwire_endpoint::*;
}
