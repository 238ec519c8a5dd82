use std::io;
use std::time::Duration;

use tcpwire_frame::{Cause, FrameConfig, WireError, DEFAULT_MAX_MESSAGE_SIZE};
use tcpwire_transport::{TransportError, DEFAULT_CONNECT_TIMEOUT};

/// Default keepalive probe interval for server connections.
pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Settings shared by client and server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireConfig {
    /// Largest payload accepted on receive. Default: 16 MiB.
    pub max_message_size: usize,
    /// Bound on establishing an outbound connection (client only).
    pub connect_timeout: Duration,
    /// Keepalive probe interval (server only).
    pub keep_alive_interval: Duration,
    /// Read deadline applied to the socket. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Write deadline applied to the socket. `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
}

impl WireConfig {
    /// Frame transport settings derived from this config.
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_message_size: self.max_message_size,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        }
    }
}

/// Endpoint constructors report socket setup failures as transport errors,
/// including deadlines rejected while building the frame transport.
pub(crate) fn deadline_error(err: WireError) -> TransportError {
    match err.into_cause() {
        Cause::Io(source) => TransportError::SocketOption {
            option: "SO_RCVTIMEO/SO_SNDTIMEO",
            source,
        },
        other => TransportError::Io(io::Error::other(other)),
    }
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
