use std::net::SocketAddr;

use tcpwire_codec::{JsonFormat, MessageCodec, MessageFormat, Result};
use tcpwire_frame::FrameTransport;
use tcpwire_transport::{TcpConnection, TransportError};
use tracing::debug;

use crate::config::{deadline_error, WireConfig};
use crate::message::{Command, Response};

/// Client side of a connection: sends [`Command`]s, receives [`Response`]s.
pub struct ClientWire<F = JsonFormat> {
    codec: MessageCodec<FrameTransport<TcpConnection>, F>,
}

impl ClientWire<JsonFormat> {
    /// Connect to `host:port` using JSON messages.
    pub fn connect(
        config: &WireConfig,
        host: &str,
        port: u16,
    ) -> std::result::Result<Self, TransportError> {
        Self::connect_with_format(config, host, port, JsonFormat)
    }
}

impl<F: MessageFormat> ClientWire<F> {
    /// Connect to `host:port` using an explicit message format.
    ///
    /// Fails if no connection is established within
    /// [`WireConfig::connect_timeout`].
    pub fn connect_with_format(
        config: &WireConfig,
        host: &str,
        port: u16,
        format: F,
    ) -> std::result::Result<Self, TransportError> {
        let conn = TcpConnection::dial(host, port, config.connect_timeout)?;
        let transport =
            FrameTransport::with_config(conn, config.frame_config()).map_err(deadline_error)?;
        debug!(host, port, "client wire ready");
        Ok(Self {
            codec: MessageCodec::with_format(transport, format),
        })
    }

    /// Send a command.
    pub fn send(&self, command: &Command) -> Result<()> {
        self.codec.send(command)
    }

    /// Receive the next response.
    pub fn receive(&self) -> Result<Response> {
        self.codec.receive()
    }

    /// Send a command and wait for its response.
    pub fn request(&self, command: &Command) -> Result<Response> {
        self.send(command)?;
        self.receive()
    }

    /// Close the connection. Safe to call more than once.
    pub fn close(&self) {
        self.codec.close();
    }

    /// Address of the server.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.codec.wire().get_ref().peer_addr().ok()
    }
}
