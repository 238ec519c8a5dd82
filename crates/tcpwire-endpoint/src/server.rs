use std::net::{SocketAddr, TcpStream};
use std::time::Duration;
#[cfg(unix)]
use std::os::fd::OwnedFd;

use tcpwire_codec::{JsonFormat, MessageCodec, MessageFormat, Result};
use tcpwire_frame::FrameTransport;
use tcpwire_transport::{TcpConnection, TransportError};
use tracing::debug;

use crate::config::{deadline_error, WireConfig};
use crate::message::{Command, Response};

/// Server side of a connection: receives [`Command`]s, sends [`Response`]s.
pub struct ServerWire<F = JsonFormat> {
    codec: MessageCodec<FrameTransport<TcpConnection>, F>,
}

impl ServerWire<JsonFormat> {
    /// Take ownership of an accepted socket descriptor, using JSON messages.
    #[cfg(unix)]
    pub fn adopt(
        config: &WireConfig,
        fd: impl Into<OwnedFd>,
    ) -> std::result::Result<Self, TransportError> {
        Self::adopt_with_format(config, fd, JsonFormat)
    }

    /// Take ownership of an accepted stream, using JSON messages.
    pub fn from_stream(
        config: &WireConfig,
        stream: TcpStream,
    ) -> std::result::Result<Self, TransportError> {
        Self::from_stream_with_format(config, stream, JsonFormat)
    }
}

impl<F: MessageFormat> ServerWire<F> {
    /// Take ownership of an accepted socket descriptor.
    ///
    /// The socket is tuned (`TCP_NODELAY`, keepalive at
    /// [`WireConfig::keep_alive_interval`], read/write deadlines). A tuning
    /// failure means the descriptor is unusable and is returned as an error.
    #[cfg(unix)]
    pub fn adopt_with_format(
        config: &WireConfig,
        fd: impl Into<OwnedFd>,
        format: F,
    ) -> std::result::Result<Self, TransportError> {
        let conn = TcpConnection::adopt(fd)?;
        Self::from_connection(config, conn, format)
    }

    /// Take ownership of an accepted stream.
    pub fn from_stream_with_format(
        config: &WireConfig,
        stream: TcpStream,
        format: F,
    ) -> std::result::Result<Self, TransportError> {
        Self::from_connection(config, TcpConnection::from_stream(stream), format)
    }

    fn from_connection(
        config: &WireConfig,
        conn: TcpConnection,
        format: F,
    ) -> std::result::Result<Self, TransportError> {
        conn.set_nodelay(true)?;
        conn.set_keepalive(config.keep_alive_interval)?;
        debug!(
            peer = ?conn.peer_addr().ok(),
            keep_alive = ?config.keep_alive_interval,
            "server wire ready"
        );

        let transport =
            FrameTransport::with_config(conn, config.frame_config()).map_err(deadline_error)?;
        Ok(Self {
            codec: MessageCodec::with_format(transport, format),
        })
    }

    /// Receive the next command.
    pub fn receive(&self) -> Result<Command> {
        self.codec.receive()
    }

    /// Send a response.
    pub fn send(&self, response: &Response) -> Result<()> {
        self.codec.send(response)
    }

    /// Close the connection. Safe to call more than once.
    pub fn close(&self) {
        self.codec.close();
    }

    /// Wait up to `timeout` for the client to send something.
    ///
    /// Lets a serving loop check for shutdown between commands without
    /// putting a deadline on the frame read itself. `true` also covers a
    /// client hangup, which the next [`receive`](Self::receive) reports.
    pub fn wait_readable(&self, timeout: Duration) -> std::result::Result<bool, TransportError> {
        self.codec.wire().get_ref().wait_readable(timeout)
    }

    /// Address of the client.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.codec.wire().get_ref().peer_addr().ok()
    }
}
