//! Client and server endpoints for tcpwire.
//!
//! This is the "just works" layer. A [`ClientWire`] dials a server and
//! exchanges [`Command`]s for [`Response`]s; a [`ServerWire`] adopts a socket
//! that was already accepted and does the opposite.

pub mod client;
pub mod config;
pub mod message;
pub mod server;

pub use client::ClientWire;
pub use config::{WireConfig, DEFAULT_KEEP_ALIVE_INTERVAL};
pub use message::{Command, Response};
pub use server::ServerWire;

pub use tcpwire_codec::{CodecError, Result};
pub use tcpwire_frame::{WireError, WireErrorKind};
pub use tcpwire_transport::TransportError;
