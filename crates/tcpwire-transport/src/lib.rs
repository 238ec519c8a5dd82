//! TCP connection primitive for tcpwire.
//!
//! This is the lowest layer of tcpwire. It knows how to open a connection
//! (active dial with a bounded timeout), how to take ownership of a socket
//! somebody else already accepted, and how to tune it. Everything else builds
//! on top of the [`Connection`] trait provided here.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::{TcpConnection, DEFAULT_CONNECT_TIMEOUT};
pub use traits::Connection;
