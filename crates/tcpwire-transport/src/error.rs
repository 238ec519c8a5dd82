use std::time::Duration;

/// Errors that can occur while establishing or tuning a connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The target address could not be resolved.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Resolution succeeded but produced no usable address.
    #[error("no addresses found for {addr}")]
    NoAddress { addr: String },

    /// Failed to connect to the specified address.
    #[error("failed to connect to {addr} within {timeout:?}: {source}")]
    Connect {
        addr: String,
        timeout: Duration,
        source: std::io::Error,
    },

    /// The adopted descriptor is not a usable connected socket.
    #[error("failed to adopt connection: {0}")]
    Adopt(std::io::Error),

    /// A socket option could not be applied.
    #[error("failed to set {option}: {source}")]
    SocketOption {
        option: &'static str,
        source: std::io::Error,
    },

    /// An I/O error occurred on the connection.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
