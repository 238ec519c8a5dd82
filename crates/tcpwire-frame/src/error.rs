use std::fmt;
use std::io;

/// Classification of a wire failure.
///
/// This is what callers branch on: the [`Cause`] attached to a [`WireError`]
/// is kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireErrorKind {
    /// A failure that fits no other category.
    Unknown,
    /// A read or write exceeded the connection deadline.
    Timeout,
    /// The peer shut the connection down in an orderly way.
    ClosedGracefully,
    /// The connection was reset, or was already closed locally.
    ClosedAbruptly,
    /// The frame header is invalid or violates the size limit.
    CorruptMessage,
    /// The write retry budget ran out before the frame was fully written.
    PartialWrite,
}

impl WireErrorKind {
    /// Stable lowercase name, used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            WireErrorKind::Unknown => "unknown",
            WireErrorKind::Timeout => "timeout",
            WireErrorKind::ClosedGracefully => "closed gracefully",
            WireErrorKind::ClosedAbruptly => "closed abruptly",
            WireErrorKind::CorruptMessage => "corrupt message",
            WireErrorKind::PartialWrite => "partial write",
        }
    }

    /// The same operation may succeed if tried again on this connection.
    pub fn is_retryable(self) -> bool {
        matches!(self, WireErrorKind::Timeout)
    }

    /// The connection is unusable and a new one is needed.
    pub fn requires_reconnect(self) -> bool {
        matches!(
            self,
            WireErrorKind::ClosedGracefully
                | WireErrorKind::ClosedAbruptly
                | WireErrorKind::PartialWrite
        )
    }

    /// The peer broke the framing protocol; the connection should be aborted.
    pub fn is_protocol_violation(self) -> bool {
        matches!(self, WireErrorKind::CorruptMessage)
    }
}

impl fmt::Display for WireErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The underlying reason behind a [`WireError`].
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    /// The length prefix decoded to a value that cannot carry a payload.
    #[error("invalid message size: {0}")]
    InvalidSize(u32),

    /// The length prefix (or outgoing payload) exceeds the allowed maximum.
    #[error("message too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    /// Every write attempt returned short.
    #[error("maximum retry limit reached, only {written} of {total} bytes written")]
    WriteRetriesExhausted { written: usize, total: usize },

    /// The stream ended before the requested bytes arrived.
    #[error("connection closed by peer")]
    PeerClosed,

    /// The transport was closed on this side.
    #[error("use of closed connection")]
    LocallyClosed,

    /// An I/O error reported by the connection.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A classified failure produced by the framing layer.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {cause}")]
pub struct WireError {
    kind: WireErrorKind,
    #[source]
    cause: Cause,
}

impl WireError {
    /// Build an error from an explicit classification.
    pub fn new(kind: WireErrorKind, cause: impl Into<Cause>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    /// Classify an error returned by a connection read.
    pub fn from_read(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::UnexpectedEof => WireErrorKind::ClosedGracefully,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => WireErrorKind::Timeout,
            _ => WireErrorKind::Unknown,
        };
        Self::new(kind, err)
    }

    /// Classify an error returned by a connection write.
    pub fn from_write(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::BrokenPipe => WireErrorKind::ClosedGracefully,
            io::ErrorKind::ConnectionReset => WireErrorKind::ClosedAbruptly,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => WireErrorKind::Timeout,
            _ => WireErrorKind::Unknown,
        };
        Self::new(kind, err)
    }

    pub(crate) fn peer_closed() -> Self {
        Self::new(WireErrorKind::ClosedGracefully, Cause::PeerClosed)
    }

    pub(crate) fn locally_closed() -> Self {
        Self::new(WireErrorKind::ClosedAbruptly, Cause::LocallyClosed)
    }

    /// The classification to branch on.
    pub fn kind(&self) -> WireErrorKind {
        self.kind
    }

    /// The underlying reason.
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Consume the error and return the underlying reason.
    pub fn into_cause(self) -> Cause {
        self.cause
    }

    /// Bytes that reached the connection before a `PartialWrite` gave up.
    pub fn bytes_written(&self) -> Option<usize> {
        match self.cause {
            Cause::WriteRetriesExhausted { written, .. } => Some(written),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
