use std::fmt;
use std::io;

use tcpwire_codec::CodecError;
use tcpwire_frame::{WireError, WireErrorKind};
use tcpwire_transport::TransportError;

// Exit codes follow sysexits(3) and timeout(1) where a convention exists.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrInUse => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. }
        | TransportError::Resolve { source, .. }
        | TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    let code = match err.kind() {
        WireErrorKind::Timeout => TIMEOUT,
        WireErrorKind::CorruptMessage => DATA_INVALID,
        WireErrorKind::ClosedGracefully => FAILURE,
        WireErrorKind::ClosedAbruptly | WireErrorKind::PartialWrite | WireErrorKind::Unknown => {
            TRANSPORT_ERROR
        }
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Wire(err) => wire_error(context, err),
        CodecError::Serialization(err) => {
            CliError::new(DATA_INVALID, format!("{context}: serialization error: {err}"))
        }
    }
}
