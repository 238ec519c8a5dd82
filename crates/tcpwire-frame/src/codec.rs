use std::time::Duration;

use bytes::{BufMut, BytesMut};

use crate::error::{Cause, Result, WireError, WireErrorKind};

/// Length prefix: one big-endian `u32`.
pub const PREFIX_SIZE: usize = 4;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬────────────────────────┐
/// │ Length (4B BE)   │ Payload (Length bytes) │
/// └──────────────────┴────────────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        WireError::new(
            WireErrorKind::CorruptMessage,
            Cause::TooLarge {
                size: payload.len(),
                max: u32::MAX as usize,
            },
        )
    })?;

    dst.reserve(PREFIX_SIZE + payload.len());
    dst.put_u32(len);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a length prefix.
pub fn decode_prefix(prefix: [u8; PREFIX_SIZE]) -> u32 {
    u32::from_be_bytes(prefix)
}

/// Check a decoded length against the receive limit.
///
/// Zero is rejected: an empty frame carries no message.
pub fn validate_length(len: u32, max_message_size: usize) -> Result<usize> {
    if len == 0 {
        return Err(WireError::new(
            WireErrorKind::CorruptMessage,
            Cause::InvalidSize(len),
        ));
    }

    let size = len as usize;
    if size > max_message_size {
        return Err(WireError::new(
            WireErrorKind::CorruptMessage,
            Cause::TooLarge {
                size,
                max: max_message_size,
            },
        ));
    }

    Ok(size)
}

/// Configuration for a frame transport.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size accepted on receive. Default: 16 MiB.
    pub max_message_size: usize,
    /// Read deadline for blocking operations.
    pub read_timeout: Option<Duration>,
    /// Write deadline for blocking operations.
    pub write_timeout: Option<Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
