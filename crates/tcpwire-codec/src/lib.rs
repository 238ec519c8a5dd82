//! Typed message codec over tcpwire frames.
//!
//! Serializes structured messages before handing them to a [`Wire`] and
//! deserializes what comes back. The serialization format is pluggable
//! through [`MessageFormat`]; [`JsonFormat`] is bundled.
//!
//! [`Wire`]: tcpwire_frame::Wire

pub mod codec;
pub mod error;
pub mod format;

pub use codec::MessageCodec;
pub use error::{CodecError, FormatError, Result};
pub use format::{JsonFormat, MessageFormat};
