use std::io;
use std::time::Duration;

/// A bidirectional, ordered, reliable byte stream.
///
/// Methods take `&self` so that one reader and one writer can drive the same
/// connection at the same time. Implementations must tolerate a concurrent
/// `shutdown` while a `read` or `write` is blocked.
pub trait Connection: Send + Sync {
    /// Read up to `buf.len()` bytes. `Ok(0)` means the peer closed its side.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write some prefix of `buf`, returning how many bytes were accepted.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Shut down both directions of the stream.
    fn shutdown(&self) -> io::Result<()>;

    /// Bound every later blocking `read`. `None` blocks indefinitely.
    ///
    /// Streams without deadlines accept the call and ignore it.
    fn set_read_timeout(&self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }

    /// Bound every later blocking `write`. `None` blocks indefinitely.
    fn set_write_timeout(&self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }
}
