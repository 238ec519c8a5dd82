use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
#[cfg(unix)]
use std::os::fd::{AsRawFd, OwnedFd};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Connection;

/// Default bound on establishing an outbound connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A connected TCP stream.
///
/// Created either by dialing out ([`TcpConnection::dial`]) or by adopting a
/// socket that was accepted elsewhere ([`TcpConnection::adopt`]). In both
/// cases the connection owns the descriptor and releases it on drop.
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Resolve `host:port` and connect to the first address that answers
    /// within `timeout` (applied per resolved address).
    pub fn dial(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let candidates: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                addr: addr.clone(),
                source,
            })?
            .collect();

        if candidates.is_empty() {
            return Err(TransportError::NoAddress { addr });
        }

        let mut last_err = None;
        for candidate in &candidates {
            match TcpStream::connect_timeout(candidate, timeout) {
                Ok(stream) => {
                    debug!(%addr, peer = %candidate, "connected");
                    return Ok(Self { stream });
                }
                Err(err) => {
                    debug!(peer = %candidate, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(TransportError::Connect {
            addr,
            timeout,
            source: last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)),
        })
    }

    /// Take ownership of an already-accepted socket descriptor.
    ///
    /// Accepts anything convertible into an [`OwnedFd`], including a
    /// [`TcpStream`] or a descriptor inherited from a parent process. Fails
    /// if the descriptor is not a connected stream socket.
    #[cfg(unix)]
    pub fn adopt(fd: impl Into<OwnedFd>) -> Result<Self> {
        let fd: OwnedFd = fd.into();

        let sock_type = getsockopt_int(fd.as_raw_fd(), libc::SOL_SOCKET, libc::SO_TYPE)
            .map_err(TransportError::Adopt)?;
        if sock_type != libc::SOCK_STREAM {
            return Err(TransportError::Adopt(io::Error::new(
                io::ErrorKind::InvalidInput,
                "descriptor is not a stream socket",
            )));
        }

        let stream = TcpStream::from(fd);
        let peer = stream.peer_addr().map_err(TransportError::Adopt)?;
        debug!(%peer, "adopted connection");
        Ok(Self { stream })
    }

    /// Wrap a stream the caller already holds.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Enable or disable `TCP_NODELAY`.
    pub fn set_nodelay(&self, nodelay: bool) -> Result<()> {
        self.stream
            .set_nodelay(nodelay)
            .map_err(|source| TransportError::SocketOption {
                option: "TCP_NODELAY",
                source,
            })
    }

    /// Enable keepalive probes, sent after `interval` of idleness and then
    /// every `interval` until the peer answers.
    #[cfg(unix)]
    pub fn set_keepalive(&self, interval: Duration) -> Result<()> {
        let fd = self.stream.as_raw_fd();
        setsockopt_int(fd, libc::SOL_SOCKET, libc::SO_KEEPALIVE, 1, "SO_KEEPALIVE")?;

        let secs = interval.as_secs().clamp(1, libc::c_int::MAX as u64) as libc::c_int;

        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPIDLE, secs, "TCP_KEEPIDLE")?;
            setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPINTVL, secs, "TCP_KEEPINTVL")?;
        }

        #[cfg(any(target_os = "macos", target_os = "ios"))]
        setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPALIVE, secs, "TCP_KEEPALIVE")?;

        #[cfg(not(any(
            target_os = "linux",
            target_os = "android",
            target_os = "macos",
            target_os = "ios"
        )))]
        let _ = secs;

        Ok(())
    }

    /// Enable keepalive probes.
    ///
    /// Probe interval tuning needs raw socket options and is only wired up
    /// on Unix.
    #[cfg(not(unix))]
    pub fn set_keepalive(&self, _interval: Duration) -> Result<()> {
        Err(TransportError::SocketOption {
            option: "SO_KEEPALIVE",
            source: io::Error::new(io::ErrorKind::Unsupported, "keepalive tuning requires unix"),
        })
    }

    /// Set the read deadline applied to every blocking read.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set the write deadline applied to every blocking write.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Address of the remote end.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.stream.peer_addr().map_err(Into::into)
    }

    /// Address of the local end.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.stream.local_addr().map_err(Into::into)
    }

    /// Wait up to `timeout` for the stream to become readable.
    ///
    /// Returns `true` when data is pending or the peer has hung up (the next
    /// read will not block), `false` when the wait elapsed or was interrupted
    /// by a signal. No bytes are consumed.
    #[cfg(unix)]
    pub fn wait_readable(&self, timeout: Duration) -> Result<bool> {
        let mut pollfd = libc::pollfd {
            fd: self.stream.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);

        // SAFETY: `pollfd` is a single valid entry that outlives the call,
        // and the descriptor stays open for as long as `self` exists.
        let rc = unsafe { libc::poll(&mut pollfd, 1, millis) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err.into());
        }

        Ok(rc > 0)
    }

    /// Readiness polling is Unix-only; elsewhere the next read simply blocks.
    #[cfg(not(unix))]
    pub fn wait_readable(&self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }
}

impl Connection for TcpConnection {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.stream).read(buf)
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (&self.stream).write(buf)
    }

    fn shutdown(&self) -> io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.stream.set_read_timeout(timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.stream.set_write_timeout(timeout)
    }
}

impl std::fmt::Debug for TcpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpConnection")
            .field("local", &self.stream.local_addr().ok())
            .field("peer", &self.stream.peer_addr().ok())
            .finish()
    }
}

#[cfg(unix)]
fn setsockopt_int(
    fd: libc::c_int,
    level: libc::c_int,
    name: libc::c_int,
    value: libc::c_int,
    option: &'static str,
) -> Result<()> {
    // SAFETY: `value` lives for the duration of the call and the length
    // passed matches its size; `fd` is an open socket owned by the caller.
    let rc = unsafe {
        libc::setsockopt(
            fd,
            level,
            name,
            (&value as *const libc::c_int).cast::<libc::c_void>(),
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };

    if rc == 0 {
        Ok(())
    } else {
        Err(TransportError::SocketOption {
            option,
            source: io::Error::last_os_error(),
        })
    }
}

#[cfg(unix)]
fn getsockopt_int(fd: libc::c_int, level: libc::c_int, name: libc::c_int) -> io::Result<libc::c_int> {
    let mut value: libc::c_int = 0;
    let mut len = std::mem::size_of::<libc::c_int>() as libc::socklen_t;

    // SAFETY: `value` and `len` are valid writable pointers for the provided
    // sizes, and `fd` is an open descriptor owned by the caller.
    let rc = unsafe {
        libc::getsockopt(
            fd,
            level,
            name,
            (&mut value as *mut libc::c_int).cast::<libc::c_void>(),
            &mut len,
        )
    };

    if rc == 0 {
        Ok(value)
    } else {
        Err(io::Error::last_os_error())
    }
}
