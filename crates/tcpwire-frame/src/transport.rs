use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};
use tcpwire_transport::Connection;
use tracing::{debug, trace, warn};

use crate::codec::{decode_prefix, encode_frame, validate_length, FrameConfig, PREFIX_SIZE};
use crate::error::{Cause, Result, WireError, WireErrorKind};
use crate::wire::Wire;

/// Write calls allowed per frame before giving up with `PartialWrite`.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
// Larger buffers are released after the frame that needed them.
const MAX_RETAINED_CAPACITY: usize = 4 * INITIAL_BUFFER_CAPACITY;

struct WriteState {
    buf: BytesMut,
}

struct ReadState {
    prefix: [u8; PREFIX_SIZE],
}

/// Sends and receives length-prefixed frames over a [`Connection`].
///
/// The transport owns the connection. Writes are serialized by one lock and
/// reads by another, so a blocked `receive` never holds up a `send` (and the
/// other way around), but two frames are never interleaved on the wire.
pub struct FrameTransport<C> {
    conn: C,
    config: FrameConfig,
    write: Mutex<WriteState>,
    read: Mutex<ReadState>,
    closed: AtomicBool,
}

impl<C: Connection> FrameTransport<C> {
    /// Create a transport with default configuration.
    ///
    /// Any deadlines already set on `conn` are left as they are.
    pub fn new(conn: C) -> Self {
        Self::assemble(conn, FrameConfig::default())
    }

    /// Create a transport with explicit configuration.
    ///
    /// The read and write deadlines in `config` are applied to the
    /// connection; a connection that rejects them is returned as an
    /// `Unknown` error.
    pub fn with_config(conn: C, config: FrameConfig) -> Result<Self> {
        conn.set_read_timeout(config.read_timeout)
            .and_then(|()| conn.set_write_timeout(config.write_timeout))
            .map_err(|err| WireError::new(WireErrorKind::Unknown, err))?;
        Ok(Self::assemble(conn, config))
    }

    fn assemble(conn: C, config: FrameConfig) -> Self {
        Self {
            conn,
            config,
            write: Mutex::new(WriteState {
                buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            }),
            read: Mutex::new(ReadState {
                prefix: [0u8; PREFIX_SIZE],
            }),
            closed: AtomicBool::new(false),
        }
    }

    /// Frame `payload` and write it out (blocking).
    pub fn send(&self, payload: &[u8]) -> Result<()> {
        let mut state = lock(&self.write);
        if self.is_closed() {
            return Err(WireError::locally_closed());
        }

        state.buf.clear();
        encode_frame(payload, &mut state.buf)?;
        let written = self.write_frame(&state.buf);
        if state.buf.capacity() > MAX_RETAINED_CAPACITY {
            state.buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
        }
        written?;

        trace!(size = payload.len(), "frame sent");
        Ok(())
    }

    /// Read the next complete frame and return its payload (blocking).
    pub fn receive(&self) -> Result<Bytes> {
        let mut state = lock(&self.read);
        if self.is_closed() {
            return Err(WireError::locally_closed());
        }

        self.read_exact(&mut state.prefix)?;
        let size = validate_length(decode_prefix(state.prefix), self.config.max_message_size)
            .inspect_err(|err| debug!(error = %err, "rejecting frame"))?;

        let mut payload = BytesMut::zeroed(size);
        self.read_exact(&mut payload)?;

        trace!(size, "frame received");
        Ok(payload.freeze())
    }

    /// Shut the connection down. Only the first call has any effect.
    ///
    /// Shutdown failures are logged, not returned: there is nothing a caller
    /// could do about them.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        match self.conn.shutdown() {
            Ok(()) => debug!("connection closed"),
            Err(err) => warn!(error = %err, "failed to close connection"),
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Current transport configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Borrow the underlying connection.
    pub fn get_ref(&self) -> &C {
        &self.conn
    }

    /// Consume the transport and return the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    fn write_frame(&self, buf: &[u8]) -> Result<()> {
        let mut written = 0usize;
        let mut attempts = 0usize;

        while written < buf.len() {
            if attempts >= MAX_WRITE_ATTEMPTS {
                return Err(WireError::new(
                    WireErrorKind::PartialWrite,
                    Cause::WriteRetriesExhausted {
                        written,
                        total: buf.len(),
                    },
                ));
            }

            match self.conn.write(&buf[written..]) {
                Ok(n) => {
                    written += n;
                    attempts += 1;
                    if written < buf.len() {
                        trace!(written, total = buf.len(), attempts, "short write");
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(if self.is_closed() {
                        WireError::locally_closed()
                    } else {
                        WireError::from_write(err)
                    });
                }
            }
        }

        Ok(())
    }

    fn read_exact(&self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0usize;

        while filled < buf.len() {
            match self.conn.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(if self.is_closed() {
                        WireError::locally_closed()
                    } else {
                        WireError::peer_closed()
                    });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(if self.is_closed() {
                        WireError::locally_closed()
                    } else {
                        WireError::from_read(err)
                    });
                }
            }
        }

        Ok(())
    }
}

impl<C: Connection> Wire for FrameTransport<C> {
    fn send(&self, payload: &[u8]) -> Result<()> {
        FrameTransport::send(self, payload)
    }

    fn receive(&self) -> Result<Bytes> {
        FrameTransport::receive(self)
    }

    fn close(&self) {
        FrameTransport::close(self)
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for FrameTransport<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTransport")
            .field("conn", &self.conn)
            .field("config", &self.config)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

// The guarded state is scratch space rebuilt on every call, so a panic in
// another holder leaves nothing to repair.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::net::TcpListener;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;

    use tcpwire_transport::{TcpConnection, DEFAULT_CONNECT_TIMEOUT};

    use super::*;

    enum WriteStep {
        Accept(usize),
        Fail(io::ErrorKind),
    }

    /// In-memory connection with scripted write behavior.
    #[derive(Default)]
    struct MockConnection {
        input: Mutex<VecDeque<u8>>,
        read_chunk: Option<usize>,
        read_error: Mutex<Option<io::ErrorKind>>,
        output: Mutex<Vec<u8>>,
        write_plan: Mutex<VecDeque<WriteStep>>,
        write_calls: AtomicUsize,
        write_entered: Mutex<Option<mpsc::Sender<()>>>,
        write_gate: Mutex<Option<mpsc::Receiver<()>>>,
        reject_deadlines: bool,
        shutdowns: AtomicUsize,
    }

    impl MockConnection {
        fn with_input(bytes: &[u8]) -> Self {
            Self {
                input: Mutex::new(bytes.iter().copied().collect()),
                ..Self::default()
            }
        }

        fn with_write_plan(plan: Vec<WriteStep>) -> Self {
            Self {
                write_plan: Mutex::new(plan.into()),
                ..Self::default()
            }
        }

        fn written(&self) -> Vec<u8> {
            self.output.lock().unwrap().clone()
        }

        fn remaining_input(&self) -> usize {
            self.input.lock().unwrap().len()
        }
    }

    impl Connection for MockConnection {
        fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(kind) = self.read_error.lock().unwrap().take() {
                return Err(io::Error::from(kind));
            }
            let mut input = self.input.lock().unwrap();
            let limit = self.read_chunk.unwrap_or(usize::MAX).min(buf.len());
            let n = limit.min(input.len());
            for slot in buf.iter_mut().take(n) {
                *slot = input.pop_front().unwrap();
            }
            Ok(n)
        }

        fn write(&self, buf: &[u8]) -> io::Result<usize> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(entered) = self.write_entered.lock().unwrap().take() {
                let _ = entered.send(());
            }
            if let Some(gate) = self.write_gate.lock().unwrap().as_ref() {
                let _ = gate.recv();
            }
            let step = self.write_plan.lock().unwrap().pop_front();
            let accepted = match step {
                None => buf.len(),
                Some(WriteStep::Accept(max)) => max.min(buf.len()),
                Some(WriteStep::Fail(kind)) => return Err(io::Error::from(kind)),
            };
            self.output
                .lock()
                .unwrap()
                .extend_from_slice(&buf[..accepted]);
            Ok(accepted)
        }

        fn shutdown(&self) -> io::Result<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn set_read_timeout(&self, _timeout: Option<Duration>) -> io::Result<()> {
            if self.reject_deadlines {
                return Err(io::Error::from(io::ErrorKind::Unsupported));
            }
            Ok(())
        }
    }

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(payload, &mut buf).unwrap();
        buf.to_vec()
    }

    fn loopback_pair() -> (TcpConnection, TcpConnection) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let client = thread::spawn(move || {
            TcpConnection::dial("127.0.0.1", port, DEFAULT_CONNECT_TIMEOUT).unwrap()
        });
        let (accepted, _) = listener.accept().unwrap();
        (
            client.join().unwrap(),
            TcpConnection::from_stream(accepted),
        )
    }

    #[test]
    fn send_writes_length_prefixed_frame_in_one_call() {
        let transport = FrameTransport::new(MockConnection::default());

        transport.send(b"hello").unwrap();

        let conn = transport.get_ref();
        assert_eq!(conn.written(), [&[0u8, 0, 0, 5][..], &b"hello"[..]].concat());
        assert_eq!(conn.write_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn receive_reassembles_byte_by_byte_reads() {
        let conn = MockConnection {
            read_chunk: Some(1),
            ..MockConnection::with_input(&framed(b"slow"))
        };
        let transport = FrameTransport::new(conn);

        let payload = transport.receive().unwrap();
        assert_eq!(payload.as_ref(), b"slow");
    }

    #[test]
    fn receive_consecutive_frames() {
        let wire = [framed(b"one"), framed(b"two"), framed(b"three")].concat();
        let transport = FrameTransport::new(MockConnection::with_input(&wire));

        assert_eq!(transport.receive().unwrap().as_ref(), b"one");
        assert_eq!(transport.receive().unwrap().as_ref(), b"two");
        assert_eq!(transport.receive().unwrap().as_ref(), b"three");
    }

    #[test]
    fn short_writes_are_retried_from_offset() {
        // 4-byte prefix + 8-byte payload, accepted a third at a time.
        let conn = MockConnection::with_write_plan(vec![
            WriteStep::Accept(4),
            WriteStep::Accept(4),
            WriteStep::Accept(4),
        ]);
        let transport = FrameTransport::new(conn);

        transport.send(b"abcdefgh").unwrap();

        let conn = transport.get_ref();
        assert_eq!(conn.write_calls.load(Ordering::SeqCst), 3);
        assert_eq!(conn.written(), framed(b"abcdefgh"));
    }

    #[test]
    fn write_retries_exhausted_reports_bytes_written() {
        let conn = MockConnection::with_write_plan(vec![
            WriteStep::Accept(1),
            WriteStep::Accept(1),
            WriteStep::Accept(1),
            WriteStep::Accept(1),
        ]);
        let transport = FrameTransport::new(conn);

        let err = transport.send(b"abcdef").unwrap_err();

        assert_eq!(err.kind(), WireErrorKind::PartialWrite);
        assert_eq!(err.bytes_written(), Some(3));
        assert!(matches!(
            err.cause(),
            Cause::WriteRetriesExhausted {
                written: 3,
                total: 10
            }
        ));
        assert_eq!(
            transport.get_ref().write_calls.load(Ordering::SeqCst),
            MAX_WRITE_ATTEMPTS
        );
    }

    #[test]
    fn zero_byte_writes_count_as_attempts() {
        let conn = MockConnection::with_write_plan(vec![
            WriteStep::Accept(0),
            WriteStep::Accept(0),
            WriteStep::Accept(0),
        ]);
        let transport = FrameTransport::new(conn);

        let err = transport.send(b"x").unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::PartialWrite);
        assert_eq!(err.bytes_written(), Some(0));
    }

    #[test]
    fn interrupted_write_does_not_consume_attempt() {
        let conn = MockConnection::with_write_plan(vec![
            WriteStep::Fail(io::ErrorKind::Interrupted),
            WriteStep::Accept(2),
            WriteStep::Accept(2),
            WriteStep::Fail(io::ErrorKind::Interrupted),
        ]);
        let transport = FrameTransport::new(conn);

        transport.send(b"ok").unwrap();
        assert_eq!(transport.get_ref().written(), framed(b"ok"));
    }

    #[test]
    fn write_failures_are_classified() {
        let cases = [
            (io::ErrorKind::BrokenPipe, WireErrorKind::ClosedGracefully),
            (io::ErrorKind::ConnectionReset, WireErrorKind::ClosedAbruptly),
            (io::ErrorKind::TimedOut, WireErrorKind::Timeout),
            (io::ErrorKind::WouldBlock, WireErrorKind::Timeout),
            (io::ErrorKind::Other, WireErrorKind::Unknown),
        ];

        for (io_kind, expected) in cases {
            let conn = MockConnection::with_write_plan(vec![
                WriteStep::Accept(2),
                WriteStep::Fail(io_kind),
            ]);
            let transport = FrameTransport::new(conn);
            let err = transport.send(b"payload").unwrap_err();
            assert_eq!(err.kind(), expected, "write {io_kind:?}");
        }
    }

    #[test]
    fn zero_length_prefix_is_corrupt() {
        let transport = FrameTransport::new(MockConnection::with_input(&[0, 0, 0, 0, 1]));

        let err = transport.receive().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::CorruptMessage);
        assert!(matches!(err.cause(), Cause::InvalidSize(0)));
    }

    #[test]
    fn oversized_prefix_is_rejected_before_payload_read() {
        let mut wire = vec![0xFF, 0xFF, 0xFF, 0xFF];
        wire.extend_from_slice(&[0xAB; 8]);
        let cfg = FrameConfig {
            max_message_size: 1024,
            ..FrameConfig::default()
        };
        let transport =
            FrameTransport::with_config(MockConnection::with_input(&wire), cfg).unwrap();

        let err = transport.receive().unwrap_err();

        assert_eq!(err.kind(), WireErrorKind::CorruptMessage);
        assert!(matches!(
            err.cause(),
            Cause::TooLarge {
                size,
                max: 1024
            } if *size == u32::MAX as usize
        ));
        assert_eq!(transport.get_ref().remaining_input(), 8);
    }

    #[test]
    fn eof_before_prefix_is_closed_gracefully() {
        let transport = FrameTransport::new(MockConnection::default());
        let err = transport.receive().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::ClosedGracefully);
    }

    #[test]
    fn eof_mid_payload_never_returns_truncated_frame() {
        let mut wire = framed(b"incomplete payload");
        wire.truncate(PREFIX_SIZE + 5);
        let transport = FrameTransport::new(MockConnection::with_input(&wire));

        let err = transport.receive().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::ClosedGracefully);
    }

    #[test]
    fn read_failures_are_classified() {
        let cases = [
            (io::ErrorKind::TimedOut, WireErrorKind::Timeout),
            (io::ErrorKind::WouldBlock, WireErrorKind::Timeout),
            (io::ErrorKind::ConnectionAborted, WireErrorKind::Unknown),
        ];

        for (io_kind, expected) in cases {
            let conn = MockConnection {
                read_error: Mutex::new(Some(io_kind)),
                ..MockConnection::with_input(&framed(b"x"))
            };
            let transport = FrameTransport::new(conn);
            let err = transport.receive().unwrap_err();
            assert_eq!(err.kind(), expected, "read {io_kind:?}");
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let conn = MockConnection {
            read_error: Mutex::new(Some(io::ErrorKind::Interrupted)),
            ..MockConnection::with_input(&framed(b"ok"))
        };
        let transport = FrameTransport::new(conn);

        assert_eq!(transport.receive().unwrap().as_ref(), b"ok");
    }

    #[test]
    fn close_is_idempotent() {
        let transport = FrameTransport::new(MockConnection::default());

        transport.close();
        transport.close();

        assert!(transport.is_closed());
        assert_eq!(transport.get_ref().shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn operations_after_close_fail_closed_abruptly() {
        let transport = FrameTransport::new(MockConnection::with_input(&framed(b"x")));
        transport.close();

        let err = transport.send(b"x").unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::ClosedAbruptly);
        let err = transport.receive().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::ClosedAbruptly);
        assert_eq!(transport.get_ref().write_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn roundtrip_over_tcp() {
        let (left, right) = loopback_pair();
        let cfg = FrameConfig {
            max_message_size: 256 * 1024,
            ..FrameConfig::default()
        };
        let writer = FrameTransport::with_config(left, cfg.clone()).unwrap();
        let reader = FrameTransport::with_config(right, cfg).unwrap();

        let payloads = [vec![1u8], b"hello".to_vec(), vec![0xAB; 256 * 1024]];
        let sender = thread::spawn(move || {
            for payload in &payloads {
                writer.send(payload).unwrap();
            }
            (writer, payloads)
        });

        let mut received = Vec::new();
        for _ in 0..3 {
            received.push(reader.receive().unwrap());
        }
        let (_writer, payloads) = sender.join().unwrap();

        for (got, want) in received.iter().zip(payloads.iter()) {
            assert_eq!(got.as_ref(), want.as_slice());
        }
    }

    #[test]
    fn frames_arrive_in_send_order() {
        let (left, right) = loopback_pair();
        let writer = FrameTransport::new(left);
        let reader = FrameTransport::new(right);

        writer.send(b"A").unwrap();
        writer.send(b"B").unwrap();

        assert_eq!(reader.receive().unwrap().as_ref(), b"A");
        assert_eq!(reader.receive().unwrap().as_ref(), b"B");
    }

    #[test]
    fn concurrent_senders_never_interleave() {
        let (left, right) = loopback_pair();
        let writer = Arc::new(FrameTransport::new(left));
        let reader = FrameTransport::new(right);

        let senders: Vec<_> = (0..4u8)
            .map(|id| {
                let writer = Arc::clone(&writer);
                thread::spawn(move || {
                    for seq in 0..50u8 {
                        let payload = vec![id, seq, id, seq, id, seq, id, seq];
                        writer.send(&payload).unwrap();
                    }
                })
            })
            .collect();

        let mut last_seq = [None::<u8>; 4];
        for _ in 0..200 {
            let payload = reader.receive().unwrap();
            assert_eq!(payload.len(), 8);
            let (id, seq) = (payload[0], payload[1]);
            assert!(payload.chunks(2).all(|pair| pair == [id, seq]));
            if let Some(prev) = last_seq[id as usize] {
                assert!(seq > prev, "frames from one sender must stay ordered");
            }
            last_seq[id as usize] = Some(seq);
        }

        for sender in senders {
            sender.join().unwrap();
        }
    }

    #[test]
    fn blocked_receive_does_not_block_send() {
        let (left, right) = loopback_pair();
        let local = Arc::new(FrameTransport::new(left));
        let remote = FrameTransport::new(right);

        let receiver = {
            let local = Arc::clone(&local);
            thread::spawn(move || local.receive())
        };
        thread::sleep(Duration::from_millis(50));

        local.send(b"ping").unwrap();
        assert!(!receiver.is_finished(), "receive should still be waiting");

        assert_eq!(remote.receive().unwrap().as_ref(), b"ping");
        remote.send(b"pong").unwrap();

        let reply = receiver.join().unwrap().unwrap();
        assert_eq!(reply.as_ref(), b"pong");
    }

    #[test]
    fn blocked_send_does_not_block_receive() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let conn = MockConnection {
            write_entered: Mutex::new(Some(entered_tx)),
            write_gate: Mutex::new(Some(release_rx)),
            ..MockConnection::with_input(&framed(b"queued"))
        };
        let transport = Arc::new(FrameTransport::new(conn));

        let sender = {
            let transport = Arc::clone(&transport);
            thread::spawn(move || transport.send(b"stuck"))
        };
        entered_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("send should reach the connection");

        let (received_tx, received_rx) = mpsc::channel();
        {
            let transport = Arc::clone(&transport);
            thread::spawn(move || {
                let _ = received_tx.send(transport.receive());
            });
        }
        let frame = received_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("receive should not wait for the pending send")
            .unwrap();
        assert_eq!(frame.as_ref(), b"queued");
        assert!(!sender.is_finished(), "send should still be blocked");

        release_tx.send(()).unwrap();
        sender.join().unwrap().unwrap();
        assert_eq!(transport.get_ref().written(), framed(b"stuck"));
    }

    #[test]
    fn large_frame_buffer_is_released_after_send() {
        let transport = FrameTransport::new(MockConnection::default());

        transport.send(&vec![0x5A; 1024 * 1024]).unwrap();
        assert!(lock(&transport.write).buf.capacity() <= MAX_RETAINED_CAPACITY);

        transport.send(b"small").unwrap();
        assert_eq!(transport.get_ref().written().len(), 2 * PREFIX_SIZE + 1024 * 1024 + 5);
    }

    #[test]
    fn configured_read_deadline_is_applied() {
        let (left, _right) = loopback_pair();
        let cfg = FrameConfig {
            read_timeout: Some(Duration::from_millis(50)),
            ..FrameConfig::default()
        };
        let local = Arc::new(FrameTransport::with_config(left, cfg).unwrap());

        let (done_tx, done_rx) = mpsc::channel();
        {
            let local = Arc::clone(&local);
            thread::spawn(move || {
                let _ = done_tx.send(local.receive());
            });
        }

        let err = done_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("receive should give up at the configured deadline")
            .unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::Timeout);
    }

    #[test]
    fn rejected_deadline_fails_construction() {
        let conn = MockConnection {
            reject_deadlines: true,
            ..MockConnection::default()
        };
        let cfg = FrameConfig {
            read_timeout: Some(Duration::from_secs(1)),
            ..FrameConfig::default()
        };

        let err = FrameTransport::with_config(conn, cfg).err().unwrap();
        assert_eq!(err.kind(), WireErrorKind::Unknown);
    }

    #[test]
    fn peer_close_is_closed_gracefully() {
        let (left, right) = loopback_pair();
        let local = FrameTransport::new(left);
        drop(right);

        let err = local.receive().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::ClosedGracefully);
    }

    #[test]
    fn read_deadline_is_timeout() {
        let (left, _right) = loopback_pair();
        left.set_read_timeout(Some(Duration::from_millis(20))).unwrap();
        let local = FrameTransport::new(left);

        let err = local.receive().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::Timeout);
        assert!(err.kind().is_retryable());
    }

    #[test]
    fn close_unblocks_pending_receive() {
        let (left, _right) = loopback_pair();
        let local = Arc::new(FrameTransport::new(left));

        let receiver = {
            let local = Arc::clone(&local);
            thread::spawn(move || local.receive())
        };
        thread::sleep(Duration::from_millis(50));
        local.close();

        let err = receiver.join().unwrap().unwrap_err();
        assert_eq!(err.kind(), WireErrorKind::ClosedAbruptly);
    }
}
