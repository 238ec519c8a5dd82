use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tcpwire_endpoint::{CodecError, Command, Response, ServerWire, WireConfig, WireErrorKind};

use crate::cmd::ServeArgs;
use crate::exit::{codec_error, io_error, transport_error, CliError, CliResult, SUCCESS};

// How often a blocked accept or an idle client is interrupted to check for
// ctrl-c.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

enum RecvErrorDisposition {
    Break,
    Reply(Response),
    Fatal(CliError),
}

enum Session {
    /// The client went away; accept the next one.
    Disconnected,
    /// Stop serving: `--count` reached or shutdown requested.
    Finished,
}

pub fn run(args: ServeArgs, config: &WireConfig) -> CliResult<i32> {
    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .map_err(|err| io_error("bind failed", err))?;
    let local = listener
        .local_addr()
        .map_err(|err| io_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    // Scripts and tests parse this line to discover the bound port.
    println!("listening on {local}");
    tracing::info!(%local, "listening");

    serve(&listener, config, args.count, &running)
}

fn serve(
    listener: &TcpListener,
    config: &WireConfig,
    count: Option<usize>,
    running: &AtomicBool,
) -> CliResult<i32> {
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("listener setup failed", err))?;

    let mut served = 0usize;

    while let Some((stream, peer)) = accept(listener, running)? {
        let wire = adopt(config, stream)?;
        tracing::info!(%peer, "client connected");

        let session = serve_client(&wire, peer, config, count, &mut served, running);
        wire.close();
        tracing::info!(%peer, "client disconnected");

        if matches!(session?, Session::Finished) {
            break;
        }
    }

    Ok(SUCCESS)
}

/// Wait for the next connection, or `None` once shutdown is requested.
fn accept(
    listener: &TcpListener,
    running: &AtomicBool,
) -> CliResult<Option<(TcpStream, SocketAddr)>> {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                // Accepted sockets inherit O_NONBLOCK on some platforms.
                stream
                    .set_nonblocking(false)
                    .map_err(|err| io_error("accept failed", err))?;
                return Ok(Some((stream, peer)));
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(SHUTDOWN_POLL_INTERVAL);
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => return Err(io_error("accept failed", err)),
        }
    }

    Ok(None)
}

fn serve_client(
    wire: &ServerWire,
    peer: SocketAddr,
    config: &WireConfig,
    count: Option<usize>,
    served: &mut usize,
    running: &AtomicBool,
) -> CliResult<Session> {
    let mut idle_since = Instant::now();

    loop {
        if !running.load(Ordering::SeqCst) {
            return Ok(Session::Finished);
        }

        match wire.wait_readable(SHUTDOWN_POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => {
                if config
                    .read_timeout
                    .is_some_and(|limit| idle_since.elapsed() >= limit)
                {
                    tracing::info!(%peer, "client idle past read deadline, dropping connection");
                    return Ok(Session::Disconnected);
                }
                continue;
            }
            Err(err) => {
                tracing::warn!(%peer, error = %err, "failed polling connection");
                return Ok(Session::Disconnected);
            }
        }

        let response = match wire.receive() {
            Ok(command) => handle(&command),
            Err(err) => match classify_recv_error(err) {
                RecvErrorDisposition::Break => return Ok(Session::Disconnected),
                RecvErrorDisposition::Reply(response) => response,
                RecvErrorDisposition::Fatal(cli_err) => return Err(cli_err),
            },
        };

        if let Err(err) = wire.send(&response) {
            tracing::warn!(%peer, error = %err, "failed sending response");
            return Ok(Session::Disconnected);
        }

        *served = served.saturating_add(1);
        if count.is_some_and(|count| *served >= count) {
            return Ok(Session::Finished);
        }
        idle_since = Instant::now();
    }
}

#[cfg(unix)]
fn adopt(config: &WireConfig, stream: TcpStream) -> CliResult<ServerWire> {
    ServerWire::adopt(config, stream).map_err(|err| transport_error("adopt failed", err))
}

#[cfg(not(unix))]
fn adopt(config: &WireConfig, stream: TcpStream) -> CliResult<ServerWire> {
    ServerWire::from_stream(config, stream).map_err(|err| transport_error("adopt failed", err))
}

fn handle(command: &Command) -> Response {
    tracing::debug!(cmd = %command.cmd, args = command.args.len(), "handling command");

    match command.cmd.to_ascii_uppercase().as_str() {
        "PING" => match command.args.first() {
            Some(message) => Response::ok(message.as_str()),
            None => Response::ok("PONG"),
        },
        "ECHO" => Response::ok(command.args.join(" ")),
        _ => Response::error(format!("unknown command '{}'", command.cmd)),
    }
}

fn classify_recv_error(err: CodecError) -> RecvErrorDisposition {
    match err.wire_kind() {
        None => RecvErrorDisposition::Reply(Response::error(format!("invalid command: {err}"))),
        Some(kind) if kind.requires_reconnect() => RecvErrorDisposition::Break,
        Some(WireErrorKind::Timeout) => {
            tracing::info!("client idle past read deadline, dropping connection");
            RecvErrorDisposition::Break
        }
        Some(WireErrorKind::CorruptMessage) => {
            tracing::warn!(error = %err, "protocol violation, dropping connection");
            RecvErrorDisposition::Break
        }
        Some(_) => RecvErrorDisposition::Fatal(codec_error("receive failed", err)),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
