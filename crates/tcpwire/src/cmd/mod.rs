use std::time::Duration;

use clap::{Args, Subcommand};
use tcpwire_endpoint::{WireConfig, DEFAULT_KEEP_ALIVE_INTERVAL};
use tcpwire_frame::DEFAULT_MAX_MESSAGE_SIZE;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept connections and answer PING / ECHO commands.
    Serve(ServeArgs),
    /// Send one command and print the response.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, config: &WireConfig, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, config),
        Command::Send(args) => send::run(args, config, format),
        Command::Version(args) => version::run(args),
    }
}

/// Connection settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Largest accepted message payload in bytes.
    #[arg(
        long,
        global = true,
        env = "TCPWIRE_MAX_MESSAGE_SIZE",
        default_value_t = DEFAULT_MAX_MESSAGE_SIZE
    )]
    pub max_message_size: usize,

    /// Keepalive probe interval in seconds (server connections).
    #[arg(
        long = "keep-alive",
        global = true,
        env = "TCPWIRE_KEEP_ALIVE_SECS",
        default_value_t = DEFAULT_KEEP_ALIVE_INTERVAL.as_secs()
    )]
    pub keep_alive_secs: u64,

    /// Bound on establishing a connection (e.g. 5s, 500ms).
    #[arg(long, global = true, env = "TCPWIRE_CONNECT_TIMEOUT", default_value = "5s")]
    pub connect_timeout: String,

    /// Read/write deadline on the socket (e.g. 5s, 500ms). Unset blocks forever.
    #[arg(long, global = true, env = "TCPWIRE_TIMEOUT")]
    pub timeout: Option<String>,
}

impl ConfigArgs {
    pub fn wire_config(&self) -> CliResult<WireConfig> {
        if self.max_message_size == 0 {
            return Err(CliError::new(USAGE, "max message size must be greater than zero"));
        }
        if self.keep_alive_secs == 0 {
            return Err(CliError::new(USAGE, "keep-alive must be greater than zero"));
        }

        let io_timeout = self.timeout.as_deref().map(parse_duration).transpose()?;

        Ok(WireConfig {
            max_message_size: self.max_message_size,
            connect_timeout: parse_duration(&self.connect_timeout)?,
            keep_alive_interval: Duration::from_secs(self.keep_alive_secs),
            read_timeout: io_timeout,
            write_timeout: io_timeout,
        })
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Port to bind (0 picks a free port).
    #[arg(long, short = 'p', default_value_t = 7379)]
    pub port: u16,
    /// Exit after answering N commands.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Command name.
    pub cmd: String,
    /// Command arguments.
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
