use tcpwire_endpoint::{ClientWire, Command, WireConfig};

use crate::cmd::SendArgs;
use crate::exit::{codec_error, transport_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: SendArgs, config: &WireConfig, format: OutputFormat) -> CliResult<i32> {
    let client = ClientWire::connect(config, &args.host, args.port)
        .map_err(|err| transport_error("connect failed", err))?;

    let command = Command::new(args.cmd, args.args);
    tracing::debug!(cmd = %command.cmd, args = command.args.len(), "sending command");

    let response = client
        .request(&command)
        .map_err(|err| codec_error("request failed", err))?;
    print_response(&response, client.peer_addr(), format);
    client.close();

    Ok(if response.is_ok() { SUCCESS } else { FAILURE })
}
