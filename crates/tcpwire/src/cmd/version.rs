use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("tcpwire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: tcpwire");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("TCPWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("TCPWIRE_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("prefix: 4-byte big-endian length");
    println!(
        "default_max_message_size: {}",
        tcpwire_frame::DEFAULT_MAX_MESSAGE_SIZE
    );
    println!("max_write_attempts: {}", tcpwire_frame::MAX_WRITE_ATTEMPTS);

    Ok(SUCCESS)
}
