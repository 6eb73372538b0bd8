use wakegate::config::WakeConfig;
use wakegate::wol;

use clap::Parser;

/// Send a single Wake-on-LAN packet: wolcli <mac> <host> [port]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    mac: String,
    host: String,
    #[arg(allow_negative_numbers = true)]
    port: Option<i64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let target = WakeConfig {
        mac: args.mac,
        ip: args.host,
        port: args.port.unwrap_or(0),
    }
    .validate()?;
    let addr = wol::send(&target.mac, &target.host, target.port)?;
    println!("sent magic packet to {}", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn test_args_arity() {
        assert!(Args::try_parse_from(["wolcli", "10:ff:e0:cf:e6:0e"]).is_err());
        assert!(Args::try_parse_from(["wolcli", "a", "b", "9", "extra"]).is_err());

        let args = Args::try_parse_from(["wolcli", "10:ff:e0:cf:e6:0e", "123.123.1.3"]).unwrap();
        assert_eq!(args.port, None);
        let args =
            Args::try_parse_from(["wolcli", "10:ff:e0:cf:e6:0e", "123.123.1.3", "70000"]).unwrap();
        assert_eq!(args.port, Some(70000));
    }

    #[test]
    fn test_port_must_be_integer() {
        assert!(Args::try_parse_from(["wolcli", "10:ff:e0:cf:e6:0e", "nas.lan", "nine"]).is_err());
    }
}
