use wakegate::config;
use wakegate::server;
use wakegate::trigger;

use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "WAKEGATE_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,

    /// MAC address of the machine to wake, e.g. aa:bb:cc:dd:ee:ff.
    #[arg(long, env = "WAKEGATE_MAC")]
    mac: Option<String>,

    /// IP address or hostname the magic packet is sent to.
    #[arg(long, env = "WAKEGATE_HOST")]
    host: Option<String>,

    /// UDP port for the magic packet. 0 means 9.
    #[arg(long, env = "WAKEGATE_PORT", allow_negative_numbers = true)]
    port: Option<i64>,

    /// JSON file with "mac", "ip" and "port". Flags override its values.
    #[arg(long, env = "WAKEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// host:port to proxy every request to after sending the packet.
    #[arg(long, env = "WAKEGATE_UPSTREAM")]
    upstream: Option<String>,

    /// If true, only log instead of sending magic packets.
    #[arg(long)]
    use_fake_wol: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("INFO"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();

    let base = match &args.config {
        Some(path) => config::WakeConfig::from_file(path)?,
        None => config::WakeConfig::default(),
    };
    let target = base.merge(args.mac, args.host, args.port).validate()?;

    let trigger: Arc<dyn trigger::Trigger + Send + Sync> = if args.use_fake_wol {
        Arc::new(trigger::LogOnlyTrigger)
    } else {
        info!(
            "waking {} via {}:{} on every request",
            target.mac, target.host, target.port
        );
        Arc::new(trigger::WakeTrigger::new(target))
    };

    info!("Starting server...");
    server::serve(&args.http_addr, server::Gateway::new(trigger, args.upstream))
}
