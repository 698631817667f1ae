use clap::Parser;

use receive_serial::device;
use receive_serial::PortConfig;

/// Print lines received on a USB serial adapter
#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(help = "USB serial adapter number (0 opens /dev/ttyUSB0, or COM0 on Windows)")]
    usbport: u32,

    #[arg(help = "Baud rate", value_parser = device::parse_baud_rate)]
    baud: u32,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args { usbport, baud } = Args::parse();

    let config = PortConfig::new(device::device_path(usbport)).with_baud_rate(baud);

    if let Err(e) = receive_serial::run(config).await {
        log::error!("{e}");
        ::std::process::exit(1);
    }
}
