//! Serial device naming, settings and opening.

use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::error::{Error, Result};

/// Prefix the numeric port identifier is appended to.
#[cfg(windows)]
pub const DEVICE_PREFIX: &str = "COM";
#[cfg(not(windows))]
pub const DEVICE_PREFIX: &str = "/dev/ttyUSB";

/// Baud rates accepted on the command line. These are the rates the termios
/// driver exposes as named constants.
pub const SUPPORTED_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200,
    38400, 57600, 115200, 230400, 460800, 500000, 576000, 921600, 1000000,
    1152000, 1500000, 2000000, 2500000, 3000000, 3500000, 4000000,
];

pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// How long a single read may block before the loop checks for cancellation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn device_path(usbport: u32) -> String {
    format!("{DEVICE_PREFIX}{usbport}")
}

pub fn validate_baud_rate(baud: u32) -> Result<u32> {
    if SUPPORTED_BAUD_RATES.contains(&baud) {
        Ok(baud)
    } else {
        Err(Error::UnsupportedBaudRate(baud))
    }
}

/// Parses a command line baud rate. Used as a clap value parser.
pub fn parse_baud_rate(arg: &str) -> Result<u32> {
    let baud = arg
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidBaudRate(arg.to_string()))?;

    validate_baud_rate(baud)
}

#[derive(Debug, Clone)]
pub struct PortConfig {
    pub path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Read timeout of the underlying port
    pub poll_interval: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            path: device_path(0),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PortConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Opens the device described by `config`. The port is closed when the
/// returned handle is dropped.
pub fn open(config: &PortConfig) -> Result<Box<dyn SerialPort>> {
    serialport::new(&config.path, config.baud_rate)
        .data_bits(config.data_bits)
        .parity(config.parity)
        .stop_bits(config.stop_bits)
        .flow_control(config.flow_control)
        .timeout(config.poll_interval)
        .open()
        .map_err(|source| Error::DeviceOpen {
            path: config.path.clone(),
            source,
        })
}
