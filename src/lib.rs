pub mod device;
pub mod error;
pub mod reader;

use std::io;

pub use device::PortConfig;
pub use error::{Error, Result};
pub use reader::{CancelToken, LineReader, Stop};

/// Opens the configured device and prints every received line to stdout until
/// Ctrl+C is pressed or the device fails.
pub async fn run(config: PortConfig) -> Result<()> {
    let port = device::open(&config)?;

    log::info!(
        "Receiving data on {} at {} baud",
        config.path,
        config.baud_rate
    );

    let cancel = CancelToken::new();
    let reader_cancel = cancel.clone();

    let mut task = tokio::task::spawn_blocking(move || {
        let mut reader = LineReader::new(port, io::stdout().lock());
        let stop = reader.run(&reader_cancel);
        log::debug!("{} lines received", reader.lines_read());
        stop
    });

    let stop = tokio::select! {
        joined = &mut task => joined??,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    log::info!("Interrupted, closing {}", config.path);
                    cancel.cancel();
                }
                Err(e) => log::warn!("Cannot listen for Ctrl+C: {e}"),
            }
            task.await??
        }
    };

    match stop {
        Stop::Cancelled => Ok(()),
        Stop::EndOfStream => Err(Error::DeviceClosed { path: config.path }),
    }
}
