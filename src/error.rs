use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid baud rate \"{0}\"")]
    InvalidBaudRate(String),

    #[error("unsupported baud rate {0}")]
    UnsupportedBaudRate(u32),

    #[error("failed to open \"{path}\": {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to read from serial device: {source}")]
    DeviceRead {
        #[source]
        source: io::Error,
    },

    #[error("\"{path}\" closed the connection")]
    DeviceClosed { path: String },

    #[error("failed to write to stdout: {source}")]
    Output {
        #[source]
        source: io::Error,
    },

    #[error("reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
