//! The line read loop.
//!
//! [`LineReader`] pulls bytes from a source chunk by chunk until a `\n`
//! arrives and writes the line, unmodified, to a sink. The loop looks at its
//! [`CancelToken`] after every chunk and every read timeout; bytes received
//! before a timeout stay buffered and become part of the next emitted line.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Shared stop flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why [`LineReader::run`] returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Cancelled,
    EndOfStream,
}

pub struct LineReader<R, W> {
    source: BufReader<R>,
    sink: W,
    line: Vec<u8>,
    lines_read: u64,
}

impl<R: Read, W: Write> LineReader<R, W> {
    pub fn new(source: R, sink: W) -> Self {
        Self {
            source: BufReader::new(source),
            sink,
            line: Vec::new(),
            lines_read: 0,
        }
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    #[cfg(test)]
    fn into_sink(self) -> W {
        self.sink
    }

    /// Reads and emits lines until `cancel` is set, the source ends or an
    /// error occurs. A partial line is emitted at end of stream and dropped on
    /// a read error.
    ///
    /// The token is checked after every chunk, so a device that never sends a
    /// newline can still be stopped.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<Stop> {
        while !cancel.is_cancelled() {
            let (complete, used) = match self.source.fill_buf() {
                Ok([]) => {
                    if !self.line.is_empty() {
                        self.emit()?;
                    }
                    return Ok(Stop::EndOfStream);
                }
                Ok(available) => match available.iter().position(|&b| b == b'\n') {
                    Some(end) => {
                        self.line.extend_from_slice(&available[..=end]);
                        (true, end + 1)
                    }
                    None => {
                        self.line.extend_from_slice(available);
                        (false, available.len())
                    }
                },
                Err(ref e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue
                }
                Err(source) => return Err(Error::DeviceRead { source }),
            };

            self.source.consume(used);
            if complete {
                self.emit()?;
            }
        }

        Ok(Stop::Cancelled)
    }

    fn emit(&mut self) -> Result<()> {
        self.sink
            .write_all(&self.line)
            .and_then(|()| self.sink.flush())
            .map_err(|source| Error::Output { source })?;

        self.lines_read += 1;
        log::trace!("line {}: {} bytes", self.lines_read, self.line.len());
        self.line.clear();

        Ok(())
    }
}
