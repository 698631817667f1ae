#![cfg(unix)]

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use receive_serial::{device, CancelToken, Error, LineReader, PortConfig, Stop};
use serialport::{SerialPort, TTYPort};

#[tokio::test]
async fn missing_device_fails_before_reading() {
    let config = PortConfig::new("/dev/ttyUSB-receive-serial-missing").with_baud_rate(9600);

    let err = receive_serial::run(config).await.unwrap_err();
    match err {
        Error::DeviceOpen { path, .. } => {
            assert_eq!(path, "/dev/ttyUSB-receive-serial-missing")
        }
        other => panic!("expected DeviceOpen, got {other:?}"),
    }
}

#[test]
fn unsupported_baud_is_reported() {
    let err = receive_serial::device::parse_baud_rate("31337").unwrap_err();
    assert_eq!(err.to_string(), "unsupported baud rate 31337");
}

/// Collects output and cancels once `left` lines have been flushed.
struct StopAfterLines {
    out: Vec<u8>,
    left: usize,
    cancel: CancelToken,
}

impl Write for StopAfterLines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.left = self.left.saturating_sub(1);
        if self.left == 0 {
            self.cancel.cancel();
        }
        Ok(())
    }
}

#[test]
fn pty_lines_are_printed_verbatim() {
    let (mut master, slave) = TTYPort::pair().unwrap();
    let path = slave.name().unwrap();

    let port = device::open(&PortConfig::new(path).with_baud_rate(9600)).unwrap();
    master.write_all(b"hello\nworld\n").unwrap();
    master.flush().unwrap();

    let cancel = CancelToken::new();
    let watchdog = cancel.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(5));
        watchdog.cancel();
    });

    let mut sink = StopAfterLines {
        out: Vec::new(),
        left: 2,
        cancel: cancel.clone(),
    };
    let stop = {
        let mut reader = LineReader::new(port, &mut sink);
        let stop = reader.run(&cancel).unwrap();
        assert_eq!(reader.lines_read(), 2);
        stop
    };

    assert_eq!(stop, Stop::Cancelled);
    assert_eq!(sink.out, b"hello\nworld\n");
}

#[tokio::test]
async fn hangup_ends_run_with_error() {
    let (master, slave) = TTYPort::pair().unwrap();
    let config = PortConfig::new(slave.name().unwrap()).with_baud_rate(9600);

    let task = tokio::spawn(receive_serial::run(config));
    tokio::time::sleep(Duration::from_millis(300)).await;
    drop(master);

    let result = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("run did not stop after the hangup")
        .unwrap();

    assert!(
        matches!(
            result,
            Err(Error::DeviceRead { .. }) | Err(Error::DeviceClosed { .. })
        ),
        "unexpected result: {result:?}"
    );
    drop(slave);
}
