//! Host stand-ins for the UARTs and the timer.

use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};
use heapless::{Deque, Vec};

/// Collects everything written to it.
#[derive(Default)]
pub(crate) struct SinkStream {
    pub(crate) written: Vec<u8, 1024>,
}

impl SinkStream {
    pub(crate) fn text(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }
}

impl ErrorType for SinkStream {
    type Error = Infallible;
}

impl Write for SinkStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let room = self.written.capacity() - self.written.len();
        let n = buf.len().min(room);
        self.written.extend_from_slice(&buf[..n]).unwrap();
        Ok(n)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Refuses every write, like a console UART that is gone.
pub(crate) struct BrokenSink;

impl ErrorType for BrokenSink {
    type Error = FakeIoError;
}

impl Write for BrokenSink {
    async fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(FakeIoError)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Err(FakeIoError)
    }
}

/// Hands out queued bytes a few at a time. Once drained a read never completes, like an idle
/// UART, unless the stream was marked finished, in which case it reads `Ok(0)`.
pub(crate) struct ScriptedStream {
    pending: Deque<u8, 1024>,
    chunk: usize,
    fail_next: bool,
    finished: bool,
}

impl ScriptedStream {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        let mut stream = Self::empty();
        stream.queue(bytes);
        stream
    }

    pub(crate) fn empty() -> Self {
        Self {
            pending: Deque::new(),
            chunk: 7,
            fail_next: false,
            finished: false,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }

    pub(crate) fn queue(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.pending.push_back(byte).unwrap();
        }
    }

    pub(crate) fn fail_next_read(&mut self) {
        self.fail_next = true;
    }

    pub(crate) fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[derive(Debug)]
pub(crate) struct FakeIoError;

impl embedded_io_async::Error for FakeIoError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::BrokenPipe
    }
}

impl ErrorType for ScriptedStream {
    type Error = FakeIoError;
}

impl Read for ScriptedStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if core::mem::take(&mut self.fail_next) {
            return Err(FakeIoError);
        }
        if self.pending.is_empty() {
            if self.finished {
                return Ok(0);
            }
            return core::future::pending().await;
        }
        let mut n = 0;
        while n < buf.len().min(self.chunk) {
            match self.pending.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

#[derive(Default)]
pub(crate) struct RecordingDelay {
    pub(crate) waits_ms: Vec<u32, 16>,
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let _ = self.waits_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        let _ = self.waits_ms.push(ms);
    }
}
