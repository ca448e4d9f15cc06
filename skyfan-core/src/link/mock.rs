//! Host-side stand-ins for the UART and the clock

use core::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use skyfan_hal::{Clock, UartRx, UartTx};
use skyfan_protocol::{Frame, FrameReceiver, ReceivedFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// UART that records writes and serves queued input
#[derive(Debug, Default)]
pub struct MockUart {
    pub incoming: VecDeque<u8>,
    pub written: Vec<u8>,
    pub fail_writes: bool,
    /// Number of upcoming writes to fail
    pub failing_writes: usize,
    pub fail_reads: bool,
    /// Largest number of bytes returned by one read, `None` for no limit
    pub read_size: Option<usize>,
    /// Served once `incoming` runs dry, so the line never goes idle
    pub noise: Option<u8>,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes for the next reads
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    /// Queue an encoded frame from the MCU
    pub fn push_frame(&mut self, command: u8, payload: &[u8]) {
        let frame = Frame::new(command, payload).unwrap();
        self.push_bytes(&frame.encode_to_vec().unwrap());
    }

    /// Frames written so far, in order
    pub fn sent_frames(&self) -> Vec<ReceivedFrame> {
        let mut receiver = FrameReceiver::new();
        let mut frames = Vec::new();
        receiver.feed_bytes(&self.written, |frame| frames.push(frame));
        frames
    }

    /// Commands of the frames written so far
    pub fn sent_commands(&self) -> Vec<u8> {
        self.sent_frames().iter().map(|f| f.command()).collect()
    }

    pub fn clear_written(&mut self) {
        self.written.clear();
    }
}

impl UartTx for MockUart {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), MockError> {
        if self.fail_writes || self.failing_writes > 0 {
            self.failing_writes = self.failing_writes.saturating_sub(1);
            return Err(MockError);
        }
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MockError> {
        Ok(())
    }
}

impl UartRx for MockUart {
    type Error = MockError;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
        if self.fail_reads {
            return Err(MockError);
        }
        let limit = self.read_size.map_or(buf.len(), |size| size.min(buf.len()));
        let mut n = 0;
        while n < limit {
            match self.incoming.pop_front().or(self.noise) {
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

/// Millisecond clock shared between a test and the supervisor
///
/// Delays advance the clock instead of sleeping. With a step set, every
/// reading also moves the clock forward by that many milliseconds.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<u32>>,
    step: Rc<Cell<u32>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn set_step(&self, ms: u32) {
        self.step.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.advance(self.step.get());
        now
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}
