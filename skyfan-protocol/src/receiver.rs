//! Incremental frame receiver
//!
//! Reassembles frames from a byte stream delivered one byte at a time, so it
//! can be driven straight from a UART read loop or an interrupt-fed queue
//! without reading ahead.
//!
//! The receiver keeps the raw frame bytes in a fixed 256-byte buffer. A
//! declared length that would run past the end of that buffer resets the
//! receiver once the buffer fills, so a corrupted length field can never
//! wedge it or write out of bounds.

use heapless::Vec;

use crate::frame::{checksum, Frame, HEADER_1, HEADER_2, HEADER_LEN, LINK_BUFFER_SIZE};

/// Capacity of the receive accumulation buffer
pub const RX_BUFFER_SIZE: usize = LINK_BUFFER_SIZE;

/// Receiver states, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveState {
    /// Waiting for the 0x55 header byte
    AwaitHeader1,
    /// Got 0x55, waiting for 0xAA
    AwaitHeader2,
    /// Waiting for the version byte
    AwaitVersion,
    /// Waiting for the command byte
    AwaitCommand,
    /// Waiting for the high byte of the payload length
    AwaitLengthHigh,
    /// Waiting for the low byte of the payload length
    AwaitLengthLow,
    /// Reading payload bytes and the trailing checksum
    AwaitPayloadAndChecksum,
}

/// A frame completed by the receiver
///
/// The checksum byte is kept as received. A mismatch does not stop the frame
/// from being routed; callers decide what to do with [`Self::checksum_ok`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedFrame {
    /// Version, command and payload
    pub frame: Frame,
    /// Checksum byte as it arrived on the wire
    pub checksum: u8,
}

impl ReceivedFrame {
    /// Command identifier
    pub fn command(&self) -> u8 {
        self.frame.command
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.frame.payload
    }

    /// Checksum computed over the received bytes
    pub fn expected_checksum(&self) -> u8 {
        self.frame.checksum()
    }

    /// True if the received checksum matches the computed one
    pub fn checksum_ok(&self) -> bool {
        self.checksum == self.expected_checksum()
    }
}

/// Byte-at-a-time frame reassembly state machine
#[derive(Debug, Clone)]
pub struct FrameReceiver {
    state: ReceiveState,
    buffer: Vec<u8, RX_BUFFER_SIZE>,
    expected_len: u16,
    command: u8,
    overflows: u32,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    /// Create a new receiver waiting for a header
    pub fn new() -> Self {
        Self {
            state: ReceiveState::AwaitHeader1,
            buffer: Vec::new(),
            expected_len: 0,
            command: 0,
            overflows: 0,
        }
    }

    /// Reset to the initial state, discarding any partial frame
    pub fn reset(&mut self) {
        self.state = ReceiveState::AwaitHeader1;
        self.buffer.clear();
        self.expected_len = 0;
    }

    /// Current state
    pub fn state(&self) -> ReceiveState {
        self.state
    }

    /// Number of bytes accumulated for the frame in progress
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Number of times the overflow guard has reset the receiver
    pub fn overflow_count(&self) -> u32 {
        self.overflows
    }

    /// Feed a single byte to the receiver
    ///
    /// Returns the frame when this byte completes one.
    pub fn feed(&mut self, byte: u8) -> Option<ReceivedFrame> {
        match self.state {
            ReceiveState::AwaitHeader1 => {
                if byte == HEADER_1 {
                    self.store(byte);
                    self.state = ReceiveState::AwaitHeader2;
                }
                // Anything else is line noise
                None
            }
            ReceiveState::AwaitHeader2 => {
                if byte == HEADER_2 {
                    self.store(byte);
                    self.state = ReceiveState::AwaitVersion;
                } else {
                    self.buffer.clear();
                    self.state = ReceiveState::AwaitHeader1;
                    // 0x55 0x55 0xAA: the second 0x55 may start the real frame
                    if byte == HEADER_1 {
                        self.store(byte);
                        self.state = ReceiveState::AwaitHeader2;
                    }
                }
                None
            }
            ReceiveState::AwaitVersion => {
                self.store(byte);
                self.state = ReceiveState::AwaitCommand;
                None
            }
            ReceiveState::AwaitCommand => {
                self.command = byte;
                self.store(byte);
                self.state = ReceiveState::AwaitLengthHigh;
                None
            }
            ReceiveState::AwaitLengthHigh => {
                self.expected_len = (byte as u16) << 8;
                self.store(byte);
                self.state = ReceiveState::AwaitLengthLow;
                None
            }
            ReceiveState::AwaitLengthLow => {
                self.expected_len |= byte as u16;
                self.store(byte);
                self.state = ReceiveState::AwaitPayloadAndChecksum;

                if self.frame_len() > RX_BUFFER_SIZE {
                    debug!(
                        "declared length {} exceeds receive buffer",
                        self.expected_len
                    );
                }
                None
            }
            ReceiveState::AwaitPayloadAndChecksum => {
                if self.buffer.push(byte).is_err() {
                    warn!(
                        "receive buffer overflow (cmd {=u8:#x}, declared {}), resetting",
                        self.command,
                        self.expected_len
                    );
                    self.overflows = self.overflows.wrapping_add(1);
                    self.reset();
                    return None;
                }

                if self.buffer.len() >= self.frame_len() {
                    let frame = self.take_frame();
                    self.reset();
                    return frame;
                }
                None
            }
        }
    }

    /// Feed a run of bytes, handing every completed frame to `on_frame`
    ///
    /// Produces the same frames as calling [`Self::feed`] once per byte.
    /// Returns the number of frames completed.
    pub fn feed_bytes<F>(&mut self, bytes: &[u8], mut on_frame: F) -> usize
    where
        F: FnMut(ReceivedFrame),
    {
        let mut completed = 0;
        for &byte in bytes {
            if let Some(frame) = self.feed(byte) {
                completed += 1;
                on_frame(frame);
            }
        }
        completed
    }

    /// Full frame length implied by the declared payload length
    fn frame_len(&self) -> usize {
        HEADER_LEN + self.expected_len as usize + 1
    }

    fn store(&mut self, byte: u8) {
        // Header fields never exceed the buffer
        let _ = self.buffer.push(byte);
    }

    fn take_frame(&self) -> Option<ReceivedFrame> {
        let payload_end = HEADER_LEN + self.expected_len as usize;
        let received = self.buffer[payload_end];

        let frame = Frame::new(self.command, &self.buffer[HEADER_LEN..payload_end])
            .ok()?
            .with_version(self.buffer[2]);

        let frame = ReceivedFrame {
            frame,
            checksum: received,
        };

        if !frame.checksum_ok() {
            warn!(
                "checksum mismatch on cmd {=u8:#x}: got {=u8:#x}, computed {=u8:#x}",
                self.command,
                received,
                checksum(&self.buffer[2..payload_end])
            );
        }

        Some(frame)
    }
}
