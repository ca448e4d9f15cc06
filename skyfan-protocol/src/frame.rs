//! Frame encoding and decoding for the Tuya MCU serial protocol.
//!
//! Frame format:
//! - HEADER (2 bytes): 0x55 0xAA synchronization pattern
//! - VERSION (1 byte): protocol version (0x03 when sent by the module)
//! - COMMAND (1 byte): command identifier
//! - LENGTH (2 bytes): payload length, big-endian
//! - PAYLOAD (0-249 bytes): command-specific data
//! - CHECKSUM (1 byte): sum of VERSION through end of PAYLOAD, modulo 256

use heapless::Vec;

/// First header byte
pub const HEADER_1: u8 = 0x55;

/// Second header byte
pub const HEADER_2: u8 = 0xAA;

/// Protocol version written into outbound frames
pub const PROTOCOL_VERSION: u8 = 0x03;

/// Bytes preceding the payload (HEADER + VERSION + COMMAND + LENGTH)
pub const HEADER_LEN: usize = 6;

/// Size of the link's frame buffers, shared by transmit and receive
pub const LINK_BUFFER_SIZE: usize = 256;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = LINK_BUFFER_SIZE;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - HEADER_LEN - 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Bytes do not start with the 0x55 0xAA header
    InvalidHeader,
    /// Frame is incomplete (need more bytes)
    Incomplete,
    /// Checksum mismatch
    InvalidChecksum,
}

/// Sum of all bytes, modulo 256
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Serialize a frame directly into `buffer`
///
/// Returns the number of bytes written. The checksum covers every byte from
/// the version field through the end of the payload.
pub fn encode_into(
    version: u8,
    command: u8,
    payload: &[u8],
    buffer: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }

    let frame_len = HEADER_LEN + payload.len() + 1;
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let len = payload.len() as u16;
    buffer[0] = HEADER_1;
    buffer[1] = HEADER_2;
    buffer[2] = version;
    buffer[3] = command;
    buffer[4..6].copy_from_slice(&len.to_be_bytes());
    buffer[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
    buffer[frame_len - 1] = checksum(&buffer[2..frame_len - 1]);

    Ok(frame_len)
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Protocol version byte
    pub version: u8,
    /// Command identifier
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            version: PROTOCOL_VERSION,
            command,
            payload,
        })
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            command,
            payload: Vec::new(),
        }
    }

    /// Replace the version byte (the MCU answers with its own version)
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Total encoded size including header and checksum
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len() + 1
    }

    /// Checksum this frame carries on the wire
    pub fn checksum(&self) -> u8 {
        let len = (self.payload.len() as u16).to_be_bytes();
        checksum(&[self.version, self.command, len[0], len[1]])
            .wrapping_add(checksum(&self.payload))
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        encode_into(self.version, self.command, &self.payload, buffer)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }

    /// Decode one complete frame from the start of `bytes`
    ///
    /// Unlike [`crate::FrameReceiver`] this rejects frames whose checksum
    /// does not match. Bytes after the frame are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() >= 2 && (bytes[0] != HEADER_1 || bytes[1] != HEADER_2) {
            return Err(FrameError::InvalidHeader);
        }
        if bytes.len() < HEADER_LEN + 1 {
            return Err(FrameError::Incomplete);
        }

        let len = u16::from_be_bytes([bytes[4], bytes[5]]) as usize;
        if len > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        let frame_len = HEADER_LEN + len + 1;
        if bytes.len() < frame_len {
            return Err(FrameError::Incomplete);
        }

        if checksum(&bytes[2..frame_len - 1]) != bytes[frame_len - 1] {
            return Err(FrameError::InvalidChecksum);
        }

        let frame = Self::new(bytes[3], &bytes[HEADER_LEN..HEADER_LEN + len])?;
        Ok(frame.with_version(bytes[2]))
    }
}
