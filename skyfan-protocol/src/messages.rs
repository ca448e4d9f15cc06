//! Message types for the Tuya MCU protocol
//!
//! Message types are divided into two categories:
//! - MCU → Module: heartbeat replies, network status requests, status reports
//! - Module → MCU: heartbeats, network status, data-point commands

use crate::datapoint::{self, DataPoint, DataPoints};
use crate::frame::{Frame, FrameError};

// Command IDs
pub const CMD_HEARTBEAT: u8 = 0x00;
pub const CMD_PRODUCT_INFO: u8 = 0x01;
pub const CMD_NETWORK_STATUS: u8 = 0x03;
pub const CMD_SEND_COMMAND: u8 = 0x06;
pub const CMD_STATUS_REPORT: u8 = 0x07;

// Network status payload values
pub const NETWORK_STATUS_DISCONNECTED: u8 = 0x03;
pub const NETWORK_STATUS_CONNECTED: u8 = 0x05;

/// Command identifier carried in every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Keepalive, sent by the module and echoed by the MCU
    Heartbeat,
    /// Product information query
    ProductInfo,
    /// Network status request (MCU) or announcement (module)
    NetworkStatus,
    /// Data-point command, echoed by the MCU as acknowledgement
    SendCommand,
    /// Data-point report pushed by the MCU
    StatusReport,
    /// Anything this bridge does not handle
    Unknown(u8),
}

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            CMD_HEARTBEAT => Command::Heartbeat,
            CMD_PRODUCT_INFO => Command::ProductInfo,
            CMD_NETWORK_STATUS => Command::NetworkStatus,
            CMD_SEND_COMMAND => Command::SendCommand,
            CMD_STATUS_REPORT => Command::StatusReport,
            other => Command::Unknown(other),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Heartbeat => CMD_HEARTBEAT,
            Command::ProductInfo => CMD_PRODUCT_INFO,
            Command::NetworkStatus => CMD_NETWORK_STATUS,
            Command::SendCommand => CMD_SEND_COMMAND,
            Command::StatusReport => CMD_STATUS_REPORT,
            Command::Unknown(byte) => byte,
        }
    }
}

/// Upstream network state as announced to the MCU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkStatus {
    /// Not joined to the coordinator
    Disconnected,
    /// Joined to the coordinator
    Connected,
}

impl NetworkStatus {
    /// Map an upstream connectivity flag to a status
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            NetworkStatus::Connected
        } else {
            NetworkStatus::Disconnected
        }
    }

    /// Parse a status from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            NETWORK_STATUS_DISCONNECTED => Some(NetworkStatus::Disconnected),
            NETWORK_STATUS_CONNECTED => Some(NetworkStatus::Connected),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            NetworkStatus::Disconnected => NETWORK_STATUS_DISCONNECTED,
            NetworkStatus::Connected => NETWORK_STATUS_CONNECTED,
        }
    }

    /// True for [`NetworkStatus::Connected`]
    pub fn is_connected(self) -> bool {
        matches!(self, NetworkStatus::Connected)
    }
}

/// Messages from the module to the MCU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleMessage {
    /// Keepalive request
    Heartbeat,
    /// Upstream network state
    NetworkStatus(NetworkStatus),
    /// Set a single data point
    SetDataPoint(DataPoint),
}

impl ModuleMessage {
    /// Command identifier for this message
    pub fn command(&self) -> u8 {
        match self {
            ModuleMessage::Heartbeat => CMD_HEARTBEAT,
            ModuleMessage::NetworkStatus(_) => CMD_NETWORK_STATUS,
            ModuleMessage::SetDataPoint(_) => CMD_SEND_COMMAND,
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ModuleMessage::Heartbeat => Ok(Frame::empty(CMD_HEARTBEAT)),
            ModuleMessage::NetworkStatus(status) => {
                Frame::new(CMD_NETWORK_STATUS, &[status.to_byte()])
            }
            ModuleMessage::SetDataPoint(dp) => Frame::new(CMD_SEND_COMMAND, &dp.to_payload()?),
        }
    }
}

/// Messages parsed from MCU-originated frames
#[derive(Debug, Clone)]
pub enum McuMessage<'a> {
    /// Heartbeat reply
    Heartbeat,
    /// Product information (not interpreted)
    ProductInfo(&'a [u8]),
    /// The MCU asks for the current network status
    NetworkStatusRequest,
    /// Echo of a data-point command
    CommandAck(DataPoints<'a>),
    /// Data points pushed by the MCU
    StatusReport(DataPoints<'a>),
    /// Unhandled command
    Unknown {
        command: u8,
        payload: &'a [u8],
    },
}

impl<'a> McuMessage<'a> {
    /// Classify a frame by its command identifier
    pub fn from_frame(frame: &'a Frame) -> Self {
        let payload = frame.payload.as_slice();
        match Command::from_byte(frame.command) {
            Command::Heartbeat => McuMessage::Heartbeat,
            Command::ProductInfo => McuMessage::ProductInfo(payload),
            Command::NetworkStatus => McuMessage::NetworkStatusRequest,
            Command::SendCommand => {
                McuMessage::CommandAck(datapoint::decode(payload, payload.len()))
            }
            Command::StatusReport => {
                McuMessage::StatusReport(datapoint::decode(payload, payload.len()))
            }
            Command::Unknown(command) => McuMessage::Unknown { command, payload },
        }
    }
}
