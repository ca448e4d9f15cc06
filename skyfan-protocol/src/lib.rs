//! Tuya MCU Serial Protocol
//!
//! This crate implements the UART protocol spoken between the fan/light
//! controller MCU and the Skyfan radio module. It covers framing, the
//! byte-at-a-time receiver, and the typed data-point payloads.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────────┬─────────┬─────────┬────────────┬─────────────┬──────────┐
//! │ 0x55 0xAA │ VERSION │ COMMAND │ LENGTH(BE) │ PAYLOAD     │ CHECKSUM │
//! │ 2B        │ 1B      │ 1B      │ 2B         │ 0–249B      │ 1B       │
//! └───────────┴─────────┴─────────┴────────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the low byte of the sum of VERSION through PAYLOAD.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod datapoint;
pub mod frame;
pub mod messages;
pub mod receiver;

pub use datapoint::{DataPoint, DataPoints, DpType};
pub use frame::{checksum, Frame, FrameError, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, PROTOCOL_VERSION};
pub use messages::{Command, McuMessage, ModuleMessage, NetworkStatus};
pub use receiver::{FrameReceiver, ReceiveState, ReceivedFrame, RX_BUFFER_SIZE};
