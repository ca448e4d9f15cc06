//! Board-agnostic core logic for the Skyfan serial bridge
//!
//! This crate contains the parts of the bridge that sit between the Tuya
//! MCU's serial link and the Zigbee application layer, without depending on
//! a specific chip:
//!
//! - Link supervisor (frame routing, heartbeats, network status sync)
//! - MCU liveness monitoring
//! - Attribute domain and validation for outbound commands
//! - Unit conversions between the MCU and Zigbee attribute ranges
//! - Link configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod attributes;
pub mod config;
pub mod convert;
pub mod link;

pub use config::{ConfigError, LinkConfig};
pub use link::{
    CommandError, DataPointHandler, LinkError, LinkMonitor, LinkState, LinkStats, LinkSupervisor,
};
