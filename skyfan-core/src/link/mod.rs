//! MCU link supervision
//!
//! The supervisor owns the serial link to the fan/light MCU. It routes
//! received frames, keeps the heartbeat going, tracks whether the MCU is
//! alive and mirrors the upstream network state to the MCU.

pub mod error;
pub mod handler;
pub mod monitor;
pub mod supervisor;

#[cfg(test)]
mod mock;

pub use error::{CommandError, LinkError};
pub use handler::DataPointHandler;
pub use monitor::{LinkMonitor, LinkState};
pub use supervisor::{LinkStats, LinkSupervisor, TxError};
