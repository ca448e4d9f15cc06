//! Skyfan Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware seams the serial bridge
//! needs, so the protocol engine can run on the radio module and be tested
//! on the host with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  skyfan-core (link supervisor)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  skyfan-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embedded-io  │       │  UART IRQ +   │
//! │  serial port  │       │  spsc queue   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`time::Clock`] - Millisecond time source

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod io;
pub mod queue;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use io::IoUart;
pub use queue::{QueueFeeder, QueueRx, RxQueue};
pub use time::Clock;
pub use uart::{Duplex, Uart, UartConfig, UartRx, UartTx};
