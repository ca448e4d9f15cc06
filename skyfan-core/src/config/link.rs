//! Link timing and serial settings

use skyfan_hal::UartConfig;
use skyfan_protocol::PROTOCOL_VERSION;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Upper bound for a serialized [`LinkConfig`]
pub const MAX_CONFIG_SIZE: usize = 64;

/// Serial link rate expected by the MCU
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Interval between outbound heartbeats
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u32 = 10_000;

/// Silence after which the MCU is considered gone
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u32 = 30_000;

/// Default wait for a generic reply
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u32 = 1_000;

/// Wait for the acknowledgement of a data-point command
pub const DEFAULT_COMMAND_TIMEOUT_MS: u32 = 500;

/// Sleep between receive polls while waiting for a reply
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timing value is zero
    ZeroInterval,
    /// Connection timeout does not exceed the heartbeat interval
    TimeoutTooShort,
    /// Baud rate is zero
    InvalidBaudrate,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch,
}

/// Serial link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Format version, see [`CONFIG_VERSION`]
    pub version: u8,
    /// UART baud rate
    pub baudrate: u32,
    /// Version byte written into outbound frames
    pub protocol_version: u8,
    /// Interval between outbound heartbeats (ms)
    pub heartbeat_interval_ms: u32,
    /// Silence before the link is declared lost (ms)
    pub connection_timeout_ms: u32,
    /// Default reply timeout (ms)
    pub response_timeout_ms: u32,
    /// Acknowledgement timeout for data-point commands (ms)
    pub command_timeout_ms: u32,
    /// Delay between polls while waiting (ms)
    pub poll_interval_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            baudrate: DEFAULT_BAUDRATE,
            protocol_version: PROTOCOL_VERSION,
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl LinkConfig {
    /// Check that the timing values are usable
    ///
    /// The connection timeout must exceed the heartbeat interval, otherwise
    /// the link drops between two heartbeats of a healthy MCU.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }

        let intervals = [
            self.heartbeat_interval_ms,
            self.connection_timeout_ms,
            self.response_timeout_ms,
            self.command_timeout_ms,
            self.poll_interval_ms,
        ];
        if intervals.contains(&0) {
            return Err(ConfigError::ZeroInterval);
        }

        if self.connection_timeout_ms <= self.heartbeat_interval_ms {
            return Err(ConfigError::TimeoutTooShort);
        }

        Ok(())
    }

    /// UART settings for this link (8N1)
    pub fn uart_config(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }
}

#[cfg(feature = "serde")]
impl LinkConfig {
    /// Serialize to postcard binary format
    pub fn to_bytes(&self) -> Result<heapless::Vec<u8, MAX_CONFIG_SIZE>, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let used = postcard::to_slice(self, &mut buffer).map_err(|_| ConfigError::Serialize)?;
        heapless::Vec::from_slice(used).map_err(|_| ConfigError::Serialize)
    }

    /// Load from postcard binary format
    ///
    /// Rejects other format versions and configurations that fail
    /// [`LinkConfig::validate`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: LinkConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: found {}, expected {}",
                config.version,
                CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch);
        }

        config.validate()?;
        debug!(
            "Link config: heartbeat {}ms, timeout {}ms",
            config.heartbeat_interval_ms,
            config.connection_timeout_ms
        );
        Ok(config)
    }
}
