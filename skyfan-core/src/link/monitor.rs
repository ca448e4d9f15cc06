//! MCU liveness monitor
//!
//! Tracks the last heartbeat seen from the MCU and reports the moment the
//! link comes up or goes silent.

/// Link state as seen from the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
}

/// Heartbeat-based liveness tracking
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    state: LinkState,
    /// Time of the last heartbeat received (ms)
    last_heartbeat_ms: u32,
    /// Silence tolerated before the link is declared lost (ms)
    timeout_ms: u32,
}

impl LinkMonitor {
    /// Create a monitor in the disconnected state
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            state: LinkState::Disconnected,
            last_heartbeat_ms: 0,
            timeout_ms,
        }
    }

    /// Record a heartbeat received at `now_ms`
    ///
    /// Returns true if this heartbeat brought the link up.
    pub fn heartbeat_received(&mut self, now_ms: u32) -> bool {
        self.last_heartbeat_ms = now_ms;
        let was_connected = self.is_connected();
        self.state = LinkState::Connected;
        !was_connected
    }

    /// Check for heartbeat timeout at `now_ms`
    ///
    /// Returns true exactly once per connected period, when the silence
    /// first exceeds the timeout.
    pub fn check(&mut self, now_ms: u32) -> bool {
        if self.is_connected() && self.silence_ms(now_ms) > self.timeout_ms {
            self.state = LinkState::Disconnected;
            return true;
        }
        false
    }

    /// Time since the last heartbeat
    pub fn silence_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_heartbeat_ms)
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }
}
