//! Link supervisor
//!
//! Drives one serial link to the MCU from the main loop:
//!
//! ```text
//! UART ──► FrameReceiver ──► dispatch ──┬─► LinkMonitor (heartbeats)
//!                                       ├─► network status reply
//!                                       └─► DataPointHandler
//!
//! tick() ──► heartbeat timer, liveness check, network status announce
//! set_*() ──► validate ──► send-command frame ──► wait_for_reply
//! ```

use embedded_hal::delay::DelayNs;
use skyfan_hal::{Clock, UartRx, UartTx};
use skyfan_protocol::frame::encode_into;
use skyfan_protocol::messages::{CMD_HEARTBEAT, CMD_NETWORK_STATUS, CMD_SEND_COMMAND};
use skyfan_protocol::{
    DataPoint, DataPoints, FrameReceiver, McuMessage, NetworkStatus, ReceivedFrame,
    MAX_FRAME_SIZE,
};

use crate::attributes::{self, OutOfRange};
use crate::config::LinkConfig;

use super::error::{CommandError, LinkError};
use super::handler::DataPointHandler;
use super::monitor::{LinkMonitor, LinkState};

/// Bytes pulled from the UART per read while polling
const POLL_CHUNK: usize = 32;

/// Write error type of a UART
pub type TxError<U> = <U as UartTx>::Error;

/// Link counters for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Complete frames received
    pub frames_received: u32,
    /// Frames whose checksum did not match (still routed)
    pub checksum_errors: u32,
    /// Receiver resets caused by oversized frames
    pub overflows: u32,
    /// Heartbeats sent
    pub heartbeats_sent: u32,
}

/// Supervisor for the serial link to the MCU
///
/// `U` is the UART, `C` the millisecond clock (also the delay provider for
/// the blocking command calls) and `H` the data-point handler.
pub struct LinkSupervisor<U, C, H> {
    uart: U,
    clock: C,
    config: LinkConfig,
    receiver: FrameReceiver,
    monitor: LinkMonitor,
    handler: Option<H>,
    /// Upstream flag from the last tick, used to answer status requests
    upstream_connected: bool,
    /// Last network status sent by tick, `None` until the first tick
    announced: Option<NetworkStatus>,
    last_heartbeat_sent_ms: u32,
    stats: LinkStats,
}

impl<U, C, H> LinkSupervisor<U, C, H>
where
    U: UartTx + UartRx,
    C: Clock,
    H: DataPointHandler,
{
    /// Create a supervisor with no handler registered
    ///
    /// The heartbeat timer starts now, so the first heartbeat goes out one
    /// interval after construction.
    pub fn new(uart: U, clock: C, config: LinkConfig) -> Self {
        let now = clock.now_ms();
        Self {
            uart,
            clock,
            receiver: FrameReceiver::new(),
            monitor: LinkMonitor::new(config.connection_timeout_ms),
            config,
            handler: None,
            upstream_connected: false,
            announced: None,
            last_heartbeat_sent_ms: now,
            stats: LinkStats::default(),
        }
    }

    /// Register the data-point handler, returning the previous one
    pub fn set_handler(&mut self, handler: H) -> Option<H> {
        self.handler.replace(handler)
    }

    /// Remove the data-point handler; reports are dropped until a new one is set
    pub fn clear_handler(&mut self) -> Option<H> {
        self.handler.take()
    }

    pub fn is_connected(&self) -> bool {
        self.monitor.is_connected()
    }

    pub fn link_state(&self) -> LinkState {
        self.monitor.state()
    }

    /// Upstream flag most recently passed to [`tick`](Self::tick)
    pub fn upstream_connected(&self) -> bool {
        self.upstream_connected
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn stats(&self) -> LinkStats {
        LinkStats {
            overflows: self.receiver.overflow_count(),
            ..self.stats
        }
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Tear down, returning the UART and clock
    pub fn release(self) -> (U, C) {
        (self.uart, self.clock)
    }

    /// Push one received byte through the link
    ///
    /// Returns true if the byte completed a frame.
    pub fn feed(&mut self, byte: u8) -> Result<bool, LinkError<TxError<U>>> {
        match self.receiver.feed(byte) {
            Some(frame) => {
                self.dispatch(frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Push a run of received bytes through the link
    ///
    /// Every byte is consumed even if a reply fails to send; the first
    /// such error is returned. On success, returns the number of frames
    /// completed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<usize, LinkError<TxError<U>>> {
        let mut frames = 0;
        let mut first_error = None;
        for &byte in bytes {
            match self.feed(byte) {
                Ok(true) => frames += 1,
                Ok(false) => {}
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(frames),
        }
    }

    /// Drain whatever the UART has buffered
    ///
    /// A read error is logged and ends the poll.
    pub fn poll(&mut self) -> Result<usize, LinkError<TxError<U>>> {
        let mut chunk = [0u8; POLL_CHUNK];
        let mut frames = 0;
        loop {
            let n = match self.uart.try_read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(_) => {
                    warn!("UART read failed, ending poll");
                    break;
                }
            };
            frames += self.feed_bytes(&chunk[..n])?;
        }
        Ok(frames)
    }

    /// Periodic housekeeping
    ///
    /// Expires the link on heartbeat silence, sends the heartbeat when due
    /// and announces `upstream_connected` to the MCU when it changed since
    /// the last announcement. The first tick always announces.
    pub fn tick(&mut self, upstream_connected: bool) -> Result<(), LinkError<TxError<U>>> {
        self.upstream_connected = upstream_connected;
        let now = self.clock.now_ms();

        if self.monitor.check(now) {
            info!("MCU link lost");
        }

        // A failed heartbeat does not hold back the announcement; both are
        // retried on the next tick and the first error is returned.
        let mut first_error = None;

        if now.wrapping_sub(self.last_heartbeat_sent_ms) > self.config.heartbeat_interval_ms {
            match self.send_heartbeat() {
                Ok(()) => self.last_heartbeat_sent_ms = now,
                Err(e) => first_error = Some(e),
            }
        }

        let status = NetworkStatus::from_connected(upstream_connected);
        if self.announced != Some(status) {
            debug!("Announcing network status {}", status.to_byte());
            match self.send_network_status(status) {
                Ok(()) => self.announced = Some(status),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Poll the UART, then tick
    pub fn update(&mut self, upstream_connected: bool) -> Result<(), LinkError<TxError<U>>> {
        self.upstream_connected = upstream_connected;
        self.poll()?;
        self.tick(upstream_connected)
    }

    /// Encode and write one frame
    pub fn send_frame(&mut self, command: u8, payload: &[u8]) -> Result<(), LinkError<TxError<U>>> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = encode_into(self.config.protocol_version, command, payload, &mut buffer)?;

        self.uart
            .write_blocking(&buffer[..len])
            .map_err(LinkError::Transport)?;
        self.uart.flush().map_err(LinkError::Transport)?;
        Ok(())
    }

    pub fn send_heartbeat(&mut self) -> Result<(), LinkError<TxError<U>>> {
        self.send_frame(CMD_HEARTBEAT, &[])?;
        self.stats.heartbeats_sent = self.stats.heartbeats_sent.wrapping_add(1);
        trace!("Heartbeat sent");
        Ok(())
    }

    pub fn send_network_status(
        &mut self,
        status: NetworkStatus,
    ) -> Result<(), LinkError<TxError<U>>> {
        self.send_frame(CMD_NETWORK_STATUS, &[status.to_byte()])
    }

    /// Send a data-point command without waiting for the acknowledgement
    pub fn send_data_point(&mut self, dp: DataPoint) -> Result<(), LinkError<TxError<U>>> {
        let payload = dp.to_payload()?;
        self.send_frame(CMD_SEND_COMMAND, &payload)
    }

    fn count_frame(&mut self, frame: &ReceivedFrame) {
        self.stats.frames_received = self.stats.frames_received.wrapping_add(1);
        if !frame.checksum_ok() {
            self.stats.checksum_errors = self.stats.checksum_errors.wrapping_add(1);
        }
    }

    fn dispatch(&mut self, received: ReceivedFrame) -> Result<(), LinkError<TxError<U>>> {
        self.count_frame(&received);

        match McuMessage::from_frame(&received.frame) {
            McuMessage::Heartbeat => {
                let now = self.clock.now_ms();
                if self.monitor.heartbeat_received(now) {
                    info!("MCU link established");
                }
            }
            McuMessage::NetworkStatusRequest => {
                let status = NetworkStatus::from_connected(self.upstream_connected);
                self.send_network_status(status)?;
            }
            McuMessage::StatusReport(points) | McuMessage::CommandAck(points) => {
                self.deliver(points);
            }
            McuMessage::ProductInfo(info) => {
                debug!("Product info received ({} bytes)", info.len());
            }
            McuMessage::Unknown { command, .. } => {
                debug!("Ignoring command {=u8:#x}", command);
            }
        }
        Ok(())
    }

    fn deliver(&mut self, points: DataPoints<'_>) {
        match self.handler.as_mut() {
            Some(handler) => {
                for dp in points {
                    handler.on_data_point(dp);
                }
            }
            None => debug!("No data-point handler, report dropped"),
        }
    }
}

impl<U, C, H> LinkSupervisor<U, C, H>
where
    U: UartTx + UartRx,
    C: Clock + DelayNs,
    H: DataPointHandler,
{
    /// Block until a frame arrives or `timeout_ms` elapses
    ///
    /// Frames whose command differs from `expected` are discarded; `None`
    /// accepts any command. The matching frame is consumed, not dispatched.
    /// Returns false on timeout, even if bytes are still arriving.
    pub fn wait_for_reply(&mut self, expected: Option<u8>, timeout_ms: u32) -> bool {
        let start = self.clock.now_ms();
        loop {
            loop {
                let byte = match self.uart.try_read_byte() {
                    Ok(Some(byte)) => byte,
                    Ok(None) => break,
                    Err(_) => {
                        warn!("UART read failed while waiting for reply");
                        break;
                    }
                };
                if let Some(frame) = self.receiver.feed(byte) {
                    self.count_frame(&frame);
                    let command = frame.command();
                    if expected.map_or(true, |want| want == command) {
                        return true;
                    }
                    debug!("Discarding command {=u8:#x} while waiting", command);
                }
                if self.clock.elapsed_ms(start) >= timeout_ms {
                    warn!("Reply timeout with input still arriving");
                    return false;
                }
            }

            if self.clock.elapsed_ms(start) >= timeout_ms {
                return false;
            }
            self.clock.delay_ms(self.config.poll_interval_ms);
        }
    }

    /// [`wait_for_reply`](Self::wait_for_reply) with the configured response timeout
    pub fn wait_for_response(&mut self, expected: Option<u8>) -> bool {
        self.wait_for_reply(expected, self.config.response_timeout_ms)
    }

    fn command(
        &mut self,
        dp: Result<DataPoint, OutOfRange>,
    ) -> Result<(), CommandError<TxError<U>>> {
        let dp = dp.map_err(|e| {
            warn!(
                "Rejected value {} for data point {} (max {})",
                e.value,
                e.dpid,
                e.max
            );
            e
        })?;

        self.send_data_point(dp)?;
        if self.wait_for_reply(Some(CMD_SEND_COMMAND), self.config.command_timeout_ms) {
            Ok(())
        } else {
            warn!("No acknowledgement for data point {}", dp.id);
            Err(CommandError::NoAck)
        }
    }

    pub fn set_fan_switch(&mut self, on: bool) -> Result<(), CommandError<TxError<U>>> {
        self.command(Ok(attributes::fan_switch(on)))
    }

    /// Fan speed, `0..=5`
    pub fn set_fan_speed(&mut self, speed: u8) -> Result<(), CommandError<TxError<U>>> {
        self.command(attributes::fan_speed(speed))
    }

    /// Fan mode, `0..=2` (normal, eco, sleep)
    pub fn set_fan_mode(&mut self, mode: u8) -> Result<(), CommandError<TxError<U>>> {
        self.command(attributes::fan_mode(mode))
    }

    /// Fan direction, `0..=1` (forward, reverse)
    pub fn set_fan_direction(&mut self, direction: u8) -> Result<(), CommandError<TxError<U>>> {
        self.command(attributes::fan_direction(direction))
    }

    pub fn set_light_switch(&mut self, on: bool) -> Result<(), CommandError<TxError<U>>> {
        self.command(Ok(attributes::light_switch(on)))
    }

    /// Light brightness, `0..=5`
    pub fn set_light_brightness(&mut self, brightness: u8) -> Result<(), CommandError<TxError<U>>> {
        self.command(attributes::light_brightness(brightness))
    }

    /// Light colour temperature, `0..=2` (warm, natural, cool)
    pub fn set_light_colour_temp(&mut self, temp: u8) -> Result<(), CommandError<TxError<U>>> {
        self.command(attributes::light_colour_temp(temp))
    }
}
