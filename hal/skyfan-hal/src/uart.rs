//! UART serial communication abstractions
//!
//! Provides traits for serial communication that can be implemented by
//! chip-specific drivers. Reads never block: the link engine is polled from
//! the main loop and must return as soon as the receive buffer is drained.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever is already buffered, up to `buf.len()` bytes
    ///
    /// Returns `Ok(0)` when nothing is available. Never blocks.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte if one is available
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.try_read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// Separate transmit and receive halves presented as one UART
///
/// Used when the receive side is fed by an interrupt through a queue while
/// the transmit side writes to the peripheral directly.
#[derive(Debug)]
pub struct Duplex<T, R> {
    /// Transmit half
    pub tx: T,
    /// Receive half
    pub rx: R,
}

impl<T, R> Duplex<T, R> {
    /// Pair a transmitter with a receiver
    pub fn new(tx: T, rx: R) -> Self {
        Self { tx, rx }
    }
}

impl<T: UartTx, R> UartTx for Duplex<T, R> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.write_blocking(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.flush()
    }
}

impl<T, R: UartRx> UartRx for Duplex<T, R> {
    type Error = R::Error;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.rx.try_read(buf)
    }
}

/// Serial port settings
///
/// The MCU link is always 8 data bits, no parity, one stop bit; only the
/// rate is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::with_baudrate(115_200)
    }
}

impl UartConfig {
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self { baudrate }
    }
}
