//! Adapter for `embedded-io` serial drivers
//!
//! Most chip HALs expose their UARTs through the `embedded-io` traits. The
//! [`IoUart`] wrapper presents such a driver as [`UartTx`] + [`UartRx`],
//! using `ReadReady` so reads stay non-blocking.

use embedded_io::{Read, ReadReady, Write};

use crate::uart::{UartRx, UartTx};

/// `embedded-io` serial port wrapped as a UART
#[derive(Debug)]
pub struct IoUart<T> {
    inner: T,
}

impl<T> IoUart<T> {
    /// Wrap a serial driver
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Access the wrapped driver
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the serial driver
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write> UartTx for IoUart<T> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: Read + ReadReady> UartRx for IoUart<T> {
    type Error = T::Error;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.inner.read_ready()? {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_io::ErrorType;
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Mock serial port with scripted input
    #[derive(Default)]
    struct MockPort {
        incoming: VecDeque<u8>,
        written: Vec<u8>,
        flushed: bool,
    }

    impl ErrorType for MockPort {
        type Error = Infallible;
    }

    impl Read for MockPort {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            while n < buf.len() {
                match self.incoming.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl ReadReady for MockPort {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.incoming.is_empty())
        }
    }

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_write_and_flush() {
        let mut uart = IoUart::new(MockPort::default());
        uart.write_blocking(&[0x55, 0xAA, 0x03]).unwrap();
        UartTx::flush(&mut uart).unwrap();

        let port = uart.into_inner();
        assert_eq!(port.written, [0x55, 0xAA, 0x03]);
        assert!(port.flushed);
    }

    #[test]
    fn test_read_does_not_block_when_idle() {
        let mut uart = IoUart::new(MockPort::default());
        let mut buf = [0u8; 4];
        assert_eq!(uart.try_read(&mut buf), Ok(0));

        uart.inner_mut().incoming.extend([0x01, 0x02]);
        assert_eq!(uart.try_read(&mut buf), Ok(2));
        assert_eq!(&buf[..2], &[0x01, 0x02]);
        assert_eq!(uart.try_read_byte(), Ok(None));
    }
}
