//! Interrupt-to-task byte queue
//!
//! When received bytes arrive in a UART interrupt, the handler pushes them
//! through a [`QueueFeeder`] and the link engine drains the matching
//! [`QueueRx`] from the main loop. The single-producer/single-consumer split
//! keeps every byte flowing through exactly one consumer, so the receive
//! state machine is never touched from interrupt context.

use core::convert::Infallible;

use heapless::spsc::{Consumer, Producer, Queue};

use crate::uart::UartRx;

/// Backing storage for the receive queue (holds `N - 1` bytes)
pub type RxQueue<const N: usize> = Queue<u8, N>;

/// Split a queue into its interrupt and task halves
pub fn split<const N: usize>(queue: &mut RxQueue<N>) -> (QueueFeeder<'_, N>, QueueRx<'_, N>) {
    let (producer, consumer) = queue.split();
    (
        QueueFeeder {
            producer,
            dropped: 0,
        },
        QueueRx { consumer },
    )
}

/// Producer half, owned by the interrupt handler
pub struct QueueFeeder<'a, const N: usize> {
    producer: Producer<'a, u8, N>,
    dropped: u32,
}

impl<'a, const N: usize> QueueFeeder<'a, N> {
    /// Queue a received byte
    ///
    /// Returns false (and counts the loss) if the queue is full.
    pub fn push(&mut self, byte: u8) -> bool {
        match self.producer.enqueue(byte) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                false
            }
        }
    }

    /// Queue a run of bytes, returning how many were accepted
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if self.push(byte) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Bytes lost to a full queue
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Consumer half, read by the link engine
pub struct QueueRx<'a, const N: usize> {
    consumer: Consumer<'a, u8, N>,
}

impl<'a, const N: usize> QueueRx<'a, N> {
    /// Bytes waiting to be read
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// True when no bytes are waiting
    pub fn is_empty(&self) -> bool {
        !self.consumer.ready()
    }
}

impl<'a, const N: usize> UartRx for QueueRx<'a, N> {
    type Error = Infallible;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.consumer.dequeue() {
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
