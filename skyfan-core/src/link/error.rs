//! Link error types

use skyfan_protocol::FrameError;

use crate::attributes::OutOfRange;

/// Failure to put a frame on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The UART reported a write error
    Transport(E),
    /// The frame could not be encoded
    Frame(FrameError),
}

impl<E> From<FrameError> for LinkError<E> {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

/// Failure of an attribute command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError<E> {
    /// Value rejected before anything was sent
    Invalid(OutOfRange),
    /// The UART reported a write error
    Transport(E),
    /// The command could not be encoded
    Frame(FrameError),
    /// No acknowledgement within the command timeout
    NoAck,
}

impl<E> From<OutOfRange> for CommandError<E> {
    fn from(e: OutOfRange) -> Self {
        CommandError::Invalid(e)
    }
}

impl<E> From<LinkError<E>> for CommandError<E> {
    fn from(e: LinkError<E>) -> Self {
        match e {
            LinkError::Transport(e) => CommandError::Transport(e),
            LinkError::Frame(e) => CommandError::Frame(e),
        }
    }
}
