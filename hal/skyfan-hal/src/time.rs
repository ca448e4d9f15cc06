//! Time source abstraction

/// Monotonic millisecond clock
///
/// Timestamps are `u32` milliseconds from an arbitrary epoch and wrap
/// after about 49 days, so intervals must be computed with
/// [`Clock::elapsed_ms`] rather than plain subtraction.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `since`, tolerant of wraparound
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
