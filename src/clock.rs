//! Millisecond time source used for timeout bookkeeping

/// A monotonic millisecond tick source.
///
/// The counter may wrap; elapsed time is always computed with wrapping arithmetic.
/// A SysTick or RTC based counter with 1 ms resolution is sufficient.
pub trait Clock {
    /// Returns the current tick count in milliseconds.
    fn now_ms(&mut self) -> u32;

    /// Milliseconds elapsed since `start`.
    fn elapsed_ms(&mut self, start: u32) -> u32 {
        self.now_ms().wrapping_sub(start)
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&mut self) -> u32 {
        (**self).now_ms()
    }
}
