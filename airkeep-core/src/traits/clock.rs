//! Monotonic time source

/// Free-running millisecond counter
///
/// The counter is allowed to wrap; consumers compare instants with
/// `wrapping_sub`. Takes `&self` so a single clock can be shared by the
/// driver and the application loop.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (usually boot)
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
