//! Frame clock.
//!
//! [`Instant`] is `std::time::Instant` on native targets and a
//! `performance.now()` reading in the browser, where the std clock panics.
//! Natively, [`now`] reads tokio's clock, so pings added during a run age at
//! the same rate as the frames that draw them, paused test time included.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

pub use web_time::Instant;

/// Current time on the clock the draw loop stamps frames with.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Current time on the clock the draw loop stamps frames with.
#[cfg(target_arch = "wasm32")]
#[must_use]
pub fn now() -> Instant {
    Instant::now()
}
