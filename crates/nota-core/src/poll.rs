//! Deadline-bounded polling with backoff.
//!
//! Waiting for something on disk (a download finishing, a marker disappearing)
//! is expressed as a probe called repeatedly by [`poll_until`]. Time is read and
//! spent through a [`Clock`], so the same loop runs against the wall clock in
//! production and against a [`ManualClock`] in tests without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Source of monotonic time and of waiting.
pub trait Clock {
    /// Monotonic time since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock: `sleep` advances time immediately.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nanos: AtomicU64::new(0),
        }
    }

    /// Move time forward without a probe running.
    pub fn advance(&self, duration: Duration) {
        let step = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(step))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Delay schedule between probe attempts.
///
/// The delay before retry `n` (0-indexed) is `initial * factor^n`, saturating,
/// capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub factor: u32,
}

impl Backoff {
    /// Constant interval between attempts.
    #[must_use]
    pub const fn fixed(interval: Duration) -> Self {
        Self {
            initial: interval,
            max: interval,
            factor: 1,
        }
    }

    /// Doubling interval starting at `initial`, never above `max`.
    #[must_use]
    pub const fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            factor: 2,
        }
    }

    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let multiplier = self.factor.saturating_pow(attempt);
        self.initial.saturating_mul(multiplier).min(self.max)
    }
}

#[derive(Debug, Error)]
pub enum PollError<E> {
    /// No probe produced a value before the deadline.
    #[error("timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// The probe itself failed; polling stopped at the first failure.
    #[error("{0}")]
    Probe(E),
}

/// Call `probe` until it yields `Some`, sleeping per `backoff` between attempts.
///
/// The probe always runs at least once, and once more after the sleep that
/// crosses `deadline`. Only when that attempt also comes back empty does the
/// call fail with [`PollError::Timeout`], carrying the elapsed time.
///
/// # Errors
///
/// Returns [`PollError::Probe`] as soon as the probe fails, or
/// [`PollError::Timeout`] once `deadline` has passed without a value.
pub fn poll_until<C, T, E, F>(
    clock: &C,
    backoff: Backoff,
    deadline: Duration,
    mut probe: F,
) -> Result<T, PollError<E>>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<Option<T>, E>,
{
    let started = clock.now();
    let mut attempt = 0_u32;

    loop {
        if let Some(value) = probe().map_err(PollError::Probe)? {
            return Ok(value);
        }

        let elapsed = clock.now().saturating_sub(started);
        if elapsed > deadline {
            return Err(PollError::Timeout { elapsed });
        }

        clock.sleep(backoff.delay(attempt));
        attempt = attempt.saturating_add(1);
    }
}
