use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::error::SessionError;

/// Unit at which elapsed time is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Key,
    Word,
    Sentence,
}

impl Granularity {
    fn index(self) -> usize {
        match self {
            Granularity::Key => 0,
            Granularity::Word => 1,
            Granularity::Sentence => 2,
        }
    }
}

/// Source of milliseconds since an arbitrary fixed origin.
///
/// The production clock is monotonic wall time; tests substitute a manually
/// advanced clock so timer semantics can be asserted deterministically.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Production clock backed by `std::time::Instant`.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for unit tests.
///
/// Cloned handles share the same time source, so a test can hold one handle
/// and advance it while the tracker owns another.
#[derive(Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Three independent stopwatches keyed by granularity.
///
/// All three are armed together, exactly once, on session start. Reading a
/// clock before arming is a contract violation, not a recoverable condition.
pub struct TimingTracker {
    clock: Box<dyn Clock>,
    started_at: Option<[u64; 3]>,
}

impl TimingTracker {
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            started_at: None,
        }
    }

    /// Starts all three clocks from the current instant.
    pub fn arm(&mut self) {
        let now = self.clock.now_ms();
        self.started_at = Some([now, now, now]);
    }

    pub fn is_armed(&self) -> bool {
        self.started_at.is_some()
    }

    /// Returns milliseconds since the clock's last start and atomically
    /// resets its start point, so the read and the reset cannot interleave
    /// with another read of the same clock.
    pub fn elapsed_and_restart(&mut self, granularity: Granularity) -> Result<u64, SessionError> {
        let starts = self.started_at.as_mut().ok_or(SessionError::TimerNotArmed)?;
        let now = self.clock.now_ms();
        let idx = granularity.index();
        let elapsed = now.saturating_sub(starts[idx]);
        starts[idx] = now;
        Ok(elapsed)
    }
}

impl Default for TimingTracker {
    fn default() -> Self {
        Self::new()
    }
}
