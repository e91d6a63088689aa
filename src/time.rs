//! Wall-clock bookkeeping for the tick loop.
//!
//! The host calls in with monotonic timestamps at whatever cadence it
//! likes (a 250ms interval is typical); `RunClock` turns those into the
//! elapsed-seconds deltas the tick engine integrates. Deltas are never
//! capped, so a backgrounded host catches up linearly on resume.

/// What happens to wall-clock time that elapses while mutation selection
/// is pending and the tick engine is paused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PausePolicy {
    /// Paused time accrues: the first delta after resuming covers the
    /// whole selection screen, producing a catch-up jump.
    Accrue,
    /// Paused time is dropped: the run resumes as if no time had passed.
    Discard,
}

/// Converts host timestamps into tick deltas, honoring the pause policy.
pub struct RunClock {
    last: Option<f64>,
    policy: PausePolicy,
}

impl RunClock {
    pub fn new(policy: PausePolicy) -> Self {
        Self { last: None, policy }
    }

    pub fn policy(&self) -> PausePolicy {
        self.policy
    }

    /// Feed the current timestamp in seconds. Returns the delta to tick
    /// with, which is zero on the first call and for the whole span of a
    /// pause. Timestamps that run backwards yield zero rather than a
    /// negative delta.
    pub fn advance(&mut self, now_seconds: f64, paused: bool) -> f64 {
        if paused {
            if self.policy == PausePolicy::Discard {
                self.last = Some(now_seconds);
            }
            return 0.0;
        }
        let delta = match self.last {
            Some(prev) => (now_seconds - prev).max(0.0),
            None => 0.0,
        };
        self.last = Some(now_seconds);
        delta
    }
}
