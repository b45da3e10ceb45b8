//! Pending timers measured against scaled or real-time clocks

use serde::{Deserialize, Serialize};

use super::host::{Clock, Delay, ObjectId};

/// Slack for frame deltas that sum to just under the delay
const DUE_EPSILON: f64 = 1e-6;

/// A pending timer
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending<T> {
    owner: ObjectId,
    clock: Clock,
    /// Accumulated in f64 so per-frame f32 deltas don't drift
    elapsed: f64,
    delay: f64,
    payload: T,
}

/// Timer queue that fires in scheduling order
///
/// `T` is whatever the runtime wants back when a timer comes due (a script
/// callback id, a delayed removal, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timers<T> {
    pending: Vec<Pending<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, owner: ObjectId, delay: Delay, payload: T) {
        self.pending.push(Pending {
            owner,
            clock: delay.clock,
            elapsed: 0.0,
            delay: f64::from(delay.seconds.max(0.0)),
            payload,
        });
    }

    /// Advance both clocks and return the timers that came due, oldest first
    pub fn advance(&mut self, real_dt: f32, scaled_dt: f32) -> Vec<(ObjectId, T)> {
        let mut due = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut timer in self.pending.drain(..) {
            timer.elapsed += f64::from(match timer.clock {
                Clock::Realtime => real_dt,
                Clock::Scaled => scaled_dt,
            });
            if timer.elapsed + DUE_EPSILON >= timer.delay {
                due.push((timer.owner, timer.payload));
            } else {
                still_pending.push(timer);
            }
        }
        self.pending = still_pending;
        due
    }

    /// Drop the timers owned by `owner` whose payload matches
    pub fn cancel_where(&mut self, owner: ObjectId, matches: impl Fn(&T) -> bool) {
        self.pending.retain(|t| t.owner != owner || !matches(&t.payload));
    }

    /// Whether `owner` still has a timer waiting
    pub fn has_pending(&self, owner: ObjectId) -> bool {
        self.pending.iter().any(|t| t.owner == owner)
    }
}
