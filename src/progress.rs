//! Click counter and goal rollover.
//!
//! Every cat gif shown counts as a click. When the counter is at or past the
//! goal threshold, the next click resets it to zero and completes a goal
//! (one more tree on the trees screen).

use std::fmt;
use std::num::NonZeroU32;

/// Clicks needed to earn a tree.
pub const MAX_CLICKS: u32 = 1500;

/// The goal threshold. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalThreshold(NonZeroU32);

impl GoalThreshold {
    /// Returns `None` for zero.
    pub fn new(max: u32) -> Option<Self> {
        NonZeroU32::new(max).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for GoalThreshold {
    fn default() -> Self {
        match NonZeroU32::new(MAX_CLICKS) {
            Some(max) => Self(max),
            None => unreachable!("MAX_CLICKS is non-zero"),
        }
    }
}

/// A user's `(click_count, completed_goals)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Progress {
    pub click_count: u32,
    pub completed_goals: u32,
}

impl Progress {
    pub fn new(click_count: u32, completed_goals: u32) -> Self {
        Self {
            click_count,
            completed_goals,
        }
    }

    /// The state after one more click.
    ///
    /// `>=` rather than `==` so a counter that overshot the threshold (for
    /// example after the threshold was lowered) still rolls over.
    pub fn next(self, threshold: GoalThreshold) -> Self {
        if self.click_count >= threshold.get() {
            Self {
                click_count: 0,
                completed_goals: self.completed_goals.saturating_add(1),
            }
        } else {
            Self {
                click_count: self.click_count + 1,
                completed_goals: self.completed_goals,
            }
        }
    }

    /// True if `next` from this state completes a goal.
    pub fn rolls_over(&self, threshold: GoalThreshold) -> bool {
        self.click_count >= threshold.get()
    }

    /// Progress bar fill, capped at 100.
    pub fn percent(&self, threshold: GoalThreshold) -> f64 {
        (f64::from(self.click_count) / f64::from(threshold.get()) * 100.0).min(100.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} clicks, {} goals",
            self.click_count, self.completed_goals
        )
    }
}
