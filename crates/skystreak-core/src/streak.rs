//! Daily check-in streak tracking with freeze forgiveness.
//!
//! The tracker is a calendar-day state machine. Status is re-derived from
//! `last_check_in` vs. today on every read, never stored:
//!
//! ```text
//! NoHistory -> Active -> AtRisk -> (Active | Broken)
//! ```
//!
//! A freeze is a consumable credit that forgives exactly one missed day.
//! One freeze is granted at the start of each ISO week (year-aware week
//! key, so a week number recurring across a year boundary does not grant
//! twice).
//!
//! All operations are infallible; duplicate check-ins on the same calendar
//! day are absorbed as no-ops. State is persisted after every mutation.

use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::events::{Event, EventBus};
use crate::storage::{Store, StreakConfig};

const STATE_KEY: &str = "streak/state";

/// Fallback step past the end of the milestone ladder.
const MILESTONE_OVERFLOW_STEP: u32 = 100;

/// Persisted streak state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub freezes_available: u32,
    pub last_check_in: Option<NaiveDate>,
    /// ISO week of the last freeze grant, e.g. "2026-W35".
    pub last_freeze_week: Option<String>,
}

/// Derived streak status, recomputed from `last_check_in` vs. today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    /// Never checked in.
    NoHistory,
    /// Checked in today, or yesterday with today still open.
    Active,
    /// A gap is open but the streak can still be saved.
    AtRisk,
    /// The gap is no longer recoverable; the streak has expired.
    Broken,
}

/// Outcome of a single [`StreakTracker::check_in`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// Already checked in today; nothing changed.
    AlreadyCheckedIn,
    /// First check-in ever.
    Started,
    /// Consecutive day; streak extended.
    Continued,
    /// One missed day forgiven by consuming a freeze.
    FreezeUsed,
    /// Gap too large; streak restarted at 1.
    Reset,
}

/// Daily check-in state machine.
pub struct StreakTracker {
    clock: Rc<dyn Clock>,
    store: Store,
    bus: EventBus,
    config: StreakConfig,
    state: StreakState,
}

impl StreakTracker {
    /// Load persisted state, falling back to a fresh default when the
    /// namespace is absent or corrupt.
    pub fn load(clock: Rc<dyn Clock>, store: Store, bus: EventBus, config: StreakConfig) -> Self {
        let state = store.get(STATE_KEY).unwrap_or_default();
        Self {
            clock,
            store,
            bus,
            config,
            state,
        }
    }

    /// Record today's check-in. Idempotent per calendar day.
    ///
    /// The weekly freeze grant is applied before the day delta is
    /// evaluated, so a gap crossing a week boundary can be forgiven by the
    /// new week's freeze.
    pub fn check_in(&mut self) -> CheckInOutcome {
        let today = self.clock.today();
        self.grant_weekly_freeze(today);

        if self.state.last_check_in == Some(today) {
            return CheckInOutcome::AlreadyCheckedIn;
        }

        let mut freeze_used = false;
        let outcome = match self.state.last_check_in {
            None => {
                self.state.current_streak = 1;
                CheckInOutcome::Started
            }
            Some(last) => {
                let delta = (today - last).num_days();
                if delta == 1 {
                    self.state.current_streak += 1;
                    CheckInOutcome::Continued
                } else if delta == 2 && self.state.freezes_available > 0 {
                    self.state.freezes_available -= 1;
                    self.state.current_streak += 1;
                    freeze_used = true;
                    CheckInOutcome::FreezeUsed
                } else {
                    // Covers delta > 2, delta == 2 with no freeze, and a
                    // backwards clock (delta < 0), which is unhandled by
                    // design and lands here.
                    self.state.current_streak = 1;
                    CheckInOutcome::Reset
                }
            }
        };

        self.state.longest_streak = self.state.longest_streak.max(self.state.current_streak);
        self.state.last_check_in = Some(today);
        self.persist();

        self.bus.publish(Event::StreakChanged {
            current_streak: self.state.current_streak,
            longest_streak: self.state.longest_streak,
            freeze_used,
            at: self.clock.now(),
        });

        outcome
    }

    /// Derive the current status; called on load, not a check-in.
    ///
    /// When the gap is no longer recoverable the streak count is forced to
    /// zero and persisted, so a user who never checks in again still sees
    /// an expired streak. `last_check_in` is left untouched; a later
    /// `check_in` restarts at 1 through its own reset branch.
    pub fn check_status(&mut self) -> StreakStatus {
        let today = self.clock.today();
        self.grant_weekly_freeze(today);

        match self.state.last_check_in {
            None => StreakStatus::NoHistory,
            Some(last) if last == today => StreakStatus::Active,
            Some(last) => {
                let delta = (today - last).num_days();
                if delta > 2 || (delta == 2 && self.state.freezes_available == 0) {
                    if self.state.current_streak != 0 {
                        self.state.current_streak = 0;
                        self.persist();
                    }
                    StreakStatus::Broken
                } else {
                    // delta == 1, or delta == 2 with a freeze in hand.
                    StreakStatus::AtRisk
                }
            }
        }
    }

    pub fn current_streak(&self) -> u32 {
        self.state.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.state.longest_streak
    }

    pub fn freezes_available(&self) -> u32 {
        self.state.freezes_available
    }

    pub fn last_check_in(&self) -> Option<NaiveDate> {
        self.state.last_check_in
    }

    /// Smallest milestone strictly greater than the current streak, or one
    /// overflow step past the current streak when the ladder is exhausted.
    pub fn next_milestone(&self) -> u32 {
        let current = self.state.current_streak;
        self.config
            .milestones
            .iter()
            .copied()
            .find(|&m| m > current)
            .unwrap_or(current + MILESTONE_OVERFLOW_STEP)
    }

    /// Largest milestone at or below the current streak, or 0.
    fn previous_milestone(&self) -> u32 {
        let current = self.state.current_streak;
        self.config
            .milestones
            .iter()
            .copied()
            .filter(|&m| m <= current)
            .last()
            .unwrap_or(0)
    }

    /// Fraction of the way from the previous milestone to the next,
    /// clamped to [0, 1].
    pub fn progress_to_next_milestone(&self) -> f64 {
        let current = self.state.current_streak;
        let prev = self.previous_milestone();
        let next = self.next_milestone();
        if next <= prev {
            return 1.0;
        }
        let progress = f64::from(current - prev) / f64::from(next - prev);
        progress.clamp(0.0, 1.0)
    }

    /// Replenish freezes at the start of a new ISO week. The week key is
    /// year-aware so the same week number in a different year counts as a
    /// new week exactly once.
    fn grant_weekly_freeze(&mut self, today: NaiveDate) {
        let week = today.iso_week();
        let key = format!("{}-W{:02}", week.year(), week.week());
        if self.state.last_freeze_week.as_deref() != Some(key.as_str()) {
            self.state.freezes_available = self.config.weekly_freezes;
            self.state.last_freeze_week = Some(key);
            self.persist();
        }
    }

    fn persist(&self) {
        // Local synchronous write; on failure the last good snapshot stays
        // on disk and in-memory state remains authoritative.
        let _ = self.store.put(STATE_KEY, &self.state);
    }
}
