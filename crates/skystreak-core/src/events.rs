//! Typed event bus connecting the trackers.
//!
//! Every externally relevant state change produces an [`Event`]. Trackers
//! publish onto a shared FIFO queue; the composition root drains the queue
//! after each public operation and routes events to interested trackers.
//! Delivery is synchronous and in publish order, but never reentrant: a
//! tracker never observes an event while the publishing tracker's own call
//! is still on the stack.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementCategory;

/// Every state change in the system produces an Event.
/// The UI drains events for display; trackers subscribe to each other's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Daily streak changed (continued, forgiven, or reset).
    StreakChanged {
        current_streak: u32,
        longest_streak: u32,
        freeze_used: bool,
        at: DateTime<Utc>,
    },
    /// An achievement crossed its requirement for the first time.
    AchievementUnlocked {
        id: String,
        name: String,
        category: AchievementCategory,
        at: DateTime<Utc>,
    },
    /// A pending prediction was scored against observed weather.
    PredictionVerified {
        target_date: NaiveDate,
        is_correct: bool,
        points: u32,
        at: DateTime<Utc>,
    },
    /// Lifetime prediction count reached the milestone threshold.
    PredictionMilestone {
        total_predictions: u32,
        accuracy: f64,
        at: DateTime<Utc>,
    },
}

/// Synchronous in-process event queue.
///
/// Cheap to clone: clones share the queue. Publishing never blocks and
/// never delivers; delivery happens when the owner drains.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the queue.
    pub fn publish(&self, event: Event) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Take all queued events, in publish order.
    pub fn drain(&self) -> Vec<Event> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
