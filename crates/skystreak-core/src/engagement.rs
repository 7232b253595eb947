//! Composition root for the engagement core.
//!
//! [`EngagementCore`] owns the clock, the store handle, the event bus, and
//! the three trackers, wired together at construction time. There is no
//! global state; every caller goes through one instance.
//!
//! The bus is drained after each public operation: streak-changed events
//! are routed to the achievement tracker there, never while the streak
//! tracker's own call is still running, and everything drained (including
//! unlocks triggered by the routing) is returned to the caller for
//! display.

use std::rc::Rc;

use crate::achievements::AchievementTracker;
use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::events::{Event, EventBus};
use crate::prediction::{PredictionGame, PredictionOutcome, TempRange};
use crate::storage::{Config, Store};
use crate::streak::{CheckInOutcome, StreakStatus, StreakTracker};
use crate::weather::WeatherObservation;

/// The engagement core: streaks, achievements, and the prediction game
/// behind one handle.
pub struct EngagementCore {
    bus: EventBus,
    pub streak: StreakTracker,
    pub achievements: AchievementTracker,
    pub predictions: PredictionGame,
}

impl EngagementCore {
    /// Wire the trackers over an injected clock, store, and config.
    pub fn new(clock: Rc<dyn Clock>, store: Store, config: Config) -> Self {
        let bus = EventBus::new();
        let streak = StreakTracker::load(
            clock.clone(),
            store.clone(),
            bus.clone(),
            config.streak.clone(),
        );
        let achievements = AchievementTracker::load(clock.clone(), store.clone(), bus.clone());
        let predictions = PredictionGame::load(clock, store, bus.clone(), config.predictions);
        Self {
            bus,
            streak,
            achievements,
            predictions,
        }
    }

    /// Open with the system clock and the default on-disk store and config.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        let store = Store::open()?;
        let config = Config::load_or_default();
        Ok(Self::new(Rc::new(SystemClock), store, config))
    }

    /// Record today's check-in and deliver resulting events.
    pub fn check_in(&mut self) -> (CheckInOutcome, Vec<Event>) {
        let outcome = self.streak.check_in();
        (outcome, self.dispatch())
    }

    /// Derive the streak status (forcing expiry when unrecoverable).
    pub fn check_status(&mut self) -> StreakStatus {
        self.streak.check_status()
    }

    /// Feed one fetched weather observation into the achievement counters.
    pub fn report_weather(&mut self, observation: &WeatherObservation) -> Vec<Event> {
        self.achievements.check_weather_achievements(observation);
        self.achievements
            .check_location_achievement(&observation.country);
        self.dispatch()
    }

    /// Submit a prediction for tomorrow.
    pub fn make_prediction(&mut self, category: &str, range: TempRange) -> bool {
        self.predictions.make_prediction(category, range)
    }

    /// Verify yesterday's prediction against the observed weather.
    pub fn verify_prediction(
        &mut self,
        actual_description: &str,
        actual_temp: f64,
    ) -> (Option<PredictionOutcome>, Vec<Event>) {
        let outcome = self
            .predictions
            .verify_prediction(actual_description, actual_temp);
        (outcome, self.dispatch())
    }

    /// Drain the bus, routing streak changes to the achievement tracker.
    /// Routed deliveries may publish follow-up events (unlocks), which are
    /// drained in the same pass; only streak changes are routed, so the
    /// loop cannot storm.
    fn dispatch(&mut self) -> Vec<Event> {
        let mut delivered = Vec::new();
        loop {
            let batch = self.bus.drain();
            if batch.is_empty() {
                break;
            }
            for event in batch {
                if let Event::StreakChanged { current_streak, .. } = event {
                    self.achievements.on_streak_changed(current_streak);
                }
                delivered.push(event);
            }
        }
        delivered
    }
}
