//! Next-day weather prediction game.
//!
//! Each day-cycle walks `pending -> predicted -> verified`: a prediction
//! made today targets tomorrow, and is scored the day after against the
//! actually observed weather. Category matching is semantic (same condition
//! bucket, see [`Condition`]), never string equality.
//!
//! Scoring: +50 for a category match, +50 for the truncated temperature
//! landing inside the predicted range (inclusive), +25 when both hold. A
//! fully correct prediction extends the prediction streak, and from a
//! streak of 3 a further `streak x 5` bonus applies; any miss resets the
//! streak to 0.

use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::conditions::Condition;
use crate::events::{Event, EventBus};
use crate::storage::{PredictionConfig, Store};

const STATE_KEY: &str = "predictions/state";

const CATEGORY_POINTS: u32 = 50;
const TEMP_POINTS: u32 = 50;
const BOTH_BONUS: u32 = 25;
const STREAK_BONUS_FROM: u32 = 3;
const STREAK_BONUS_PER_DAY: u32 = 5;

/// Inclusive predicted temperature range, degrees Celsius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TempRange {
    pub min: i32,
    pub max: i32,
}

impl TempRange {
    /// Build a range, swapping the bounds if given in the wrong order so
    /// `min <= max` always holds.
    pub fn new(min: i32, max: i32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Inclusive containment of a truncated temperature.
    pub fn contains(&self, temperature_c: f64) -> bool {
        let truncated = temperature_c.trunc() as i32;
        truncated >= self.min && truncated <= self.max
    }
}

/// One submitted forecast guess. Verification fields stay unset until the
/// single verification pass, and are immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Uuid,
    /// The day being predicted ("tomorrow" at submission time).
    pub target_date: NaiveDate,
    pub predicted_category: String,
    pub predicted_range: TempRange,
    pub actual_category: Option<String>,
    pub actual_temp: Option<f64>,
    pub is_correct: Option<bool>,
    pub points: Option<u32>,
}

impl Prediction {
    fn is_verified(&self) -> bool {
        self.points.is_some()
    }
}

/// The points breakdown of one verification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub category_match: bool,
    pub temp_match: bool,
    pub is_correct: bool,
    pub points: u32,
    /// Prediction streak after this verification.
    pub streak: u32,
}

/// Persisted game state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct GameState {
    predictions: Vec<Prediction>,
    total_predictions: u32,
    correct_predictions: u32,
    total_points: u32,
    current_streak: u32,
}

/// Accuracy rank label. Five contiguous bands over [0, 100].
pub fn rank_for_accuracy(accuracy: f64) -> &'static str {
    if accuracy >= 80.0 {
        "Weather Oracle"
    } else if accuracy >= 60.0 {
        "Forecaster"
    } else if accuracy >= 40.0 {
        "Weather Watcher"
    } else if accuracy >= 20.0 {
        "Apprentice"
    } else {
        "Novice"
    }
}

/// Next-day prediction game.
pub struct PredictionGame {
    clock: Rc<dyn Clock>,
    store: Store,
    bus: EventBus,
    config: PredictionConfig,
    state: GameState,
}

impl PredictionGame {
    /// Load persisted state, falling back to a fresh default when the
    /// namespace is absent or corrupt.
    pub fn load(
        clock: Rc<dyn Clock>,
        store: Store,
        bus: EventBus,
        config: PredictionConfig,
    ) -> Self {
        let state = store.get(STATE_KEY).unwrap_or_default();
        Self {
            clock,
            store,
            bus,
            config,
            state,
        }
    }

    /// Submit a guess for tomorrow. Returns `false` (and changes nothing)
    /// when tomorrow already has a prediction.
    pub fn make_prediction(&mut self, category: &str, range: TempRange) -> bool {
        let target = self.clock.today() + chrono::Days::new(1);
        if self.state.predictions.iter().any(|p| p.target_date == target) {
            return false;
        }

        self.state.predictions.push(Prediction {
            id: Uuid::new_v4(),
            target_date: target,
            predicted_category: category.to_string(),
            predicted_range: range,
            actual_category: None,
            actual_temp: None,
            is_correct: None,
            points: None,
        });
        self.state.total_predictions += 1;
        self.persist();
        true
    }

    /// Whether tomorrow already has a prediction.
    pub fn has_predicted_tomorrow(&self) -> bool {
        let target = self.clock.today() + chrono::Days::new(1);
        self.state.predictions.iter().any(|p| p.target_date == target)
    }

    /// Score yesterday's pending prediction against the observed weather.
    /// No-op (returns `None`) when nothing is pending for yesterday.
    pub fn verify_prediction(
        &mut self,
        actual_description: &str,
        actual_temp: f64,
    ) -> Option<PredictionOutcome> {
        let today = self.clock.today();
        let yesterday = today - chrono::Days::new(1);
        let index = self
            .state
            .predictions
            .iter()
            .rposition(|p| p.target_date == yesterday && !p.is_verified())?;

        let category_match = Condition::matches(
            &self.state.predictions[index].predicted_category,
            actual_description,
        );
        let temp_match = self.state.predictions[index]
            .predicted_range
            .contains(actual_temp);
        let is_correct = category_match && temp_match;

        let mut points = 0;
        if category_match {
            points += CATEGORY_POINTS;
        }
        if temp_match {
            points += TEMP_POINTS;
        }
        if is_correct {
            points += BOTH_BONUS;
            self.state.current_streak += 1;
            if self.state.current_streak >= STREAK_BONUS_FROM {
                points += self.state.current_streak * STREAK_BONUS_PER_DAY;
            }
            self.state.correct_predictions += 1;
        } else {
            self.state.current_streak = 0;
        }
        self.state.total_points += points;

        let prediction = &mut self.state.predictions[index];
        prediction.actual_category = Some(actual_description.to_string());
        prediction.actual_temp = Some(actual_temp);
        prediction.is_correct = Some(is_correct);
        prediction.points = Some(points);
        self.persist();

        let now = self.clock.now();
        self.bus.publish(Event::PredictionVerified {
            target_date: yesterday,
            is_correct,
            points,
            at: now,
        });
        if self.state.total_predictions >= self.config.milestone_threshold {
            self.bus.publish(Event::PredictionMilestone {
                total_predictions: self.state.total_predictions,
                accuracy: self.accuracy(),
                at: now,
            });
        }

        Some(PredictionOutcome {
            category_match,
            temp_match,
            is_correct,
            points,
            streak: self.state.current_streak,
        })
    }

    pub fn total_predictions(&self) -> u32 {
        self.state.total_predictions
    }

    pub fn correct_predictions(&self) -> u32 {
        self.state.correct_predictions
    }

    pub fn total_points(&self) -> u32 {
        self.state.total_points
    }

    /// Prediction streak, distinct from the daily check-in streak.
    pub fn current_streak(&self) -> u32 {
        self.state.current_streak
    }

    /// Percentage of correct predictions, 0 when none were made yet.
    pub fn accuracy(&self) -> f64 {
        if self.state.total_predictions == 0 {
            return 0.0;
        }
        f64::from(self.state.correct_predictions) / f64::from(self.state.total_predictions) * 100.0
    }

    /// Banded rank label for the current accuracy.
    pub fn rank(&self) -> &'static str {
        rank_for_accuracy(self.accuracy())
    }

    /// All predictions, oldest first.
    pub fn history(&self) -> &[Prediction] {
        &self.state.predictions
    }

    fn persist(&self) {
        let _ = self.store.put(STATE_KEY, &self.state);
    }
}
