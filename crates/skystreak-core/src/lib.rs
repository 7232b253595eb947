//! # Skystreak Core Library
//!
//! This library provides the engagement core for the Skystreak weather
//! companion: the stateful logic that turns raw weather observations into
//! durable user progress. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Streak Tracker**: calendar-day check-in state machine with a
//!   freeze-based forgiveness mechanic
//! - **Achievement Tracker**: progress counters against a static catalog
//!   with one-way unlocks
//! - **Prediction Game**: one next-day forecast guess per day, scored
//!   against the actually observed weather
//! - **Storage**: SQLite key/value state storage and TOML-based configuration
//!
//! The trackers are wired behind [`EngagementCore`], a single composition
//! root with construction-time injection of the clock and the store. Cross
//! tracker communication goes through a typed [`Event`] bus with deferred,
//! in-order delivery.
//!
//! All public tracker operations are infallible by design: duplicate or
//! invalid invocations are absorbed as no-ops, and corrupt persisted state
//! falls back to documented defaults.

pub mod achievements;
pub mod clock;
pub mod conditions;
pub mod engagement;
pub mod error;
pub mod events;
pub mod prediction;
pub mod storage;
pub mod streak;
pub mod weather;

pub use achievements::{Achievement, AchievementCategory, AchievementTracker, CATALOG};
pub use clock::{Clock, FixedClock, SystemClock};
pub use conditions::Condition;
pub use engagement::EngagementCore;
pub use error::{ConfigError, CoreError, StoreError};
pub use events::{Event, EventBus};
pub use prediction::{Prediction, PredictionGame, PredictionOutcome, TempRange};
pub use storage::{Config, Store};
pub use streak::{CheckInOutcome, StreakState, StreakStatus, StreakTracker};
pub use weather::WeatherObservation;
