//! Achievement catalog and progress tracking.
//!
//! The catalog is static configuration: every entry is instantiated with
//! zero progress on first run, and persisted progress is merged back onto
//! the catalog on load so entries added in later versions appear with
//! defaults. Unlocking is a one-way transition -- the unlock timestamp is
//! stamped once and the unlock event fires exactly once, no matter how far
//! progress climbs afterwards.
//!
//! Streak achievements are fed through the event bus subscription
//! ([`AchievementTracker::on_streak_changed`]) rather than a direct
//! dependency on the streak tracker.

use std::collections::BTreeSet;
use std::rc::Rc;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::conditions::Condition;
use crate::events::{Event, EventBus};
use crate::storage::Store;
use crate::weather::WeatherObservation;

const STATE_KEY: &str = "achievements/state";
const COUNTRIES_KEY: &str = "achievements/countries";
const SEASONS_KEY: &str = "achievements/seasons";

/// Extreme-temperature thresholds, degrees Celsius.
const HEAT_THRESHOLD_C: f64 = 30.0;
const FROST_THRESHOLD_C: f64 = 0.0;

/// Achievement grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Weather,
    Streak,
    Explorer,
    Seasonal,
}

/// One catalog entry: id, display strings, category, and the progress
/// value at which it unlocks.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub requirement: u32,
}

/// The static achievement catalog.
pub const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "sun_seeker",
        name: "Sun Seeker",
        description: "Log 10 sunny observations",
        category: AchievementCategory::Weather,
        requirement: 10,
    },
    AchievementDef {
        id: "cloud_watcher",
        name: "Cloud Watcher",
        description: "Log 10 cloudy observations",
        category: AchievementCategory::Weather,
        requirement: 10,
    },
    AchievementDef {
        id: "rain_walker",
        name: "Rain Walker",
        description: "Log 10 rainy observations",
        category: AchievementCategory::Weather,
        requirement: 10,
    },
    AchievementDef {
        id: "snow_day",
        name: "Snow Day",
        description: "Log 5 snowy observations",
        category: AchievementCategory::Weather,
        requirement: 5,
    },
    AchievementDef {
        id: "storm_chaser",
        name: "Storm Chaser",
        description: "Log 3 stormy observations",
        category: AchievementCategory::Weather,
        requirement: 3,
    },
    AchievementDef {
        id: "heat_wave",
        name: "Heat Wave",
        description: "Log 3 observations at 30\u{b0}C or above",
        category: AchievementCategory::Weather,
        requirement: 3,
    },
    AchievementDef {
        id: "deep_freeze",
        name: "Deep Freeze",
        description: "Log 3 observations at 0\u{b0}C or below",
        category: AchievementCategory::Weather,
        requirement: 3,
    },
    AchievementDef {
        id: "streak_week",
        name: "One Week Strong",
        description: "Reach a 7-day check-in streak",
        category: AchievementCategory::Streak,
        requirement: 7,
    },
    AchievementDef {
        id: "streak_month",
        name: "Monthly Regular",
        description: "Reach a 30-day check-in streak",
        category: AchievementCategory::Streak,
        requirement: 30,
    },
    AchievementDef {
        id: "streak_hundred",
        name: "Centurion",
        description: "Reach a 100-day check-in streak",
        category: AchievementCategory::Streak,
        requirement: 100,
    },
    AchievementDef {
        id: "streak_year",
        name: "All Year Round",
        description: "Reach a 365-day check-in streak",
        category: AchievementCategory::Streak,
        requirement: 365,
    },
    AchievementDef {
        id: "globetrotter",
        name: "Globetrotter",
        description: "Check the weather in 5 different countries",
        category: AchievementCategory::Explorer,
        requirement: 5,
    },
    AchievementDef {
        id: "world_wanderer",
        name: "World Wanderer",
        description: "Check the weather in 10 different countries",
        category: AchievementCategory::Explorer,
        requirement: 10,
    },
    AchievementDef {
        id: "four_seasons",
        name: "Four Seasons",
        description: "Log observations in all four seasons",
        category: AchievementCategory::Seasonal,
        requirement: 4,
    },
];

/// Runtime (persisted) achievement state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub requirement: u32,
    pub progress: u32,
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    fn from_def(def: &AchievementDef) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            category: def.category,
            requirement: def.requirement,
            progress: 0,
            is_unlocked: false,
            unlocked_at: None,
        }
    }
}

/// Progress tracker over the static catalog.
pub struct AchievementTracker {
    clock: Rc<dyn Clock>,
    store: Store,
    bus: EventBus,
    achievements: Vec<Achievement>,
    countries: BTreeSet<String>,
    seasons: BTreeSet<String>,
}

impl AchievementTracker {
    /// Load persisted progress, merging it onto the catalog. Stored
    /// entries no longer in the catalog are dropped; new catalog entries
    /// start at zero.
    pub fn load(clock: Rc<dyn Clock>, store: Store, bus: EventBus) -> Self {
        let stored: Vec<Achievement> = store.get(STATE_KEY).unwrap_or_default();
        let achievements = CATALOG
            .iter()
            .map(|def| {
                stored
                    .iter()
                    .find(|a| a.id == def.id)
                    .cloned()
                    .unwrap_or_else(|| Achievement::from_def(def))
            })
            .collect();
        let countries = store.get(COUNTRIES_KEY).unwrap_or_default();
        let seasons = store.get(SEASONS_KEY).unwrap_or_default();
        Self {
            clock,
            store,
            bus,
            achievements,
            countries,
            seasons,
        }
    }

    /// Set an achievement's progress, unlocking it when the requirement is
    /// first met. Unknown ids are a silent no-op. Monotonicity is the
    /// caller's responsibility; this does not reject lower values.
    pub fn update_progress(&mut self, id: &str, new_progress: u32) {
        let now = self.clock.now();
        let Some(achievement) = self.achievements.iter_mut().find(|a| a.id == id) else {
            return;
        };

        achievement.progress = new_progress;
        if !achievement.is_unlocked && achievement.progress >= achievement.requirement {
            achievement.is_unlocked = true;
            achievement.unlocked_at = Some(now);
            self.bus.publish(Event::AchievementUnlocked {
                id: achievement.id.clone(),
                name: achievement.name.clone(),
                category: achievement.category,
                at: now,
            });
        }
        self.persist();
    }

    /// Add `by` to an achievement's progress.
    pub fn increment_progress(&mut self, id: &str, by: u32) {
        let Some(current) = self
            .achievements
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.progress)
        else {
            return;
        };
        self.update_progress(id, current + by);
    }

    /// Feed one classified weather observation into the category and
    /// extreme-temperature counters. Each qualifying reading counts once.
    pub fn check_weather_achievements(&mut self, observation: &WeatherObservation) {
        if let Some(condition) = Condition::classify(&observation.description) {
            let id = match condition {
                Condition::Sunny => "sun_seeker",
                Condition::Cloudy => "cloud_watcher",
                Condition::Rainy => "rain_walker",
                Condition::Snowy => "snow_day",
                Condition::Stormy => "storm_chaser",
            };
            self.increment_progress(id, 1);
        }

        if observation.temperature_c >= HEAT_THRESHOLD_C {
            self.increment_progress("heat_wave", 1);
        }
        if observation.temperature_c <= FROST_THRESHOLD_C {
            self.increment_progress("deep_freeze", 1);
        }

        let season = season_of(self.clock.today().month());
        if self.seasons.insert(season.to_string()) {
            let _ = self.store.put(SEASONS_KEY, &self.seasons);
            let count = self.seasons.len() as u32;
            self.update_progress("four_seasons", count);
        }
    }

    /// Record a country sighting. Progress is the cardinality of the
    /// persisted country set, so duplicates are no-ops.
    pub fn check_location_achievement(&mut self, country: &str) {
        let normalized = country.trim();
        if normalized.is_empty() {
            return;
        }
        if self.countries.insert(normalized.to_string()) {
            let _ = self.store.put(COUNTRIES_KEY, &self.countries);
            let count = self.countries.len() as u32;
            self.update_progress("globetrotter", count);
            self.update_progress("world_wanderer", count);
        }
    }

    /// Event-bus subscription: raise streak-category progress to the
    /// reported streak. Streak resets never lower recorded progress.
    pub fn on_streak_changed(&mut self, current_streak: u32) {
        let ids: Vec<(String, u32)> = self
            .achievements
            .iter()
            .filter(|a| a.category == AchievementCategory::Streak)
            .map(|a| (a.id.clone(), a.progress))
            .collect();
        for (id, progress) in ids {
            if current_streak > progress {
                self.update_progress(&id, current_streak);
            }
        }
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_unlocked).count()
    }

    pub fn total_count(&self) -> usize {
        self.achievements.len()
    }

    fn persist(&self) {
        let _ = self.store.put(STATE_KEY, &self.achievements);
    }
}

/// Meteorological season for a month number.
fn season_of(month: u32) -> &'static str {
    match month {
        3..=5 => "spring",
        6..=8 => "summer",
        9..=11 => "autumn",
        _ => "winter",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker() -> (AchievementTracker, EventBus) {
        let bus = EventBus::new();
        let tracker = AchievementTracker::load(
            Rc::new(FixedClock::new(date(2026, 7, 15))),
            Store::open_memory().unwrap(),
            bus.clone(),
        );
        (tracker, bus)
    }

    #[test]
    fn catalog_instantiates_with_zero_progress() {
        let (tracker, _bus) = tracker();
        assert_eq!(tracker.total_count(), CATALOG.len());
        assert_eq!(tracker.unlocked_count(), 0);
        assert!(tracker.achievements().iter().all(|a| a.progress == 0));
    }

    #[test]
    fn unknown_id_is_a_silent_no_op() {
        let (mut tracker, bus) = tracker();
        tracker.update_progress("no_such_achievement", 99);
        tracker.increment_progress("no_such_achievement", 1);
        assert!(bus.is_empty());
        assert_eq!(tracker.unlocked_count(), 0);
    }

    #[test]
    fn unlock_fires_once_and_stamps_date() {
        let (mut tracker, bus) = tracker();
        tracker.update_progress("storm_chaser", 3);

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Event::AchievementUnlocked { id, .. } if id == "storm_chaser"
        ));

        let unlocked_at = tracker
            .achievements()
            .iter()
            .find(|a| a.id == "storm_chaser")
            .and_then(|a| a.unlocked_at);
        assert!(unlocked_at.is_some());

        // Further progress stays unlocked, re-emits nothing, keeps the stamp.
        tracker.update_progress("storm_chaser", 10);
        assert!(bus.is_empty());
        let achievement = tracker
            .achievements()
            .iter()
            .find(|a| a.id == "storm_chaser")
            .unwrap();
        assert!(achievement.is_unlocked);
        assert_eq!(achievement.progress, 10);
        assert_eq!(achievement.unlocked_at, unlocked_at);
    }

    #[test]
    fn unlock_is_one_way_even_when_progress_drops() {
        let (mut tracker, bus) = tracker();
        tracker.update_progress("storm_chaser", 3);
        bus.drain();
        tracker.update_progress("storm_chaser", 0);
        let achievement = tracker
            .achievements()
            .iter()
            .find(|a| a.id == "storm_chaser")
            .unwrap();
        assert!(achievement.is_unlocked);
        assert!(bus.is_empty());
    }

    #[test]
    fn weather_observations_bump_condition_counters() {
        let (mut tracker, bus) = tracker();
        for _ in 0..3 {
            tracker.check_weather_achievements(&WeatherObservation::new("Gewitter", 18.0, "DE"));
        }
        let storm = tracker
            .achievements()
            .iter()
            .find(|a| a.id == "storm_chaser")
            .unwrap();
        assert_eq!(storm.progress, 3);
        assert!(storm.is_unlocked);
        assert_eq!(
            bus.drain()
                .iter()
                .filter(|e| matches!(e, Event::AchievementUnlocked { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn unclassified_observation_counts_nothing() {
        let (mut tracker, _bus) = tracker();
        tracker.check_weather_achievements(&WeatherObservation::new("Nebel", 12.0, "DE"));
        assert!(tracker
            .achievements()
            .iter()
            .filter(|a| a.category == AchievementCategory::Weather)
            .all(|a| a.progress == 0));
    }

    #[test]
    fn extreme_temperatures_count_inclusively() {
        let (mut tracker, _bus) = tracker();
        tracker.check_weather_achievements(&WeatherObservation::new("klar", 30.0, "DE"));
        tracker.check_weather_achievements(&WeatherObservation::new("klar", 35.5, "DE"));
        tracker.check_weather_achievements(&WeatherObservation::new("Schnee", 0.0, "DE"));
        tracker.check_weather_achievements(&WeatherObservation::new("Schnee", -4.0, "DE"));

        let progress = |id: &str| {
            tracker
                .achievements()
                .iter()
                .find(|a| a.id == id)
                .unwrap()
                .progress
        };
        assert_eq!(progress("heat_wave"), 2);
        assert_eq!(progress("deep_freeze"), 2);
    }

    #[test]
    fn seasons_counted_once_each() {
        let bus = EventBus::new();
        let clock = Rc::new(FixedClock::new(date(2026, 1, 10)));
        let mut tracker = AchievementTracker::load(
            clock.clone(),
            Store::open_memory().unwrap(),
            bus,
        );
        let observe = |t: &mut AchievementTracker| {
            t.check_weather_achievements(&WeatherObservation::new("klar", 10.0, "DE"))
        };

        observe(&mut tracker); // winter
        observe(&mut tracker); // winter again
        clock.set_today(date(2026, 4, 10));
        observe(&mut tracker); // spring
        clock.set_today(date(2026, 7, 10));
        observe(&mut tracker); // summer
        clock.set_today(date(2026, 10, 10));
        observe(&mut tracker); // autumn

        let four_seasons = tracker
            .achievements()
            .iter()
            .find(|a| a.id == "four_seasons")
            .unwrap();
        assert_eq!(four_seasons.progress, 4);
        assert!(four_seasons.is_unlocked);
    }

    #[test]
    fn duplicate_countries_are_no_ops() {
        let (mut tracker, _bus) = tracker();
        tracker.check_location_achievement("Germany");
        tracker.check_location_achievement("Germany");
        tracker.check_location_achievement("  Germany  ");
        tracker.check_location_achievement("Austria");
        tracker.check_location_achievement("");

        let globetrotter = tracker
            .achievements()
            .iter()
            .find(|a| a.id == "globetrotter")
            .unwrap();
        assert_eq!(globetrotter.progress, 2);
    }

    #[test]
    fn streak_events_raise_streak_progress_without_lowering() {
        let (mut tracker, _bus) = tracker();
        tracker.on_streak_changed(8);
        let progress = |t: &AchievementTracker, id: &str| {
            t.achievements()
                .iter()
                .find(|a| a.id == id)
                .unwrap()
                .progress
        };
        assert_eq!(progress(&tracker, "streak_week"), 8);
        assert!(tracker
            .achievements()
            .iter()
            .find(|a| a.id == "streak_week")
            .unwrap()
            .is_unlocked);

        // A streak reset to 1 must not erase recorded progress.
        tracker.on_streak_changed(1);
        assert_eq!(progress(&tracker, "streak_week"), 8);
    }

    #[test]
    fn progress_survives_reload() {
        let store = Store::open_memory().unwrap();
        let clock = Rc::new(FixedClock::new(date(2026, 7, 15)));
        let mut tracker =
            AchievementTracker::load(clock.clone(), store.clone(), EventBus::new());
        tracker.check_location_achievement("Germany");
        tracker.update_progress("storm_chaser", 3);

        let reloaded = AchievementTracker::load(clock, store, EventBus::new());
        assert_eq!(reloaded.unlocked_count(), 1);
        let globetrotter = reloaded
            .achievements()
            .iter()
            .find(|a| a.id == "globetrotter")
            .unwrap();
        assert_eq!(globetrotter.progress, 1);

        // The country set itself must survive too, or reload would recount.
        let mut reloaded = reloaded;
        reloaded.check_location_achievement("Germany");
        assert_eq!(
            reloaded
                .achievements()
                .iter()
                .find(|a| a.id == "globetrotter")
                .unwrap()
                .progress,
            1
        );
    }
}
