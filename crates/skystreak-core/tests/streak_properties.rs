//! Property tests for the streak tracker and the prediction scorer.

use std::rc::Rc;

use chrono::NaiveDate;
use proptest::prelude::*;
use skystreak_core::storage::{PredictionConfig, StreakConfig};
use skystreak_core::{EventBus, FixedClock, PredictionGame, Store, StreakTracker, TempRange};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

fn tracker() -> (StreakTracker, Rc<FixedClock>) {
    let clock = Rc::new(FixedClock::new(start_date()));
    let tracker = StreakTracker::load(
        clock.clone(),
        Store::open_memory().unwrap(),
        EventBus::new(),
        StreakConfig::default(),
    );
    (tracker, clock)
}

proptest! {
    /// `longest_streak` never decreases and always dominates
    /// `current_streak`, for any pattern of gaps between check-ins.
    #[test]
    fn longest_streak_is_monotone(gaps in prop::collection::vec(0u64..6, 1..60)) {
        let (mut tracker, clock) = tracker();
        let mut last_longest = 0;
        for gap in gaps {
            clock.advance_days(gap);
            tracker.check_in();
            prop_assert!(tracker.longest_streak() >= tracker.current_streak());
            prop_assert!(tracker.longest_streak() >= last_longest);
            last_longest = tracker.longest_streak();
        }
    }

    /// Checking in twice on the same day leaves every field unchanged.
    #[test]
    fn same_day_check_in_is_idempotent(gaps in prop::collection::vec(0u64..6, 1..40)) {
        let (mut tracker, clock) = tracker();
        for gap in gaps {
            clock.advance_days(gap);
            tracker.check_in();
            let current = tracker.current_streak();
            let longest = tracker.longest_streak();
            let freezes = tracker.freezes_available();
            tracker.check_in();
            prop_assert_eq!(tracker.current_streak(), current);
            prop_assert_eq!(tracker.longest_streak(), longest);
            prop_assert_eq!(tracker.freezes_available(), freezes);
        }
    }

    /// Freezes never exceed the weekly grant, and the only transitions are
    /// a decrease by one (consumption) or a refill to the grant value.
    #[test]
    fn freeze_conservation(gaps in prop::collection::vec(0u64..10, 1..60)) {
        let (mut tracker, clock) = tracker();
        let grant = StreakConfig::default().weekly_freezes;
        let mut previous = tracker.freezes_available();
        for gap in gaps {
            clock.advance_days(gap);
            tracker.check_in();
            let now = tracker.freezes_available();
            prop_assert!(now <= grant);
            prop_assert!(
                now == previous || now + 1 == previous || now == grant,
                "freezes jumped from {} to {}",
                previous,
                now
            );
            previous = now;
        }
    }

    /// A verified prediction scores exactly {0, 50, 100, 125} below a
    /// prediction streak of 3, and 125 + 5 x streak from there on.
    #[test]
    fn score_bounds(
        predicted in prop::sample::select(vec!["sunny", "Regen", "Schnee", "Gewitter", "Nebel"]),
        actual in prop::sample::select(vec!["klar", "rainy", "Schneefall", "Sturm", "Dunst"]),
        min in -10i32..25,
        span in 0i32..15,
        temp in -15.0f64..40.0,
        rounds in 1usize..8,
    ) {
        let clock = Rc::new(FixedClock::new(start_date()));
        let mut game = PredictionGame::load(
            clock.clone(),
            Store::open_memory().unwrap(),
            EventBus::new(),
            PredictionConfig::default(),
        );

        for _ in 0..rounds {
            let streak_before = game.current_streak();
            game.make_prediction(predicted, TempRange::new(min, min + span));
            clock.advance_days(1);
            let outcome = game.verify_prediction(actual, temp).unwrap();

            if outcome.is_correct && streak_before + 1 >= 3 {
                prop_assert_eq!(outcome.points, 125 + (streak_before + 1) * 5);
            } else {
                prop_assert!([0u32, 50, 100, 125].contains(&outcome.points));
            }
            if !outcome.is_correct {
                prop_assert_eq!(game.current_streak(), 0);
            }
        }
    }
}
