use chrono::NaiveDate;
use serde::Serialize;
use skystreak_core::{CheckInOutcome, EngagementCore, StreakStatus};

use super::print_events;

#[derive(Serialize)]
struct StreakSummary {
    outcome: Option<CheckInOutcome>,
    status: StreakStatus,
    current_streak: u32,
    longest_streak: u32,
    freezes_available: u32,
    last_check_in: Option<NaiveDate>,
    next_milestone: u32,
    progress_to_next_milestone: f64,
}

fn summary(core: &mut EngagementCore, outcome: Option<CheckInOutcome>) -> StreakSummary {
    StreakSummary {
        outcome,
        status: core.check_status(),
        current_streak: core.streak.current_streak(),
        longest_streak: core.streak.longest_streak(),
        freezes_available: core.streak.freezes_available(),
        last_check_in: core.streak.last_check_in(),
        next_milestone: core.streak.next_milestone(),
        progress_to_next_milestone: core.streak.progress_to_next_milestone(),
    }
}

pub fn check_in() -> Result<(), Box<dyn std::error::Error>> {
    let mut core = EngagementCore::open()?;
    let (outcome, events) = core.check_in();
    print_events(&events);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary(&mut core, Some(outcome)))?
    );
    Ok(())
}

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    let mut core = EngagementCore::open()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary(&mut core, None))?
    );
    Ok(())
}
