use serde::Serialize;
use skystreak_core::{Achievement, EngagementCore};

#[derive(Serialize)]
struct AchievementList<'a> {
    unlocked_count: usize,
    total_count: usize,
    achievements: &'a [Achievement],
}

pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    let core = EngagementCore::open()?;
    let list = AchievementList {
        unlocked_count: core.achievements.unlocked_count(),
        total_count: core.achievements.total_count(),
        achievements: core.achievements.achievements(),
    };
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}
