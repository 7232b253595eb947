use serde::Serialize;
use skystreak_core::{Condition, EngagementCore, WeatherObservation};

use super::print_events;

#[derive(Serialize)]
struct WeatherResult {
    bucket: Option<&'static str>,
    unlocked_count: usize,
    total_count: usize,
}

pub fn report(
    description: &str,
    temp: f64,
    country: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut core = EngagementCore::open()?;
    let observation = WeatherObservation::new(description, temp, country);
    let events = core.report_weather(&observation);
    print_events(&events);

    let result = WeatherResult {
        bucket: Condition::classify(description).map(Condition::label),
        unlocked_count: core.achievements.unlocked_count(),
        total_count: core.achievements.total_count(),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
