pub mod achievements;
pub mod predict;
pub mod stats;
pub mod streak;
pub mod weather;

use skystreak_core::Event;

/// Print bus events drained by an operation, one JSON object per line.
pub fn print_events(events: &[Event]) {
    for event in events {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }
}
