use serde::Serialize;
use skystreak_core::{EngagementCore, PredictionOutcome, TempRange};

use super::print_events;

#[derive(Serialize)]
struct PredictResult {
    accepted: bool,
    already_predicted: bool,
}

#[derive(Serialize)]
struct VerifyResult {
    verified: bool,
    outcome: Option<PredictionOutcome>,
    total_points: u32,
    prediction_streak: u32,
}

pub fn predict(category: &str, min: i32, max: i32) -> Result<(), Box<dyn std::error::Error>> {
    let mut core = EngagementCore::open()?;
    let accepted = core.make_prediction(category, TempRange::new(min, max));
    let result = PredictResult {
        accepted,
        already_predicted: !accepted,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn verify(description: &str, temp: f64) -> Result<(), Box<dyn std::error::Error>> {
    let mut core = EngagementCore::open()?;
    let (outcome, events) = core.verify_prediction(description, temp);
    print_events(&events);
    let result = VerifyResult {
        verified: outcome.is_some(),
        outcome,
        total_points: core.predictions.total_points(),
        prediction_streak: core.predictions.current_streak(),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
