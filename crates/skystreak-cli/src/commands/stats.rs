use serde::Serialize;
use skystreak_core::{EngagementCore, Prediction};

#[derive(Serialize)]
struct GameStats<'a> {
    total_predictions: u32,
    correct_predictions: u32,
    total_points: u32,
    prediction_streak: u32,
    accuracy: f64,
    rank: &'static str,
    history: &'a [Prediction],
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let core = EngagementCore::open()?;
    let stats = GameStats {
        total_predictions: core.predictions.total_predictions(),
        correct_predictions: core.predictions.correct_predictions(),
        total_points: core.predictions.total_points(),
        prediction_streak: core.predictions.current_streak(),
        accuracy: core.predictions.accuracy(),
        rank: core.predictions.rank(),
        history: core.predictions.history(),
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
