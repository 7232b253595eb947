//! Condition classifier: free-text weather descriptions to semantic buckets.
//!
//! Weather providers describe conditions as free text ("Leichter Regen",
//! "klar", "partly cloudy"). Prediction matching cares about the semantic
//! bucket, not the exact wording, so descriptions are classified into five
//! mutually exclusive buckets by case-insensitive keyword containment.
//! Keyword lists carry German (the deployment language) and English terms.
//!
//! A description matching no keyword list classifies to nothing and never
//! matches anything, so an unrecognized condition never earns credit.

use serde::{Deserialize, Serialize};

/// Semantic weather bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

/// Classification order. Stormy and snowy are tested before rainy so that
/// compound descriptions ("Gewitter mit Regen", "Schneeregen") land in the
/// more specific bucket.
const CLASSIFY_ORDER: [Condition; 5] = [
    Condition::Stormy,
    Condition::Snowy,
    Condition::Rainy,
    Condition::Sunny,
    Condition::Cloudy,
];

impl Condition {
    /// Keyword list for this bucket.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Condition::Sunny => &["sonnig", "sonne", "klar", "heiter", "sunny", "clear"],
            Condition::Cloudy => &[
                "bewölkt",
                "bewoelkt",
                "wolkig",
                "wolken",
                "bedeckt",
                "trüb",
                "trueb",
                "cloud",
                "overcast",
            ],
            Condition::Rainy => &[
                "regen", "schauer", "niesel", "rain", "drizzle", "shower",
            ],
            Condition::Snowy => &["schnee", "graupel", "snow", "sleet"],
            Condition::Stormy => &[
                "gewitter", "sturm", "blitz", "donner", "orkan", "storm", "thunder",
            ],
        }
    }

    /// Display label for the bucket.
    pub fn label(self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Cloudy => "cloudy",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
            Condition::Stormy => "stormy",
        }
    }

    /// Classify a free-text description into a bucket, or `None` when no
    /// keyword matches.
    pub fn classify(description: &str) -> Option<Condition> {
        let haystack = description.to_lowercase();
        CLASSIFY_ORDER.into_iter().find(|bucket| {
            bucket
                .keywords()
                .iter()
                .any(|keyword| haystack.contains(keyword))
        })
    }

    /// Semantic match: two descriptions match iff both classify into the
    /// same bucket. This is deliberately not string equality.
    pub fn matches(a: &str, b: &str) -> bool {
        match (Self::classify(a), Self::classify(b)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}
