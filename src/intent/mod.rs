//! Question intents: the fixed set of shapes the engine understands.

pub mod recognizer;

use serde::{Deserialize, Serialize};

pub use recognizer::IntentRecognizer;

/// A recognized question shape with its extracted parameters.
///
/// Text parameters are trimmed and lower-cased at recognition time; the plan
/// builder title-cases them again for display. Window and limit values are
/// always positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// `top N crops in <state>`
    TopCrops { n: u32, state: String },

    /// `trend of <crop> over last N years in <state>`
    Trend {
        crop: String,
        state: String,
        window_years: u32,
    },

    /// `compare rainfall between <state_a> and <state_b>`, optionally
    /// windowed with `over last N years`
    CompareRain {
        state_a: String,
        state_b: String,
        window_years: Option<u32>,
    },

    /// `trend of rainfall in <state> for last N years`
    RainTrend { state: String, window_years: u32 },

    /// Anything the templates do not match
    Unknown,
}
