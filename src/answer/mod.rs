//! Answer construction: statistics and deterministic narrative synthesis.

pub mod stats;
pub mod synthesizer;

use serde::{Deserialize, Serialize};

use crate::execution::result::ResultTable;

/// Final response for one question. Built fresh per question, returned to
/// the caller, never cached or mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub narrative: String,
    pub table: Option<ResultTable>,
}
