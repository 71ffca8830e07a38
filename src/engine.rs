use std::sync::Arc;

use tracing::{debug, info};

use crate::answer::{synthesizer, Answer};
use crate::error::EngineError;
use crate::execution::executor::QueryExecutor;
use crate::intent::{Intent, IntentRecognizer};
use crate::query::builder::PlanBuilder;
use crate::query::plan::QueryPlan;
use crate::storage::store::TabularStore;

/// Main Q&A engine interface.
///
/// Holds an immutable shared store and a compiled recognizer; each question
/// runs the stateless pipeline recognize → plan → execute → synthesize.
/// The store's lifecycle is owned by the caller's loader and is never
/// mutated or recreated here.
pub struct QaEngine {
    store: Arc<TabularStore>,
    recognizer: IntentRecognizer,
}

impl QaEngine {
    pub fn new(store: TabularStore) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<TabularStore>) -> Self {
        Self {
            store,
            recognizer: IntentRecognizer::new(),
        }
    }

    pub fn store(&self) -> &TabularStore {
        &self.store
    }

    /// Answer one question.
    ///
    /// Recoverable conditions (unrecognized input, missing data, empty
    /// results, undefined statistics) come back as informational answers;
    /// only store faults surface as errors, scoped to this question.
    pub fn ask(&self, question: &str) -> Result<Answer, EngineError> {
        let intent = self.recognizer.recognize(question);
        debug!(?intent, "recognized intent");
        if intent == Intent::Unknown {
            return Ok(synthesizer::unknown());
        }

        let plan = match PlanBuilder::new(&self.store).build(&intent) {
            Ok(plan) => plan,
            Err(err) if err.is_recoverable() => {
                info!(%err, "question not answerable from the loaded data");
                return Ok(Answer {
                    narrative: err.to_string(),
                    table: None,
                });
            }
            Err(err) => return Err(err),
        };

        let executor = QueryExecutor::new(&self.store);
        let answer = match plan {
            QueryPlan::TopCrops { spec, n, state } => {
                synthesizer::top_crops(&state, n, executor.execute(&spec)?)
            }
            QueryPlan::Trend {
                production,
                rainfall,
                crop,
                state,
                years,
            } => synthesizer::trend(
                &crop,
                &state,
                years,
                executor.execute(&production)?,
                executor.execute(&rainfall)?,
            ),
            QueryPlan::CompareRain {
                spec,
                state_a,
                state_b,
            } => synthesizer::compare_rain(&state_a, &state_b, executor.execute(&spec)?),
            QueryPlan::RainTrend { spec, state, years } => {
                synthesizer::rain_trend(&state, years, executor.execute(&spec)?)
            }
        };
        Ok(answer)
    }
}
