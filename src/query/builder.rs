use tracing::debug;

use crate::error::EngineError;
use crate::intent::Intent;
use crate::query::plan::{
    Aggregate, AggregateOp, Direction, OrderBy, OrderTarget, Predicate, PredicateOp, QueryPlan,
    QuerySpec,
};
use crate::storage::store::{Relation, TabularStore};

/// Derives executable query specs from a recognized intent and the store's
/// year extremes. Relative windows (`last N years`) resolve against the
/// maximum year of whichever relations the question touches; a question
/// touching both relations takes the overall maximum.
pub struct PlanBuilder<'a> {
    store: &'a TabularStore,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(store: &'a TabularStore) -> Self {
        Self { store }
    }

    pub fn build(&self, intent: &Intent) -> Result<QueryPlan, EngineError> {
        let plan = match intent {
            Intent::TopCrops { n, state } => self.build_top_crops(*n, state)?,
            Intent::Trend {
                crop,
                state,
                window_years,
            } => self.build_trend(crop, state, *window_years)?,
            Intent::CompareRain {
                state_a,
                state_b,
                window_years,
            } => self.build_compare_rain(state_a, state_b, *window_years)?,
            Intent::RainTrend {
                state,
                window_years,
            } => self.build_rain_trend(state, *window_years)?,
            Intent::Unknown => {
                return Err(EngineError::internal(
                    "cannot build a plan for an unknown intent",
                ))
            }
        };
        debug!(?plan, "built query plan");
        Ok(plan)
    }

    fn build_top_crops(&self, n: u32, state: &str) -> Result<QueryPlan, EngineError> {
        ensure_positive(n, "n")?;
        let spec = QuerySpec {
            relation: Relation::Crop,
            filters: vec![state_equals(state)],
            group_by: "crop".to_string(),
            aggregate: Aggregate {
                op: AggregateOp::Sum,
                column: "production_mt".to_string(),
                alias: "total_prod".to_string(),
            },
            order_by: Some(OrderBy {
                target: OrderTarget::Aggregate,
                direction: Direction::Descending,
            }),
            limit: Some(n as usize),
        };
        Ok(QueryPlan::TopCrops {
            spec,
            n,
            state: title_case(state),
        })
    }

    fn build_trend(&self, crop: &str, state: &str, window: u32) -> Result<QueryPlan, EngineError> {
        ensure_positive(window, "window_years")?;
        // the trend touches both relations, so the window anchors on the
        // overall maximum year across crop and rain
        let max_year = [
            self.store.max_year(Relation::Crop),
            self.store.max_year(Relation::Rain),
        ]
        .into_iter()
        .flatten()
        .max()
        .ok_or_else(|| {
            EngineError::no_data("no crop or rainfall rows to resolve the year window against")
        })?;
        let min_year = max_year - i64::from(window) + 1;

        let production = QuerySpec {
            relation: Relation::Crop,
            filters: vec![
                Predicate {
                    column: "crop".to_string(),
                    op: PredicateOp::ContainsFold(fold(crop)),
                },
                state_equals(state),
                year_between(min_year, max_year),
            ],
            group_by: "year".to_string(),
            aggregate: Aggregate {
                op: AggregateOp::Sum,
                column: "production_mt".to_string(),
                alias: "total_prod".to_string(),
            },
            order_by: Some(OrderBy {
                target: OrderTarget::GroupKey,
                direction: Direction::Ascending,
            }),
            limit: None,
        };
        let rainfall = QuerySpec {
            relation: Relation::Rain,
            filters: vec![state_equals(state), year_between(min_year, max_year)],
            group_by: "year".to_string(),
            aggregate: Aggregate {
                op: AggregateOp::Avg,
                column: "annual".to_string(),
                alias: "avg_rain".to_string(),
            },
            order_by: Some(OrderBy {
                target: OrderTarget::GroupKey,
                direction: Direction::Ascending,
            }),
            limit: None,
        };
        Ok(QueryPlan::Trend {
            production,
            rainfall,
            crop: title_case(crop),
            state: title_case(state),
            years: (min_year, max_year),
        })
    }

    fn build_compare_rain(
        &self,
        state_a: &str,
        state_b: &str,
        window: Option<u32>,
    ) -> Result<QueryPlan, EngineError> {
        let mut filters = vec![Predicate {
            column: "state".to_string(),
            op: PredicateOp::InFold(vec![fold(state_a), fold(state_b)]),
        }];
        if let Some(window) = window {
            ensure_positive(window, "window_years")?;
            let max_year = self.store.max_year(Relation::Rain).ok_or_else(|| {
                EngineError::no_data("no rainfall rows to resolve the year window against")
            })?;
            filters.push(year_between(max_year - i64::from(window) + 1, max_year));
        }
        let spec = QuerySpec {
            relation: Relation::Rain,
            filters,
            group_by: "state".to_string(),
            aggregate: Aggregate {
                op: AggregateOp::Avg,
                column: "annual".to_string(),
                alias: "avg_rain".to_string(),
            },
            // no explicit ordering; the executor's group-key order is stable
            order_by: None,
            limit: None,
        };
        Ok(QueryPlan::CompareRain {
            spec,
            state_a: title_case(state_a),
            state_b: title_case(state_b),
        })
    }

    fn build_rain_trend(&self, state: &str, window: u32) -> Result<QueryPlan, EngineError> {
        ensure_positive(window, "window_years")?;
        let max_year = self.store.max_year(Relation::Rain).ok_or_else(|| {
            EngineError::no_data("no rainfall rows to resolve the year window against")
        })?;
        let min_year = max_year - i64::from(window) + 1;
        let spec = QuerySpec {
            relation: Relation::Rain,
            filters: vec![state_equals(state), year_between(min_year, max_year)],
            group_by: "year".to_string(),
            aggregate: Aggregate {
                op: AggregateOp::Avg,
                column: "annual".to_string(),
                alias: "avg_rain".to_string(),
            },
            order_by: Some(OrderBy {
                target: OrderTarget::GroupKey,
                direction: Direction::Ascending,
            }),
            limit: None,
        };
        Ok(QueryPlan::RainTrend {
            spec,
            state: title_case(state),
            years: (min_year, max_year),
        })
    }
}

fn state_equals(state: &str) -> Predicate {
    Predicate {
        column: "state".to_string(),
        op: PredicateOp::EqualsFold(fold(state)),
    }
}

fn year_between(min_year: i64, max_year: i64) -> Predicate {
    Predicate {
        column: "year".to_string(),
        op: PredicateOp::IntBetween(min_year, max_year),
    }
}

fn ensure_positive(n: u32, name: &str) -> Result<(), EngineError> {
    if n == 0 {
        Err(EngineError::invalid_parameter(format!(
            "{name} must be a positive integer"
        )))
    } else {
        Ok(())
    }
}

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Title-case a name for display: first letter of each word upper-cased
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{build_crop_table, build_rain_table, CropRow, RainRow};
    use crate::intent::Intent;

    fn store_with_years(crop_years: &[i64], rain_years: &[i64]) -> TabularStore {
        let crop_rows: Vec<CropRow> = crop_years
            .iter()
            .map(|y| CropRow {
                state: Some("Punjab".to_string()),
                district: Some("Amritsar".to_string()),
                crop: Some("Wheat".to_string()),
                production_mt: Some(1.0),
                year: Some(*y),
            })
            .collect();
        let rain_rows: Vec<RainRow> = rain_years
            .iter()
            .map(|y| RainRow {
                state: Some("Punjab".to_string()),
                year: Some(*y),
                annual: Some(100.0),
                ..Default::default()
            })
            .collect();
        TabularStore::new(build_crop_table(&crop_rows), build_rain_table(&rain_rows)).unwrap()
    }

    #[test]
    fn trend_window_anchors_on_overall_max_year() {
        let store = store_with_years(&[2019, 2020], &[2021, 2022]);
        let intent = Intent::Trend {
            crop: "wheat".to_string(),
            state: "punjab".to_string(),
            window_years: 3,
        };
        let plan = PlanBuilder::new(&store).build(&intent).unwrap();
        match plan {
            QueryPlan::Trend { years, .. } => assert_eq!(years, (2020, 2022)),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn trend_with_no_rows_is_no_data() {
        let store = store_with_years(&[], &[]);
        let intent = Intent::Trend {
            crop: "wheat".to_string(),
            state: "punjab".to_string(),
            window_years: 3,
        };
        let err = PlanBuilder::new(&store).build(&intent).unwrap_err();
        assert!(matches!(err, EngineError::NoDataAvailable { .. }));
    }

    #[test]
    fn rain_trend_window_uses_rain_years_only() {
        let store = store_with_years(&[2025], &[2020, 2021]);
        let intent = Intent::RainTrend {
            state: "punjab".to_string(),
            window_years: 2,
        };
        let plan = PlanBuilder::new(&store).build(&intent).unwrap();
        match plan {
            QueryPlan::RainTrend { years, .. } => assert_eq!(years, (2020, 2021)),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn compare_rain_without_window_needs_no_year_bounds() {
        let store = store_with_years(&[], &[]);
        let intent = Intent::CompareRain {
            state_a: "kerala".to_string(),
            state_b: "karnataka".to_string(),
            window_years: None,
        };
        assert!(PlanBuilder::new(&store).build(&intent).is_ok());
    }

    #[test]
    fn display_names_are_title_cased() {
        let store = store_with_years(&[2020], &[2020]);
        let intent = Intent::TopCrops {
            n: 3,
            state: "himachal pradesh".to_string(),
        };
        match PlanBuilder::new(&store).build(&intent).unwrap() {
            QueryPlan::TopCrops { state, .. } => assert_eq!(state, "Himachal Pradesh"),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn title_case_handles_mixed_input() {
        assert_eq!(title_case("himachal  pradesh"), "Himachal Pradesh");
        assert_eq!(title_case("wheat"), "Wheat");
        assert_eq!(title_case(""), "");
    }
}
