use serde::{Deserialize, Serialize};

use crate::storage::store::Relation;

/// A bound filter predicate: column name plus an operation carrying its
/// value(s). Predicates are never rendered to a query string, so there is no
/// escaping and no injection surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub op: PredicateOp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOp {
    /// Case-insensitive equality against a lower-cased bound value
    EqualsFold(String),

    /// Case-insensitive substring containment
    ContainsFold(String),

    /// Case-insensitive membership in a lower-cased bound set
    InFold(Vec<String>),

    /// Inclusive integer range
    IntBetween(i64, i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    Sum,
    Avg,
}

/// The single aggregate a spec computes, and the output column it lands in
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub op: AggregateOp,
    pub column: String,
    pub alias: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTarget {
    GroupKey,
    Aggregate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub target: OrderTarget,
    pub direction: Direction,
}

/// One declarative aggregate query over a single relation: filter, group,
/// aggregate, order, limit. Purely a function of the intent and the store's
/// year bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub relation: Relation,
    pub filters: Vec<Predicate>,
    pub group_by: String,
    pub aggregate: Aggregate,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

/// The resolved plan for one question: machine specs plus the
/// human-presentable parameters the answer synthesizer needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum QueryPlan {
    TopCrops {
        spec: QuerySpec,
        n: u32,
        state: String,
    },
    /// Two coupled specs over the same year window so the synthesizer can
    /// join the series
    Trend {
        production: QuerySpec,
        rainfall: QuerySpec,
        crop: String,
        state: String,
        years: (i64, i64),
    },
    CompareRain {
        spec: QuerySpec,
        state_a: String,
        state_b: String,
    },
    RainTrend {
        spec: QuerySpec,
        state: String,
        years: (i64, i64),
    },
}
