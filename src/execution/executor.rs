use std::cmp::Ordering;
use std::collections::BTreeMap;

use arrow::array::Array;
use arrow::datatypes::DataType;
use tracing::debug;

use crate::error::EngineError;
use crate::execution::result::{ResultTable, Value};
use crate::query::plan::{
    AggregateOp, Direction, OrderTarget, Predicate, PredicateOp, QuerySpec,
};
use crate::storage::columnar::Table;
use crate::storage::store::TabularStore;

/// Executes one declarative aggregate spec against the store:
/// filter mask, group-by, sum/avg, order, limit. Values are never
/// transformed beyond what the spec states.
pub struct QueryExecutor<'a> {
    store: &'a TabularStore,
}

/// Group keys are text or integers; relation key columns are non-null by the
/// ingestion invariant, null keys in other columns are skipped.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Int(i64),
    Text(String),
}

impl GroupKey {
    fn into_value(self) -> Value {
        match self {
            GroupKey::Int(v) => Value::Int(v),
            GroupKey::Text(v) => Value::Text(v),
        }
    }
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a TabularStore) -> Self {
        Self { store }
    }

    pub fn execute(&self, spec: &QuerySpec) -> Result<ResultTable, EngineError> {
        let table = self.store.relation(spec.relation);
        let mask = filter_mask(table, &spec.filters)?;
        let keys = group_keys(table, &spec.group_by)?;
        let agg_col = table.f64_column(&spec.aggregate.column)?;

        // BTreeMap keeps group iteration in ascending key order, which is
        // the stable default when no explicit order-by is set
        let mut groups: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();
        for i in 0..table.row_count {
            if !mask[i] {
                continue;
            }
            let Some(key) = keys[i].clone() else {
                continue;
            };
            let entry = groups.entry(key).or_insert((0.0, 0));
            if !agg_col.is_null(i) {
                entry.0 += agg_col.value(i);
                entry.1 += 1;
            }
        }

        let mut rows: Vec<(GroupKey, Value)> = groups
            .into_iter()
            .map(|(key, (sum, count))| {
                // a group whose inputs are all null aggregates to Null
                let value = if count == 0 {
                    Value::Null
                } else {
                    match spec.aggregate.op {
                        AggregateOp::Sum => Value::Float(sum),
                        AggregateOp::Avg => Value::Float(sum / count as f64),
                    }
                };
                (key, value)
            })
            .collect();

        if let Some(order) = &spec.order_by {
            match order.target {
                OrderTarget::GroupKey => {
                    if order.direction == Direction::Descending {
                        rows.reverse();
                    }
                }
                OrderTarget::Aggregate => {
                    let descending = order.direction == Direction::Descending;
                    rows.sort_by(|a, b| {
                        let ord = compare_aggregates(&a.1, &b.1);
                        let ord = if descending { ord.reverse() } else { ord };
                        // ties break on the group key for deterministic answers
                        ord.then_with(|| a.0.cmp(&b.0))
                    });
                }
            }
        }
        if let Some(limit) = spec.limit {
            rows.truncate(limit);
        }
        debug!(
            relation = ?spec.relation,
            groups = rows.len(),
            "executed query spec"
        );

        let mut result = ResultTable::new(vec![spec.group_by.clone(), spec.aggregate.alias.clone()]);
        result.rows = rows
            .into_iter()
            .map(|(key, value)| vec![key.into_value(), value])
            .collect();
        Ok(result)
    }
}

/// Null aggregates order below every present value
fn compare_aggregates(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn group_keys(table: &Table, column: &str) -> Result<Vec<Option<GroupKey>>, EngineError> {
    let array = table.column_by_name(column).ok_or_else(|| {
        EngineError::execution(format!("unknown group column '{column}'"))
    })?;
    match array.data_type() {
        DataType::Utf8 => {
            let col = table.str_column(column)?;
            Ok((0..col.len())
                .map(|i| {
                    if col.is_null(i) {
                        None
                    } else {
                        Some(GroupKey::Text(col.value(i).to_string()))
                    }
                })
                .collect())
        }
        DataType::Int64 => {
            let col = table.i64_column(column)?;
            Ok((0..col.len())
                .map(|i| {
                    if col.is_null(i) {
                        None
                    } else {
                        Some(GroupKey::Int(col.value(i)))
                    }
                })
                .collect())
        }
        other => Err(EngineError::execution_with_context(
            format!("unsupported group column type {other:?}"),
            format!("column '{column}'"),
        )),
    }
}

fn filter_mask(table: &Table, filters: &[Predicate]) -> Result<Vec<bool>, EngineError> {
    let mut mask = vec![true; table.row_count];
    for predicate in filters {
        match &predicate.op {
            PredicateOp::EqualsFold(value) => {
                let col = table.str_column(&predicate.column)?;
                for (i, keep) in mask.iter_mut().enumerate() {
                    if *keep {
                        *keep = !col.is_null(i) && col.value(i).to_lowercase() == *value;
                    }
                }
            }
            PredicateOp::ContainsFold(value) => {
                let col = table.str_column(&predicate.column)?;
                for (i, keep) in mask.iter_mut().enumerate() {
                    if *keep {
                        *keep = !col.is_null(i) && col.value(i).to_lowercase().contains(value);
                    }
                }
            }
            PredicateOp::InFold(values) => {
                let col = table.str_column(&predicate.column)?;
                for (i, keep) in mask.iter_mut().enumerate() {
                    if *keep {
                        *keep = !col.is_null(i) && {
                            let cell = col.value(i).to_lowercase();
                            values.iter().any(|v| *v == cell)
                        };
                    }
                }
            }
            PredicateOp::IntBetween(min, max) => {
                let col = table.i64_column(&predicate.column)?;
                for (i, keep) in mask.iter_mut().enumerate() {
                    if *keep {
                        *keep = !col.is_null(i) && {
                            let v = col.value(i);
                            *min <= v && v <= *max
                        };
                    }
                }
            }
        }
    }
    Ok(mask)
}
