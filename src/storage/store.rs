use std::collections::BTreeSet;

use arrow::array::Array;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::storage::columnar::Table;

/// Columns every crop relation must carry
pub const REQUIRED_CROP_COLUMNS: &[&str] = &["state", "district", "crop", "production_mt", "year"];

/// Columns every rainfall relation must carry (monthly columns exist but only these are required)
pub const REQUIRED_RAIN_COLUMNS: &[&str] = &["state", "year", "annual"];

/// Which relation a query spec reads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Crop,
    Rain,
}

/// The two loaded relations, shared read-only for the life of the process.
/// Year extremes are cached at construction so window resolution never
/// rescans the store.
pub struct TabularStore {
    crop: Table,
    rain: Table,
    crop_max_year: Option<i64>,
    rain_max_year: Option<i64>,
}

/// Row counts and distinct states per relation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreStatus {
    pub crop_rows: usize,
    pub rain_rows: usize,
    pub crop_states: Vec<String>,
    pub rain_states: Vec<String>,
}

impl TabularStore {
    /// Validate the two relations and cache their year extremes.
    pub fn new(crop: Table, rain: Table) -> Result<Self, EngineError> {
        check_columns(&crop, REQUIRED_CROP_COLUMNS, "crop")?;
        check_columns(&rain, REQUIRED_RAIN_COLUMNS, "rainfall")?;

        let crop_max_year = max_year(&crop)?;
        let rain_max_year = max_year(&rain)?;
        debug!(
            crop_rows = crop.row_count,
            rain_rows = rain.row_count,
            ?crop_max_year,
            ?rain_max_year,
            "tabular store ready"
        );

        Ok(Self {
            crop,
            rain,
            crop_max_year,
            rain_max_year,
        })
    }

    pub fn relation(&self, relation: Relation) -> &Table {
        match relation {
            Relation::Crop => &self.crop,
            Relation::Rain => &self.rain,
        }
    }

    /// Maximum year present in a relation, if it has any rows with a year
    pub fn max_year(&self, relation: Relation) -> Option<i64> {
        match relation {
            Relation::Crop => self.crop_max_year,
            Relation::Rain => self.rain_max_year,
        }
    }

    /// Row counts and distinct states, for status reporting
    pub fn status(&self) -> StoreStatus {
        StoreStatus {
            crop_rows: self.crop.row_count,
            rain_rows: self.rain.row_count,
            crop_states: distinct_states(&self.crop),
            rain_states: distinct_states(&self.rain),
        }
    }
}

fn check_columns(table: &Table, required: &[&str], label: &str) -> Result<(), EngineError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !table.has_column(name))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EngineError::ingestion(
            format!("the {label} table is missing columns: {missing:?}"),
            None,
        ))
    }
}

fn max_year(table: &Table) -> Result<Option<i64>, EngineError> {
    let years = table.i64_column("year")?;
    let mut max = None;
    for i in 0..years.len() {
        if years.is_null(i) {
            continue;
        }
        let y = years.value(i);
        max = Some(max.map_or(y, |m: i64| m.max(y)));
    }
    Ok(max)
}

fn distinct_states(table: &Table) -> Vec<String> {
    let mut states = BTreeSet::new();
    if let Ok(col) = table.str_column("state") {
        for i in 0..col.len() {
            if !col.is_null(i) {
                states.insert(col.value(i).to_string());
            }
        }
    }
    states.into_iter().collect()
}
