//! Dataset ingestion: typed rows, lenient numeric coercion, CSV loading.
//!
//! Numeric fields that fail to parse become absent rather than errors; rows
//! missing a `state` or `year` key are dropped when the arrow table is built.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::storage::columnar::Table;

/// Monthly rainfall columns, in calendar order
pub const MONTH_COLUMNS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Seasonal rainfall aggregate columns
pub const SEASON_COLUMNS: &[&str] = &["jf", "mam", "jjas", "ond"];

/// One crop production record; absent values survive until the table build
#[derive(Clone, Debug, Default)]
pub struct CropRow {
    pub state: Option<String>,
    pub district: Option<String>,
    pub crop: Option<String>,
    pub production_mt: Option<f64>,
    pub year: Option<i64>,
}

/// One rainfall record: monthly values in calendar order, then the annual
/// total and the four seasonal aggregates
#[derive(Clone, Debug, Default)]
pub struct RainRow {
    pub state: Option<String>,
    pub year: Option<i64>,
    pub months: [Option<f64>; 12],
    pub annual: Option<f64>,
    pub seasons: [Option<f64>; 4],
}

/// Build the crop relation, dropping rows without a state or year
pub fn build_crop_table(rows: &[CropRow]) -> Table {
    let kept: Vec<&CropRow> = rows
        .iter()
        .filter(|r| r.state.is_some() && r.year.is_some())
        .collect();
    if kept.len() < rows.len() {
        warn!(
            dropped = rows.len() - kept.len(),
            "dropped crop rows missing state or year"
        );
    }

    let state: StringArray = kept.iter().map(|r| normalized(&r.state)).collect();
    let district: StringArray = kept.iter().map(|r| normalized(&r.district)).collect();
    let crop: StringArray = kept.iter().map(|r| normalized(&r.crop)).collect();
    let production: Float64Array = kept.iter().map(|r| r.production_mt).collect();
    let year: Int64Array = kept.iter().map(|r| r.year).collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("state", DataType::Utf8, true),
        Field::new("district", DataType::Utf8, true),
        Field::new("crop", DataType::Utf8, true),
        Field::new("production_mt", DataType::Float64, true),
        Field::new("year", DataType::Int64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(state),
        Arc::new(district),
        Arc::new(crop),
        Arc::new(production),
        Arc::new(year),
    ];
    Table::new(columns, schema)
}

/// Build the rainfall relation, dropping rows without a state or year
pub fn build_rain_table(rows: &[RainRow]) -> Table {
    let kept: Vec<&RainRow> = rows
        .iter()
        .filter(|r| r.state.is_some() && r.year.is_some())
        .collect();
    if kept.len() < rows.len() {
        warn!(
            dropped = rows.len() - kept.len(),
            "dropped rainfall rows missing state or year"
        );
    }

    let mut fields = vec![
        Field::new("state", DataType::Utf8, true),
        Field::new("year", DataType::Int64, true),
    ];
    let state: StringArray = kept.iter().map(|r| normalized(&r.state)).collect();
    let year: Int64Array = kept.iter().map(|r| r.year).collect();
    let mut columns: Vec<ArrayRef> = vec![Arc::new(state), Arc::new(year)];

    for (idx, name) in MONTH_COLUMNS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, true));
        let col: Float64Array = kept.iter().map(|r| r.months[idx]).collect();
        columns.push(Arc::new(col));
    }

    fields.push(Field::new("annual", DataType::Float64, true));
    let annual: Float64Array = kept.iter().map(|r| r.annual).collect();
    columns.push(Arc::new(annual));

    for (idx, name) in SEASON_COLUMNS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, true));
        let col: Float64Array = kept.iter().map(|r| r.seasons[idx]).collect();
        columns.push(Arc::new(col));
    }

    Table::new(columns, Arc::new(Schema::new(fields)))
}

/// Load the crop relation from a CSV file with the required header columns
pub fn load_crop_csv(path: &Path) -> Result<Table, EngineError> {
    let mut reader = open_csv(path, "crop")?;
    let headers = read_headers(&mut reader, path)?;
    let cols = require_columns(
        &headers,
        &["state", "district", "crop", "production_mt", "year"],
        "crop",
        path,
    )?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            EngineError::ingestion(
                format!("could not read crop record: {e}"),
                Some(path.display().to_string()),
            )
        })?;
        rows.push(CropRow {
            state: text_cell(&record, cols[0]),
            district: text_cell(&record, cols[1]),
            crop: text_cell(&record, cols[2]),
            production_mt: f64_cell(&record, cols[3]),
            year: i64_cell(&record, cols[4]),
        });
    }
    debug!(rows = rows.len(), path = %path.display(), "loaded crop csv");
    Ok(build_crop_table(&rows))
}

/// Load the rainfall relation from a CSV file. Monthly and seasonal columns
/// are optional; `state`, `year` and `annual` are required.
pub fn load_rain_csv(path: &Path) -> Result<Table, EngineError> {
    let mut reader = open_csv(path, "rainfall")?;
    let headers = read_headers(&mut reader, path)?;
    let cols = require_columns(&headers, &["state", "year", "annual"], "rainfall", path)?;
    let month_idx: Vec<Option<usize>> = MONTH_COLUMNS
        .iter()
        .map(|name| column_index(&headers, name))
        .collect();
    let season_idx: Vec<Option<usize>> = SEASON_COLUMNS
        .iter()
        .map(|name| column_index(&headers, name))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            EngineError::ingestion(
                format!("could not read rainfall record: {e}"),
                Some(path.display().to_string()),
            )
        })?;
        let mut row = RainRow {
            state: text_cell(&record, cols[0]),
            year: i64_cell(&record, cols[1]),
            annual: f64_cell(&record, cols[2]),
            ..Default::default()
        };
        for (slot, idx) in row.months.iter_mut().zip(&month_idx) {
            if let Some(idx) = idx {
                *slot = f64_cell(&record, *idx);
            }
        }
        for (slot, idx) in row.seasons.iter_mut().zip(&season_idx) {
            if let Some(idx) = idx {
                *slot = f64_cell(&record, *idx);
            }
        }
        rows.push(row);
    }
    debug!(rows = rows.len(), path = %path.display(), "loaded rainfall csv");
    Ok(build_rain_table(&rows))
}

fn open_csv(path: &Path, label: &str) -> Result<csv::Reader<std::fs::File>, EngineError> {
    csv::Reader::from_path(path).map_err(|e| {
        EngineError::ingestion(
            format!("could not read {label} data: {e}"),
            Some(path.display().to_string()),
        )
    })
}

fn read_headers(
    reader: &mut csv::Reader<std::fs::File>,
    path: &Path,
) -> Result<StringRecord, EngineError> {
    reader
        .headers()
        .map(|h| h.clone())
        .map_err(|e| {
            EngineError::ingestion(
                format!("could not read header row: {e}"),
                Some(path.display().to_string()),
            )
        })
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn require_columns(
    headers: &StringRecord,
    required: &[&str],
    label: &str,
    path: &Path,
) -> Result<Vec<usize>, EngineError> {
    let mut indexes = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match column_index(headers, name) {
            Some(idx) => indexes.push(idx),
            None => missing.push(*name),
        }
    }
    if missing.is_empty() {
        Ok(indexes)
    } else {
        Err(EngineError::ingestion(
            format!("the {label} file is missing columns: {missing:?}"),
            Some(path.display().to_string()),
        ))
    }
}

fn text_cell(record: &StringRecord, idx: usize) -> Option<String> {
    let value = record.get(idx)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn f64_cell(record: &StringRecord, idx: usize) -> Option<f64> {
    record.get(idx)?.trim().parse::<f64>().ok()
}

/// Integer coercion accepts float-formatted years ("2020.0")
fn i64_cell(record: &StringRecord, idx: usize) -> Option<i64> {
    f64_cell(record, idx).map(|v| v as i64)
}

fn normalized(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use std::io::Write;

    #[test]
    fn build_drops_rows_missing_keys() {
        let rows = vec![
            CropRow {
                state: Some("Punjab".to_string()),
                district: Some("Amritsar".to_string()),
                crop: Some("Wheat".to_string()),
                production_mt: Some(10.0),
                year: Some(2020),
            },
            CropRow {
                state: None,
                year: Some(2020),
                ..Default::default()
            },
            CropRow {
                state: Some("Punjab".to_string()),
                year: None,
                ..Default::default()
            },
        ];
        let table = build_crop_table(&rows);
        assert_eq!(table.row_count, 1);
    }

    #[test]
    fn build_keeps_absent_numerics_as_null() {
        let rows = vec![CropRow {
            state: Some("Punjab".to_string()),
            district: Some("Amritsar".to_string()),
            crop: Some("Wheat".to_string()),
            production_mt: None,
            year: Some(2020),
        }];
        let table = build_crop_table(&rows);
        assert!(table.f64_column("production_mt").unwrap().is_null(0));
    }

    #[test]
    fn crop_csv_coerces_and_drops() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "state,district,crop,production_mt,year").unwrap();
        writeln!(file, "Punjab,Amritsar,Wheat,10.5,2020").unwrap();
        writeln!(file, "Punjab,Amritsar,Rice,not-a-number,2020.0").unwrap();
        writeln!(file, ",Amritsar,Maize,5,2020").unwrap();
        file.flush().unwrap();

        let table = load_crop_csv(file.path()).unwrap();
        assert_eq!(table.row_count, 2);
        let production = table.f64_column("production_mt").unwrap();
        assert_eq!(production.value(0), 10.5);
        assert!(production.is_null(1));
        assert_eq!(table.i64_column("year").unwrap().value(1), 2020);
    }

    #[test]
    fn crop_csv_missing_column_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "state,district,crop,year").unwrap();
        writeln!(file, "Punjab,Amritsar,Wheat,2020").unwrap();
        file.flush().unwrap();

        let err = load_crop_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("production_mt"));
    }

    #[test]
    fn rain_csv_monthly_columns_are_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "state,year,annual").unwrap();
        writeln!(file, "Kerala,2021,3005.2").unwrap();
        file.flush().unwrap();

        let table = load_rain_csv(file.path()).unwrap();
        assert_eq!(table.row_count, 1);
        assert_eq!(table.f64_column("annual").unwrap().value(0), 3005.2);
        assert!(table.f64_column("jan").unwrap().is_null(0));
    }
}
