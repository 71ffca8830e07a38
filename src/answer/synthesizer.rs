//! Deterministic narrative synthesis: result tables plus resolved intent
//! parameters in, narrative text plus a display table out. No free-form
//! generation, no randomness.

use std::collections::{BTreeSet, HashMap};

use crate::answer::stats::pearson;
use crate::answer::Answer;
use crate::execution::result::{ResultTable, Value};

/// Heading plus one bullet per crop, in the descending order received
pub fn top_crops(state: &str, n: u32, result: ResultTable) -> Answer {
    if result.is_empty() {
        return Answer {
            narrative: format!("No crop data for {state}."),
            table: None,
        };
    }
    let mut lines = vec![format!("### Top {n} Crops in {state}")];
    for row in &result.rows {
        match row[1].as_f64() {
            Some(total) => lines.push(format!("- {} — {} t", row[0], total as i64)),
            None => lines.push(format!("- {} — no recorded production", row[0])),
        }
    }
    Answer {
        narrative: lines.join("\n"),
        table: Some(result),
    }
}

/// Join the production and rainfall series on year and report their
/// correlation; an undefined coefficient renders as "N/A"
pub fn trend(
    crop: &str,
    state: &str,
    years: (i64, i64),
    production: ResultTable,
    rainfall: ResultTable,
) -> Answer {
    let joined = join_on_year(&production, &rainfall);
    let pairs: Vec<(f64, f64)> = joined
        .rows
        .iter()
        .filter_map(|row| Some((row[1].as_f64()?, row[2].as_f64()?)))
        .collect();
    let correlation = match pearson(&pairs) {
        Some(c) => format!("{c:.2}"),
        None => "N/A".to_string(),
    };

    let mut narrative = format!(
        "### Trend: {crop} in {state}\nYears: {}-{}\nCorrelation (production vs rainfall): {correlation}",
        years.0, years.1
    );
    if joined.is_empty() {
        narrative.push_str("\nNo overlapping data points found for that period.");
    }
    Answer {
        narrative,
        table: Some(joined),
    }
}

/// One bullet per state with the average rounded to one decimal place
pub fn compare_rain(state_a: &str, state_b: &str, result: ResultTable) -> Answer {
    if result.is_empty() {
        return Answer {
            narrative: "No rainfall data found for those states.".to_string(),
            table: None,
        };
    }
    let mut lines = vec![format!("### Rainfall Comparison: {state_a} vs {state_b}")];
    for row in &result.rows {
        match row[1].as_f64() {
            Some(avg) => lines.push(format!(
                "- {} — {avg:.1} mm (avg across available years)",
                row[0]
            )),
            None => lines.push(format!("- {} — no recorded rainfall", row[0])),
        }
    }
    Answer {
        narrative: lines.join("\n"),
        table: Some(result),
    }
}

/// Heading naming the state and resolved window; table is the per-year series
pub fn rain_trend(state: &str, years: (i64, i64), result: ResultTable) -> Answer {
    if result.is_empty() {
        return Answer {
            narrative: format!(
                "No rainfall data for {state} between {} and {}.",
                years.0, years.1
            ),
            table: None,
        };
    }
    Answer {
        narrative: format!("### Rainfall Trend: {state}\nYears: {}-{}", years.0, years.1),
        table: Some(result),
    }
}

/// Fixed help text listing the supported question shapes
pub fn unknown() -> Answer {
    Answer {
        narrative: "I couldn't interpret that question. Supported questions:\n\
             - Top 5 crops in Himachal Pradesh\n\
             - Trend of wheat over last 5 years in Himachal Pradesh\n\
             - Compare rainfall between Maharashtra and Karnataka\n\
             - Trend of rainfall in Kerala for last 5 years"
            .to_string(),
        table: None,
    }
}

/// Full outer join of two year-keyed series, ascending by year. A year
/// missing from either side carries Null for that side.
fn join_on_year(production: &ResultTable, rainfall: &ResultTable) -> ResultTable {
    let mut years: BTreeSet<i64> = BTreeSet::new();
    let mut production_by_year: HashMap<i64, Value> = HashMap::new();
    let mut rainfall_by_year: HashMap<i64, Value> = HashMap::new();
    for row in &production.rows {
        if let Some(year) = row[0].as_i64() {
            years.insert(year);
            production_by_year.insert(year, row[1].clone());
        }
    }
    for row in &rainfall.rows {
        if let Some(year) = row[0].as_i64() {
            years.insert(year);
            rainfall_by_year.insert(year, row[1].clone());
        }
    }

    let mut joined = ResultTable::new(vec![
        "year".to_string(),
        "total_prod".to_string(),
        "avg_rain".to_string(),
    ]);
    for year in years {
        joined.rows.push(vec![
            Value::Int(year),
            production_by_year.get(&year).cloned().unwrap_or(Value::Null),
            rainfall_by_year.get(&year).cloned().unwrap_or(Value::Null),
        ]);
    }
    joined
}
