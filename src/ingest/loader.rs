//! CSV loading with a designated time column and a demo-data fallback.
//!
//! The loader reads the full table, coerces every non-time cell, and
//! returns the ordered row set plus the column catalog (header order minus
//! the time column). Rows without a parseable time are dropped and counted;
//! a load with zero usable rows still succeeds.
//!
//! When no readable source exists, `load_or_demo` substitutes a synthetic
//! table generated from deterministic periodic functions so the hub always
//! has something to serve. The substitution is flagged via
//! `LoadedTable::real_data`, never inferred from data shape.

use crate::ingest::coerce::{coerce_number, parse_instant};
use chrono::{DateTime, Duration, Local, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One usable record: a parsed instant plus coerced values, parallel to the
/// table's column catalog. Non-numeric cells are carried as NaN sentinels
/// until series construction.
#[derive(Debug, Clone)]
pub struct Row {
    pub t: DateTime<Utc>,
    pub values: Vec<f64>,
}

/// Result of a load: the row set, the column catalog, and provenance.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Feature columns in header order, minus the time column.
    pub columns: Vec<String>,
    /// Usable rows in source order.
    pub rows: Vec<Row>,
    /// False when the table is the synthetic demo fallback.
    pub real_data: bool,
    /// Rows dropped for a missing or unparseable time cell.
    pub rows_dropped: usize,
}

/// Options controlling a load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Name of the designated time column.
    pub time_column: String,
    /// Restrict the table to the local calendar day of the first row.
    /// A bounding policy for dense high-frequency exports, off by default.
    pub first_day_only: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            time_column: "Time".to_string(),
            first_day_only: false,
        }
    }
}

/// Errors from a strict load. `load_or_demo` recovers from all of these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv read error: {0}")]
    Csv(#[from] csv::Error),
    #[error("time column {0:?} not found in header")]
    MissingTimeColumn(String),
}

/// Load a sensor CSV from `path`.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<LoadedTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let time_index = headers
        .iter()
        .position(|h| h == options.time_column)
        .ok_or_else(|| LoadError::MissingTimeColumn(options.time_column.clone()))?;

    let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
    let mut value_indices = Vec::with_capacity(headers.len().saturating_sub(1));
    for (i, name) in headers.iter().enumerate() {
        if i != time_index {
            columns.push(name.to_string());
            value_indices.push(i);
        }
    }

    let mut rows = Vec::new();
    let mut rows_dropped = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                rows_dropped += 1;
                continue;
            }
        };

        let Some(t) = record.get(time_index).and_then(parse_instant) else {
            rows_dropped += 1;
            continue;
        };

        let values = value_indices
            .iter()
            .map(|&i| coerce_number(record.get(i)))
            .collect();
        rows.push(Row { t, values });
    }

    if options.first_day_only {
        restrict_to_first_day(&mut rows);
    }

    if rows_dropped > 0 {
        tracing::warn!(
            path = %path.display(),
            rows_dropped,
            "dropped rows with missing or unparseable time"
        );
    }

    Ok(LoadedTable {
        columns,
        rows,
        real_data: true,
        rows_dropped,
    })
}

/// Keep only rows sharing the local calendar date of the first row.
fn restrict_to_first_day(rows: &mut Vec<Row>) {
    let Some(first) = rows.first() else {
        return;
    };
    let first_day = first.t.with_timezone(&Local).date_naive();
    rows.retain(|r| r.t.with_timezone(&Local).date_naive() == first_day);
}

/// Try each candidate path in order; fall back to the demo table when none
/// is readable. The fallback is logged and flagged, never silent.
pub fn load_or_demo(candidates: &[PathBuf], options: &LoadOptions) -> LoadedTable {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_table(path, options) {
            Ok(table) => {
                tracing::info!(
                    path = %path.display(),
                    rows = table.rows.len(),
                    features = table.columns.len(),
                    "loaded sensor csv"
                );
                return table;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable csv");
            }
        }
    }

    tracing::warn!("no readable sensor csv found; serving demo data");
    demo_table(Utc::now())
}

/// Feature columns of the synthetic demo table.
pub const DEMO_FEATURES: &[&str] = &[
    "MAIN STEAM PRESSURE",
    "MAIN STEAM TEMPERATURE",
    "TOTAL AIR FLOW ACTUAL",
    "BOILER BANK GAS OUTLET OXYGEN",
    "STACK TEMPERATOR",
    "FURNACE PRESSURE BOILER 11",
];

/// Build the synthetic demo table: 60 rows, one per minute ending at `now`,
/// each value a deterministic periodic function of the row index.
pub fn demo_table(now: DateTime<Utc>) -> LoadedTable {
    let rows = (0i64..60)
        .map(|i| {
            let x = i as f64;
            Row {
                t: now - Duration::minutes(59 - i),
                values: vec![
                    50.0 + (x / 6.0).sin() * 5.0,
                    480.0 + (x / 8.0).cos() * 10.0,
                    60.0 + (x / 7.0).sin() * 8.0,
                    3.0 + (x / 9.0).cos() * 0.5,
                    160.0 + (x / 5.0).sin() * 6.0,
                    (x / 10.0).cos() * 2.0,
                ],
            }
        })
        .collect();

    LoadedTable {
        columns: DEMO_FEATURES.iter().map(|s| s.to_string()).collect(),
        rows,
        real_data: false,
        rows_dropped: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("boilerhub-loader-{name}.csv"));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_basic_table() {
        let path = write_temp_csv(
            "basic",
            "Time,MAIN STEAM PRESSURE,STACK TEMPERATOR\n\
             2024-01-01T00:00:00Z,\"50,0\",160\n\
             2024-01-01T00:30:00Z,55,161\n\
             2024-01-01T01:00:00Z,bad,162\n",
        );

        let table = load_table(&path, &LoadOptions::default()).unwrap();
        assert_eq!(
            table.columns,
            vec!["MAIN STEAM PRESSURE", "STACK TEMPERATOR"]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows_dropped, 0);
        assert!(table.real_data);

        // Coerced values: finite where parseable, NaN sentinel otherwise.
        assert_eq!(table.rows[0].values[0], 50.0);
        assert_eq!(table.rows[1].values[0], 55.0);
        assert!(table.rows[2].values[0].is_nan());
        assert_eq!(table.rows[2].values[1], 162.0);
    }

    #[test]
    fn test_malformed_rows_dropped_and_counted() {
        let path = write_temp_csv(
            "malformed",
            "Time,P\n\
             2024-01-01T00:00:00Z,1\n\
             not-a-time,2\n\
             ,3\n\
             2024-01-01T00:02:00Z,4\n",
        );

        let table = load_table(&path, &LoadOptions::default()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows_dropped, 2);
    }

    #[test]
    fn test_zero_usable_rows_still_succeeds() {
        let path = write_temp_csv("empty", "Time,P\n");
        let table = load_table(&path, &LoadOptions::default()).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.columns, vec!["P"]);
    }

    #[test]
    fn test_missing_time_column_is_an_error() {
        let path = write_temp_csv("no-time", "Stamp,P\n2024-01-01T00:00:00Z,1\n");
        let err = load_table(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingTimeColumn(_)));
    }

    #[test]
    fn test_first_day_only_restriction() {
        let path = write_temp_csv(
            "first-day",
            "Time,P\n\
             2024-01-01T12:00:00Z,1\n\
             2024-01-01T12:05:00Z,2\n\
             2024-01-04T12:00:00Z,3\n",
        );

        let options = LoadOptions {
            first_day_only: true,
            ..LoadOptions::default()
        };
        let table = load_table(&path, &options).unwrap();
        // The third row is on a later calendar day regardless of timezone.
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_load_or_demo_falls_back() {
        let missing = PathBuf::from("/nonexistent/boilerhub/data.csv");
        let table = load_or_demo(&[missing], &LoadOptions::default());
        assert!(!table.real_data);
        assert_eq!(table.rows.len(), 60);
        assert_eq!(table.columns.len(), DEMO_FEATURES.len());
    }

    #[test]
    fn test_demo_table_is_deterministic() {
        let now = Utc::now();
        let a = demo_table(now);
        let b = demo_table(now);
        assert_eq!(a.rows[0].values, b.rows[0].values);
        assert_eq!(a.rows[59].values, b.rows[59].values);
        // One row per minute, ending at `now`.
        assert_eq!(a.rows[59].t, now);
        assert_eq!(a.rows[0].t, now - Duration::minutes(59));
    }
}
