//! Per-feature series construction and the shared series store.
//!
//! A series holds only finite values, ascending by instant (duplicates
//! allowed, inversions forbidden). Both invariants are established at
//! construction time; consumers never re-sort or re-filter.

use crate::ingest::loader::LoadedTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One observation: an instant and a finite value.
///
/// Serialized as `{"t": ..., "v": ...}`, the wire shape the dashboard
/// front-end consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub t: DateTime<Utc>,
    pub v: f64,
}

/// Mapping from feature name to its ordered series, built once per load and
/// replaced wholesale on reload. The live tick merger is the only mutation
/// path besides replacement.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    columns: Vec<String>,
    series: HashMap<String, Vec<SeriesPoint>>,
    real_data: bool,
    rows_loaded: usize,
    rows_dropped: usize,
}

/// Shared handle to the current store snapshot. Readers take the read lock;
/// a tick append or a reload takes the write lock, so a reader sees the
/// store either before or after a mutation, never mid-append.
pub type SharedStore = Arc<RwLock<FeatureStore>>;

impl FeatureStore {
    /// Project a loaded table into one series per feature column.
    ///
    /// Rows whose coerced value is the NaN sentinel are omitted from that
    /// feature's series only, so series lengths may differ across features
    /// of the same row set.
    pub fn from_table(table: &LoadedTable) -> Self {
        let mut series = HashMap::with_capacity(table.columns.len());
        for (index, column) in table.columns.iter().enumerate() {
            let mut points: Vec<SeriesPoint> = table
                .rows
                .iter()
                .filter_map(|row| {
                    let v = *row.values.get(index)?;
                    v.is_finite().then_some(SeriesPoint { t: row.t, v })
                })
                .collect();
            // Stable sort: duplicate instants keep their source order.
            points.sort_by_key(|p| p.t);
            series.insert(column.clone(), points);
        }

        Self {
            columns: table.columns.clone(),
            series,
            real_data: table.real_data,
            rows_loaded: table.rows.len(),
            rows_dropped: table.rows_dropped,
        }
    }

    /// Wrap the store in a shared handle.
    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Feature names in catalog (header) order.
    pub fn features(&self) -> &[String] {
        &self.columns
    }

    /// The series for one feature, or `None` for an unknown feature.
    pub fn series(&self, feature: &str) -> Option<&[SeriesPoint]> {
        self.series.get(feature).map(|s| s.as_slice())
    }

    /// The maximum instant present across all series: the fallback anchor
    /// for range queries against historical data.
    pub fn latest_instant(&self) -> Option<DateTime<Utc>> {
        self.series
            .values()
            .filter_map(|points| points.last().map(|p| p.t))
            .max()
    }

    /// Append a live point to a feature's series.
    ///
    /// Returns false (no mutation) for an unknown feature or a non-finite
    /// value. History is never rewritten, only extended.
    pub fn append(&mut self, feature: &str, point: SeriesPoint) -> bool {
        if !point.v.is_finite() {
            return false;
        }
        match self.series.get_mut(feature) {
            Some(points) => {
                points.push(point);
                true
            }
            None => false,
        }
    }

    /// Whether the store holds real source data (vs the demo fallback).
    pub fn real_data(&self) -> bool {
        self.real_data
    }

    /// Usable rows in the load this store was built from.
    pub fn rows_loaded(&self) -> usize {
        self.rows_loaded
    }

    /// Rows dropped during that load for a missing/unparseable time.
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped
    }
}
