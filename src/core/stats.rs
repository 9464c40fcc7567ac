//! Summary statistics over a series slice.

use crate::core::series::SeriesPoint;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Min/max/mean/latest over a slice. All fields are `None` on empty input
/// so "no data" is never mistaken for "data is zero".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SeriesStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub latest: Option<f64>,
}

/// Compute stats over any series slice.
///
/// `latest` is the last point in sequence order. Series are time-ordered by
/// construction, so this coincides with the maximum-instant point.
pub fn stats_of(points: &[SeriesPoint]) -> SeriesStats {
    if points.is_empty() {
        return SeriesStats::default();
    }

    let values: Vec<f64> = points.iter().map(|p| p.v).collect();
    SeriesStats {
        min: Some(Statistics::min(&values)),
        max: Some(Statistics::max(&values)),
        mean: Some(Statistics::mean(&values)),
        latest: values.last().copied(),
    }
}
