//! Core series pipeline for the boiler telemetry hub.
//!
//! This module contains:
//! - Per-feature series construction from a loaded table
//! - Range-relative window slicing with fallback-anchor logic
//! - Summary statistics over any series slice

pub mod range;
pub mod series;
pub mod stats;

// Re-export commonly used types
pub use range::{slice_by_range, RangeError, RangeSlice, TimeRange, UnknownRangePolicy};
pub use series::{FeatureStore, SeriesPoint, SharedStore};
pub use stats::{stats_of, SeriesStats};
