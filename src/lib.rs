//! Boilerhub - telemetry hub for an industrial boiler dashboard.
//!
//! This library ingests a time-stamped sensor CSV, exposes it as
//! per-parameter numeric series, slices those series by relative time
//! windows, and merges simulated live ticks into the same store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Boilerhub                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │ CSV Loader  │──▶│   Series    │──▶│   Range +   │        │
//! │  │ (+ demo     │   │   Builder   │   │   Stats     │        │
//! │  │  fallback)  │   │             │   │   Engine    │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │                           │                 │               │
//! │                           ▼                 ▼               │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │ Tick Feed   │──▶│ Tick Merger │   │ HTTP / WS   │        │
//! │  │ (simulated) │   │ (one sub)   │   │ Server      │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loader and builder run once per load and replace the feature store
//! wholesale; the range engine and stats are pure functions over a store
//! snapshot; the merger is the only incremental mutation path.
//!
//! # Example
//!
//! ```no_run
//! use boilerhub::core::{slice_by_range, stats_of, FeatureStore, TimeRange};
//! use boilerhub::ingest::{load_or_demo, LoadOptions};
//! use chrono::Utc;
//!
//! let table = load_or_demo(&[], &LoadOptions::default());
//! let store = FeatureStore::from_table(&table);
//!
//! let series = store.series("MAIN STEAM PRESSURE").unwrap();
//! let slice = slice_by_range(series, TimeRange::OneHour, Utc::now(), store.latest_instant());
//! let stats = stats_of(&slice.points);
//! println!("mean: {:?} (fallback anchor: {})", stats.mean, slice.used_fallback);
//! ```

pub mod chat;
pub mod config;
pub mod core;
pub mod ingest;
pub mod live;
pub mod server;
pub mod suggestions;

// Re-export key types at crate root for convenience
pub use config::Config;
pub use core::{
    slice_by_range, stats_of, FeatureStore, RangeSlice, SeriesPoint, SeriesStats, SharedStore,
    TimeRange, UnknownRangePolicy,
};
pub use ingest::{coerce_number, load_or_demo, load_table, LoadOptions, LoadedTable};
pub use live::{Tick, TickMerger, TickOutcome, TickerConfig};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
