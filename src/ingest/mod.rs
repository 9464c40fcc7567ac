//! Sensor CSV ingestion for the boiler telemetry hub.
//!
//! This module turns a raw sensor table into a well-typed row set:
//! - Numeric coercion of cell text into finite numbers or a NaN sentinel
//! - CSV loading with a designated time column and a demo-data fallback

pub mod coerce;
pub mod loader;

// Re-export commonly used items
pub use coerce::{coerce_number, parse_instant};
pub use loader::{demo_table, load_or_demo, load_table, LoadError, LoadOptions, LoadedTable, Row};
