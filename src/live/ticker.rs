//! Simulated tick feed.
//!
//! A random walk over the selected feature, emitted at irregular intervals
//! on the order of seconds. Best-effort: if the consumer goes away the
//! ticker stops, it never buffers against a dead receiver.

use crate::live::Tick;
use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::mpsc;

/// Tick feed tuning. Intervals are configurable so tests can run fast.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    pub min_interval: Duration,
    pub max_interval: Duration,
    /// Maximum absolute step of the random walk per tick.
    pub amplitude: f64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(4),
            amplitude: 1.5,
        }
    }
}

/// One random-walk step around the previous value.
fn random_step(value: f64, amplitude: f64, rng: &mut impl Rng) -> f64 {
    value + (rng.random::<f64>() - 0.5) * amplitude
}

/// Emit ticks for `feature` starting from `start` until the receiver is
/// dropped (or the task is aborted).
pub async fn run_ticker(feature: String, start: f64, config: TickerConfig, tx: mpsc::Sender<Tick>) {
    let mut rng = StdRng::from_os_rng();
    let mut value = start;
    let min_ms = config.min_interval.as_millis() as u64;
    let max_ms = config.max_interval.as_millis().max(config.min_interval.as_millis()) as u64;

    loop {
        let wait = rng.random_range(min_ms..=max_ms);
        tokio::time::sleep(Duration::from_millis(wait)).await;

        value = random_step(value, config.amplitude, &mut rng);
        let tick = Tick {
            feature: feature.clone(),
            t: Utc::now(),
            v: value,
        };
        if tx.send(tick).await.is_err() {
            break;
        }
    }
}
