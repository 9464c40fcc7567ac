//! Live tick merging for real-time mode.
//!
//! At most one feature subscription is active at a time. Inbound ticks for
//! any other feature are discarded, never appended, so there is no
//! cross-feature leakage. Changing the selected feature re-subscribes in a
//! single step; there is no window where both or neither feature is active.

pub mod ticker;

pub use ticker::{run_ticker, TickerConfig};

use crate::core::series::{SeriesPoint, SharedStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One streamed real-time observation for a single feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub feature: String,
    pub t: DateTime<Utc>,
    pub v: f64,
}

/// What happened to an inbound tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Appended to the subscribed feature's series.
    Applied,
    /// No subscription is active; the tick was discarded.
    NotSubscribed,
    /// The tick's feature does not match the subscription.
    FeatureMismatch,
    /// The tick's value is not finite; series never hold non-finite values.
    NonFinite,
    /// The subscribed feature is not in the store's catalog.
    UnknownFeature,
}

/// Applies subscribed ticks to the shared series store.
pub struct TickMerger {
    store: SharedStore,
    subscription: Option<String>,
}

impl TickMerger {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            subscription: None,
        }
    }

    /// Subscribe to `feature`, atomically replacing any prior subscription.
    pub fn subscribe(&mut self, feature: impl Into<String>) {
        self.subscription = Some(feature.into());
    }

    /// Drop the active subscription. Subsequent ticks are discarded.
    pub fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    /// The currently subscribed feature, if any.
    pub fn subscribed(&self) -> Option<&str> {
        self.subscription.as_deref()
    }

    /// Apply one inbound tick. The append is a single observable mutation:
    /// readers see the series before or after it, never a partial point.
    pub async fn apply(&self, tick: &Tick) -> TickOutcome {
        let Some(current) = self.subscription.as_deref() else {
            return TickOutcome::NotSubscribed;
        };
        if tick.feature != current {
            return TickOutcome::FeatureMismatch;
        }
        if !tick.v.is_finite() {
            return TickOutcome::NonFinite;
        }

        let mut store = self.store.write().await;
        if store.append(&tick.feature, SeriesPoint { t: tick.t, v: tick.v }) {
            TickOutcome::Applied
        } else {
            TickOutcome::UnknownFeature
        }
    }
}

/// Commands for a channel-driven merger task.
#[derive(Debug)]
pub enum MergerCommand {
    Subscribe(String),
    Unsubscribe,
    Tick(Tick),
    Shutdown,
}

/// Spawn a merger task owning the subscription state.
///
/// Dropping the sender (or sending `Shutdown`) stops the task; no tick sent
/// after that point can mutate the store.
pub fn spawn_merger(store: SharedStore) -> (mpsc::Sender<MergerCommand>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(64);
    let handle = tokio::spawn(async move {
        let mut merger = TickMerger::new(store);
        while let Some(command) = rx.recv().await {
            match command {
                MergerCommand::Subscribe(feature) => merger.subscribe(feature),
                MergerCommand::Unsubscribe => merger.unsubscribe(),
                MergerCommand::Tick(tick) => {
                    let outcome = merger.apply(&tick).await;
                    if outcome != TickOutcome::Applied {
                        tracing::trace!(feature = %tick.feature, ?outcome, "tick discarded");
                    }
                }
                MergerCommand::Shutdown => break,
            }
        }
    });
    (tx, handle)
}
