//! Mock operator suggestions.
//!
//! A static catalog shuffled per request. Real suggestion scoring is out of
//! scope; this exists so the dashboard panels have realistic content.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Suggestion priority, ordered for `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// One operator suggestion tied to a monitored feature.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: &'static str,
    pub title: &'static str,
    pub reason: &'static str,
    pub feature: &'static str,
    pub delta: &'static str,
    pub priority: Priority,
    pub confidence: f64,
}

fn catalog() -> Vec<Suggestion> {
    vec![
        Suggestion {
            id: "sug-001",
            title: "Increase TOTAL AIR FLOW by 3%",
            reason: "O2 trending low; raising air improves combustion margin.",
            feature: "TOTAL AIR FLOW ACTUAL",
            delta: "+3%",
            priority: Priority::High,
            confidence: 0.78,
        },
        Suggestion {
            id: "sug-002",
            title: "Monitor MAIN STEAM PRESSURE closely",
            reason: "Pressure approaching upper threshold. Consider load adjustment.",
            feature: "MAIN STEAM PRESSURE",
            delta: "Monitor",
            priority: Priority::Medium,
            confidence: 0.65,
        },
        Suggestion {
            id: "sug-003",
            title: "Optimize ECONOMIZER performance",
            reason: "Temperature differential could be improved for better efficiency.",
            feature: "ECONOMIZER OUTLET TEMPERATURE",
            delta: "+2\u{b0}C",
            priority: Priority::Low,
            confidence: 0.82,
        },
        Suggestion {
            id: "sug-004",
            title: "Check ID FAN bearing temperatures",
            reason: "Bearing temperatures slightly elevated. Monitor for trends.",
            feature: "ID FAN NDE BEARING TEMP",
            delta: "Check",
            priority: Priority::Medium,
            confidence: 0.71,
        },
        Suggestion {
            id: "sug-005",
            title: "Adjust FURNACE PRESSURE",
            reason: "Pressure slightly negative. Consider damper adjustment.",
            feature: "FURNACE PRESSURE BOILER 11",
            delta: "+0.5 kPa",
            priority: Priority::Low,
            confidence: 0.58,
        },
        Suggestion {
            id: "sug-006",
            title: "Optimize STACK temperature",
            reason: "Stack temperature could be reduced for better efficiency.",
            feature: "STACK TEMPERATOR",
            delta: "-5\u{b0}C",
            priority: Priority::Medium,
            confidence: 0.74,
        },
    ]
}

/// 3-5 suggestions in shuffled order.
pub fn generate(rng: &mut impl Rng) -> Vec<Suggestion> {
    let mut suggestions = catalog();
    suggestions.shuffle(rng);
    let count = rng.random_range(3..=5);
    suggestions.truncate(count);
    suggestions
}

/// The highest-priority suggestions, at most `limit`.
pub fn top(limit: usize, rng: &mut impl Rng) -> Vec<Suggestion> {
    let mut suggestions = generate(rng);
    suggestions.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    suggestions.truncate(limit);
    suggestions
}
