//! Mock chat responder.
//!
//! Keyword-matched canned replies about boiler operations. A real model
//! integration is out of scope; the transport treats this as an opaque
//! message-in/reply-out function.

use rand::seq::IndexedRandom;
use rand::Rng;

const DEFAULT_REPLIES: &[&str] = &[
    "I understand you're asking about the boiler operations. Could you be more specific about which parameter you'd like me to analyze?",
    "That's an interesting question about the boiler system. I can help analyze specific parameters like pressure, temperature, or air flow.",
    "I'm here to help with boiler operations. What specific aspect of the system would you like me to focus on?",
    "Let me know which parameter or system you'd like me to analyze, and I'll provide detailed insights.",
];

/// Produce a reply for one operator message.
pub fn reply_to(message: &str, rng: &mut impl Rng) -> String {
    let lower = message.to_lowercase();
    let contains_any = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

    if contains_any(&["pressure", "steam"]) {
        return "I can see the main steam pressure is currently within normal range. \
                Would you like me to analyze the pressure trends over the last hour?"
            .to_string();
    }
    if contains_any(&["temperature", "temp"]) {
        return "The boiler temperatures are being monitored. The main steam temperature \
                is stable. Is there a specific temperature parameter you'd like me to focus on?"
            .to_string();
    }
    if contains_any(&["air flow", "oxygen"]) {
        return "The air flow and oxygen levels are within acceptable ranges. \
                I can provide suggestions for optimization if needed."
            .to_string();
    }
    if contains_any(&["efficiency", "optimize"]) {
        return "Based on current readings, I can suggest several optimization opportunities. \
                The economizer performance could be improved, and stack temperature \
                optimization is available."
            .to_string();
    }
    if contains_any(&["alarm", "warning", "alert"]) {
        return "No active alarms detected. All systems are operating within normal \
                parameters. I can help you set up monitoring for specific thresholds."
            .to_string();
    }
    if contains_any(&["help", "what can you do"]) {
        return "I can help you monitor boiler operations, analyze trends, provide \
                optimization suggestions, and answer questions about system performance. \
                Try asking about pressure, temperature, air flow, or efficiency."
            .to_string();
    }

    DEFAULT_REPLIES
        .choose(rng)
        .copied()
        .unwrap_or(DEFAULT_REPLIES[0])
        .to_string()
}
