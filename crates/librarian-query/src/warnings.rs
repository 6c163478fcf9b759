//! Stage 8: classify and order warnings. Critical warnings (storage
//! degraded, synthesis failed, confidence below 0.1) must sort strictly
//! before Coverage warnings (partial index, provider unavailable).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Critical,
    Coverage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub severity: WarningSeverity,
    pub message: String,
}

impl Warning {
    pub fn critical(message: impl Into<String>) -> Self {
        Self { severity: WarningSeverity::Critical, message: message.into() }
    }

    pub fn coverage(message: impl Into<String>) -> Self {
        Self { severity: WarningSeverity::Coverage, message: message.into() }
    }
}

const LOW_CONFIDENCE_THRESHOLD: f32 = 0.1;

pub fn low_confidence_warning(confidence: f32) -> Option<Warning> {
    if confidence < LOW_CONFIDENCE_THRESHOLD {
        Some(Warning::critical(format!("result confidence {confidence:.2} is below the reliability floor")))
    } else {
        None
    }
}

/// Sorts `warnings` in place so every Critical entry precedes every
/// Coverage entry, preserving relative order within each severity.
pub fn order_warnings(mut warnings: Vec<Warning>) -> Vec<Warning> {
    warnings.sort_by_key(|w| match w.severity {
        WarningSeverity::Critical => 0,
        WarningSeverity::Coverage => 1,
    });
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_sorts_before_coverage() {
        let warnings = vec![Warning::coverage("partial index"), Warning::critical("synthesis failed")];
        let ordered = order_warnings(warnings);
        assert_eq!(ordered[0].severity, WarningSeverity::Critical);
        assert_eq!(ordered[1].severity, WarningSeverity::Coverage);
    }

    #[test]
    fn flags_low_confidence_as_critical() {
        assert!(low_confidence_warning(0.05).is_some());
        assert!(low_confidence_warning(0.5).is_none());
    }
}
