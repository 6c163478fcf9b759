//! Shared gate result shape: every gate returns pass/fail with findings
//! rather than throwing — a gate regression is a diagnostic, not a crash.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub scenario: String,
    pub message: String,
}

impl Finding {
    pub fn new(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        Self { scenario: scenario.into(), message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDuration {
    pub scenario: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    pub gate: String,
    pub passed: bool,
    pub findings: Vec<Finding>,
    pub durations: Vec<ScenarioDuration>,
}

impl GateResult {
    pub fn new(gate: impl Into<String>) -> Self {
        Self { gate: gate.into(), passed: true, findings: Vec::new(), durations: Vec::new() }
    }

    pub fn record(&mut self, scenario: &str, elapsed: Duration, max_duration_ms: u64) {
        self.durations.push(ScenarioDuration { scenario: scenario.to_string(), duration_ms: elapsed.as_millis() as u64 });
        if elapsed.as_millis() as u64 > max_duration_ms {
            self.finding(scenario, format!("exceeded budget of {max_duration_ms}ms ({}ms)", elapsed.as_millis()));
        }
    }

    pub fn finding(&mut self, scenario: &str, message: impl Into<String>) {
        self.passed = false;
        self.findings.push(Finding::new(scenario, message));
    }
}
