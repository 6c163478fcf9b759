//! Lifecycle phase detection: derives where in discover/investigate/
//! implement/verify an agent's task currently sits from its intent text
//! and recent tool-call trace.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Discover,
    Investigate,
    Implement,
    Verify,
    Unknown,
}

const DISCOVER_KEYWORDS: &[&str] = &["explore", "find", "where is", "locate", "what is"];
const INVESTIGATE_KEYWORDS: &[&str] = &["why", "debug", "trace", "investigate", "root cause"];
const IMPLEMENT_KEYWORDS: &[&str] = &["add", "implement", "fix", "refactor", "write", "create"];
const VERIFY_KEYWORDS: &[&str] = &["test", "verify", "check", "confirm", "validate"];

const VERIFY_TOOLS: &[&str] = &["run_tests", "cargo_test", "pytest", "npm_test"];
const IMPLEMENT_TOOLS: &[&str] = &["edit", "write_file", "apply_patch"];

pub fn detect_phase(intent: &str, recent_tool_calls: &[String]) -> Phase {
    let lower = intent.to_lowercase();

    if let Some(last_tool) = recent_tool_calls.last() {
        let tool_lower = last_tool.to_lowercase();
        if VERIFY_TOOLS.iter().any(|t| tool_lower.contains(t)) {
            return Phase::Verify;
        }
        if IMPLEMENT_TOOLS.iter().any(|t| tool_lower.contains(t)) {
            return Phase::Implement;
        }
    }

    if VERIFY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Phase::Verify
    } else if IMPLEMENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Phase::Implement
    } else if INVESTIGATE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Phase::Investigate
    } else if DISCOVER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Phase::Discover
    } else {
        Phase::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_implement_from_intent() {
        assert_eq!(detect_phase("add a retry to the HTTP client", &[]), Phase::Implement);
    }

    #[test]
    fn detects_verify_from_recent_tool_call() {
        let calls = vec!["read_file".to_string(), "run_tests".to_string()];
        assert_eq!(detect_phase("is this working now", &calls), Phase::Verify);
    }

    #[test]
    fn falls_back_to_unknown() {
        assert_eq!(detect_phase("hello there", &[]), Phase::Unknown);
    }
}
