//! Capability probing and the readiness gate that sits in front of every
//! LLM/embedding call the query pipeline makes.

use serde::{Deserialize, Serialize};

/// What a single probe against a backend found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityProbe {
    pub provider: String,
    pub available: bool,
    pub authenticated: bool,
    pub latency_ms: Option<u64>,
    pub model_id: Option<String>,
    pub error: Option<String>,
}

impl CapabilityProbe {
    pub fn unavailable(provider: &str, error: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            available: false,
            authenticated: false,
            latency_ms: None,
            model_id: None,
            error: Some(error.into()),
        }
    }

    pub fn ready(provider: &str, latency_ms: u64, model_id: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            available: true,
            authenticated: true,
            latency_ms: Some(latency_ms),
            model_id: Some(model_id.into()),
            error: None,
        }
    }

    fn is_ready(&self) -> bool {
        self.available && self.authenticated
    }
}

/// Folded verdict over every probed backend, handed to the query pipeline's
/// Synthesize stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Readiness {
    pub ready: bool,
    pub selected_provider: Option<String>,
    pub reason: String,
    pub remediation_steps: Vec<String>,
}

/// Picks the first probe that came back ready, in the order given — callers
/// pass probes in their configured preference order so ties favor the
/// earlier entry.
pub fn fold_readiness(probes: &[CapabilityProbe]) -> Readiness {
    if let Some(probe) = probes.iter().find(|p| p.is_ready()) {
        return Readiness {
            ready: true,
            selected_provider: Some(probe.provider.clone()),
            reason: format!("{} is authenticated and reachable", probe.provider),
            remediation_steps: Vec::new(),
        };
    }

    let mut remediation = Vec::new();
    for probe in probes {
        if !probe.available {
            remediation.push(format!(
                "{}: {}",
                probe.provider,
                probe.error.clone().unwrap_or_else(|| "unavailable".to_string())
            ));
        } else if !probe.authenticated {
            remediation.push(format!("{}: set its API key and retry", probe.provider));
        }
    }

    Readiness {
        ready: false,
        selected_provider: None,
        reason: "no configured provider is both available and authenticated".to_string(),
        remediation_steps: remediation,
    }
}
