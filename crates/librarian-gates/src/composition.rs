//! Composition Pipeline gate: verifies that a sequence of operators
//! propagates its first failure, halting the pipeline and surfacing
//! which stage failed (`errorAt`).

use std::time::Instant;

use crate::gate::GateResult;

pub struct Stage<'a, T> {
    pub name: &'a str,
    pub run: Box<dyn Fn(T) -> anyhow::Result<T> + 'a>,
}

pub struct CompositionOutcome<T> {
    pub value: Option<T>,
    pub error_at: Option<String>,
}

pub fn compose<T>(initial: T, stages: &[Stage<'_, T>]) -> CompositionOutcome<T> {
    let mut value = initial;
    for stage in stages {
        match (stage.run)(value) {
            Ok(next) => value = next,
            Err(e) => {
                return CompositionOutcome { value: None, error_at: Some(format!("{}: {e}", stage.name)) };
            }
        }
    }
    CompositionOutcome { value: Some(value), error_at: None }
}

/// Exercises `compose` against a list of scenarios, each a stage sequence
/// expected to fail at a named stage (or succeed, if `expected_error_at`
/// is `None`).
pub fn run<T: Clone>(
    scenarios: &[(&str, T, Vec<Stage<'_, T>>, Option<&str>)],
    max_duration_ms: u64,
) -> anyhow::Result<GateResult> {
    let mut result = GateResult::new("composition_pipeline");

    for (name, initial, stages, expected_error_at) in scenarios {
        let started = Instant::now();
        let outcome = compose(initial.clone(), stages);

        match (outcome.error_at.as_deref(), expected_error_at) {
            (Some(actual), Some(expected)) if !actual.starts_with(expected) => {
                result.finding(*name, format!("errorAt was {actual:?}, expected prefix {expected:?}"));
            }
            (None, Some(expected)) => {
                result.finding(*name, format!("expected failure at {expected:?} but pipeline succeeded"));
            }
            (Some(actual), None) => {
                result.finding(*name, format!("expected success but pipeline failed at {actual:?}"));
            }
            _ => {}
        }

        result.record(name, started.elapsed(), max_duration_ms);
    }

    Ok(result)
}
