//! Stage 2: classify an intent before any scoring happens. Enumeration
//! and structural queries bypass semantic scoring entirely and return
//! sorted deterministic results.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentMode {
    Enumeration,
    Structural,
    General,
}

const ENUMERATION_PREFIXES: &[&str] = &["list all", "list every", "enumerate", "show all"];
const STRUCTURAL_PATTERNS: &[&str] = &["who calls", "what calls", "callers of", "depends on", "imports"];

pub fn classify(intent: &str) -> IntentMode {
    let lower = intent.to_lowercase();
    if ENUMERATION_PREFIXES.iter().any(|p| lower.starts_with(p) || lower.contains(p)) {
        return IntentMode::Enumeration;
    }
    if STRUCTURAL_PATTERNS.iter().any(|p| lower.contains(p)) {
        return IntentMode::Structural;
    }
    IntentMode::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_enumeration() {
        assert_eq!(classify("list all handlers"), IntentMode::Enumeration);
    }

    #[test]
    fn detects_structural() {
        assert_eq!(classify("who calls parseConfig"), IntentMode::Structural);
    }

    #[test]
    fn falls_back_to_general() {
        assert_eq!(classify("how does auth work"), IntentMode::General);
    }
}
