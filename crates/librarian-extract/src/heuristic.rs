//! Regex-based fallback extraction for languages with no tree-sitter
//! grammar in the workspace dependency set: C#, Ruby, PHP, Swift, Scala,
//! Dart, Lua, shell scripts, SQL, HTML, CSS.
//!
//! These facts are line-pattern matches, not parses — lower precision,
//! reported with the same `StructuralFact` shape so downstream code
//! doesn't need to know the difference. A heuristic match never
//! produces a warning; an unmatched line is simply not a fact.

use std::path::Path;

use regex::Regex;

use crate::extractor::ExtractOutcome;
use crate::fact::{FunctionDetails, StructuralFact};

struct LanguagePatterns {
    function: Regex,
    import: Regex,
}

pub struct HeuristicExtractor {
    recognized: Vec<(&'static [&'static str], LanguagePatterns)>,
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        let recognized = vec![
            (
                &["cs"] as &[&str],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*(?:public|private|protected|internal|static)[\w\s<>\[\]]*\s(\w+)\s*\([^)]*\)\s*\{").unwrap(),
                    import: Regex::new(r"(?m)^\s*using\s+([\w.]+);").unwrap(),
                },
            ),
            (
                &["rb"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*def\s+([\w?!=]+)").unwrap(),
                    import: Regex::new(r#"(?m)^\s*require(?:_relative)?\s+['"]([\w./-]+)['"]"#).unwrap(),
                },
            ),
            (
                &["php"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*function\s+(\w+)\s*\(").unwrap(),
                    import: Regex::new(r#"(?m)^\s*(?:require|include)(?:_once)?\s*\(?['"]([\w./-]+)['"]"#).unwrap(),
                },
            ),
            (
                &["swift"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*(?:public\s+|private\s+|internal\s+)?func\s+(\w+)\s*\(").unwrap(),
                    import: Regex::new(r"(?m)^\s*import\s+(\w+)").unwrap(),
                },
            ),
            (
                &["scala"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*def\s+(\w+)\s*[\[(]").unwrap(),
                    import: Regex::new(r"(?m)^\s*import\s+([\w.{}, ]+)").unwrap(),
                },
            ),
            (
                &["dart"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*[\w<>?]+\s+(\w+)\s*\([^)]*\)\s*(?:async\s*)?\{").unwrap(),
                    import: Regex::new(r#"(?m)^\s*import\s+['"]([\w./:-]+)['"]"#).unwrap(),
                },
            ),
            (
                &["lua"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*(?:local\s+)?function\s+([\w.:]+)\s*\(").unwrap(),
                    import: Regex::new(r#"(?m)^\s*require\s*\(?['"]([\w./-]+)['"]"#).unwrap(),
                },
            ),
            (
                &["sh", "bash"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*(?:function\s+)?([\w-]+)\s*\(\)\s*\{").unwrap(),
                    import: Regex::new(r"(?m)^\s*source\s+([\w./-]+)").unwrap(),
                },
            ),
            (
                &["sql"],
                LanguagePatterns {
                    function: Regex::new(r"(?mi)^\s*create\s+(?:or\s+replace\s+)?(?:function|procedure)\s+([\w.]+)").unwrap(),
                    import: Regex::new(r"(?mi)^\s*\\i\s+([\w./-]+)").unwrap(),
                },
            ),
            (
                &["html", "htm"],
                LanguagePatterns {
                    function: Regex::new(r#"(?mi)<script[^>]*src=["']([\w./:-]+)["']"#).unwrap(),
                    import: Regex::new(r#"(?mi)<link[^>]*href=["']([\w./:-]+)["']"#).unwrap(),
                },
            ),
            (
                &["css", "scss"],
                LanguagePatterns {
                    function: Regex::new(r"(?m)^\s*\.?([\w-]+)\s*\{").unwrap(),
                    import: Regex::new(r#"(?m)^\s*@import\s+['"]([\w./-]+)['"]"#).unwrap(),
                },
            ),
        ];
        Self { recognized }
    }

    fn patterns_for(&self, path: &Path) -> Option<&LanguagePatterns> {
        let ext = path.extension()?.to_str()?;
        self.recognized
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, patterns)| patterns)
    }

    pub fn extract(&self, path: &Path, source: &str) -> ExtractOutcome {
        let Some(patterns) = self.patterns_for(path) else {
            return ExtractOutcome::skipped(format!(
                "{} has no tree-sitter grammar or heuristic pattern, skipped",
                path.display()
            ));
        };

        let mut facts = Vec::new();
        for cap in patterns.function.captures_iter(source) {
            let Some(name) = cap.get(1) else { continue };
            let line = source[..name.start()].matches('\n').count() as u32 + 1;
            facts.push(StructuralFact::function(
                name.as_str(),
                path.to_path_buf(),
                line,
                FunctionDetails::default(),
            ));
        }
        for cap in patterns.import.captures_iter(source) {
            let Some(module) = cap.get(1) else { continue };
            let line = source[..module.start()].matches('\n').count() as u32 + 1;
            facts.push(StructuralFact::import(module.as_str(), path.to_path_buf(), line, module.as_str()));
        }

        ExtractOutcome {
            warnings: if facts.is_empty() {
                vec![format!("{} matched no heuristic patterns", path.display())]
            } else {
                Vec::new()
            },
            facts,
        }
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ruby_methods_and_requires() {
        let extractor = HeuristicExtractor::new();
        let source = "require 'json'\n\ndef greet(name)\n  puts name\nend\n";
        let outcome = extractor.extract(Path::new("greeter.rb"), source);
        assert!(outcome.facts.iter().any(|f| f.identifier == "greet"));
        assert!(outcome.facts.iter().any(|f| f.identifier == "json"));
    }

    #[test]
    fn unrecognized_extension_is_skipped_not_panicked() {
        let extractor = HeuristicExtractor::new();
        let outcome = extractor.extract(Path::new("notes.txt"), "whatever");
        assert!(outcome.facts.is_empty());
        assert!(!outcome.warnings.is_empty());
    }
}
