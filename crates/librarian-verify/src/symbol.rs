//! Symbol reference extraction: finds identifiers a piece of generated
//! text treats as real code symbols, independent of the citation
//! patterns in [`crate::citation`] — a bare `computeTotal()` or
//! `new OrderService(` counts even with no backticks around it.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    FunctionCall,
    Constructor,
    MethodCall,
    Import,
    TypeAnnotation,
    Constant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolReference {
    pub name: String,
    pub kind: SymbolKind,
    pub context: String,
}

const BUILTINS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "print", "println", "printf", "console", "len",
    "new", "super", "this", "self", "require", "import", "export", "match", "loop", "let", "const", "var", "fn",
    "def", "class", "struct", "enum", "impl", "pub", "use", "mod",
];

const SHELL_COMMANDS: &[&str] = &["cd", "ls", "git", "npm", "cargo", "curl", "echo", "cat", "grep", "sed", "awk"];

pub fn extract_symbols(text: &str) -> Vec<SymbolReference> {
    let mut seen = HashSet::new();
    let mut refs = Vec::new();

    let call = Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap();
    for cap in call.captures_iter(text) {
        let name = cap[1].to_string();
        if is_builtin_or_noise(&name) || !seen.insert((name.clone(), "call")) {
            continue;
        }
        refs.push(SymbolReference { name, kind: SymbolKind::FunctionCall, context: cap[0].to_string() });
    }

    let constructor = Regex::new(r"\bnew\s+([A-Z][A-Za-z0-9_]*)\s*\(").unwrap();
    for cap in constructor.captures_iter(text) {
        let name = cap[1].to_string();
        if !seen.insert((name.clone(), "ctor")) {
            continue;
        }
        refs.push(SymbolReference { name, kind: SymbolKind::Constructor, context: cap[0].to_string() });
    }

    let method_call = Regex::new(r"\b([A-Z][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap();
    for cap in method_call.captures_iter(text) {
        let name = format!("{}.{}", &cap[1], &cap[2]);
        if !seen.insert((name.clone(), "method")) {
            continue;
        }
        refs.push(SymbolReference { name, kind: SymbolKind::MethodCall, context: cap[0].to_string() });
    }

    let import = Regex::new(r#"(?:import|require|use)\s+[\w:./]*?([A-Za-z_][A-Za-z0-9_]*)['"]?\s*;?"#).unwrap();
    for cap in import.captures_iter(text) {
        let name = cap[1].to_string();
        if is_builtin_or_noise(&name) || !seen.insert((name.clone(), "import")) {
            continue;
        }
        refs.push(SymbolReference { name, kind: SymbolKind::Import, context: cap[0].to_string() });
    }

    let type_annotation = Regex::new(r":\s*([A-Z][A-Za-z0-9_<>]*)\b").unwrap();
    for cap in type_annotation.captures_iter(text) {
        let name = cap[1].to_string();
        if !seen.insert((name.clone(), "type")) {
            continue;
        }
        refs.push(SymbolReference { name, kind: SymbolKind::TypeAnnotation, context: cap[0].to_string() });
    }

    let constant = Regex::new(r"\b([A-Z][A-Z0-9_]{2,})\b").unwrap();
    for cap in constant.captures_iter(text) {
        let name = cap[1].to_string();
        if !seen.insert((name.clone(), "const")) {
            continue;
        }
        refs.push(SymbolReference { name, kind: SymbolKind::Constant, context: cap[0].to_string() });
    }

    refs
}

fn is_builtin_or_noise(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BUILTINS.contains(&lower.as_str()) || SHELL_COMMANDS.contains(&lower.as_str()) || name.len() < 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_function_calls_and_constructors() {
        let text = "call computeTotal(items) then new OrderService(config) and log it";
        let refs = extract_symbols(text);
        assert!(refs.iter().any(|r| r.name == "computeTotal" && r.kind == SymbolKind::FunctionCall));
        assert!(refs.iter().any(|r| r.name == "OrderService" && r.kind == SymbolKind::Constructor));
    }

    #[test]
    fn ignores_builtins_and_shell_commands() {
        let text = "if (x) { println(x) } then run git status";
        let refs = extract_symbols(text);
        assert!(!refs.iter().any(|r| r.name.eq_ignore_ascii_case("if")));
        assert!(!refs.iter().any(|r| r.name.eq_ignore_ascii_case("git")));
    }
}
