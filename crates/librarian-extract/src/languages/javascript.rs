//! JavaScript extractor using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{ClassDetails, FunctionDetails, StructuralFact};

pub struct JavaScriptExtractor;

impl JavaScriptExtractor {
    pub(crate) fn params(node: Node, source: &str) -> Vec<(String, String)> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            if child.is_named() {
                if let Ok(name) = child.utf8_text(source.as_bytes()) {
                    out.push((name.to_string(), String::new()));
                }
            }
        }
        out
    }

    pub(crate) fn method_names(body: Node, source: &str) -> Vec<String> {
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() == "method_definition" {
                if let Some(name_node) = child.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        methods.push(name.to_string());
                    }
                }
            }
        }
        methods
    }

    pub(crate) fn visit(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        Self::visit_one(node, source, path, facts);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::visit(child, source, path, facts);
        }
    }

    /// Handles the facts a single node can produce, without recursing
    /// into its children — shared with [`super::typescript`], which
    /// drives its own recursion so it can add type-level node kinds.
    pub(crate) fn visit_one(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "function_declaration" | "function" | "generator_function_declaration" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        facts.push(StructuralFact::function(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            FunctionDetails {
                                params: Self::params(node, source),
                                return_type: None,
                                is_async: node.child(0).map(|n| n.kind() == "async").unwrap_or(false),
                                is_exported: node
                                    .parent()
                                    .map(|p| p.kind() == "export_statement")
                                    .unwrap_or(false),
                                is_abstract: false,
                            },
                        ));
                    }
                }
            }
            "class_declaration" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let methods = node
                            .child_by_field_name("body")
                            .map(|b| Self::method_names(b, source))
                            .unwrap_or_default();
                        facts.push(StructuralFact::class(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            ClassDetails { methods, is_abstract: false },
                        ));
                    }
                }
            }
            "import_statement" => {
                if let Some(source_node) = node.child_by_field_name("source") {
                    if let Ok(raw) = source_node.utf8_text(source.as_bytes()) {
                        let module = raw.trim_matches(|c| c == '"' || c == '\'');
                        facts.push(StructuralFact::import(
                            module,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            module,
                        ));
                    }
                }
            }
            "export_statement" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if matches!(child.kind(), "identifier" | "function_declaration" | "class_declaration") {
                        if let Ok(name) = child.utf8_text(source.as_bytes()) {
                            facts.push(StructuralFact::export(
                                name,
                                path.to_path_buf(),
                                point_to_line(node.start_position()),
                                name,
                            ));
                        }
                    }
                }
            }
            "call_expression" => {
                if let Some(fn_node) = node.child_by_field_name("function") {
                    if let Ok(callee) = fn_node.utf8_text(source.as_bytes()) {
                        facts.push(StructuralFact::call(
                            callee,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            callee,
                        ));
                    }
                }
            }
            _ => {}
        }
    }
}

impl LanguageExtractor for JavaScriptExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        Self::visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
