//! C extractor using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{FunctionDetails, StructuralFact};

pub struct CExtractor;

impl CExtractor {
    pub(crate) fn declarator_name(node: Node, source: &str) -> Option<String> {
        match node.kind() {
            "function_declarator" => node
                .child_by_field_name("declarator")
                .and_then(|n| Self::declarator_name(n, source)),
            "identifier" => node.utf8_text(source.as_bytes()).ok().map(str::to_string),
            _ => node
                .child_by_field_name("declarator")
                .and_then(|n| Self::declarator_name(n, source)),
        }
    }

    fn visit(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "function_definition" => {
                if let Some(declarator) = node.child_by_field_name("declarator") {
                    if let Some(name) = Self::declarator_name(declarator, source) {
                        let return_type = node
                            .child_by_field_name("type")
                            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                            .map(str::to_string);
                        facts.push(StructuralFact::function(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            FunctionDetails {
                                params: Vec::new(),
                                return_type,
                                is_async: false,
                                is_exported: true,
                                is_abstract: false,
                            },
                        ));
                    }
                }
            }
            "preproc_include" => {
                if let Some(path_node) = node.child_by_field_name("path") {
                    if let Ok(raw) = path_node.utf8_text(source.as_bytes()) {
                        let module = raw.trim_matches(|c| c == '"' || c == '<' || c == '>');
                        facts.push(StructuralFact::import(
                            module,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            module,
                        ));
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

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::visit(child, source, path, facts);
        }
    }
}

impl LanguageExtractor for CExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        Self::visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
