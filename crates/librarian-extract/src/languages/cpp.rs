//! C++ extractor using tree-sitter.
//!
//! Builds on [`super::c::CExtractor`]'s declarator-name walk (C++'s
//! grammar nests function declarators the same way C's does) and adds
//! `class_specifier`.

use std::path::Path;

use tree_sitter::Node;

use super::c::CExtractor;
use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{ClassDetails, FunctionDetails, StructuralFact};

pub struct CppExtractor;

impl CppExtractor {
    fn method_names(body: Node, source: &str) -> Vec<String> {
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() == "function_definition" || child.kind() == "declaration" {
                if let Some(declarator) = child.child_by_field_name("declarator") {
                    if let Some(name) = CExtractor::declarator_name(declarator, source) {
                        methods.push(name);
                    }
                }
            }
        }
        methods
    }

    fn visit(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "function_definition" => {
                if let Some(declarator) = node.child_by_field_name("declarator") {
                    if let Some(name) = CExtractor::declarator_name(declarator, source) {
                        facts.push(StructuralFact::function(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            FunctionDetails {
                                params: Vec::new(),
                                return_type: node
                                    .child_by_field_name("type")
                                    .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                                    .map(str::to_string),
                                is_async: false,
                                is_exported: true,
                                is_abstract: false,
                            },
                        ));
                    }
                }
            }
            "class_specifier" | "struct_specifier" => {
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

impl LanguageExtractor for CppExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        Self::visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
