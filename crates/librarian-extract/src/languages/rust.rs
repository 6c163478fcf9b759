//! Rust extractor using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{ClassDetails, FunctionDetails, StructuralFact};

pub struct RustExtractor;

impl RustExtractor {
    fn params(&self, node: Node, source: &str) -> Vec<(String, String)> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            if child.kind() == "parameter" {
                let name = child
                    .child_by_field_name("pattern")
                    .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                    .unwrap_or_default();
                let ty = child
                    .child_by_field_name("type")
                    .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                    .unwrap_or_default();
                out.push((name.to_string(), ty.to_string()));
            }
        }
        out
    }

    fn is_pub(node: Node) -> bool {
        node.child(0).map(|n| n.kind() == "visibility_modifier").unwrap_or(false)
    }

    fn method_names(body: Node, source: &str) -> Vec<String> {
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() == "function_item" {
                if let Some(name_node) = child.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        methods.push(name.to_string());
                    }
                }
            }
        }
        methods
    }

    fn visit(&self, node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "function_item" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let return_type = node
                            .child_by_field_name("return_type")
                            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                            .map(str::to_string);
                        facts.push(StructuralFact::function(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            FunctionDetails {
                                params: self.params(node, source),
                                return_type,
                                is_async: node
                                    .children(&mut node.walk())
                                    .any(|n| n.kind() == "async"),
                                is_exported: Self::is_pub(node),
                                is_abstract: false,
                            },
                        ));
                    }
                }
            }
            "struct_item" | "enum_item" | "trait_item" => {
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
                            ClassDetails {
                                methods,
                                is_abstract: node.kind() == "trait_item",
                            },
                        ));
                    }
                }
            }
            "impl_item" => {
                if let Some(type_node) = node.child_by_field_name("type") {
                    if let (Ok(name), Some(body)) =
                        (type_node.utf8_text(source.as_bytes()), node.child_by_field_name("body"))
                    {
                        let methods = Self::method_names(body, source);
                        if !methods.is_empty() {
                            facts.push(StructuralFact::class(
                                name,
                                path.to_path_buf(),
                                point_to_line(node.start_position()),
                                ClassDetails { methods, is_abstract: false },
                            ));
                        }
                    }
                }
            }
            "use_declaration" => {
                if let Some(arg) = node.child(1) {
                    if let Ok(module) = arg.utf8_text(source.as_bytes()) {
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
            self.visit(child, source, path, facts);
        }
    }
}

impl LanguageExtractor for RustExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        self.visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
