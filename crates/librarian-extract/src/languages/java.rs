//! Java extractor using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{ClassDetails, FunctionDetails, StructuralFact};

pub struct JavaExtractor;

impl JavaExtractor {
    fn params(node: Node, source: &str) -> Vec<(String, String)> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            if child.kind() == "formal_parameter" {
                let name = child
                    .child_by_field_name("name")
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

    fn has_modifier(node: Node, source: &str, modifier: &str) -> bool {
        node.child_by_field_name("modifiers")
            .map(|m| {
                let mut c = m.walk();
                m.children(&mut c)
                    .any(|n| n.utf8_text(source.as_bytes()).map(|t| t == modifier).unwrap_or(false))
            })
            .unwrap_or(false)
    }

    fn method_names(body: Node, source: &str) -> Vec<String> {
        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() == "method_declaration" {
                if let Some(name_node) = child.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        methods.push(name.to_string());
                    }
                }
            }
        }
        methods
    }

    fn visit(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "method_declaration" | "constructor_declaration" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let return_type = node
                            .child_by_field_name("type")
                            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                            .map(str::to_string);
                        facts.push(StructuralFact::function(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            FunctionDetails {
                                params: Self::params(node, source),
                                return_type,
                                is_async: false,
                                is_exported: Self::has_modifier(node, source, "public"),
                                is_abstract: Self::has_modifier(node, source, "abstract"),
                            },
                        ));
                    }
                }
            }
            "class_declaration" | "interface_declaration" => {
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
                                is_abstract: node.kind() == "interface_declaration"
                                    || Self::has_modifier(node, source, "abstract"),
                            },
                        ));
                    }
                }
            }
            "import_declaration" => {
                if let Ok(raw) = node.utf8_text(source.as_bytes()) {
                    let module = raw
                        .trim_start_matches("import")
                        .trim_end_matches(';')
                        .trim();
                    facts.push(StructuralFact::import(
                        module,
                        path.to_path_buf(),
                        point_to_line(node.start_position()),
                        module,
                    ));
                }
            }
            "method_invocation" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(callee) = name_node.utf8_text(source.as_bytes()) {
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

impl LanguageExtractor for JavaExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        Self::visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
