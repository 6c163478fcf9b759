//! Go extractor using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{ClassDetails, FunctionDetails, StructuralFact};

pub struct GoExtractor;

impl GoExtractor {
    fn params(node: Node, source: &str) -> Vec<(String, String)> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            if child.kind() == "parameter_declaration" {
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

    fn visit(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "function_declaration" | "method_declaration" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let return_type = node
                            .child_by_field_name("result")
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
                                is_exported: name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false),
                                is_abstract: false,
                            },
                        ));
                    }
                }
            }
            "type_spec" => {
                if let (Some(name_node), Some(type_node)) =
                    (node.child_by_field_name("name"), node.child_by_field_name("type"))
                {
                    if type_node.kind() == "struct_type" {
                        if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                            facts.push(StructuralFact::class(
                                name,
                                path.to_path_buf(),
                                point_to_line(node.start_position()),
                                ClassDetails { methods: Vec::new(), is_abstract: false },
                            ));
                        }
                    }
                }
            }
            "import_spec" => {
                if let Some(path_node) = node.child_by_field_name("path") {
                    if let Ok(raw) = path_node.utf8_text(source.as_bytes()) {
                        let module = raw.trim_matches('"');
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

impl LanguageExtractor for GoExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        Self::visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
