//! Python extractor using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::{FunctionDetails, StructuralFact};

pub struct PythonExtractor;

impl PythonExtractor {
    fn params(&self, node: Node, source: &str) -> Vec<(String, String)> {
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            match child.kind() {
                "identifier" => {
                    if let Ok(name) = child.utf8_text(source.as_bytes()) {
                        out.push((name.to_string(), String::new()));
                    }
                }
                "typed_parameter" => {
                    let name = child
                        .child(0)
                        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                        .unwrap_or_default();
                    let ty = child
                        .child_by_field_name("type")
                        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                        .unwrap_or_default();
                    out.push((name.to_string(), ty.to_string()));
                }
                _ => {}
            }
        }
        out
    }

    fn decorated(&self, node: Node) -> bool {
        node.prev_sibling().map(|n| n.kind() == "decorator").unwrap_or(false)
    }
}

impl LanguageExtractor for PythonExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        self.visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}

impl PythonExtractor {
    fn visit(&self, node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "function_definition" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let line = point_to_line(node.start_position());
                        let return_type = node
                            .child_by_field_name("return_type")
                            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                            .map(str::to_string);
                        facts.push(StructuralFact::function(
                            name,
                            path.to_path_buf(),
                            line,
                            FunctionDetails {
                                params: self.params(node, source),
                                return_type,
                                is_async: node
                                    .child(0)
                                    .map(|n| n.kind() == "async")
                                    .unwrap_or(false),
                                is_exported: !name.starts_with('_'),
                                is_abstract: self.decorated(node),
                            },
                        ));
                    }
                }
            }
            "class_definition" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let line = point_to_line(node.start_position());
                        let methods = Self::method_names(node, source);
                        facts.push(StructuralFact::class(
                            name,
                            path.to_path_buf(),
                            line,
                            crate::fact::ClassDetails { methods, is_abstract: false },
                        ));
                    }
                }
            }
            "import_statement" => {
                let mut c = node.walk();
                for child in node.children(&mut c) {
                    if matches!(child.kind(), "dotted_name" | "aliased_import") {
                        if let Ok(module) = child.utf8_text(source.as_bytes()) {
                            let name = module.split_whitespace().next().unwrap_or(module);
                            facts.push(StructuralFact::import(
                                name,
                                path.to_path_buf(),
                                point_to_line(node.start_position()),
                                name,
                            ));
                        }
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module_node) = node.child_by_field_name("module_name") {
                    if let Ok(module) = module_node.utf8_text(source.as_bytes()) {
                        facts.push(StructuralFact::import(
                            module,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            module,
                        ));
                    }
                }
            }
            "call" => {
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

    fn method_names(class_node: Node, source: &str) -> Vec<String> {
        let mut methods = Vec::new();
        if let Some(body) = class_node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.children(&mut cursor) {
                if child.kind() == "function_definition" {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                            methods.push(name.to_string());
                        }
                    }
                }
            }
        }
        methods
    }
}
