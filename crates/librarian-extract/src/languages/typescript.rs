//! TypeScript extractor using tree-sitter.
//!
//! The TypeScript grammar is a superset of JavaScript's for the shapes
//! this crate cares about; this extractor reuses
//! [`super::javascript::JavaScriptExtractor`]'s param/method helpers and
//! adds the type-level facts (`interface`, `type`) JS has no syntax for.

use std::path::Path;

use tree_sitter::Node;

use super::javascript::JavaScriptExtractor;
use crate::extractor::{point_to_line, LanguageExtractor};
use crate::fact::StructuralFact;

pub struct TypeScriptExtractor;

impl TypeScriptExtractor {
    fn visit(node: Node, source: &str, path: &Path, facts: &mut Vec<StructuralFact>) {
        match node.kind() {
            "interface_declaration" | "type_alias_declaration" => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source.as_bytes()) {
                        let definition = node.utf8_text(source.as_bytes()).unwrap_or_default();
                        facts.push(StructuralFact::type_def(
                            name,
                            path.to_path_buf(),
                            point_to_line(node.start_position()),
                            definition,
                        ));
                    }
                }
            }
            _ => {
                JavaScriptExtractor::visit_one(node, source, path, facts);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::visit(child, source, path, facts);
        }
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn extract(&self, path: &Path, tree: &tree_sitter::Tree, source: &str) -> Vec<StructuralFact> {
        let mut facts = Vec::new();
        Self::visit(tree.root_node(), source, path, &mut facts);
        facts
    }
}
