//! Module Symbol Loader
//!
//! Materializes a definition file's declared symbols: its top-level classes
//! with their base classes, annotated attributes (in declaration order),
//! and the constructor's argument-type annotation. Shapes come from a
//! tree-sitter parse of the source text, so declarations are inspectable
//! without running the file.
//!
//! Loads are memoized per canonical path: a load-once cache whose entries
//! are never mutated, so repeated loads of one file return the same handle
//! and never corrupt handles already returned for other files.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::typeexpr::{TypeExpr, last_segment};
use crate::constants::discovery::{ARGS_PARAMETER, COMPONENT_BASE};
use crate::types::{IntrospecError, Result};

/// One top-level class declaration.
#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub name: String,
    pub bases: Vec<String>,
    /// Annotated attributes in declaration order, with expanded types
    pub attributes: IndexMap<String, TypeExpr>,
    /// The declared type of the constructor's `args` parameter
    pub args_type: Option<TypeExpr>,
}

impl ClassSymbol {
    /// Whether this class derives from the component base class.
    pub fn is_component(&self) -> bool {
        self.bases
            .iter()
            .any(|base| last_segment(base) == COMPONENT_BASE)
    }
}

/// The declared symbols of one definition file.
#[derive(Debug)]
pub struct ModuleSymbols {
    pub path: PathBuf,
    pub classes: IndexMap<String, ClassSymbol>,
}

impl ModuleSymbols {
    pub fn class(&self, name: &str) -> Option<&ClassSymbol> {
        self.classes.get(name)
    }

    /// Classes deriving from the component base, in declaration order.
    pub fn components(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.classes.values().filter(|class| class.is_component())
    }
}

/// Load-once symbol cache keyed by canonical file path.
#[derive(Default)]
pub struct ModuleLoader {
    cache: HashMap<PathBuf, Arc<ModuleSymbols>>,
}

impl ModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a definition file's symbols, reusing the cached table when the
    /// file was already loaded.
    pub fn load(&mut self, path: &Path) -> Result<Arc<ModuleSymbols>> {
        let key = std::fs::canonicalize(path)?;
        if let Some(symbols) = self.cache.get(&key) {
            return Ok(Arc::clone(symbols));
        }

        debug!("Loading symbols from {}", key.display());
        let content = std::fs::read_to_string(&key)?;
        let symbols = Arc::new(parse_module(&key, &content)?);
        self.cache.insert(key, Arc::clone(&symbols));
        Ok(symbols)
    }
}

/// Create a tree-sitter parser for definition files.
pub(crate) fn definition_parser(path: &Path) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| {
            IntrospecError::parse(
                format!("Failed to set definition language: {}", e),
                path.display().to_string(),
            )
        })?;
    Ok(parser)
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub(crate) fn node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        debug!(
            "UTF-8 extraction failed at {}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            e
        );
        ""
    })
}

/// Resolve module-level statements to class definitions, looking through
/// decorators.
pub(crate) fn as_class_definition(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    match node.kind() {
        "class_definition" => Some(node),
        "decorated_definition" => node
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "class_definition"),
        _ => None,
    }
}

fn parse_module(path: &Path, content: &str) -> Result<ModuleSymbols> {
    let mut parser = definition_parser(path)?;
    let tree = parser.parse(content, None).ok_or_else(|| {
        IntrospecError::parse("Failed to parse definition file", path.display().to_string())
    })?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(IntrospecError::parse(
            "Definition file contains syntax errors",
            path.display().to_string(),
        ));
    }

    let bytes = content.as_bytes();
    let mut classes = IndexMap::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let Some(class_node) = as_class_definition(child) else {
            continue;
        };
        if let Some(class) = extract_class(class_node, bytes) {
            classes.insert(class.name.clone(), class);
        }
    }

    Ok(ModuleSymbols {
        path: path.to_path_buf(),
        classes,
    })
}

fn extract_class(node: tree_sitter::Node, content: &[u8]) -> Option<ClassSymbol> {
    let name = node_text(node.child_by_field_name("name")?, content).to_string();
    if name.is_empty() {
        return None;
    }

    let mut bases = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            bases.push(node_text(base, content).to_string());
        }
    }

    let mut attributes = IndexMap::new();
    let mut args_type = None;
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            match statement.kind() {
                "expression_statement" => {
                    if let Some((attr, expr)) = extract_annotated_field(statement, content) {
                        attributes.insert(attr, expr);
                    }
                }
                "function_definition" => {
                    let fn_name = statement
                        .child_by_field_name("name")
                        .map(|n| node_text(n, content))
                        .unwrap_or("");
                    if fn_name == "__init__" {
                        args_type = extract_args_annotation(statement, content);
                    }
                }
                _ => {}
            }
        }
    }

    Some(ClassSymbol {
        name,
        bases,
        attributes,
        args_type,
    })
}

/// `name: Annotation` class-body statements become attribute entries.
fn extract_annotated_field(
    statement: tree_sitter::Node,
    content: &[u8],
) -> Option<(String, TypeExpr)> {
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    let annotation = assignment.child_by_field_name("type")?;
    let name = node_text(left, content).to_string();
    let expr = TypeExpr::parse_expanded(node_text(annotation, content));
    Some((name, expr))
}

/// The annotation of the constructor's `args` parameter.
fn extract_args_annotation(function: tree_sitter::Node, content: &[u8]) -> Option<TypeExpr> {
    let parameters = function.child_by_field_name("parameters")?;
    let mut cursor = parameters.walk();
    for parameter in parameters.named_children(&mut cursor) {
        let (name_node, annotation) = match parameter.kind() {
            "typed_parameter" => (parameter.named_child(0), parameter.child_by_field_name("type")),
            "typed_default_parameter" => (
                parameter.child_by_field_name("name"),
                parameter.child_by_field_name("type"),
            ),
            _ => continue,
        };
        let Some(name_node) = name_node else { continue };
        if node_text(name_node, content) != ARGS_PARAMETER {
            continue;
        }
        return annotation.map(|node| TypeExpr::parse_expanded(node_text(node, content)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"
from dataclasses import dataclass
from typing import Optional

import pulumi


@dataclass
class SelfSignedCertificateArgs:
    algorithm: Optional[pulumi.Input[str]]
    ecdsa_curve: Optional[pulumi.Input[str]]


class SelfSignedCertificate(pulumi.ComponentResource):
    pem: pulumi.Output[str]
    private_key: pulumi.Output[str]
    ca_cert: pulumi.Output[str]

    def __init__(self, args: SelfSignedCertificateArgs, opts=None):
        pass
"#;

    fn write_definition(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_extracts_classes_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "cert.py", DEFINITION);

        let mut loader = ModuleLoader::new();
        let symbols = loader.load(&path).unwrap();

        let names: Vec<_> = symbols.classes.keys().cloned().collect();
        assert_eq!(names, vec!["SelfSignedCertificateArgs", "SelfSignedCertificate"]);
    }

    #[test]
    fn test_component_detection_and_args_type() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "cert.py", DEFINITION);

        let mut loader = ModuleLoader::new();
        let symbols = loader.load(&path).unwrap();

        let args = symbols.class("SelfSignedCertificateArgs").unwrap();
        assert!(!args.is_component());
        assert_eq!(
            args.attributes.keys().collect::<Vec<_>>(),
            vec!["algorithm", "ecdsa_curve"]
        );

        let component = symbols.class("SelfSignedCertificate").unwrap();
        assert!(component.is_component());
        assert_eq!(
            component.args_type,
            Some(TypeExpr::Name("SelfSignedCertificateArgs".to_string()))
        );
        assert_eq!(component.attributes.len(), 3);
    }

    #[test]
    fn test_load_is_memoized() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "cert.py", DEFINITION);

        let mut loader = ModuleLoader::new();
        let first = loader.load(&path).unwrap();
        let second = loader.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "broken.py", "class Broken(:\n    pass\n");

        let mut loader = ModuleLoader::new();
        assert!(matches!(
            loader.load(&path),
            Err(crate::types::IntrospecError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut loader = ModuleLoader::new();
        assert!(matches!(
            loader.load(Path::new("/nonexistent/introspec.py")),
            Err(crate::types::IntrospecError::Io(_))
        ));
    }
}
