//! Docstring Recovery
//!
//! Recovers attribute documentation from the raw source text of definition
//! files, independently of symbol loading. This is a second, fully
//! decoupled parse: it reflects exactly what the source says, works even
//! when a file has import-time side effects, and shares no state with the
//! loader. The two extraction paths meet only at the analyzer, keyed by
//! the same (declaring class, attribute) pair.
//!
//! Association rule: within a class body, a bare string-literal statement
//! documents the immediately preceding annotated field. Only statement
//! nodes participate in the adjacency test, so a source comment between a
//! field and its literal does not break the association. A class's own
//! leading literal becomes the class description. A field with no trailing
//! literal simply has no description; absent, never empty.

use indexmap::IndexMap;
use std::path::Path;
use tracing::warn;

use super::loader::{as_class_definition, definition_parser, node_text};
use super::scanner::DefinitionScanner;
use crate::types::{IntrospecError, Result};

/// Documentation recovered for one class.
#[derive(Debug, Default, Clone)]
pub struct ClassDocs {
    pub description: Option<String>,
    pub attributes: IndexMap<String, String>,
}

/// Documentation recovered for a set of definition files, keyed by
/// declaring class name.
#[derive(Debug, Default)]
pub struct DocIndex {
    classes: IndexMap<String, ClassDocs>,
}

impl DocIndex {
    /// Recover docstrings for every definition file in a directory.
    ///
    /// Files that cannot be read or parsed are skipped with a warning;
    /// docstrings are best-effort decoration, and the loader reports hard
    /// failures for the same files.
    pub fn recover_all(directory: &Path) -> Result<Self> {
        let mut index = Self::default();
        for file in DefinitionScanner::new(directory).scan()? {
            match std::fs::read_to_string(&file) {
                Ok(content) => {
                    if let Err(e) = index.recover_file(&file, &content) {
                        warn!("Skipping docstrings for {}: {}", file.display(), e);
                    }
                }
                Err(e) => warn!("Skipping docstrings for {}: {}", file.display(), e),
            }
        }
        Ok(index)
    }

    /// Recover docstrings from one file's source text.
    pub fn recover_file(&mut self, path: &Path, content: &str) -> Result<()> {
        let mut parser = definition_parser(path)?;
        let tree = parser.parse(content, None).ok_or_else(|| {
            IntrospecError::parse("Failed to parse definition file", path.display().to_string())
        })?;

        let bytes = content.as_bytes();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let Some(class_node) = as_class_definition(child) else {
                continue;
            };
            let Some(name_node) = class_node.child_by_field_name("name") else {
                continue;
            };
            let name = node_text(name_node, bytes).to_string();
            let docs = recover_class(class_node, bytes);
            self.classes.insert(name, docs);
        }
        Ok(())
    }

    /// The class-level description of a declaring type.
    pub fn class_description(&self, class: &str) -> Option<&str> {
        self.classes.get(class)?.description.as_deref()
    }

    /// The recovered description for one attribute of a declaring type.
    pub fn attribute(&self, class: &str, attribute: &str) -> Option<&str> {
        self.classes.get(class)?.attributes.get(attribute).map(String::as_str)
    }
}

fn recover_class(class_node: tree_sitter::Node, content: &[u8]) -> ClassDocs {
    let mut docs = ClassDocs::default();
    let Some(body) = class_node.child_by_field_name("body") else {
        return docs;
    };

    // name of the field a trailing literal would document
    let mut pending_field: Option<String> = None;
    let mut first_statement = true;

    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        // comments are not statements; they never break adjacency
        if statement.kind() == "comment" {
            continue;
        }

        if let Some(literal) = string_statement(statement, content) {
            if let Some(field) = pending_field.take() {
                docs.attributes.insert(field, literal);
            } else if first_statement {
                docs.description = Some(literal);
            }
        } else {
            pending_field = annotated_field_name(statement, content);
        }
        first_statement = false;
    }

    docs
}

/// The trimmed contents of a bare string-literal statement, if the
/// statement is one.
fn string_statement(statement: tree_sitter::Node, content: &[u8]) -> Option<String> {
    if statement.kind() != "expression_statement" || statement.named_child_count() != 1 {
        return None;
    }
    let string = statement.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }
    Some(string_contents(string, content))
}

/// Join the content segments of a string node, stripping the quote
/// delimiters and surrounding whitespace.
fn string_contents(string: tree_sitter::Node, content: &[u8]) -> String {
    let mut text = String::new();
    let mut cursor = string.walk();
    let mut found = false;
    for part in string.named_children(&mut cursor) {
        if part.kind() == "string_content" {
            text.push_str(node_text(part, content));
            found = true;
        }
    }
    if !found {
        // fall back to trimming delimiters off the raw literal
        text = node_text(string, content)
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
    }
    text.trim().to_string()
}

/// The attribute name of an annotated-field statement (`name: Type`).
fn annotated_field_name(statement: tree_sitter::Node, content: &[u8]) -> Option<String> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    assignment.child_by_field_name("type")?;
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    Some(node_text(left, content).to_string())
}
