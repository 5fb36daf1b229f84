//! Core Data Model
//!
//! The canonical property model produced by component analysis:
//! - [`SchemaProperty`]: one analyzed attribute (carried type, optionality,
//!   recovered description)
//! - [`TypeDefinition`]: a named structured type referenced by properties
//! - [`ComponentSchema`]: one discovered component (inputs, outputs,
//!   type-definition registry)
//!
//! These values are constructed once per analysis pass and never mutated
//! afterwards; serialization to the package-schema document is a read-only
//! projection in [`crate::schema`].

pub mod error;
pub mod utils;

pub use error::{IntrospecError, Result};
pub use utils::snake_to_camel;

use indexmap::IndexMap;

/// The classified carried type of a property.
///
/// Primitive kinds map to fixed schema tokens; anything else is retained as
/// an opaque structured-type name for the forward-looking nested-type
/// registry and renders as a generic object token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Float,
    Boolean,
    /// A non-primitive carried type, by declared name
    Object(String),
}

impl PropertyType {
    /// Look up the primitive kind for a bare type name, if it is one.
    pub fn primitive(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Self::String),
            "int" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// One analyzed attribute.
///
/// Exactly one of a primitive `property_type` and a `type_ref` into the
/// type-definition registry is meaningful at a time. `optional` reflects
/// only the outermost Optional wrapper of the declared type, independent of
/// any wrapping inside deferred or boxed shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperty {
    pub property_type: Option<PropertyType>,
    /// Reference into [`ComponentSchema::type_definitions`]
    pub type_ref: Option<String>,
    pub optional: bool,
    pub description: Option<String>,
}

impl SchemaProperty {
    pub fn new(property_type: PropertyType, optional: bool) -> Self {
        Self {
            property_type: Some(property_type),
            type_ref: None,
            optional,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// A named structured type referenced by one or more properties.
///
/// The registry holding these exists for forward extensibility; analysis
/// passes that encounter no nested structured types legitimately leave it
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub properties: IndexMap<String, SchemaProperty>,
    pub description: Option<String>,
}

/// One discovered component: its documentation, constructor inputs, declared
/// outputs, and nested-type registry. Maps preserve declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSchema {
    pub description: Option<String>,
    pub inputs: IndexMap<String, SchemaProperty>,
    pub outputs: IndexMap<String, SchemaProperty>,
    pub type_definitions: IndexMap<String, TypeDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_lookup() {
        assert_eq!(PropertyType::primitive("str"), Some(PropertyType::String));
        assert_eq!(PropertyType::primitive("int"), Some(PropertyType::Integer));
        assert_eq!(PropertyType::primitive("float"), Some(PropertyType::Float));
        assert_eq!(PropertyType::primitive("bool"), Some(PropertyType::Boolean));
        assert_eq!(PropertyType::primitive("bytes"), None);
    }

    #[test]
    fn test_schema_property_builder() {
        let prop = SchemaProperty::new(PropertyType::String, true)
            .with_description(Some("The private key.".to_string()));
        assert_eq!(prop.property_type, Some(PropertyType::String));
        assert!(prop.optional);
        assert!(prop.type_ref.is_none());
        assert_eq!(prop.description.as_deref(), Some("The private key."));
    }
}
