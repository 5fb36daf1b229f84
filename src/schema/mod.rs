//! Package Schema Serialization
//!
//! Projects analyzed component schemas into the portable package-schema
//! document consumed by the orchestration host. The projection is pure and
//! deterministic: property order follows the analyzed maps (which follow
//! declaration order in source), required lists are derived at
//! serialization time from the `optional` flags, and the same component
//! map always yields a byte-identical document.

use indexmap::IndexMap;
use serde::Serialize;

use crate::constants::schema::OBJECT_TOKEN;
use crate::types::{ComponentSchema, PropertyType, Result, SchemaProperty};

/// One property of the serialized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub will_replace_on_changes: Option<bool>,
    pub items: Option<ItemType>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

impl Property {
    /// Project an analyzed property into its document form.
    pub fn from_analyzed(property: &SchemaProperty) -> Self {
        Self {
            description: property.description.clone(),
            property_type: property.property_type.as_ref().map(type_to_str),
            will_replace_on_changes: Some(false),
            items: None,
            reference: property.type_ref.clone(),
        }
    }
}

/// Element type of a list-shaped property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemType {
    #[serde(rename = "type")]
    pub item_type: String,
}

/// One resource entry of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub is_component: bool,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub input_properties: IndexMap<String, Property>,
    pub required_inputs: Vec<String>,
    pub properties: IndexMap<String, Property>,
    pub required: Vec<String>,
}

/// The serialized package-schema document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub resources: IndexMap<String, Resource>,
}

impl PackageSpec {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The fixed schema token for a classified carried type.
pub fn type_to_str(property_type: &PropertyType) -> String {
    match property_type {
        PropertyType::String => "string".to_string(),
        PropertyType::Integer => "integer".to_string(),
        PropertyType::Float => "number".to_string(),
        PropertyType::Boolean => "boolean".to_string(),
        PropertyType::Object(_) => OBJECT_TOKEN.to_string(),
    }
}

/// Flatten analyzed component schemas into one package-schema document.
///
/// Resources are keyed `<name>:index:<Component>`; required lists contain
/// the non-optional property names in declaration order.
pub fn generate_schema(
    name: &str,
    display_name: &str,
    version: &str,
    components: &IndexMap<String, ComponentSchema>,
) -> PackageSpec {
    let mut resources = IndexMap::new();
    for (component_name, component) in components {
        let resource_id = format!("{}:index:{}", name, component_name);
        resources.insert(
            resource_id,
            Resource {
                is_component: true,
                description: component.description.clone(),
                type_name: Some(component_name.clone()),
                input_properties: project_properties(&component.inputs),
                required_inputs: required_names(&component.inputs),
                properties: project_properties(&component.outputs),
                required: required_names(&component.outputs),
            },
        );
    }

    PackageSpec {
        name: name.to_string(),
        display_name: display_name.to_string(),
        version: version.to_string(),
        resources,
    }
}

fn project_properties(properties: &IndexMap<String, SchemaProperty>) -> IndexMap<String, Property> {
    properties
        .iter()
        .map(|(name, property)| (name.clone(), Property::from_analyzed(property)))
        .collect()
}

fn required_names(properties: &IndexMap<String, SchemaProperty>) -> Vec<String> {
    properties
        .iter()
        .filter(|(_, property)| !property.optional)
        .map(|(name, _)| name.clone())
        .collect()
}
