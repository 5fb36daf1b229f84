//! Component Analyzer Module
//!
//! Orchestrates definition-file discovery, symbol loading, type
//! classification, and docstring recovery into per-component schemas:
//!
//! - [`scanner`]: definition-file enumeration
//! - [`loader`]: memoized symbol materialization
//! - [`typeexpr`] / [`classify`]: the declared-type algebra
//! - [`docstrings`]: source-text documentation recovery
//!
//! An [`Analyzer::analyze`] pass is a finite, sequential, single-shot scan:
//! discovery failures are fatal, while a failure analyzing one file is
//! logged and does not abort the others. Named lookups
//! ([`Analyzer::find_component`]) surface their failure directly.

pub mod classify;
pub mod docstrings;
pub mod loader;
pub mod scanner;
pub mod typeexpr;

pub use classify::Resolved;
pub use docstrings::DocIndex;
pub use loader::{ClassSymbol, ModuleLoader, ModuleSymbols};
pub use scanner::DefinitionScanner;
pub use typeexpr::TypeExpr;

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{
    ComponentSchema, IntrospecError, Result, SchemaProperty, snake_to_camel,
};

/// A component located by name, with its resolved constructor-argument
/// type. This is what the host-boundary construct operation needs before
/// instantiating: where the component lives and what its inputs bind
/// against.
#[derive(Debug, Clone)]
pub struct ComponentHandle {
    pub file: PathBuf,
    pub component: String,
    pub args_type: TypeExpr,
}

/// Analyzes the component definitions of one directory.
pub struct Analyzer {
    path: PathBuf,
    loader: ModuleLoader,
}

impl Analyzer {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            loader: ModuleLoader::new(),
        }
    }

    /// Analyze every definition file in the directory.
    ///
    /// Components are keyed by class name in discovery order. A file that
    /// fails to load or analyze is skipped with a warning; failure to
    /// enumerate the directory itself is fatal.
    pub fn analyze(&mut self) -> Result<IndexMap<String, ComponentSchema>> {
        let files = DefinitionScanner::new(&self.path).scan()?;
        let docs = DocIndex::recover_all(&self.path)?;

        let mut components = IndexMap::new();
        for file in files {
            match self.analyze_file(&file, &docs) {
                Ok(found) => components.extend(found),
                Err(e) => warn!("Skipping {}: {}", file.display(), e),
            }
        }
        Ok(components)
    }

    /// Analyze the components declared by one definition file.
    pub fn analyze_file(
        &mut self,
        file: &Path,
        docs: &DocIndex,
    ) -> Result<IndexMap<String, ComponentSchema>> {
        let symbols = self.loader.load(file)?;
        let mut components = IndexMap::new();
        for class in symbols.components() {
            debug!("Analyzing component {}", class.name);
            let schema = analyze_component(&symbols, class, docs)?;
            components.insert(class.name.clone(), schema);
        }
        Ok(components)
    }

    /// Analyze a single component by name, wherever it is declared.
    pub fn analyze_component(&mut self, name: &str) -> Result<ComponentSchema> {
        let handle = self.find_component(name)?;
        let symbols = self.loader.load(&handle.file)?;
        let docs = DocIndex::recover_all(&self.path)?;
        let class = symbols
            .class(name)
            .ok_or_else(|| IntrospecError::ComponentNotFound {
                name: name.to_string(),
            })?;
        analyze_component(&symbols, class, &docs)
    }

    /// Scan files in enumeration order for the first component declared
    /// with this name.
    pub fn find_component(&mut self, name: &str) -> Result<ComponentHandle> {
        for file in DefinitionScanner::new(&self.path).scan()? {
            let symbols = self.loader.load(&file)?;
            let Some(class) = symbols.class(name) else {
                continue;
            };
            if !class.is_component() {
                continue;
            }
            let args_type =
                class
                    .args_type
                    .clone()
                    .ok_or_else(|| IntrospecError::MissingArgsType {
                        component: name.to_string(),
                    })?;
            return Ok(ComponentHandle {
                file,
                component: name.to_string(),
                args_type,
            });
        }
        Err(IntrospecError::ComponentNotFound {
            name: name.to_string(),
        })
    }

    /// Normalized names of the attributes a freshly constructed instance
    /// surfaces as observable state: exactly those declared with a
    /// deferred or box-wrapped shape. Plain attributes are not state, even
    /// when present.
    ///
    /// Works from an already-resolved handle so a lookup scans the
    /// directory once.
    pub fn component_outputs(&mut self, handle: &ComponentHandle) -> Result<Vec<String>> {
        let symbols = self.loader.load(&handle.file)?;
        let class = symbols
            .class(&handle.component)
            .ok_or_else(|| IntrospecError::ComponentNotFound {
                name: handle.component.clone(),
            })?;
        Ok(class
            .attributes
            .iter()
            .filter(|(_, expr)| classify::is_observable(expr))
            .map(|(attr, _)| snake_to_camel(attr))
            .collect())
    }
}

/// Build one component's schema from its loaded declaration.
fn analyze_component(
    symbols: &ModuleSymbols,
    class: &ClassSymbol,
    docs: &DocIndex,
) -> Result<ComponentSchema> {
    let args_type = class
        .args_type
        .as_ref()
        .ok_or_else(|| IntrospecError::MissingArgsType {
            component: class.name.clone(),
        })?;
    let args_name = args_type.head().ok_or_else(|| {
        IntrospecError::parse(
            format!(
                "Unexpected constructor argument type {} on {}",
                args_type, class.name
            ),
            symbols.path.display().to_string(),
        )
    })?;
    let args_class = symbols.class(args_name).ok_or_else(|| {
        IntrospecError::parse(
            format!("Argument type {} is not declared in this file", args_name),
            symbols.path.display().to_string(),
        )
    })?;

    Ok(ComponentSchema {
        description: docs.class_description(&class.name).map(String::from),
        inputs: analyze_attributes(args_class, docs)?,
        outputs: analyze_attributes(class, docs)?,
        type_definitions: IndexMap::new(),
    })
}

/// Classify each declared attribute of a type and merge in its recovered
/// description. Keys are normalized to the outward naming convention;
/// descriptions are looked up by the source-level name.
fn analyze_attributes(
    class: &ClassSymbol,
    docs: &DocIndex,
) -> Result<IndexMap<String, SchemaProperty>> {
    let mut properties = IndexMap::new();
    for (attribute, expr) in &class.attributes {
        let resolved =
            classify::resolve(expr).ok_or_else(|| IntrospecError::UnsupportedType {
                component: class.name.clone(),
                attribute: attribute.clone(),
                declared: expr.to_string(),
            })?;
        let description = docs.attribute(&class.name, attribute).map(String::from);
        properties.insert(
            snake_to_camel(attribute),
            SchemaProperty::new(resolved.property_type, resolved.optional)
                .with_description(description),
        );
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyType;
    use std::fs;
    use tempfile::TempDir;

    const CERT_DEFINITION: &str = r#"
from typing import Optional

import pulumi


class SelfSignedCertificateArgs:
    """
    The arguments for creating a self-signed certificate.
    """

    algorithm: Optional[pulumi.Input[str]]
    """The algorithm to use for the key."""
    ecdsa_curve: Optional[pulumi.Input[str]]


class SelfSignedCertificate(pulumi.ComponentResource):
    """
    A self-signed certificate.
    """

    pem: pulumi.Output[str]
    private_key: pulumi.Output[str]
    """The private key."""
    ca_cert: pulumi.Output[str]

    def __init__(self, args: SelfSignedCertificateArgs, opts=None):
        pass
"#;

    fn definition_dir(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cert.py"), content).unwrap();
        dir
    }

    #[test]
    fn test_analyze_directory_end_to_end() {
        let dir = definition_dir(CERT_DEFINITION);
        let mut analyzer = Analyzer::new(dir.path());
        let components = analyzer.analyze().unwrap();

        assert_eq!(components.len(), 1);
        let schema = &components["SelfSignedCertificate"];
        assert_eq!(schema.description.as_deref(), Some("A self-signed certificate."));

        let input_names: Vec<_> = schema.inputs.keys().cloned().collect();
        assert_eq!(input_names, vec!["algorithm", "ecdsaCurve"]);
        for property in schema.inputs.values() {
            assert_eq!(property.property_type, Some(PropertyType::String));
            assert!(property.optional);
        }
        assert_eq!(
            schema.inputs["algorithm"].description.as_deref(),
            Some("The algorithm to use for the key.")
        );
        assert_eq!(schema.inputs["ecdsaCurve"].description, None);

        let output_names: Vec<_> = schema.outputs.keys().cloned().collect();
        assert_eq!(output_names, vec!["pem", "privateKey", "caCert"]);
        for property in schema.outputs.values() {
            assert_eq!(property.property_type, Some(PropertyType::String));
            assert!(!property.optional);
        }
        assert_eq!(
            schema.outputs["privateKey"].description.as_deref(),
            Some("The private key.")
        );
        assert!(schema.type_definitions.is_empty());
    }

    #[test]
    fn test_component_outputs_filters_unwrapped_attributes() {
        let dir = definition_dir(
            r#"
from typing import Optional

import pulumi


class WidgetArgs:
    size: Optional[pulumi.Input[int]]


class Widget(pulumi.ComponentResource):
    pem: pulumi.Output[str]
    private_key: pulumi.Output[str]
    ca_cert: pulumi.Output[str]
    status: str
    retries: Optional[int]

    def __init__(self, args: WidgetArgs):
        pass
"#,
        );
        let mut analyzer = Analyzer::new(dir.path());
        let handle = analyzer.find_component("Widget").unwrap();
        let outputs = analyzer.component_outputs(&handle).unwrap();
        assert_eq!(outputs, vec!["pem", "privateKey", "caCert"]);
    }

    #[test]
    fn test_component_outputs_does_not_rescan_the_directory() {
        let dir = definition_dir(CERT_DEFINITION);
        let mut analyzer = Analyzer::new(dir.path());
        let handle = analyzer.find_component("SelfSignedCertificate").unwrap();

        // A file that would break a fresh scan must not affect a lookup
        // against a handle that is already resolved.
        fs::write(dir.path().join("a_broken.py"), "class Broken(:\n").unwrap();

        let outputs = analyzer.component_outputs(&handle).unwrap();
        assert_eq!(outputs, vec!["pem", "privateKey", "caCert"]);
    }

    #[test]
    fn test_find_component_resolves_args_type() {
        let dir = definition_dir(CERT_DEFINITION);
        let mut analyzer = Analyzer::new(dir.path());
        let handle = analyzer.find_component("SelfSignedCertificate").unwrap();
        assert_eq!(handle.component, "SelfSignedCertificate");
        assert_eq!(
            handle.args_type,
            TypeExpr::Name("SelfSignedCertificateArgs".to_string())
        );
    }

    #[test]
    fn test_find_component_unknown_name() {
        let dir = definition_dir(CERT_DEFINITION);
        let mut analyzer = Analyzer::new(dir.path());
        assert!(matches!(
            analyzer.find_component("LoadBalancer"),
            Err(IntrospecError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_args_annotation() {
        let dir = definition_dir(
            r#"
import pulumi


class Widget(pulumi.ComponentResource):
    pem: pulumi.Output[str]

    def __init__(self, args):
        pass
"#,
        );
        let mut analyzer = Analyzer::new(dir.path());
        let docs = DocIndex::default();
        let file = dir.path().join("cert.py");
        assert!(matches!(
            analyzer.analyze_file(&file, &docs),
            Err(IntrospecError::MissingArgsType { component }) if component == "Widget"
        ));
    }

    #[test]
    fn test_unsupported_attribute_type_is_attributed() {
        let dir = definition_dir(
            r#"
import pulumi


class WidgetArgs:
    handler: Callable[[int], str]


class Widget(pulumi.ComponentResource):
    pem: pulumi.Output[str]

    def __init__(self, args: WidgetArgs):
        pass
"#,
        );
        let mut analyzer = Analyzer::new(dir.path());
        let docs = DocIndex::default();
        let file = dir.path().join("cert.py");
        match analyzer.analyze_file(&file, &docs) {
            Err(IntrospecError::UnsupportedType {
                component,
                attribute,
                ..
            }) => {
                assert_eq!(component, "WidgetArgs");
                assert_eq!(attribute, "handler");
            }
            other => panic!("expected UnsupportedType, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_broken_file_does_not_abort_directory_scan() {
        let dir = definition_dir(CERT_DEFINITION);
        fs::write(dir.path().join("broken.py"), "class Broken(:\n").unwrap();

        let mut analyzer = Analyzer::new(dir.path());
        let components = analyzer.analyze().unwrap();
        assert_eq!(components.len(), 1);
        assert!(components.contains_key("SelfSignedCertificate"));
    }

    #[test]
    fn test_missing_directory_fails_the_scan() {
        let dir = TempDir::new().unwrap();
        let mut analyzer = Analyzer::new(dir.path().join("missing"));
        assert!(analyzer.analyze().is_err());
    }

    #[test]
    fn test_non_component_class_with_same_name_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a_plain.py"),
            "class Widget:\n    value: str\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b_component.py"),
            r#"
import pulumi


class WidgetArgs:
    size: Optional[pulumi.Input[int]]


class Widget(pulumi.ComponentResource):
    status: pulumi.Output[str]

    def __init__(self, args: WidgetArgs):
        pass
"#,
        )
        .unwrap();

        let mut analyzer = Analyzer::new(dir.path());
        let handle = analyzer.find_component("Widget").unwrap();
        assert!(handle.file.ends_with("b_component.py"));
    }
}
