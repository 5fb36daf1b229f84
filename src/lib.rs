//! Introspec - Component Schema Inference
//!
//! Infers a structured, serializable schema describing the public
//! input/output contract of component definitions by introspecting their
//! declared type signatures and source-level documentation.
//!
//! ## Core Pieces
//!
//! - **Discovery**: enumerate a directory's definition files
//! - **Symbol Loading**: materialize each file's declared classes and
//!   annotated attributes from a tree-sitter parse, memoized per file
//! - **Type Classification**: a small closed algebra over declared type
//!   expressions (plain, optional, deferred, wrapped, unrecognized)
//! - **Docstring Recovery**: a second, independent source parse that
//!   associates trailing string literals with the fields they document
//! - **Schema Serialization**: a deterministic projection of analyzed
//!   components into the portable package-schema document
//!
//! ## Quick Start
//!
//! ```ignore
//! use introspec::{Analyzer, generate_schema};
//!
//! let mut analyzer = Analyzer::new("./components");
//! let components = analyzer.analyze()?;
//! let spec = generate_schema("tls", "tls", "1.0.0", &components);
//! println!("{}", spec.to_json()?);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: discovery, symbol loading, classification, docstrings
//! - [`schema`]: package-schema document model and generation
//! - [`config`]: package settings with file and environment resolution
//! - [`types`]: the canonical property model and error types

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod schema;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Analysis
pub use analyzer::{Analyzer, ComponentHandle, DefinitionScanner, DocIndex, TypeExpr};

// Data model
pub use types::{ComponentSchema, PropertyType, SchemaProperty, TypeDefinition};

// Error types
pub use types::error::{IntrospecError, Result};

// Schema document
pub use schema::{PackageSpec, Property, Resource, generate_schema};

// Configuration
pub use config::{ConfigLoader, PackageConfig};
