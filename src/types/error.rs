//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//!
//! ## Design Principles
//!
//! - Single unified error type (IntrospecError) for the whole analysis pass
//! - Structured variants carrying the component and attribute that failed,
//!   so classification errors are attributable in diagnostics
//! - No panic/unwrap in library code - all failures surface as errors
//!
//! Analysis errors are static failures over fixed input: there is no retry
//! machinery and no transient category. A failure is fatal to the single
//! component analysis that triggered it; whole-directory scans isolate
//! failures per file at the orchestrator level instead.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, IntrospecError>;

#[derive(Debug, Error)]
pub enum IntrospecError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Source Loading
    // -------------------------------------------------------------------------
    /// A definition file could not be parsed or materialized
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    // -------------------------------------------------------------------------
    // Analysis
    // -------------------------------------------------------------------------
    /// The requested component is not declared by any definition file
    #[error("Could not find component {name}")]
    ComponentNotFound { name: String },

    /// A component constructor lacks a recognizable argument-type annotation
    #[error("Could not find an args type on {component}'s constructor")]
    MissingArgsType { component: String },

    /// A declared type does not match any recognized shape
    #[error("Unsupported type {declared} for {component}.{attribute}")]
    UnsupportedType {
        component: String,
        attribute: String,
        declared: String,
    },

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),
}

impl IntrospecError {
    /// Shorthand for a parse error scoped to a file path.
    pub fn parse(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }
}
