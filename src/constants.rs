//! Global Constants
//!
//! Centralized constants for discovery and schema generation.

/// Definition-file discovery constants
pub mod discovery {
    /// File extension of component definition files
    pub const DEFINITION_EXTENSION: &str = "py";

    /// Base class marking a class as a component (matched on the last
    /// dotted segment, so both `ComponentResource` and
    /// `pulumi.ComponentResource` qualify)
    pub const COMPONENT_BASE: &str = "ComponentResource";

    /// Constructor parameter carrying the argument-type annotation
    pub const ARGS_PARAMETER: &str = "args";
}

/// Schema document constants
pub mod schema {
    /// Version used when none is configured
    pub const DEFAULT_VERSION: &str = "0.1.0";

    /// Token rendered for non-primitive property types
    pub const OBJECT_TOKEN: &str = "object";
}

/// Configuration constants
pub mod config {
    /// Project configuration file name
    pub const CONFIG_FILE: &str = "introspec.toml";

    /// Environment variable prefix (e.g. INTROSPEC_NAME)
    pub const ENV_PREFIX: &str = "INTROSPEC_";
}
