//! Top-level error type for blueprint assembly.
//!
//! Assembly itself cannot fail for well-typed inputs; every variant here is
//! produced either by the typing layer (variables, configuration) before
//! assembly starts, by misuse of the [`crate::Template`] container, or by
//! rendering.

use thiserror::Error;

use crate::{LogicalId, ParameterName};

/// Errors produced while building or rendering a template.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// A blueprint variable was given a value its type does not accept.
    #[error("Invalid value for variable '{name}': {reason}")]
    InvalidVariable {
        /// Variable name as declared by the blueprint (e.g. `"EnvironmentName"`).
        name: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// The GitHub account allow-list is empty, so no event could ever
    /// trigger a build.
    #[error("At least one GitHub account id must be allowed to trigger builds")]
    EmptyAccountAllowList,

    /// A resource with the same logical id is already present in the template.
    #[error("Duplicate resource logical id: {id}")]
    DuplicateLogicalId {
        /// The conflicting logical id.
        id: LogicalId,
    },

    /// A parameter with the same name is already declared in the template.
    #[error("Duplicate parameter: {name}")]
    DuplicateParameter {
        /// The conflicting parameter name.
        name: ParameterName,
    },

    /// The blueprint configuration is invalid.
    ///
    /// Produced at load time; a blueprint is never assembled from an invalid
    /// configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The template could not be rendered as JSON.
    #[error("Template serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The rendered template bytes are not valid UTF-8.
    #[error("Rendered template is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
