//! The template document: parameters plus resources keyed by logical id.
//!
//! Rendering goes through [`serde_json::Value`], whose maps keep keys sorted,
//! and uses a fixed four-space indent. Two renders of equal templates are
//! therefore byte-identical regardless of insertion order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::{BlueprintError, LogicalId, ParameterName, Project, Role};

/// CloudFormation template format version.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Type of a declared template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    /// Free-form string supplied at deploy time.
    String,
}

/// A value supplied by whoever deploys the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    kind: ParameterType,
    description: String,
}

impl Parameter {
    /// A string parameter.
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            kind: ParameterType::String,
            description: description.into(),
        }
    }

    /// Returns the parameter description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A resource declaration, rendered as `{"Type": ..., "Properties": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    /// Identity description.
    #[serde(rename = "AWS::IAM::Role")]
    Role(Role),
    /// Build project description.
    #[serde(rename = "AWS::CodeBuild::Project")]
    Project(Project),
}

impl Resource {
    /// Returns the role, if this resource is one.
    pub fn as_role(&self) -> Option<&Role> {
        match self {
            Self::Role(role) => Some(role),
            _ => None,
        }
    }

    /// Returns the project, if this resource is one.
    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Self::Project(project) => Some(project),
            _ => None,
        }
    }
}

/// A complete template document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<ParameterName, Parameter>,
    #[serde(rename = "Resources")]
    resources: BTreeMap<LogicalId, Resource>,
}

impl Template {
    /// An empty template with the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION,
            description: description.into(),
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }

    /// Declares a parameter. Names must be unique.
    pub fn add_parameter(
        &mut self,
        name: ParameterName,
        parameter: Parameter,
    ) -> Result<(), BlueprintError> {
        if self.parameters.contains_key(&name) {
            return Err(BlueprintError::DuplicateParameter { name });
        }
        self.parameters.insert(name, parameter);
        Ok(())
    }

    /// Adds a resource. Logical ids must be unique.
    pub fn add_resource(&mut self, id: LogicalId, resource: Resource) -> Result<(), BlueprintError> {
        if self.resources.contains_key(&id) {
            return Err(BlueprintError::DuplicateLogicalId { id });
        }
        debug!(logical_id = %id, "Adding resource to template");
        self.resources.insert(id, resource);
        Ok(())
    }

    /// Returns the template description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared parameters.
    pub fn parameters(&self) -> &BTreeMap<ParameterName, Parameter> {
        &self.parameters
    }

    /// Returns the resources keyed by logical id.
    pub fn resources(&self) -> &BTreeMap<LogicalId, Resource> {
        &self.resources
    }

    /// Iterates over the role resources.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.resources.values().filter_map(Resource::as_role)
    }

    /// Iterates over the project resources.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.resources.values().filter_map(Resource::as_project)
    }

    /// Renders the template as JSON with sorted keys and a four-space indent.
    pub fn to_json(&self) -> Result<String, BlueprintError> {
        let value = serde_json::to_value(self)?;
        let mut out = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut serializer)?;
        Ok(String::from_utf8(out)?)
    }
}
