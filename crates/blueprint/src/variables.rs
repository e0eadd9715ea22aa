//! Typed blueprint variables.
//!
//! A [`CfnString`] is either a literal value, substituted verbatim into the
//! template, or a deploy-time parameter, in which case the template declares
//! the parameter and refers to it with `Ref`. Constructors reject empty values
//! so assembly never sees them.

use crate::{BlueprintError, Expr, Parameter, ParameterName, Template};

/// A string-typed blueprint variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfnString {
    /// Value known at generation time.
    Value(String),
    /// Value supplied at deploy time through a template parameter.
    Parameter {
        /// Parameter name declared in the template.
        name: ParameterName,
        /// Parameter description shown to whoever deploys the template.
        description: String,
    },
}

impl CfnString {
    /// Returns the expression to place wherever the variable is used.
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Value(value) => Expr::literal(value.clone()),
            Self::Parameter { name, .. } => Expr::parameter(name),
        }
    }

    /// Declares the backing parameter in `template`, if there is one.
    pub fn declare(&self, template: &mut Template) -> Result<(), BlueprintError> {
        match self {
            Self::Value(_) => Ok(()),
            Self::Parameter { name, description } => {
                template.add_parameter(name.clone(), Parameter::string(description.clone()))
            }
        }
    }
}

/// Name of the variable holding the deployment environment.
pub const ENVIRONMENT_NAME: &str = "EnvironmentName";

/// Name of the variable holding the repository URL.
pub const GITHUB_URL: &str = "GitHubUrl";

/// Inputs of the CodeBuild blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintVariables {
    environment_name: CfnString,
    github_url: CfnString,
}

impl BlueprintVariables {
    /// Literal values for both variables.
    ///
    /// Returns [`BlueprintError::InvalidVariable`] if either value is empty.
    /// The URL is otherwise not validated.
    pub fn from_values(
        environment_name: impl Into<String>,
        github_url: impl Into<String>,
    ) -> Result<Self, BlueprintError> {
        Self::from_optional(Some(environment_name.into()), Some(github_url.into()))
    }

    /// Both variables as deploy-time template parameters.
    pub fn as_parameters() -> Self {
        Self {
            environment_name: environment_name_parameter(),
            github_url: github_url_parameter(),
        }
    }

    /// A literal for each value given, a template parameter for each `None`.
    ///
    /// Returns [`BlueprintError::InvalidVariable`] if a given value is empty.
    pub fn from_optional(
        environment_name: Option<String>,
        github_url: Option<String>,
    ) -> Result<Self, BlueprintError> {
        let environment_name = match environment_name {
            Some(value) => CfnString::Value(non_empty(ENVIRONMENT_NAME, value)?),
            None => environment_name_parameter(),
        };
        let github_url = match github_url {
            Some(value) => CfnString::Value(non_empty(GITHUB_URL, value)?),
            None => github_url_parameter(),
        };
        Ok(Self {
            environment_name,
            github_url,
        })
    }

    /// Returns the `EnvironmentName` variable.
    pub fn environment_name(&self) -> &CfnString {
        &self.environment_name
    }

    /// Returns the `GitHubUrl` variable.
    pub fn github_url(&self) -> &CfnString {
        &self.github_url
    }
}

fn environment_name_parameter() -> CfnString {
    CfnString::Parameter {
        name: ParameterName::from_static(ENVIRONMENT_NAME),
        description: "Name of environment".to_owned(),
    }
}

fn github_url_parameter() -> CfnString {
    CfnString::Parameter {
        name: ParameterName::from_static(GITHUB_URL),
        description: "URL to GitHub repository".to_owned(),
    }
}

fn non_empty(name: &str, value: String) -> Result<String, BlueprintError> {
    if value.is_empty() {
        Err(BlueprintError::InvalidVariable {
            name: name.to_owned(),
            reason: "value must not be empty".to_owned(),
        })
    } else {
        Ok(value)
    }
}
