//! Environment-driven CLI configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the caller. A bare invocation renders the `test` namespace with
//! both blueprint variables left as template parameters; setting a variable
//! substitutes it as a literal instead.

use std::env;

use anyhow::{Context, Result};
use blueprint::{BlueprintConfig, BlueprintVariables};

const NAMESPACE: &str = "test";

/// Settings resolved before the blueprint is built.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Stack / namespace name reported by the blueprint.
    pub namespace: String,
    /// Template inputs.
    pub variables: BlueprintVariables,
    /// Trigger allow-list and other non-input settings.
    pub blueprint: BlueprintConfig,
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// A variable that is set but blank is an error, never a fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |name: &str| lookup(name).map(|v| v.trim().to_owned());

        let variables = BlueprintVariables::from_optional(
            value("CODEBUILD_ENVIRONMENT_NAME"),
            value("CODEBUILD_GITHUB_URL"),
        )
        .context("invalid CODEBUILD_ENVIRONMENT_NAME or CODEBUILD_GITHUB_URL")?;

        let blueprint = match value("CODEBUILD_GITHUB_ACCOUNT_IDS") {
            Some(raw) => BlueprintConfig::from_account_list(&raw)
                .context("invalid CODEBUILD_GITHUB_ACCOUNT_IDS")?,
            None => BlueprintConfig::default(),
        };

        Ok(Self {
            namespace: NAMESPACE.to_owned(),
            variables,
            blueprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use blueprint::{Blueprint, CfnString, CodeBuildBlueprint, GitHubAccountId};

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<CliConfig> {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();
        CliConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_render_parameterized_test_context() -> Result<()> {
        let config = config(&[])?;

        assert_eq!(config.namespace, "test");
        assert!(matches!(
            config.variables.environment_name(),
            CfnString::Parameter { .. }
        ));
        assert!(matches!(config.variables.github_url(), CfnString::Parameter { .. }));
        assert_eq!(
            config.blueprint.github_account_ids(),
            &[GitHubAccountId::new(627555)]
        );
        Ok(())
    }

    #[test]
    fn default_template_declares_both_parameters() -> Result<()> {
        let config = config(&[])?;
        let template =
            CodeBuildBlueprint::new(config.namespace, config.variables, config.blueprint)
                .create_template()?;

        let names = template
            .parameters()
            .keys()
            .map(|name| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["EnvironmentName", "GitHubUrl"]);
        Ok(())
    }

    #[test]
    fn set_variables_are_substituted_as_literals() -> Result<()> {
        let config = config(&[
            ("CODEBUILD_ENVIRONMENT_NAME", "prod"),
            ("CODEBUILD_GITHUB_URL", "https://github.com/o/r"),
            ("CODEBUILD_GITHUB_ACCOUNT_IDS", "1,2"),
        ])?;

        assert_eq!(
            config.variables.environment_name(),
            &CfnString::Value("prod".to_owned())
        );
        assert_eq!(
            config.variables.github_url(),
            &CfnString::Value("https://github.com/o/r".to_owned())
        );
        assert_eq!(config.blueprint.github_account_ids().len(), 2);
        Ok(())
    }

    #[test]
    fn blank_environment_name_is_rejected() {
        assert!(config(&[("CODEBUILD_ENVIRONMENT_NAME", "")]).is_err());
        assert!(config(&[("CODEBUILD_ENVIRONMENT_NAME", "   ")]).is_err());
    }

    #[test]
    fn blank_github_url_is_rejected() {
        assert!(config(&[("CODEBUILD_GITHUB_URL", " ")]).is_err());
    }

    #[test]
    fn blank_account_ids_are_rejected() {
        assert!(config(&[("CODEBUILD_GITHUB_ACCOUNT_IDS", "")]).is_err());
    }

    #[test]
    fn invalid_account_ids_are_rejected() {
        assert!(config(&[("CODEBUILD_GITHUB_ACCOUNT_IDS", "abc")]).is_err());
    }
}
