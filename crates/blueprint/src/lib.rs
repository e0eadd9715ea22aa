//! CodeBuild integration-test blueprint.
//!
//! This crate describes, as a CloudFormation template, a CodeBuild project
//! that runs integration tests on GitHub pull requests together with the IAM
//! role it runs as. The role is confined to resources carrying the test-suite
//! naming prefix through paired allow/deny statements.
//!
//! ## Architectural Layer
//!
//! **Pure domain.** This crate has no I/O dependencies. It builds and renders
//! the document; loading configuration and writing the output live in the
//! `cli` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`LogicalId`, `GitHubAccountId`, etc.) |
//! | [`intrinsic`] | `Ref` / `Fn::Join` / `Fn::Sub` / `Fn::GetAtt` expressions |
//! | [`policy`] | Policy documents and the scoped allow/deny builder |
//! | [`iam`] | Role resource |
//! | [`codebuild`] | Project resource and webhook filters |
//! | [`template`] | Template container and rendering |
//! | [`variables`] | Typed blueprint inputs |
//! | [`codebuild_blueprint`] | The assembly routine |
//! | [`errors`] | Error type |

pub mod codebuild;
pub mod codebuild_blueprint;
pub mod errors;
pub mod iam;
pub mod identifiers;
pub mod intrinsic;
pub mod policy;
pub mod template;
pub mod variables;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use codebuild::{
    Artifacts, ArtifactsType, ComputeType, Environment, EnvironmentType, EnvironmentVariable,
    EnvironmentVariableType, FilterGroup, Project, ProjectTriggers, Source, SourceType,
    WebhookEvent, WebhookFilter, WebhookFilterType,
};
pub use codebuild_blueprint::{
    resource_scopes, Blueprint, BlueprintConfig, CodeBuildBlueprint, DEFAULT_GITHUB_ACCOUNT_IDS,
    DEPLOY_NAME, PROJECT_LOGICAL_ID, QUEUE_PREFIX, ROLE_LOGICAL_ID, TEST_SUITE_PREFIX,
};
pub use errors::BlueprintError;
pub use iam::{InlinePolicy, Role};
pub use identifiers::{GitHubAccountId, LogicalId, ParameterName, ServiceNamespace};
pub use intrinsic::{Expr, PseudoParameter};
pub use policy::{
    scoped_statement_pair, simple_assume_policy, Action, Effect, PolicyDocument, Principal,
    ResourceMatch, ResourceScope, Statement, POLICY_VERSION,
};
pub use template::{Parameter, ParameterType, Resource, Template, TEMPLATE_FORMAT_VERSION};
pub use variables::{BlueprintVariables, CfnString, ENVIRONMENT_NAME, GITHUB_URL};
