//! The CodeBuild integration-test blueprint.
//!
//! Produces a template with one IAM role and one CodeBuild project. The role
//! may only act on resources named after the test suite; the project runs the
//! integration tests when an allowed GitHub account opens or updates a pull
//! request from `master` into `release`.

use tracing::{debug, info};

use crate::{
    scoped_statement_pair, simple_assume_policy, Action, Artifacts, BlueprintError,
    BlueprintVariables, ComputeType, Environment, EnvironmentVariable, Expr, FilterGroup,
    GitHubAccountId, InlinePolicy, LogicalId, PolicyDocument, Project, ProjectTriggers,
    PseudoParameter, Resource, ResourceScope, Role, ServiceNamespace, Source, Template,
    WebhookEvent, WebhookFilter,
};

/// Name shared by the project, its log groups and its policy.
pub const DEPLOY_NAME: &str = "runway-integration-tests";

/// Resource name prefix of the test suite.
///
/// Must match the stack used by the Terraform state integration tests
/// (`integration_tests/test_terraform/tf_state.cfn`).
pub const TEST_SUITE_PREFIX: &str = "testsuite-tf-state";

/// Queue name prefix used by the Terraform tests.
pub const QUEUE_PREFIX: &str = "terraform-";

/// GitHub accounts allowed to trigger builds when none are configured.
pub const DEFAULT_GITHUB_ACCOUNT_IDS: [u64; 1] = [627555];

/// Logical id of the role resource.
pub const ROLE_LOGICAL_ID: &str = "CodeBuildRole";

/// Logical id of the project resource.
pub const PROJECT_LOGICAL_ID: &str = "RunwayIntegrationTests";

const TEMPLATE_DESCRIPTION: &str = "Runway CodeBuild Project";
const CODEBUILD_SERVICE_PRINCIPAL: &str = "codebuild.amazonaws.com";
const BUILD_IMAGE: &str = "aws/codebuild/standard:2.0";
const BASE_BRANCH: &str = "release";
const HEAD_BRANCH: &str = "master";

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Anything that can produce a template.
pub trait Blueprint {
    /// Returns the blueprint (stack) name.
    fn name(&self) -> &str;

    /// Assembles the template.
    fn create_template(&self) -> Result<Template, BlueprintError>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings that are not template inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintConfig {
    github_account_ids: Vec<GitHubAccountId>,
}

impl BlueprintConfig {
    /// Creates a configuration with the given trigger allow-list.
    ///
    /// Returns [`BlueprintError::EmptyAccountAllowList`] if `github_account_ids`
    /// is empty.
    pub fn new(github_account_ids: Vec<GitHubAccountId>) -> Result<Self, BlueprintError> {
        if github_account_ids.is_empty() {
            return Err(BlueprintError::EmptyAccountAllowList);
        }
        Ok(Self { github_account_ids })
    }

    /// Parses a comma-separated list of numeric account ids (`"1, 2,3"`).
    pub fn from_account_list(raw: &str) -> Result<Self, BlueprintError> {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>()
                    .map(GitHubAccountId::new)
                    .map_err(|error| BlueprintError::Configuration {
                        message: format!("invalid GitHub account id '{part}': {error}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(ids)
    }

    /// Returns the accounts allowed to trigger builds.
    pub fn github_account_ids(&self) -> &[GitHubAccountId] {
        &self.github_account_ids
    }
}

impl Default for BlueprintConfig {
    fn default() -> Self {
        Self {
            github_account_ids: DEFAULT_GITHUB_ACCOUNT_IDS
                .iter()
                .copied()
                .map(GitHubAccountId::new)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resource scopes
// ---------------------------------------------------------------------------

fn namespace(name: &'static str) -> ServiceNamespace {
    ServiceNamespace::from_static(name)
}

fn prefixed(template: &str) -> Expr {
    Expr::sub(template, [("prefix", Expr::literal(TEST_SUITE_PREFIX))])
}

/// `arn:${Partition}:<service>:${Region}:${AccountId}:<resource>`
fn regional_arn(service: &str, resource: Expr) -> Expr {
    Expr::join(
        ":",
        [
            Expr::literal("arn"),
            Expr::pseudo(PseudoParameter::Partition),
            Expr::literal(service),
            Expr::pseudo(PseudoParameter::Region),
            Expr::pseudo(PseudoParameter::AccountId),
            resource,
        ],
    )
}

/// `arn:${Partition}:<resource>` for services without region or account.
fn global_arn(resource: Expr) -> Expr {
    Expr::join(
        ":",
        [Expr::literal("arn"), Expr::pseudo(PseudoParameter::Partition), resource],
    )
}

fn log_group_arn(suffix: &str) -> Expr {
    Expr::join(
        "",
        [
            Expr::literal("arn:"),
            Expr::pseudo(PseudoParameter::Partition),
            Expr::literal(":logs:"),
            Expr::pseudo(PseudoParameter::Region),
            Expr::literal(":"),
            Expr::pseudo(PseudoParameter::AccountId),
            Expr::literal(":log-group:/aws/codebuild/"),
            Expr::literal(DEPLOY_NAME),
            Expr::literal("*"),
            Expr::literal(suffix),
        ],
    )
}

/// The per-service scopes the build role is confined to, in policy order.
pub fn resource_scopes() -> Vec<ResourceScope> {
    let logs = namespace("logs");
    let logs_actions = ["CreateLogGroup", "CreateLogStream", "PutLogEvents"]
        .into_iter()
        .map(|name| Action::new(logs.clone(), name))
        .collect();

    vec![
        ResourceScope::new(
            logs,
            logs_actions,
            vec![log_group_arn(":*"), log_group_arn(":*/*")],
        ),
        ResourceScope::new(
            namespace("cloudformation"),
            vec![Action::all(namespace("cloudformation"))],
            vec![regional_arn("cloudformation", prefixed("stack/${prefix}/*"))],
        ),
        ResourceScope::new(
            namespace("dynamodb"),
            vec![Action::all(namespace("dynamodb"))],
            vec![regional_arn("dynamodb", prefixed("table/${prefix}-*"))],
        ),
        ResourceScope::new(
            namespace("s3"),
            vec![Action::all(namespace("s3"))],
            vec![
                global_arn(prefixed("s3:::${prefix}")),
                global_arn(prefixed("s3:::${prefix}/*")),
            ],
        ),
        ResourceScope::new(
            namespace("sqs"),
            vec![Action::all(namespace("sqs"))],
            vec![regional_arn("sqs", Expr::literal(format!("{QUEUE_PREFIX}*")))],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

/// Role plus CodeBuild project running the integration tests.
#[derive(Debug, Clone)]
pub struct CodeBuildBlueprint {
    name: String,
    variables: BlueprintVariables,
    config: BlueprintConfig,
}

impl CodeBuildBlueprint {
    /// Creates the blueprint.
    pub fn new(name: impl Into<String>, variables: BlueprintVariables, config: BlueprintConfig) -> Self {
        Self {
            name: name.into(),
            variables,
            config,
        }
    }

    fn build_role(&self) -> Role {
        let statements = resource_scopes()
            .iter()
            .flat_map(|scope| {
                let (allow, deny) = scoped_statement_pair(scope);
                [allow, deny]
            })
            .collect::<Vec<_>>();
        debug!(statements = statements.len(), "Assembled build role policy");

        let policy = InlinePolicy::new(
            Expr::join("", [Expr::literal(DEPLOY_NAME), Expr::literal("-policy")]),
            PolicyDocument::new(statements),
        );
        Role::new(simple_assume_policy(CODEBUILD_SERVICE_PRINCIPAL), vec![policy])
    }

    fn build_project(&self, role_id: LogicalId) -> Project {
        let environment = Environment::linux_container(
            ComputeType::Small,
            BUILD_IMAGE,
            vec![
                EnvironmentVariable::plaintext("CI", "1"),
                EnvironmentVariable::plaintext(
                    "DEPLOY_ENVIRONMENT",
                    self.variables.environment_name().to_expr(),
                ),
            ],
        );

        let filters = FilterGroup::new(vec![
            WebhookFilter::actor_account_ids(self.config.github_account_ids()),
            WebhookFilter::events(&[
                WebhookEvent::PullRequestCreated,
                WebhookEvent::PullRequestUpdated,
                WebhookEvent::PullRequestReopened,
            ]),
            WebhookFilter::base_branch(BASE_BRANCH),
            WebhookFilter::head_branch(HEAD_BRANCH),
        ]);

        Project::new(
            DEPLOY_NAME,
            Expr::get_att(role_id, "Arn"),
            Artifacts::none(),
            environment,
            Source::github(self.variables.github_url().to_expr()),
            ProjectTriggers::webhook(vec![filters]),
        )
    }
}

impl Blueprint for CodeBuildBlueprint {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_template(&self) -> Result<Template, BlueprintError> {
        let mut template = Template::new(TEMPLATE_DESCRIPTION);
        self.variables.environment_name().declare(&mut template)?;
        self.variables.github_url().declare(&mut template)?;

        let role_id = LogicalId::from_static(ROLE_LOGICAL_ID);
        template.add_resource(role_id.clone(), Resource::Role(self.build_role()))?;
        template.add_resource(
            LogicalId::from_static(PROJECT_LOGICAL_ID),
            Resource::Project(self.build_project(role_id)),
        )?;

        info!(
            blueprint = %self.name,
            resources = template.resources().len(),
            parameters = template.parameters().len(),
            "Template assembled"
        );
        Ok(template)
    }
}
