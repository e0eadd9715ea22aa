//! `AWS::CodeBuild::Project` resource properties and webhook trigger filters.

use serde::Serialize;

use crate::{Expr, GitHubAccountId};

// ---------------------------------------------------------------------------
// Build environment
// ---------------------------------------------------------------------------

/// Build output handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactsType {
    /// The build produces nothing to upload.
    NoArtifacts,
}

/// `Artifacts` property of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    #[serde(rename = "Type")]
    kind: ArtifactsType,
}

impl Artifacts {
    /// No build output is stored.
    pub fn none() -> Self {
        Self {
            kind: ArtifactsType::NoArtifacts,
        }
    }
}

/// Build host size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComputeType {
    /// 3 GB memory, 2 vCPUs.
    #[serde(rename = "BUILD_GENERAL1_SMALL")]
    Small,
}

/// Container platform of the build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentType {
    /// Linux container.
    LinuxContainer,
}

/// How an environment variable value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentVariableType {
    /// Stored verbatim in the project definition.
    Plaintext,
}

/// One environment variable exported to the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentVariable {
    name: String,
    #[serde(rename = "Type")]
    kind: EnvironmentVariableType,
    value: Expr,
}

impl EnvironmentVariable {
    /// A plaintext variable.
    pub fn plaintext(name: impl Into<String>, value: impl Into<Expr>) -> Self {
        Self {
            name: name.into(),
            kind: EnvironmentVariableType::Plaintext,
            value: value.into(),
        }
    }

    /// Returns the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variable value.
    pub fn value(&self) -> &Expr {
        &self.value
    }
}

/// `Environment` property of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    compute_type: ComputeType,
    environment_variables: Vec<EnvironmentVariable>,
    image: String,
    #[serde(rename = "Type")]
    kind: EnvironmentType,
}

impl Environment {
    /// A Linux container environment running `image`.
    pub fn linux_container(
        compute_type: ComputeType,
        image: impl Into<String>,
        environment_variables: Vec<EnvironmentVariable>,
    ) -> Self {
        Self {
            compute_type,
            environment_variables,
            image: image.into(),
            kind: EnvironmentType::LinuxContainer,
        }
    }

    /// Looks up an environment variable by name.
    pub fn variable(&self, name: &str) -> Option<&EnvironmentVariable> {
        self.environment_variables.iter().find(|v| v.name == name)
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Source-control provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// A GitHub repository.
    Github,
}

/// `Source` property of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Source {
    #[serde(rename = "Type")]
    kind: SourceType,
    location: Expr,
}

impl Source {
    /// A GitHub repository at `location`.
    pub fn github(location: Expr) -> Self {
        Self {
            kind: SourceType::Github,
            location,
        }
    }

    /// Returns the repository location.
    pub fn location(&self) -> &Expr {
        &self.location
    }
}

// ---------------------------------------------------------------------------
// Webhook triggers
// ---------------------------------------------------------------------------

/// What a webhook filter matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookFilterType {
    /// The numeric id of the account that caused the event.
    ActorAccountId,
    /// The webhook event name.
    Event,
    /// The pull request target branch.
    BaseRef,
    /// The pushed or pull request source branch.
    HeadRef,
}

/// Pull-request webhook events that can start a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookEvent {
    /// A pull request was opened.
    PullRequestCreated,
    /// New commits were pushed to an open pull request.
    PullRequestUpdated,
    /// A closed pull request was reopened.
    PullRequestReopened,
}

impl WebhookEvent {
    /// Returns the CodeBuild event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PullRequestCreated => "PULL_REQUEST_CREATED",
            Self::PullRequestUpdated => "PULL_REQUEST_UPDATED",
            Self::PullRequestReopened => "PULL_REQUEST_REOPENED",
        }
    }
}

/// A single match condition on incoming webhook events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhookFilter {
    #[serde(rename = "Type")]
    kind: WebhookFilterType,
    pattern: String,
}

impl WebhookFilter {
    /// Matches events caused by any of `accounts` (`id1|id2|...`).
    pub fn actor_account_ids(accounts: &[GitHubAccountId]) -> Self {
        let pattern = accounts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|");
        Self {
            kind: WebhookFilterType::ActorAccountId,
            pattern,
        }
    }

    /// Matches any of `events` (`EVENT_A,EVENT_B,...`).
    pub fn events(events: &[WebhookEvent]) -> Self {
        let pattern = events
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            kind: WebhookFilterType::Event,
            pattern,
        }
    }

    /// Matches pull requests targeting exactly `branch`.
    pub fn base_branch(branch: &str) -> Self {
        Self {
            kind: WebhookFilterType::BaseRef,
            pattern: exact_branch_pattern(branch),
        }
    }

    /// Matches pull requests coming from exactly `branch`.
    pub fn head_branch(branch: &str) -> Self {
        Self {
            kind: WebhookFilterType::HeadRef,
            pattern: exact_branch_pattern(branch),
        }
    }

    /// Returns what the filter matches on.
    pub fn kind(&self) -> WebhookFilterType {
        self.kind
    }

    /// Returns the match pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Anchored ref pattern for one branch: `^refs/heads/<branch>$`.
fn exact_branch_pattern(branch: &str) -> String {
    format!("^refs/heads/{branch}$")
}

/// Filters that must all match for an event to trigger a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterGroup(Vec<WebhookFilter>);

impl FilterGroup {
    /// Creates a group from `filters`, in order.
    pub fn new(filters: Vec<WebhookFilter>) -> Self {
        Self(filters)
    }

    /// Returns the filters in order.
    pub fn filters(&self) -> &[WebhookFilter] {
        &self.0
    }
}

/// `Triggers` property of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectTriggers {
    webhook: bool,
    filter_groups: Vec<FilterGroup>,
}

impl ProjectTriggers {
    /// Enables the webhook; a build starts when any group matches.
    pub fn webhook(filter_groups: Vec<FilterGroup>) -> Self {
        Self {
            webhook: true,
            filter_groups,
        }
    }

    /// Returns `true` if builds are started by webhook events.
    pub fn is_webhook_enabled(&self) -> bool {
        self.webhook
    }

    /// Returns the filter groups.
    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.filter_groups
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Project description: what to build, where, and under which role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    artifacts: Artifacts,
    environment: Environment,
    name: String,
    service_role: Expr,
    source: Source,
    triggers: ProjectTriggers,
}

impl Project {
    /// Creates a project description.
    pub fn new(
        name: impl Into<String>,
        service_role: Expr,
        artifacts: Artifacts,
        environment: Environment,
        source: Source,
        triggers: ProjectTriggers,
    ) -> Self {
        Self {
            artifacts,
            environment,
            name: name.into(),
            service_role,
            source,
            triggers,
        }
    }

    /// Returns the build environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the source location.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Returns the triggers.
    pub fn triggers(&self) -> &ProjectTriggers {
        &self.triggers
    }
}
