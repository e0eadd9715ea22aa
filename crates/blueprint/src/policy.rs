//! IAM policy documents and the scoped allow/deny statement builder.
//!
//! A role that must only touch resources belonging to one test suite gets,
//! per service, an `Allow` statement on the suite's resources and a `Deny`
//! statement on everything else (`NotResource`). [`scoped_statement_pair`]
//! produces both from a single [`ResourceScope`], so the two halves can never
//! drift apart.

use serde::ser::Serializer;
use serde::Serialize;
use tracing::debug;

use crate::{Expr, ServiceNamespace};

/// Policy language version emitted in every document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Whether a statement grants or refuses its actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Effect {
    /// Grant the actions on the matched resources.
    Allow,
    /// Refuse the actions on the matched resources. Overrides any `Allow`.
    Deny,
}

/// An IAM action such as `s3:GetObject` or `cloudformation:*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    service: ServiceNamespace,
    name: String,
}

impl Action {
    /// Creates an action in `service`.
    pub fn new(service: ServiceNamespace, name: impl Into<String>) -> Self {
        Self {
            service,
            name: name.into(),
        }
    }

    /// Every action of `service` (`service:*`).
    pub fn all(service: ServiceNamespace) -> Self {
        Self::new(service, "*")
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.service, self.name)
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Principal allowed to assume a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    #[serde(rename = "Service")]
    services: Vec<String>,
}

impl Principal {
    /// A service principal such as `codebuild.amazonaws.com`.
    pub fn service(service: impl Into<String>) -> Self {
        Self {
            services: vec![service.into()],
        }
    }
}

/// Which resources a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResourceMatch {
    /// Exactly the listed resources.
    Resource(Vec<Expr>),
    /// Every resource except the listed ones.
    NotResource(Vec<Expr>),
}

/// One policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    effect: Effect,
    action: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal: Option<Principal>,
    #[serde(flatten)]
    resources: Option<ResourceMatch>,
}

impl Statement {
    /// A statement over `actions` limited to the given resource match.
    pub fn new(effect: Effect, actions: Vec<Action>, resources: ResourceMatch) -> Self {
        Self {
            effect,
            action: actions,
            principal: None,
            resources: Some(resources),
        }
    }

    /// A trust statement letting `principal` perform `actions` on the role.
    pub fn trust(principal: Principal, actions: Vec<Action>) -> Self {
        Self {
            effect: Effect::Allow,
            action: actions,
            principal: Some(principal),
            resources: None,
        }
    }

    /// Returns the statement effect.
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Returns the actions covered by the statement.
    pub fn actions(&self) -> &[Action] {
        &self.action
    }

    /// Returns the `Resource` list, if the statement uses one.
    pub fn resources(&self) -> Option<&[Expr]> {
        match &self.resources {
            Some(ResourceMatch::Resource(list)) => Some(list),
            _ => None,
        }
    }

    /// Returns the `NotResource` list, if the statement uses one.
    pub fn not_resources(&self) -> Option<&[Expr]> {
        match &self.resources {
            Some(ResourceMatch::NotResource(list)) => Some(list),
            _ => None,
        }
    }
}

/// An ordered list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    version: &'static str,
    statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Creates a document from `statements`, in order.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION,
            statement: statements,
        }
    }

    /// Returns the statements in document order.
    pub fn statements(&self) -> &[Statement] {
        &self.statement
    }
}

/// The resources of one service that belong to a naming prefix, and the
/// actions allowed on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScope {
    service: ServiceNamespace,
    actions: Vec<Action>,
    resources: Vec<Expr>,
}

impl ResourceScope {
    /// Creates a scope. `actions` should all belong to `service`.
    pub fn new(service: ServiceNamespace, actions: Vec<Action>, resources: Vec<Expr>) -> Self {
        Self {
            service,
            actions,
            resources,
        }
    }

    /// Returns the service the scope belongs to.
    pub fn service(&self) -> &ServiceNamespace {
        &self.service
    }

    /// Returns the resource patterns inside the scope.
    pub fn resources(&self) -> &[Expr] {
        &self.resources
    }
}

/// Builds the `Allow` statement for `scope` and the matching `Deny` statement
/// covering everything outside it.
///
/// Both statements carry the same actions; the deny's `NotResource` list is
/// exactly the allow's `Resource` list.
pub fn scoped_statement_pair(scope: &ResourceScope) -> (Statement, Statement) {
    debug!(
        service = %scope.service,
        resources = scope.resources.len(),
        "Building scoped allow/deny statement pair"
    );
    let allow = Statement::new(
        Effect::Allow,
        scope.actions.clone(),
        ResourceMatch::Resource(scope.resources.clone()),
    );
    let deny = Statement::new(
        Effect::Deny,
        scope.actions.clone(),
        ResourceMatch::NotResource(scope.resources.clone()),
    );
    (allow, deny)
}

/// Trust policy letting the AWS service `service` assume the role.
pub fn simple_assume_policy(service: &str) -> PolicyDocument {
    let assume = Action::new(ServiceNamespace::from_static("sts"), "AssumeRole");
    PolicyDocument::new(vec![Statement::trust(Principal::service(service), vec![assume])])
}
