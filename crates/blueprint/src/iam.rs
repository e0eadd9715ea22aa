//! `AWS::IAM::Role` resource properties.

use serde::Serialize;

use crate::{Expr, PolicyDocument};

/// A policy embedded directly in a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    policy_name: Expr,
    policy_document: PolicyDocument,
}

impl InlinePolicy {
    /// Creates an inline policy.
    pub fn new(policy_name: Expr, policy_document: PolicyDocument) -> Self {
        Self {
            policy_name,
            policy_document,
        }
    }

    /// Returns the permission statements.
    pub fn policy_document(&self) -> &PolicyDocument {
        &self.policy_document
    }
}

/// Identity description: who may assume the role and what it may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    assume_role_policy_document: PolicyDocument,
    policies: Vec<InlinePolicy>,
}

impl Role {
    /// Creates a role with the given trust policy and inline policies.
    pub fn new(assume_role_policy_document: PolicyDocument, policies: Vec<InlinePolicy>) -> Self {
        Self {
            assume_role_policy_document,
            policies,
        }
    }

    /// Returns the inline policies.
    pub fn policies(&self) -> &[InlinePolicy] {
        &self.policies
    }
}
