//! Newtype identifiers for template entities.
//!
//! Every named concept in a template is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`LogicalId`] with a [`ParameterName`] even though both are strings under
//! the hood.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Creates an identifier from a non-empty compile-time constant.
            pub(crate) fn from_static(value: &'static str) -> Self {
                debug_assert!(!value.is_empty());
                Self(value.to_owned())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (GitHub-assigned integers).
// Generates: struct (Copy), new(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — GitHub-integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// Numeric GitHub account id of a user allowed to trigger builds.
    ///
    /// Matched against the `ACTOR_ACCOUNT_ID` webhook filter.
    GitHubAccountId
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (template names)
// ---------------------------------------------------------------------------

string_id! {
    /// Key of a resource within the template's `Resources` section
    /// (e.g. `"CodeBuildRole"`).
    ///
    /// Also the target of `Ref` and `Fn::GetAtt` expressions.
    LogicalId
}

string_id! {
    /// Key of a declared template parameter (e.g. `"EnvironmentName"`).
    ParameterName
}

string_id! {
    /// IAM service namespace used as the action prefix (e.g. `"s3"`, `"logs"`).
    ServiceNamespace
}
