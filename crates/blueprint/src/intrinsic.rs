//! CloudFormation intrinsic expressions.
//!
//! An [`Expr`] is either a plain string or one of the intrinsic functions the
//! provider resolves at deploy time (`Ref`, `Fn::Join`, `Fn::Sub`,
//! `Fn::GetAtt`). Pseudo parameters such as the account id are emitted as
//! symbolic `Ref`s so one rendered template is portable across accounts,
//! partitions and regions.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::{LogicalId, ParameterName};

/// Provider-supplied values that are resolved at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoParameter {
    /// `AWS::AccountId`
    AccountId,
    /// `AWS::Partition` (`aws`, `aws-cn`, `aws-us-gov`, ...)
    Partition,
    /// `AWS::Region`
    Region,
}

impl PseudoParameter {
    /// Returns the name used as the `Ref` target.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountId => "AWS::AccountId",
            Self::Partition => "AWS::Partition",
            Self::Region => "AWS::Region",
        }
    }
}

/// A template value: a literal string or an intrinsic function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Plain string emitted verbatim.
    Literal(String),
    /// `{"Ref": target}`; the target is a parameter, resource or pseudo parameter.
    Ref(String),
    /// `{"Fn::Join": [delimiter, [values...]]}`
    Join {
        /// Separator placed between the joined values.
        delimiter: String,
        /// Values to join, in order.
        values: Vec<Expr>,
    },
    /// `{"Fn::Sub": template}` or `{"Fn::Sub": [template, {variables}]}`
    Sub {
        /// String containing `${name}` placeholders.
        template: String,
        /// Explicit placeholder bindings. Empty means the short form.
        variables: BTreeMap<String, Expr>,
    },
    /// `{"Fn::GetAtt": [logical_id, attribute]}`
    GetAtt {
        /// Resource whose attribute is read.
        logical_id: LogicalId,
        /// Attribute name (e.g. `"Arn"`).
        attribute: String,
    },
}

impl Expr {
    /// A literal string value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// `Ref` to a pseudo parameter.
    pub fn pseudo(parameter: PseudoParameter) -> Self {
        Self::Ref(parameter.as_str().to_owned())
    }

    /// `Ref` to a declared template parameter.
    pub fn parameter(name: &ParameterName) -> Self {
        Self::Ref(name.as_str().to_owned())
    }

    /// `Fn::Join` over `values`.
    pub fn join(delimiter: impl Into<String>, values: impl IntoIterator<Item = Expr>) -> Self {
        Self::Join {
            delimiter: delimiter.into(),
            values: values.into_iter().collect(),
        }
    }

    /// `Fn::Sub` with explicit variable bindings.
    pub fn sub<K, I>(template: impl Into<String>, variables: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expr)>,
    {
        Self::Sub {
            template: template.into(),
            variables: variables.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// `Fn::GetAtt` on a resource in the same template.
    pub fn get_att(logical_id: LogicalId, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            logical_id,
            attribute: attribute.into(),
        }
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<PseudoParameter> for Expr {
    fn from(parameter: PseudoParameter) -> Self {
        Self::pseudo(parameter)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => serializer.serialize_str(value),
            Self::Ref(target) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", target)?;
                map.end()
            }
            Self::Join { delimiter, values } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, values))?;
                map.end()
            }
            Self::Sub {
                template,
                variables,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                if variables.is_empty() {
                    map.serialize_entry("Fn::Sub", template)?;
                } else {
                    map.serialize_entry("Fn::Sub", &(template, variables))?;
                }
                map.end()
            }
            Self::GetAtt {
                logical_id,
                attribute,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &(logical_id, attribute))?;
                map.end()
            }
        }
    }
}
