//! Comparison prefixes for date and quantity search values.
//!
//! Both operator sets share one prefix parser through [`ComparisonOperator`].
//! Every code is two lowercase ASCII letters and no code is a prefix of
//! another, so at most one operator matches the start of a canonical string.
//!
//! See: https://build.fhir.org/search.html#prefix

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Behaviour shared by the per-type operator enums.
pub trait ComparisonOperator:
    Copy + Eq + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// All operators, in selector order.
    const ALL: &'static [Self];

    /// The wire code (`"eq"`, `"gt"`, ...).
    fn code(&self) -> &'static str;

    /// Looks up an operator by its exact wire code.
    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.code() == code)
    }

    /// Splits a canonical string into its operator and payload.
    ///
    /// The longest matching prefix wins. When no recognised prefix is present
    /// the default operator is returned together with the full string.
    fn split_prefix(value: &str) -> (Self, &str) {
        Self::ALL
            .iter()
            .filter(|op| value.starts_with(op.code()))
            .max_by_key(|op| op.code().len())
            .map(|op| (*op, &value[op.code().len()..]))
            .unwrap_or((Self::default(), value))
    }

    /// Returns every wire code, in selector order.
    fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|op| op.code()).collect()
    }
}

/// Comparison prefixes accepted by date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateOperator {
    /// Equal (default).
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Starts after.
    Sa,
    /// Ends before.
    Eb,
    /// Approximately equal.
    Ap,
}

impl ComparisonOperator for DateOperator {
    const ALL: &'static [Self] = &[
        DateOperator::Eq,
        DateOperator::Ne,
        DateOperator::Gt,
        DateOperator::Ge,
        DateOperator::Lt,
        DateOperator::Le,
        DateOperator::Sa,
        DateOperator::Eb,
        DateOperator::Ap,
    ];

    fn code(&self) -> &'static str {
        match self {
            DateOperator::Eq => "eq",
            DateOperator::Ne => "ne",
            DateOperator::Gt => "gt",
            DateOperator::Ge => "ge",
            DateOperator::Lt => "lt",
            DateOperator::Le => "le",
            DateOperator::Sa => "sa",
            DateOperator::Eb => "eb",
            DateOperator::Ap => "ap",
        }
    }
}

/// Comparison prefixes accepted by quantity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuantityOperator {
    /// Equal (default).
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
}

impl ComparisonOperator for QuantityOperator {
    const ALL: &'static [Self] = &[
        QuantityOperator::Eq,
        QuantityOperator::Ne,
        QuantityOperator::Gt,
        QuantityOperator::Ge,
        QuantityOperator::Lt,
        QuantityOperator::Le,
    ];

    fn code(&self) -> &'static str {
        match self {
            QuantityOperator::Eq => "eq",
            QuantityOperator::Ne => "ne",
            QuantityOperator::Gt => "gt",
            QuantityOperator::Ge => "ge",
            QuantityOperator::Lt => "lt",
            QuantityOperator::Le => "le",
        }
    }
}

impl fmt::Display for DateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for QuantityOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DateOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown date operator: {}", s))
    }
}

impl FromStr for QuantityOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown quantity operator: {}", s))
    }
}
