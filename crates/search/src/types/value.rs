//! Typed field values.

use super::field::ValueType;
use super::operator::{DateOperator, QuantityOperator};

/// An operator together with the raw payload it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparison<O> {
    /// The comparison prefix.
    pub operator: O,
    /// The raw payload (a date or a number, as typed).
    pub payload: String,
}

impl<O> Comparison<O> {
    /// Creates a new comparison.
    pub fn new(operator: O, payload: impl Into<String>) -> Self {
        Self {
            operator,
            payload: payload.into(),
        }
    }
}

/// A value for one search field, discriminated by the field's value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypedValue {
    /// Free text.
    String(String),
    /// A `system|value` code or identifier.
    Token(String),
    /// A date with its comparison prefix.
    Date(Comparison<DateOperator>),
    /// A number with its comparison prefix.
    Quantity(Comparison<QuantityOperator>),
}

impl TypedValue {
    /// Creates a string value.
    pub fn string(payload: impl Into<String>) -> Self {
        TypedValue::String(payload.into())
    }

    /// Creates a token value from its raw form.
    pub fn token(payload: impl Into<String>) -> Self {
        TypedValue::Token(payload.into())
    }

    /// Creates a `system|value` token.
    pub fn token_pair(system: &str, value: &str) -> Self {
        TypedValue::Token(format!("{}|{}", system, value))
    }

    /// Creates a date value.
    pub fn date(operator: DateOperator, payload: impl Into<String>) -> Self {
        TypedValue::Date(Comparison::new(operator, payload))
    }

    /// Creates a quantity value.
    pub fn quantity(operator: QuantityOperator, payload: impl Into<String>) -> Self {
        TypedValue::Quantity(Comparison::new(operator, payload))
    }

    /// Returns the value type of this variant.
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::String(_) => ValueType::String,
            TypedValue::Token(_) => ValueType::Token,
            TypedValue::Date(_) => ValueType::Date,
            TypedValue::Quantity(_) => ValueType::Quantity,
        }
    }

    /// Returns the raw payload without any operator.
    pub fn payload(&self) -> &str {
        match self {
            TypedValue::String(p) | TypedValue::Token(p) => p,
            TypedValue::Date(c) => &c.payload,
            TypedValue::Quantity(c) => &c.payload,
        }
    }

    /// Returns the operator code, if this type carries one.
    pub fn operator_code(&self) -> Option<&'static str> {
        use super::operator::ComparisonOperator;

        match self {
            TypedValue::String(_) | TypedValue::Token(_) => None,
            TypedValue::Date(c) => Some(c.operator.code()),
            TypedValue::Quantity(c) => Some(c.operator.code()),
        }
    }

    /// Returns true if the payload is empty. Such values are never sent.
    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// For tokens, splits `system|value` into its parts.
    pub fn token_parts(&self) -> Option<(&str, &str)> {
        match self {
            TypedValue::Token(p) => p.split_once('|'),
            _ => None,
        }
    }
}
