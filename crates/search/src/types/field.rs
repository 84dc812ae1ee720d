//! Per-resource search field definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::operator::{ComparisonOperator, DateOperator, QuantityOperator};

/// Value type of a search field.
///
/// Configuration may omit the type, set it to null, or name one this client
/// does not model (`reference`, `number`, ...); all deserialize as
/// [`ValueType::String`] so a partial configuration still renders as
/// free-text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum ValueType {
    /// Free text, sent unmodified.
    #[default]
    String,
    /// A `system|value` style code or identifier, sent unmodified.
    Token,
    /// A date with an optional comparison prefix.
    Date,
    /// A number with an optional comparison prefix.
    Quantity,
}

impl ValueType {
    /// Returns true if canonical strings of this type carry an operator prefix.
    pub fn has_operator(&self) -> bool {
        matches!(self, ValueType::Date | ValueType::Quantity)
    }

    /// Returns the operator codes accepted by this type, in selector order.
    pub fn operator_codes(&self) -> Vec<&'static str> {
        match self {
            ValueType::String | ValueType::Token => Vec::new(),
            ValueType::Date => DateOperator::codes(),
            ValueType::Quantity => QuantityOperator::codes(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Token => write!(f, "token"),
            ValueType::Date => write!(f, "date"),
            ValueType::Quantity => write!(f, "quantity"),
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(ValueType::String),
            "token" => Ok(ValueType::Token),
            "date" => Ok(ValueType::Date),
            "quantity" => Ok(ValueType::Quantity),
            _ => Err(format!("unknown value type: {}", s)),
        }
    }
}

impl From<String> for ValueType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::debug!(value_type = %s, "unmodelled field type, treating as string");
            ValueType::String
        })
    }
}

impl From<Option<String>> for ValueType {
    fn from(s: Option<String>) -> Self {
        s.map(ValueType::from).unwrap_or_default()
    }
}

/// One search field of a resource type, as published in the field
/// configuration documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The query parameter name (e.g., "birthdate", "subject.identifier").
    pub name: String,

    /// The value type, which selects the encoding rules.
    #[serde(rename = "type", default)]
    pub value_type: ValueType,

    /// Short help text shown next to the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Fixed choices, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDefinition {
    /// Creates a definition with no help text or options.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            help: None,
            options: Vec::new(),
        }
    }

    /// The fallback used when a field is missing from the registry.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::String)
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the fixed options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// The field configuration document for one resource type
/// (`<config-root>/<type>.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFieldConfig {
    /// Field definitions in display order.
    #[serde(default)]
    pub params: Vec<FieldDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::Date.to_string(), "date");
        assert_eq!(ValueType::Token.to_string(), "token");
    }

    #[test]
    fn test_has_operator() {
        assert!(ValueType::Date.has_operator());
        assert!(ValueType::Quantity.has_operator());
        assert!(!ValueType::String.has_operator());
        assert!(!ValueType::Token.has_operator());
    }

    #[test]
    fn test_operator_codes() {
        assert_eq!(ValueType::Date.operator_codes().len(), 9);
        assert_eq!(
            ValueType::Quantity.operator_codes(),
            vec!["eq", "ne", "gt", "ge", "lt", "le"]
        );
        assert!(ValueType::Token.operator_codes().is_empty());
    }

    #[test]
    fn test_deserialize_config() {
        let json = serde_json::json!({
            "params": [
                { "name": "gender", "type": "token", "options": ["female", "male"] },
                { "name": "birthdate", "type": "date", "help": "YYYY-MM-DD" },
                { "name": "family" },
                { "name": "general-practitioner", "type": "reference" },
                { "name": "given", "type": null }
            ]
        });

        let config: ResourceFieldConfig = serde_json::from_value(json).unwrap();

        assert_eq!(config.params.len(), 5);
        assert_eq!(config.params[0].value_type, ValueType::Token);
        assert_eq!(config.params[0].options, vec!["female", "male"]);
        assert_eq!(config.params[1].value_type, ValueType::Date);
        assert_eq!(config.params[1].help.as_deref(), Some("YYYY-MM-DD"));
        assert_eq!(config.params[2].value_type, ValueType::String);
        assert_eq!(config.params[3].value_type, ValueType::String);
        assert_eq!(config.params[4].value_type, ValueType::String);
    }
}
