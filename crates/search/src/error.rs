//! Error types for the search core.
//!
//! Decoding never fails: an unrecognised operator prefix is treated as part of
//! the payload so the value stays editable. Only the encode path and registry
//! registration can produce errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::types::ValueType;

/// Errors raised while turning typed input into canonical strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The operator is not in the recognised set for the field's type.
    #[error("unknown operator '{operator}' for {value_type} field '{field}'")]
    UnknownOperator {
        field: String,
        operator: String,
        value_type: ValueType,
    },

    /// An operator was supplied for a string or token field.
    #[error("operators do not apply to {value_type} field '{field}'")]
    OperatorNotApplicable { field: String, value_type: ValueType },

    /// The typed value does not match the field definition.
    #[error("field '{field}' expects a {expected} value, got {found}")]
    TypeMismatch {
        field: String,
        expected: ValueType,
        found: ValueType,
    },
}

/// Errors raised while registering per-resource field configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two definitions share a name within one resource type.
    #[error("duplicate field '{name}' in {resource_type} configuration")]
    DuplicateField { resource_type: String, name: String },
}
