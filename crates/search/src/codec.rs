//! Parameter codec.
//!
//! Converts between a field's [`TypedValue`] and its canonical wire string.
//! Date and quantity values are written as `operator ++ payload` with no
//! separator (`gt2015-01-01`, `le5.4`); string and token values are written
//! unchanged. The operator is always written, including the default `eq`, so
//! `decode(def, encode(def, v)) == v` holds for every value.
//!
//! # Example
//!
//! ```
//! use sift_search::codec::{decode, encode};
//! use sift_search::types::{DateOperator, FieldDefinition, TypedValue, ValueType};
//!
//! let def = FieldDefinition::new("birthdate", ValueType::Date);
//! let value = TypedValue::date(DateOperator::Gt, "2015-01-01");
//!
//! let canonical = encode(&def, &value).unwrap();
//! assert_eq!(canonical, "gt2015-01-01");
//! assert_eq!(decode(&def, &canonical), value);
//! ```

use std::str::FromStr;

use crate::error::CodecError;
use crate::types::{
    Comparison, ComparisonOperator, DateOperator, FieldDefinition, QuantityOperator, TypedValue,
    ValueType,
};

/// Encodes a typed value into its canonical string.
///
/// Fails with [`CodecError::TypeMismatch`] when the value's variant does not
/// match the field's value type. An empty payload still encodes (to `""` or
/// to the bare operator); callers drop such entries before assembling a
/// query string.
pub fn encode(def: &FieldDefinition, value: &TypedValue) -> Result<String, CodecError> {
    if value.value_type() != def.value_type {
        return Err(CodecError::TypeMismatch {
            field: def.name.clone(),
            expected: def.value_type,
            found: value.value_type(),
        });
    }

    Ok(match value {
        TypedValue::String(payload) | TypedValue::Token(payload) => payload.clone(),
        TypedValue::Date(c) => prefixed(c),
        TypedValue::Quantity(c) => prefixed(c),
    })
}

fn prefixed<O: ComparisonOperator>(comparison: &Comparison<O>) -> String {
    format!("{}{}", comparison.operator.code(), comparison.payload)
}

/// Decodes a canonical string into a typed value.
///
/// Never fails. For date and quantity fields an unrecognised prefix is kept
/// as part of the payload with the operator defaulting to `eq`.
pub fn decode(def: &FieldDefinition, canonical: &str) -> TypedValue {
    match def.value_type {
        ValueType::String => TypedValue::String(canonical.to_string()),
        ValueType::Token => TypedValue::Token(canonical.to_string()),
        ValueType::Date => TypedValue::Date(split(canonical)),
        ValueType::Quantity => TypedValue::Quantity(split(canonical)),
    }
}

fn split<O: ComparisonOperator>(canonical: &str) -> Comparison<O> {
    let (operator, payload) = O::split_prefix(canonical);
    Comparison::new(operator, payload)
}

/// Builds a typed value from raw input: an optional operator code as picked
/// in a selector (case-insensitive) and the payload as typed.
///
/// A missing operator defaults to `eq` for date and quantity fields. An
/// operator supplied for a string or token field, or one outside the field
/// type's set, is rejected.
pub fn parse_input(
    def: &FieldDefinition,
    operator: Option<&str>,
    payload: &str,
) -> Result<TypedValue, CodecError> {
    match def.value_type {
        ValueType::String | ValueType::Token => {
            if operator.is_some() {
                return Err(CodecError::OperatorNotApplicable {
                    field: def.name.clone(),
                    value_type: def.value_type,
                });
            }
            Ok(match def.value_type {
                ValueType::Token => TypedValue::token(payload),
                _ => TypedValue::string(payload),
            })
        }
        ValueType::Date => {
            let op = parse_operator::<DateOperator>(def, operator)?;
            Ok(TypedValue::date(op, payload))
        }
        ValueType::Quantity => {
            let op = parse_operator::<QuantityOperator>(def, operator)?;
            Ok(TypedValue::quantity(op, payload))
        }
    }
}

fn parse_operator<O>(def: &FieldDefinition, operator: Option<&str>) -> Result<O, CodecError>
where
    O: ComparisonOperator + FromStr,
{
    match operator {
        None => Ok(O::default()),
        Some(code) => code.parse().map_err(|_| CodecError::UnknownOperator {
            field: def.name.clone(),
            operator: code.to_string(),
            value_type: def.value_type,
        }),
    }
}

/// Parses raw input and encodes it in one step.
pub fn encode_input(
    def: &FieldDefinition,
    operator: Option<&str>,
    payload: &str,
) -> Result<String, CodecError> {
    encode(def, &parse_input(def, operator, payload)?)
}

/// Replaces the operator of a canonical string, keeping its payload.
///
/// With no current value the result is the bare operator, which is a valid
/// canonical string with an empty payload.
pub fn set_operator(
    def: &FieldDefinition,
    current: Option<&str>,
    operator: &str,
) -> Result<String, CodecError> {
    let payload = current
        .map(|c| decode(def, c))
        .map(|v| v.payload().to_string())
        .unwrap_or_default();
    encode_input(def, Some(operator), &payload)
}

/// Replaces the payload of a canonical string, keeping its operator.
pub fn set_payload(def: &FieldDefinition, current: Option<&str>, payload: &str) -> String {
    let current = decode(def, current.unwrap_or_default());
    let updated = match current {
        TypedValue::String(_) => TypedValue::string(payload),
        TypedValue::Token(_) => TypedValue::token(payload),
        TypedValue::Date(c) => TypedValue::date(c.operator, payload),
        TypedValue::Quantity(c) => TypedValue::quantity(c.operator, payload),
    };
    // variant always matches def, so encode cannot fail
    encode(def, &updated).unwrap_or_default()
}

/// Returns true if the canonical string carries no payload, meaning the
/// parameter must not be sent.
pub fn payload_is_empty(def: &FieldDefinition, canonical: &str) -> bool {
    decode(def, canonical).is_empty()
}
