//! Core types for search field configuration and values.

mod field;
mod operator;
mod samples;
mod value;

pub use field::{FieldDefinition, ResourceFieldConfig, ValueType};
pub use operator::{ComparisonOperator, DateOperator, QuantityOperator};
pub use samples::{DateRange, SampleValueSet, parse_partial_date};
pub use value::{Comparison, TypedValue};
