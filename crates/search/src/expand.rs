//! Multi-value expansion.
//!
//! A small set of date fields accept several values at once, typed as one
//! comma-separated string. Each value becomes a separate occurrence of the
//! parameter, which the backend ORs together. Membership is by name only;
//! no other field splits on a comma, whatever its type.

use std::collections::BTreeSet;

/// Fields expanded unless configured otherwise.
pub const DEFAULT_MULTI_VALUE_FIELDS: &[&str] = &["birthdate", "date-start", "end-date"];

/// Splits comma-separated values of allow-listed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueExpander {
    fields: BTreeSet<String>,
}

impl MultiValueExpander {
    /// Creates an expander for the given field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `name` is allow-listed.
    pub fn is_multi_value(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Allow-listed names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Splits `value` into the values to send for `name`.
    ///
    /// A value without a comma, or one for a field outside the allow-list,
    /// is returned unchanged as the single element. Otherwise each segment
    /// is trimmed and empty segments are dropped.
    pub fn expand<'a>(&self, name: &str, value: &'a str) -> Vec<&'a str> {
        if !self.is_multi_value(name) || !value.contains(',') {
            return vec![value];
        }
        value
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

impl Default for MultiValueExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MULTI_VALUE_FIELDS.iter().copied())
    }
}
