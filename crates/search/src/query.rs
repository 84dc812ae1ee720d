//! Form state and query-string assembly.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::codec::payload_is_empty;
use crate::expand::MultiValueExpander;
use crate::registry::FieldRegistry;

/// Backend execution strategy, passed through in the `x-search-mode` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Precomputed search index.
    #[default]
    Accelerated,
    /// Direct evaluation against stored resources.
    Canonical,
}

impl SearchMode {
    /// The header value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Accelerated => "accelerated",
            SearchMode::Canonical => "canonical",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accelerated" => Ok(SearchMode::Accelerated),
            "canonical" => Ok(SearchMode::Canonical),
            _ => Err(format!(
                "unknown search mode: {} (expected accelerated or canonical)",
                s
            )),
        }
    }
}

/// Canonical strings keyed by field name.
///
/// Every edit produces a new `FormState`; the session swaps it in whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, String>,
}

impl FormState {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `name` set to `value`.
    #[must_use]
    pub fn with(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = self.values.clone();
        values.insert(name.into(), value.into());
        Self { values }
    }

    /// Returns a copy without `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(name);
        Self { values }
    }

    /// The canonical string for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries, including empty ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the form has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FormState {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Ordered `(name, value)` pairs ready to be serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// Wraps already assembled pairs.
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Percent-encodes each pair as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// The pairs in order.
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    /// Values sent for `name`, in order.
    pub fn values_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing will be sent.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Assembles the pairs to send for a form.
///
/// Entries whose payload is empty (including operator-only values such as
/// `ge`) are dropped, allow-listed fields are expanded into one pair per
/// value, and everything else becomes a single pair. Names missing from the
/// registry are treated as string fields.
pub fn assemble(
    form: &FormState,
    registry: &FieldRegistry,
    resource_type: &str,
    expander: &MultiValueExpander,
) -> QueryPairs {
    let mut pairs = Vec::with_capacity(form.len());
    for (name, value) in form.iter() {
        if value.is_empty() {
            continue;
        }
        let def = registry.resolve(resource_type, name);
        for segment in expander.expand(name, value) {
            if payload_is_empty(&def, segment) {
                continue;
            }
            pairs.push((name.to_string(), segment.to_string()));
        }
    }
    QueryPairs(pairs)
}

/// A search ready for the execution adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Resource type searched.
    pub resource_type: String,
    /// Assembled parameters.
    pub pairs: QueryPairs,
    /// Backend execution strategy.
    pub mode: SearchMode,
}

impl SearchRequest {
    /// The serialized query string (without `?`).
    pub fn query_string(&self) -> String {
        self.pairs.to_query_string()
    }

    /// The request path under `search_path`, e.g. `/fhir/Patient?gender=female`.
    pub fn path(&self, search_path: &str) -> String {
        let base = format!("/{}/{}", search_path.trim_matches('/'), self.resource_type);
        if self.pairs.is_empty() {
            base
        } else {
            format!("{}?{}", base, self.query_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDefinition, ResourceFieldConfig, ValueType};

    fn registry() -> FieldRegistry {
        let mut registry = FieldRegistry::new();
        registry
            .register(
                "Patient",
                ResourceFieldConfig {
                    params: vec![
                        FieldDefinition::new("birthdate", ValueType::Date),
                        FieldDefinition::new("gender", ValueType::Token),
                        FieldDefinition::new("family", ValueType::String),
                        FieldDefinition::new("identifier", ValueType::Token),
                    ],
                },
            )
            .unwrap();
        registry
    }

    fn assemble_patient(form: &FormState) -> QueryPairs {
        assemble(form, &registry(), "Patient", &MultiValueExpander::default())
    }

    #[test]
    fn test_form_state_is_replaced_not_mutated() {
        let empty = FormState::new();
        let one = empty.with("gender", "female");
        let two = one.with("family", "Chan");

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.get("family"), Some("Chan"));
        assert_eq!(two.without("family"), one);
    }

    #[test]
    fn test_empty_values_omitted() {
        let form: FormState = [
            ("gender", ""),
            ("birthdate", "eq"),
            ("family", "Chan"),
        ]
        .into_iter()
        .collect();

        let pairs = assemble_patient(&form);
        assert_eq!(
            pairs.as_slice(),
            &[("family".to_string(), "Chan".to_string())]
        );
    }

    #[test]
    fn test_multi_value_expansion() {
        let form = FormState::new()
            .with("birthdate", "2020-01-01, 2021-06-15 ,2022-12-31")
            .with("family", "2020-01-01, 2021-06-15 ,2022-12-31");

        let pairs = assemble_patient(&form);
        assert_eq!(
            pairs.values_of("birthdate").collect::<Vec<_>>(),
            vec!["2020-01-01", "2021-06-15", "2022-12-31"]
        );
        assert_eq!(
            pairs.values_of("family").collect::<Vec<_>>(),
            vec!["2020-01-01, 2021-06-15 ,2022-12-31"]
        );
    }

    #[test]
    fn test_operator_only_segment_dropped() {
        let form = FormState::new().with("birthdate", "ge2020-01-01, le");
        let pairs = assemble_patient(&form);
        assert_eq!(
            pairs.values_of("birthdate").collect::<Vec<_>>(),
            vec!["ge2020-01-01"]
        );
    }

    #[test]
    fn test_unregistered_field_sent_as_string() {
        let form = FormState::new().with("limit", "10").with("_count", "");
        let pairs = assemble_patient(&form);
        assert_eq!(pairs.to_query_string(), "limit=10");
    }

    #[test]
    fn test_query_string_percent_encodes_pairs() {
        let form = FormState::new()
            .with("identifier", "adminid|A123456(7)")
            .with("family", "Li Chan");
        let request = SearchRequest {
            resource_type: "Patient".to_string(),
            pairs: assemble_patient(&form),
            mode: SearchMode::Accelerated,
        };

        assert_eq!(
            request.query_string(),
            "family=Li+Chan&identifier=adminid%7CA123456%287%29"
        );
        assert_eq!(
            request.path("/fhir/"),
            "/fhir/Patient?family=Li+Chan&identifier=adminid%7CA123456%287%29"
        );
    }

    #[test]
    fn test_path_without_parameters() {
        let request = SearchRequest {
            resource_type: "Encounter".to_string(),
            pairs: QueryPairs::default(),
            mode: SearchMode::Canonical,
        };
        assert_eq!(request.path("fhir"), "/fhir/Encounter");
    }

    #[test]
    fn test_search_mode_parse() {
        assert_eq!("Canonical".parse::<SearchMode>().unwrap(), SearchMode::Canonical);
        assert_eq!(SearchMode::default().to_string(), "accelerated");
        assert!("fast".parse::<SearchMode>().is_err());
    }
}
