//! Example query synthesis.
//!
//! Each supported resource type has a fixed, ordered list of category
//! templates. A template builds its queries from the current
//! [`SampleValueSet`] and contributes nothing when the values it references
//! were not observed, so every generated query points at data that exists.
//! Categories that end up empty are dropped. Derived dates (midpoint years,
//! N-months-back cutoffs) come from the cached ranges only, never from the
//! wall clock.
//!
//! # Example
//!
//! ```
//! use sift_search::presets::synthesize;
//! use sift_search::types::SampleValueSet;
//!
//! let samples = SampleValueSet {
//!     genders: vec!["female".to_string(), "male".to_string()],
//!     ..Default::default()
//! };
//!
//! let categories = synthesize("Patient", &samples);
//! assert_eq!(categories[0].name, "Basic Searches");
//! assert_eq!(categories[0].queries[0].params.get("gender"), Some("female"));
//! ```

mod encounter;
mod patient;

use chrono::{Months, NaiveDate};
use serde::Serialize;
use tracing::trace;

use crate::query::FormState;
use crate::types::SampleValueSet;

/// One clickable example query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetQuery {
    /// Short title.
    pub label: String,
    /// One-line description of what the query demonstrates.
    pub desc: String,
    /// The form that replaces the current one when the preset is chosen.
    pub params: FormState,
}

impl PresetQuery {
    /// Creates a preset.
    pub fn new(label: impl Into<String>, desc: impl Into<String>, params: FormState) -> Self {
        Self {
            label: label.into(),
            desc: desc.into(),
            params,
        }
    }
}

/// A named, ordered group of presets. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetCategory {
    /// Category title.
    pub name: String,
    /// Presets in display order.
    pub queries: Vec<PresetQuery>,
}

/// Builds the queries of one category from sample values.
pub(crate) struct CategoryTemplate {
    pub name: &'static str,
    pub build: fn(&SampleValueSet) -> Vec<PresetQuery>,
}

fn templates(resource_type: &str) -> &'static [CategoryTemplate] {
    match resource_type {
        "Patient" => patient::TEMPLATES,
        "Encounter" => encounter::TEMPLATES,
        _ => &[],
    }
}

/// Synthesizes the example queries for a resource type.
///
/// Resource types without templates yield no categories.
pub fn synthesize(resource_type: &str, samples: &SampleValueSet) -> Vec<PresetCategory> {
    templates(resource_type)
        .iter()
        .filter_map(|template| {
            let queries = (template.build)(samples);
            if queries.is_empty() {
                trace!(resource_type, category = template.name, "skipping empty category");
                return None;
            }
            Some(PresetCategory {
                name: template.name.to_string(),
                queries,
            })
        })
        .collect()
}

/// Total number of presets across categories.
pub fn preset_count(categories: &[PresetCategory]) -> usize {
    categories.iter().map(|c| c.queries.len()).sum()
}

/// Finds a preset by its exact label.
pub fn find_preset<'a>(categories: &'a [PresetCategory], label: &str) -> Option<&'a PresetQuery> {
    categories
        .iter()
        .flat_map(|c| c.queries.iter())
        .find(|q| q.label == label)
}

/// The date `months` calendar months before `date`. Days past the end of the
/// target month clamp to its last day (`2023-03-31` minus one month is
/// `2023-02-28`).
pub(crate) fn months_before(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

/// `YYYY-01-01` for a year.
pub(crate) fn first_of_year(year: i32) -> String {
    format!("{:04}-01-01", year)
}
