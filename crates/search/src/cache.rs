//! Per-resource sample value cache.

use std::collections::HashMap;

use crate::types::{FieldDefinition, SampleValueSet};

/// Sample values keyed by resource type. Each entry is read-only once stored
/// and is replaced whole when the type is fetched again.
#[derive(Debug, Clone, Default)]
pub struct SampleValueCache {
    entries: HashMap<String, SampleValueSet>,
}

impl SampleValueCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the snapshot for a resource type, returning the previous one.
    pub fn insert(&mut self, resource_type: &str, samples: SampleValueSet) -> Option<SampleValueSet> {
        self.entries.insert(resource_type.to_string(), samples)
    }

    /// The snapshot for a resource type.
    pub fn get(&self, resource_type: &str) -> Option<&SampleValueSet> {
        self.entries.get(resource_type)
    }

    /// Drops the snapshot for a resource type.
    pub fn remove(&mut self, resource_type: &str) -> Option<SampleValueSet> {
        self.entries.remove(resource_type)
    }

    /// Returns true if a snapshot for the resource type is stored.
    pub fn contains(&self, resource_type: &str) -> bool {
        self.entries.contains_key(resource_type)
    }
}

/// The choices to offer for a field.
///
/// Configured options win. A field configured without options falls back to
/// observed values where one set applies: `gender` uses the observed genders
/// and `status` the observed statuses.
pub fn effective_options<'a>(
    def: &'a FieldDefinition,
    samples: Option<&'a SampleValueSet>,
) -> &'a [String] {
    if !def.options.is_empty() {
        return &def.options;
    }
    match (def.name.as_str(), samples) {
        ("gender", Some(s)) => &s.genders,
        ("status", Some(s)) => &s.statuses,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueType;

    fn samples() -> SampleValueSet {
        SampleValueSet {
            genders: vec!["female".into(), "male".into(), "unknown".into()],
            statuses: vec!["finished".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_insert_and_replace() {
        let mut cache = SampleValueCache::new();
        assert!(cache.insert("Patient", samples()).is_none());
        assert!(cache.contains("Patient"));

        let previous = cache.insert("Patient", SampleValueSet::default());
        assert_eq!(previous, Some(samples()));
        assert!(cache.get("Patient").map(|s| s.is_empty()).unwrap_or(false));

        cache.remove("Patient");
        assert!(cache.get("Patient").is_none());
    }

    #[test]
    fn test_configured_options_win() {
        let def = FieldDefinition::new("gender", ValueType::Token).with_options(["female"]);
        let s = samples();
        assert_eq!(effective_options(&def, Some(&s)), ["female".to_string()]);
    }

    #[test]
    fn test_options_from_samples() {
        let s = samples();
        let gender = FieldDefinition::new("gender", ValueType::Token);
        let status = FieldDefinition::new("status", ValueType::Token);
        let family = FieldDefinition::new("family", ValueType::String);

        assert_eq!(effective_options(&gender, Some(&s)).len(), 3);
        assert_eq!(effective_options(&status, Some(&s)), ["finished".to_string()]);
        assert!(effective_options(&family, Some(&s)).is_empty());
        assert!(effective_options(&gender, None).is_empty());
    }
}
