use chrono::Datelike;

use super::{CategoryTemplate, PresetQuery, first_of_year};
use crate::query::FormState;
use crate::types::SampleValueSet;

pub(crate) static TEMPLATES: &[CategoryTemplate] = &[
    CategoryTemplate {
        name: "Basic Searches",
        build: basic,
    },
    CategoryTemplate {
        name: "Date & Demographics",
        build: demographics,
    },
    CategoryTemplate {
        name: "Combined Queries",
        build: combined,
    },
    CategoryTemplate {
        name: "Cross-Resource Tip",
        build: cross_resource_tip,
    },
    CategoryTemplate {
        name: "FHIR Extras (_revinclude)",
        build: revinclude,
    },
];

fn basic(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let mut queries: Vec<PresetQuery> = samples
        .genders
        .iter()
        .map(|gender| {
            PresetQuery::new(
                format!("All {} Patients", capitalize(gender)),
                "Filter by gender",
                FormState::new().with("gender", gender).with("limit", "10"),
            )
        })
        .collect();

    if let Some(adminid) = samples.adminids.first() {
        queries.push(PresetQuery::new(
            format!("Specific Patient ({})", adminid),
            "Search by ADMINID",
            FormState::new().with("identifier", format!("adminid|{}", adminid)),
        ));
    }
    if let Some(family) = samples.family_names.first() {
        queries.push(PresetQuery::new(
            format!("Name: {}", family),
            "Search by family name",
            FormState::new().with("family", family),
        ));
    }
    queries
}

fn demographics(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let Some(mid) = samples
        .birth_date_range
        .as_ref()
        .and_then(|range| range.midpoint_year())
    else {
        return Vec::new();
    };
    let date = first_of_year(mid);

    vec![
        PresetQuery::new(
            format!("Born After {}", mid),
            "Date comparison (greater than)",
            FormState::new()
                .with("birthdate", format!("gt{}", date))
                .with("limit", "10"),
        ),
        PresetQuery::new(
            format!("Born Before {}", mid),
            "Date comparison (less than)",
            FormState::new()
                .with("birthdate", format!("lt{}", date))
                .with("limit", "10"),
        ),
        PresetQuery::new(
            format!("Born in {}", mid),
            "Date exact match",
            FormState::new()
                .with("birthdate", date.as_str())
                .with("limit", "10"),
        ),
    ]
}

fn combined(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let mut queries = Vec::new();

    let latest_birth_year = samples
        .birth_date_range
        .as_ref()
        .and_then(|range| range.max_date())
        .map(|date| date.year());
    if let (true, Some(year)) = (samples.has_gender("female"), latest_birth_year) {
        queries.push(PresetQuery::new(
            "Young Female Patients",
            "Gender + birth date",
            FormState::new()
                .with("gender", "female")
                .with("birthdate", format!("gt{}", first_of_year(year - 10)))
                .with("limit", "10"),
        ));
    }

    if let Some(family) = samples.family_names.first() {
        if samples.has_gender("male") {
            queries.push(PresetQuery::new(
                format!("Male {}s", family),
                "Name + gender",
                FormState::new()
                    .with("family", family)
                    .with("gender", "male")
                    .with("limit", "10"),
            ));
        }
        if samples.has_gender("female") {
            queries.push(PresetQuery::new(
                format!("Female {}s", family),
                "Name + gender combination",
                FormState::new()
                    .with("family", family)
                    .with("gender", "female")
                    .with("limit", "10"),
            ));
        }
    }
    queries
}

fn cross_resource_tip(samples: &SampleValueSet) -> Vec<PresetQuery> {
    samples
        .adminids
        .first()
        .map(|adminid| {
            PresetQuery::new(
                format!("Use {} with Encounter", adminid),
                "Switch to Encounter to see cross-resource queries",
                FormState::new().with("identifier", format!("adminid|{}", adminid)),
            )
        })
        .into_iter()
        .collect()
}

fn revinclude(samples: &SampleValueSet) -> Vec<PresetQuery> {
    samples
        .adminids
        .first()
        .map(|adminid| {
            PresetQuery::new(
                "Patient + Encounters bundle",
                "_revinclude=Encounter:patient",
                FormState::new()
                    .with("identifier", format!("adminid|{}", adminid))
                    .with("_revinclude", "Encounter:patient")
                    .with("limit", "5"),
            )
        })
        .into_iter()
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DateRange;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("female"), "Female");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_basic_only_uses_observed_genders() {
        let samples = SampleValueSet {
            genders: vec!["female".to_string()],
            ..Default::default()
        };
        let queries = basic(&samples);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].label, "All Female Patients");
    }

    #[test]
    fn test_demographics_midpoint() {
        let samples = SampleValueSet {
            birth_date_range: Some(DateRange::new("1940-05-01", "2010-02-11")),
            ..Default::default()
        };
        let queries = demographics(&samples);
        let labels: Vec<_> = queries.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(labels, vec!["Born After 1975", "Born Before 1975", "Born in 1975"]);
        assert_eq!(queries[0].params.get("birthdate"), Some("gt1975-01-01"));
        assert_eq!(queries[1].params.get("birthdate"), Some("lt1975-01-01"));
        assert_eq!(queries[2].params.get("birthdate"), Some("1975-01-01"));
    }

    #[test]
    fn test_demographics_skipped_for_unparseable_range() {
        let samples = SampleValueSet {
            birth_date_range: Some(DateRange::new("", "")),
            ..Default::default()
        };
        assert!(demographics(&samples).is_empty());
    }

    #[test]
    fn test_young_female_needs_both() {
        let range = Some(DateRange::new("1950-01-01", "2012-08-30"));
        let only_range = SampleValueSet {
            birth_date_range: range.clone(),
            genders: vec!["male".to_string()],
            ..Default::default()
        };
        assert!(combined(&only_range).is_empty());

        let both = SampleValueSet {
            birth_date_range: range,
            genders: vec!["female".to_string()],
            ..Default::default()
        };
        let queries = combined(&both);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].params.get("birthdate"), Some("gt2002-01-01"));
    }
}
