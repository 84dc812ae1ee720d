//! Preset synthesis against realistic sample value snapshots.

use sift_search::types::{DateRange, SampleValueSet};
use sift_search::{PresetCategory, preset_count, synthesize};

fn full_patient_samples() -> SampleValueSet {
    SampleValueSet {
        genders: vec!["female".into(), "male".into()],
        adminids: vec!["A1234567".into(), "B7654321".into()],
        family_names: vec!["Chan".into(), "Wong".into()],
        birth_date_range: Some(DateRange::new("1940-01-01", "2010-12-31")),
        ..Default::default()
    }
}

fn full_encounter_samples() -> SampleValueSet {
    SampleValueSet {
        statuses: vec!["finished".into(), "in-progress".into()],
        adminids: vec!["A1234567".into(), "B7654321".into()],
        hospital_codes: vec!["QEH".into(), "PWH".into()],
        doctor_codes: vec!["D001".into()],
        team_codes: vec!["T01".into()],
        date_range: Some(DateRange::new("2019-01-01", "2023-06-01")),
        ..Default::default()
    }
}

fn names(categories: &[PresetCategory]) -> Vec<&str> {
    categories.iter().map(|c| c.name.as_str()).collect()
}

fn category<'a>(categories: &'a [PresetCategory], name: &str) -> &'a PresetCategory {
    categories
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("missing category {}", name))
}

#[test]
fn test_gender_presets() {
    let samples = SampleValueSet {
        genders: vec!["female".into(), "male".into()],
        ..Default::default()
    };

    let categories = synthesize("Patient", &samples);
    let basic = category(&categories, "Basic Searches");

    let params: Vec<_> = basic
        .queries
        .iter()
        .map(|q| (q.params.get("gender"), q.params.get("limit"), q.params.len()))
        .collect();
    assert_eq!(
        params,
        vec![
            (Some("female"), Some("10"), 2),
            (Some("male"), Some("10"), 2),
        ]
    );
}

#[test]
fn test_last_month_cutoff() {
    let samples = SampleValueSet {
        date_range: Some(DateRange::new("2019-01-01", "2023-06-01")),
        ..Default::default()
    };

    let categories = synthesize("Encounter", &samples);
    let last_month = categories
        .iter()
        .flat_map(|c| &c.queries)
        .find(|q| q.label == "Last Month")
        .unwrap();

    assert_eq!(last_month.params.get("date-start"), Some("ge2023-05-01"));
}

#[test]
fn test_patient_categories_in_template_order() {
    let categories = synthesize("Patient", &full_patient_samples());
    assert_eq!(
        names(&categories),
        vec![
            "Basic Searches",
            "Date & Demographics",
            "Combined Queries",
            "Cross-Resource Tip",
            "FHIR Extras (_revinclude)",
        ]
    );
    // 2 genders + adminid + family, 3 dates, 3 combined, tip, bundle
    assert_eq!(preset_count(&categories), 12);
}

#[test]
fn test_encounter_categories_in_template_order() {
    let categories = synthesize("Encounter", &full_encounter_samples());
    assert_eq!(
        names(&categories),
        vec![
            "Status & Classification",
            "Provider & Location",
            "Date Ranges",
            "Complex Combined Queries",
            "Cross-Resource Queries (Patient → Encounter)",
            "FHIR Extras (_include)",
        ]
    );

    let labels: Vec<_> = category(&categories, "Complex Combined Queries")
        .queries
        .iter()
        .map(|q| q.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Completed @ QEH",
            "Dr. D001 Recent",
            "Dr. D001 @ QEH",
            "Finished Last Month",
        ]
    );
}

#[test]
fn test_no_gender_values_means_no_gender_queries() {
    let mut samples = full_patient_samples();
    samples.genders.clear();

    let categories = synthesize("Patient", &samples);
    for query in categories.iter().flat_map(|c| &c.queries) {
        assert!(
            query.params.get("gender").is_none(),
            "{} uses gender",
            query.label
        );
    }
    // family-name query keeps Basic Searches alive; Combined needs a gender
    assert!(names(&categories).contains(&"Basic Searches"));
    assert!(!names(&categories).contains(&"Combined Queries"));
}

#[test]
fn test_empty_snapshot_yields_only_data_free_presets() {
    let empty = SampleValueSet::default();

    assert!(synthesize("Patient", &empty).is_empty());

    let encounter = synthesize("Encounter", &empty);
    assert_eq!(names(&encounter), vec!["FHIR Extras (_include)"]);
    assert_eq!(encounter[0].queries.len(), 1);
}

#[test]
fn test_categories_are_never_empty() {
    let partials = [
        SampleValueSet {
            statuses: vec!["cancelled".into()],
            ..Default::default()
        },
        SampleValueSet {
            genders: vec!["other".into()],
            ..Default::default()
        },
        SampleValueSet {
            date_range: Some(DateRange::new("bad", "bad")),
            birth_date_range: Some(DateRange::new("bad", "bad")),
            ..Default::default()
        },
    ];

    for samples in &partials {
        for resource_type in ["Patient", "Encounter"] {
            for c in synthesize(resource_type, samples) {
                assert!(!c.queries.is_empty(), "{} is empty", c.name);
            }
        }
    }
}

#[test]
fn test_presets_only_reference_observed_identifiers() {
    let samples = full_encounter_samples();
    let categories = synthesize("Encounter", &samples);

    for query in categories.iter().flat_map(|c| &c.queries) {
        if let Some(subject) = query.params.get("subject.identifier") {
            let id = subject.trim_start_matches("adminid|");
            assert!(samples.adminids.iter().any(|a| a == id));
        }
        if let Some(provider) = query.params.get("service-provider") {
            let code = provider.trim_start_matches("Organization/");
            assert!(samples.hospital_codes.iter().any(|h| h == code));
        }
        if let Some(doctor) = query.params.get("participant.identifier") {
            let code = doctor.trim_start_matches("doctorCode|");
            assert!(samples.doctor_codes.iter().any(|d| d == code));
        }
    }
}

fn assert_patient_presets_observed(samples: &SampleValueSet) {
    let categories = synthesize("Patient", samples);
    assert!(!categories.is_empty());

    for query in categories.iter().flat_map(|c| &c.queries) {
        if let Some(identifier) = query.params.get("identifier") {
            let id = identifier.trim_start_matches("adminid|");
            assert!(samples.adminids.iter().any(|a| a == id), "{}", query.label);
        }
        if let Some(family) = query.params.get("family") {
            assert!(samples.family_names.iter().any(|f| f == family), "{}", query.label);
        }
        if let Some(gender) = query.params.get("gender") {
            assert!(samples.genders.iter().any(|g| g == gender), "{}", query.label);
        }
    }
}

#[test]
fn test_patient_presets_only_reference_observed_values() {
    assert_patient_presets_observed(&full_patient_samples());

    let female_only = SampleValueSet {
        genders: vec!["female".into()],
        ..full_patient_samples()
    };
    assert_patient_presets_observed(&female_only);
}
