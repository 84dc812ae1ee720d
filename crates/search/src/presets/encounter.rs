use chrono::NaiveDate;

use super::{CategoryTemplate, PresetQuery, months_before};
use crate::query::FormState;
use crate::types::SampleValueSet;

pub(crate) static TEMPLATES: &[CategoryTemplate] = &[
    CategoryTemplate {
        name: "Status & Classification",
        build: status,
    },
    CategoryTemplate {
        name: "Provider & Location",
        build: provider,
    },
    CategoryTemplate {
        name: "Date Ranges",
        build: date_ranges,
    },
    CategoryTemplate {
        name: "Complex Combined Queries",
        build: complex,
    },
    CategoryTemplate {
        name: "Cross-Resource Queries (Patient → Encounter)",
        build: cross_resource,
    },
    CategoryTemplate {
        name: "FHIR Extras (_include)",
        build: include,
    },
];

fn organization(code: &str) -> String {
    format!("Organization/{}", code)
}

fn doctor(code: &str) -> String {
    format!("doctorCode|{}", code)
}

fn patient(adminid: &str) -> String {
    format!("adminid|{}", adminid)
}

/// `ge<date>` for the date `months` before the latest observed encounter.
fn since(samples: &SampleValueSet, months: u32) -> Option<String> {
    let latest: NaiveDate = samples.date_range.as_ref()?.max_date()?;
    months_before(latest, months).map(|cutoff| format!("ge{}", cutoff))
}

fn status(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let mut queries = Vec::new();
    if samples.has_status("finished") {
        queries.push(PresetQuery::new(
            "Finished Encounters",
            "Filter by status",
            FormState::new().with("status", "finished").with("limit", "10"),
        ));
    }
    if samples.has_status("in-progress") {
        queries.push(PresetQuery::new(
            "Active Encounters",
            "In-progress encounters",
            FormState::new()
                .with("status", "in-progress")
                .with("limit", "10"),
        ));
    }
    queries
}

fn provider(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let mut queries = Vec::new();

    let descs = ["Filter by service provider", "Different hospital"];
    for (hospital, desc) in samples.hospital_codes.iter().zip(descs) {
        queries.push(PresetQuery::new(
            format!("Hospital: {}", hospital),
            desc,
            FormState::new()
                .with("service-provider", organization(hospital))
                .with("limit", "10"),
        ));
    }
    if let Some(code) = samples.doctor_codes.first() {
        queries.push(PresetQuery::new(
            format!("Doctor: {}", code),
            "Filter by practitioner",
            FormState::new()
                .with("participant.identifier", doctor(code))
                .with("limit", "10"),
        ));
    }
    if let Some(team) = samples.team_codes.first() {
        queries.push(PresetQuery::new(
            format!("Care Team: {}", team),
            "Filter by care team",
            FormState::new()
                .with("careteam", format!("CareTeam/{}", team))
                .with("limit", "10"),
        ));
    }
    queries
}

fn date_ranges(samples: &SampleValueSet) -> Vec<PresetQuery> {
    [
        (1, "Last Month", "Recent encounters"),
        (3, "Last 3 Months", "Date range query"),
        (6, "Last 6 Months", "Longer date range"),
    ]
    .into_iter()
    .filter_map(|(months, label, desc)| {
        let start = since(samples, months)?;
        Some(PresetQuery::new(
            label,
            desc,
            FormState::new()
                .with("date-start", start)
                .with("limit", "10"),
        ))
    })
    .collect()
}

fn complex(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let mut queries = Vec::new();
    let hospital = samples.hospital_codes.first();
    let doctor_code = samples.doctor_codes.first();
    let last_month = since(samples, 1);

    if let (Some(hospital), true) = (hospital, samples.has_status("finished")) {
        queries.push(PresetQuery::new(
            format!("Completed @ {}", hospital),
            "Hospital + status",
            FormState::new()
                .with("service-provider", organization(hospital))
                .with("status", "finished")
                .with("limit", "10"),
        ));
    }
    if let (Some(code), Some(start)) = (doctor_code, &last_month) {
        queries.push(PresetQuery::new(
            format!("Dr. {} Recent", code),
            "Practitioner + date",
            FormState::new()
                .with("participant.identifier", doctor(code))
                .with("date-start", start.as_str())
                .with("limit", "10"),
        ));
    }
    if let (Some(hospital), Some(code)) = (hospital, doctor_code) {
        queries.push(PresetQuery::new(
            format!("Dr. {} @ {}", code, hospital),
            "Practitioner + hospital",
            FormState::new()
                .with("participant.identifier", doctor(code))
                .with("service-provider", organization(hospital))
                .with("limit", "10"),
        ));
    }
    if let (true, Some(start)) = (samples.has_status("finished"), &last_month) {
        queries.push(PresetQuery::new(
            "Finished Last Month",
            "Status + date range",
            FormState::new()
                .with("status", "finished")
                .with("date-start", start.as_str())
                .with("limit", "10"),
        ));
    }
    queries
}

fn cross_resource(samples: &SampleValueSet) -> Vec<PresetQuery> {
    let mut queries = Vec::new();
    let Some(first) = samples.adminids.first() else {
        return queries;
    };

    queries.push(PresetQuery::new(
        format!("Encounters for Patient {}", first),
        "Cross-resource: Patient → Encounters via ADMINID",
        FormState::new()
            .with("subject.identifier", patient(first))
            .with("limit", "10"),
    ));
    if let Some(second) = samples.adminids.get(1) {
        queries.push(PresetQuery::new(
            format!("Encounters for {}", second),
            "Different patient's encounters",
            FormState::new()
                .with("subject.identifier", patient(second))
                .with("limit", "10"),
        ));
    }
    if samples.has_status("finished") {
        queries.push(PresetQuery::new(
            format!("Finished visits for {}", first),
            "Patient encounters + status filter",
            FormState::new()
                .with("subject.identifier", patient(first))
                .with("status", "finished")
                .with("limit", "10"),
        ));
    }
    if let Some(hospital) = samples.hospital_codes.first() {
        queries.push(PresetQuery::new(
            format!("{} @ {}", first, hospital),
            "Patient encounters at specific hospital",
            FormState::new()
                .with("subject.identifier", patient(first))
                .with("service-provider", organization(hospital))
                .with("limit", "10"),
        ));
    }
    if let Some(start) = since(samples, 3) {
        queries.push(PresetQuery::new(
            format!("{} Recent 3mo", first),
            "Patient's recent encounters (date filter)",
            FormState::new()
                .with("subject.identifier", patient(first))
                .with("date-start", start)
                .with("limit", "10"),
        ));
    }
    queries
}

fn include(samples: &SampleValueSet) -> Vec<PresetQuery> {
    // references no sample values, so always present
    let mut queries = vec![PresetQuery::new(
        "Include Patient resources",
        "_include=Encounter:subject",
        FormState::new()
            .with("limit", "5")
            .with("_include", "Encounter:subject"),
    )];
    if let Some(code) = samples.doctor_codes.first() {
        queries.push(PresetQuery::new(
            format!("Doctor {} + include subject", code),
            "Doctor filter with included Patient bundles",
            FormState::new()
                .with("participant.identifier", doctor(code))
                .with("_include", "Encounter:subject")
                .with("limit", "5"),
        ));
    }
    queries
}
