//! Common test utilities for the search client.
//!
//! - [`fake_backend`] - an in-process HTTP backend that records requests
//! - fixture documents shared by the test files

#![allow(dead_code)]

pub mod fake_backend;

use serde_json::{Value, json};

/// Field configuration document for Patient.
pub fn patient_config() -> Value {
    json!({
        "params": [
            { "name": "identifier", "type": "token", "help": "system|value" },
            { "name": "family", "type": "string" },
            { "name": "gender", "type": "token" },
            { "name": "birthdate", "type": "date", "help": "YYYY-MM-DD, comma for several" }
        ]
    })
}

/// Field configuration document for Encounter.
pub fn encounter_config() -> Value {
    json!({
        "params": [
            { "name": "subject.identifier", "type": "token" },
            { "name": "status", "type": "token" },
            { "name": "service-provider", "type": "reference" },
            { "name": "date-start", "type": "date" },
            { "name": "length", "type": "quantity" }
        ]
    })
}

/// Sample values for Patient.
pub fn patient_samples() -> Value {
    json!({
        "genders": ["female", "male"],
        "adminids": ["A1234567", "B7654321"],
        "familyNames": ["Chan", "Wong"],
        "birthDateRange": { "min": "1940-01-01", "max": "2010-12-31" }
    })
}

/// Sample values for Encounter.
pub fn encounter_samples() -> Value {
    json!({
        "statuses": ["finished", "in-progress"],
        "adminids": ["A1234567"],
        "hospitalCodes": ["QEH"],
        "doctorCodes": ["D001"],
        "teamCodes": null,
        "dateRange": { "min": "2019-01-01", "max": "2023-06-01" }
    })
}

/// A search response with two entries and both filter descriptions.
pub fn search_response() -> Value {
    json!({
        "bundle": {
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [
                { "resource": { "resourceType": "Patient", "id": "p1" } },
                { "resource": { "resourceType": "Patient", "id": "p2" } }
            ]
        },
        "mongoFilter": { "gender": "female" },
        "mongoPipeline": [{ "$match": { "gender": "female" } }, { "$limit": 10 }]
    })
}
