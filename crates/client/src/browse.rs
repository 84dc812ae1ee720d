//! One-line summaries of browsed resources.

use serde::Serialize;
use serde_json::Value;

use crate::backend::BrowseItem;

/// Placeholder for a missing value.
const MISSING: &str = "-";

/// Title and two detail lines for a browsed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    /// Resource id, if any.
    pub id: Option<String>,
    /// Main line.
    pub title: String,
    /// First detail line.
    pub detail: String,
    /// Second detail line.
    pub extra: String,
}

impl ResourceSummary {
    /// Summarizes an item of the given resource type.
    ///
    /// Patients show their name with ADMINID and MRN; every other type is
    /// shown the way encounters are, by id with status and class.
    pub fn from_item(resource_type: &str, item: &BrowseItem) -> Self {
        let resource = &item.resource;
        let id = str_at(resource, &["id"]).map(str::to_string);

        if resource_type == "Patient" {
            return Self {
                id,
                title: patient_name(resource, item.app.as_ref()),
                detail: format!("ID: {}", identifier_value(resource, "adminid")),
                extra: format!("MRN: {}", identifier_value(resource, "mrn")),
            };
        }

        Self {
            title: format!(
                "{}: {}",
                resource_type,
                id.as_deref().unwrap_or("No ID")
            ),
            id,
            detail: format!("Status: {}", str_at(resource, &["status"]).unwrap_or(MISSING)),
            extra: format!(
                "Class: {}",
                str_at(resource, &["class", "code"]).unwrap_or(MISSING)
            ),
        }
    }
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_str)
}

fn patient_name(resource: &Value, app: Option<&Value>) -> String {
    resource
        .get("name")
        .and_then(|names| names.get(0))
        .and_then(|name| str_at(name, &["text"]))
        .filter(|text| !text.is_empty())
        .or_else(|| app.and_then(|a| str_at(a, &["patientName"])))
        .filter(|text| !text.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

/// Value of the first identifier whose system contains `system_key`,
/// ignoring case.
fn identifier_value<'a>(resource: &'a Value, system_key: &str) -> &'a str {
    let key = system_key.to_lowercase();
    resource
        .get("identifier")
        .and_then(Value::as_array)
        .and_then(|identifiers| {
            identifiers.iter().find(|i| {
                str_at(i, &["system"])
                    .map(|s| s.to_lowercase().contains(&key))
                    .unwrap_or(false)
            })
        })
        .and_then(|i| str_at(i, &["value"]))
        .unwrap_or(MISSING)
}
