//! Snapshot of distinct values observed in the backing store.
//!
//! The backend publishes one [`SampleValueSet`] per resource type at
//! `<inspect>/sample-values/<type>`. Presets are built only from what this
//! snapshot contains.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Lowest and highest observed value of a date-bearing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest observed value, as sent by the backend.
    pub min: String,
    /// Latest observed value, as sent by the backend.
    pub max: String,
}

impl DateRange {
    /// Creates a range from two date strings.
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// The calendar date of `min`, if it parses.
    pub fn min_date(&self) -> Option<NaiveDate> {
        parse_partial_date(&self.min)
    }

    /// The calendar date of `max`, if it parses.
    pub fn max_date(&self) -> Option<NaiveDate> {
        parse_partial_date(&self.max)
    }

    /// The year halfway between `min` and `max`, rounded down.
    pub fn midpoint_year(&self) -> Option<i32> {
        let min = self.min_date()?.year();
        let max = self.max_date()?.year();
        Some((min + max).div_euclid(2))
    }
}

/// Distinct values observed for one resource type.
///
/// Missing or `null` arrays deserialize as empty, a missing range as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleValueSet {
    /// Observed `Patient.gender` codes.
    #[serde(deserialize_with = "null_as_empty")]
    pub genders: Vec<String>,
    /// Observed `Encounter.status` codes.
    #[serde(deserialize_with = "null_as_empty")]
    pub statuses: Vec<String>,
    /// Example patient ADMINIDs.
    #[serde(deserialize_with = "null_as_empty")]
    pub adminids: Vec<String>,
    /// Example family names.
    #[serde(deserialize_with = "null_as_empty")]
    pub family_names: Vec<String>,
    /// Example hospital (service provider) codes.
    #[serde(deserialize_with = "null_as_empty")]
    pub hospital_codes: Vec<String>,
    /// Example attending doctor codes.
    #[serde(deserialize_with = "null_as_empty")]
    pub doctor_codes: Vec<String>,
    /// Example care team codes.
    #[serde(deserialize_with = "null_as_empty")]
    pub team_codes: Vec<String>,
    /// Range of `Patient.birthDate`.
    pub birth_date_range: Option<DateRange>,
    /// Range of `Encounter.period.start`.
    pub date_range: Option<DateRange>,
}

impl SampleValueSet {
    /// Returns true if `gender` was observed.
    pub fn has_gender(&self, gender: &str) -> bool {
        self.genders.iter().any(|g| g == gender)
    }

    /// Returns true if `status` was observed.
    pub fn has_status(&self, status: &str) -> bool {
        self.statuses.iter().any(|s| s == status)
    }

    /// Returns true if nothing at all was observed.
    pub fn is_empty(&self) -> bool {
        self.genders.is_empty()
            && self.statuses.is_empty()
            && self.adminids.is_empty()
            && self.family_names.is_empty()
            && self.hospital_codes.is_empty()
            && self.doctor_codes.is_empty()
            && self.team_codes.is_empty()
            && self.birth_date_range.is_none()
            && self.date_range.is_none()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Parses the calendar date at the start of a FHIR date or dateTime.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and anything longer that starts
/// with a full date (`2023-06-01T10:00:00Z`). Partial dates resolve to the
/// first day of the year or month.
pub fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(date) = value
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    {
        return Some(date);
    }

    let mut parts = value.splitn(3, '-');
    let year: i32 = parts.next().filter(|y| y.len() == 4)?.parse().ok()?;
    let month: u32 = match parts.next() {
        Some(m) if m.len() == 2 => m.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}
