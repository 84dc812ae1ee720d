//! Query execution adapter contract.
//!
//! [`SearchBackend`] is the seam between the synchronous core and the
//! network. [`crate::HttpBackend`] implements it over HTTP; tests substitute
//! their own implementations.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sift_search::SearchRequest;
use sift_search::types::{ResourceFieldConfig, SampleValueSet};

use crate::error::ClientResult;

/// Response key of the multi-stage pipeline description.
pub const PIPELINE_KEY: &str = "mongoPipeline";

/// Response key of the single filter document description.
pub const FILTER_KEY: &str = "mongoFilter";

/// Result of one executed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// The URL that was requested.
    pub url: String,
    /// The result bundle as returned.
    pub bundle: Value,
    /// Description of the filter the backend executed. Opaque; shown as is.
    pub filter: Value,
    /// Number of entries in the bundle.
    pub count: usize,
    /// Wall-clock time of the round trip.
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

impl SearchOutcome {
    /// Builds an outcome from a decoded search response body.
    ///
    /// The bundle is the `bundle` member, or the whole body when there is
    /// none. The filter is the pipeline description when present, else the
    /// filter document, else an empty object.
    pub fn from_response(url: impl Into<String>, body: Value, elapsed: Duration) -> Self {
        let filter = [PIPELINE_KEY, FILTER_KEY]
            .iter()
            .filter_map(|key| body.get(*key))
            .find(|value| !value.is_null())
            .cloned()
            .unwrap_or_else(|| json!({}));

        let bundle = match body.get("bundle") {
            Some(bundle) if !bundle.is_null() => bundle.clone(),
            _ => body,
        };
        let count = bundle
            .get("entry")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        Self {
            url: url.into(),
            bundle,
            filter,
            count,
            elapsed,
        }
    }

    /// The bundle entries, empty when there are none.
    pub fn entries(&self) -> &[Value] {
        self.bundle
            .get("entry")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A page request for the resource browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseQuery {
    /// Resource type to list.
    pub resource_type: String,
    /// Free-text filter; omitted when empty.
    pub q: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl BrowseQuery {
    /// First page of 20 for a resource type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            q: None,
            page: 1,
            limit: 20,
        }
    }

    /// Sets the free-text filter.
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.q = (!q.is_empty()).then_some(q);
        self
    }

    /// Sets the page number and size.
    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Query parameters in request order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("resourceType", self.resource_type.clone())];
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// One item of a browse page: the stored resource and its application
/// metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseItem {
    /// The FHIR resource.
    #[serde(default)]
    pub resource: Value,
    /// Application-side metadata (e.g., `patientName`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<Value>,
}

/// A page of stored resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowsePage {
    /// Items on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<BrowseItem>,
    /// Total matching resources.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A backend that can describe and execute searches.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetches the field configuration document of a resource type.
    async fn field_config(&self, resource_type: &str) -> ClientResult<ResourceFieldConfig>;

    /// Fetches the sample value snapshot of a resource type.
    async fn sample_values(&self, resource_type: &str) -> ClientResult<SampleValueSet>;

    /// Executes a search.
    async fn execute(&self, request: &SearchRequest) -> ClientResult<SearchOutcome>;

    /// Lists stored resources.
    async fn browse(&self, query: &BrowseQuery) -> ClientResult<BrowsePage>;
}
