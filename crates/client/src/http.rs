//! HTTP implementation of [`SearchBackend`].
//!
//! | Operation | Request |
//! |-----------|---------|
//! | field configuration | `GET <field-config-url>/<type-lowercased>.json`, or the same file under the local directory |
//! | sample values | `GET <backend>/<inspect>/sample-values/<type>` |
//! | search | `GET <backend>/<search>/<type>?<query>` with `x-search-mode` and `x-debug-filter` |
//! | browse | `GET <backend>/<inspect>/resources?resourceType=&q=&page=&limit=` |

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sift_search::SearchRequest;
use sift_search::types::{ResourceFieldConfig, SampleValueSet};
use tracing::{debug, info, instrument};
use url::Url;

use crate::backend::{BrowsePage, BrowseQuery, SearchBackend, SearchOutcome};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Header carrying the search mode.
pub const SEARCH_MODE_HEADER: &str = "x-search-mode";

/// Header asking the backend to describe the executed filter.
pub const DEBUG_FILTER_HEADER: &str = "x-debug-filter";

/// Where field configuration documents come from.
#[derive(Debug, Clone)]
enum FieldConfigSource {
    Remote(Url),
    Local(PathBuf),
}

/// Talks to the search backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    search_path: String,
    inspect_path: String,
    field_configs: FieldConfigSource,
    debug_filter: bool,
}

impl HttpBackend {
    /// Creates a backend from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("sift/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ClientError::Http {
                url: config.backend_url.clone(),
                source,
            })?;

        let field_configs = match &config.field_config_dir {
            Some(dir) => FieldConfigSource::Local(dir.clone()),
            None => FieldConfigSource::Remote(parse_url(&config.field_config_url)?),
        };

        Ok(Self {
            client,
            base_url: parse_url(&config.backend_url)?,
            search_path: config.search_path.trim_matches('/').to_string(),
            inspect_path: config.inspect_path.trim_matches('/').to_string(),
            field_configs,
            debug_filter: config.debug_filter,
        })
    }

    /// The URL a search request is sent to.
    pub fn search_url(&self, request: &SearchRequest) -> ClientResult<Url> {
        let mut url = join(&self.base_url, &[&self.search_path, &request.resource_type])?;
        if !request.pairs.is_empty() {
            url.set_query(Some(&request.query_string()));
        }
        Ok(url)
    }

    fn inspect_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut all = vec![self.inspect_path.as_str()];
        all.extend_from_slice(segments);
        join(&self.base_url, &all)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        let text = self.get_text(self.client.get(url.clone()), &url).await?;
        decode(&url, &text)
    }

    async fn get_text(&self, request: reqwest::RequestBuilder, url: &Url) -> ClientResult<String> {
        let response = request.send().await.map_err(|source| ClientError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ClientError::Http {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn parse_url(value: &str) -> ClientResult<Url> {
    Url::parse(value).map_err(|_| ClientError::InvalidUrl(value.to_string()))
}

/// Appends path segments to `base`, percent-encoding each one.
fn join(base: &Url, segments: &[&str]) -> ClientResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments.iter().flat_map(|s| s.split('/')).filter(|s| !s.is_empty()));
    Ok(url)
}

fn decode<T: DeserializeOwned>(url: &Url, text: &str) -> ClientResult<T> {
    serde_json::from_str(text).map_err(|e| ClientError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn config_file_name(resource_type: &str) -> String {
    format!("{}.json", resource_type.to_lowercase())
}

#[async_trait]
impl SearchBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn field_config(&self, resource_type: &str) -> ClientResult<ResourceFieldConfig> {
        let file = config_file_name(resource_type);
        match &self.field_configs {
            FieldConfigSource::Local(dir) => {
                let path = dir.join(&file);
                debug!(path = %path.display(), "reading field configuration");
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| ClientError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                serde_json::from_str(&text).map_err(|e| ClientError::Decode {
                    url: path.display().to_string(),
                    message: e.to_string(),
                })
            }
            FieldConfigSource::Remote(root) => {
                let url = join(root, &[&file])?;
                debug!(%url, "fetching field configuration");
                self.get_json(url).await
            }
        }
    }

    #[instrument(skip(self))]
    async fn sample_values(&self, resource_type: &str) -> ClientResult<SampleValueSet> {
        let url = self.inspect_url(&["sample-values", resource_type])?;
        debug!(%url, "fetching sample values");
        self.get_json(url).await
    }

    #[instrument(skip(self, request), fields(resource_type = %request.resource_type, mode = %request.mode))]
    async fn execute(&self, request: &SearchRequest) -> ClientResult<SearchOutcome> {
        let url = self.search_url(request)?;
        let mut builder = self
            .client
            .get(url.clone())
            .header(SEARCH_MODE_HEADER, request.mode.as_str());
        if self.debug_filter {
            builder = builder.header(DEBUG_FILTER_HEADER, "true");
        }

        let started = Instant::now();
        let text = self.get_text(builder, &url).await?;
        let elapsed = started.elapsed();

        let body: Value = decode(&url, &text)?;
        let outcome = SearchOutcome::from_response(url.as_str(), body, elapsed);
        info!(
            url = %outcome.url,
            count = outcome.count,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "search completed"
        );
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn browse(&self, query: &BrowseQuery) -> ClientResult<BrowsePage> {
        let mut url = self.inspect_url(&["resources"])?;
        url.query_pairs_mut()
            .extend_pairs(query.pairs().iter().map(|(k, v)| (*k, v.as_str())));
        self.get_json(url).await
    }
}
