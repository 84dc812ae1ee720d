//! Drives a [`Session`] against a [`SearchBackend`].
//!
//! Switching resource types is split into three steps so callers that run
//! loads concurrently keep the supersede guarantee:
//!
//! 1. [`Explorer::begin_switch`] selects the type and returns a ticket
//! 2. [`Explorer::fetch`] loads field configuration and sample values for the
//!    ticket, concurrently, without touching the session
//! 3. [`Explorer::apply`] hands the results to the session, which drops them
//!    if a newer selection was made in the meantime
//!
//! [`Explorer::switch_resource`] does all three in sequence.

use sift_search::types::{ResourceFieldConfig, SampleValueSet};
use sift_search::{FetchTicket, PresetQuery, Session};
use tracing::{debug, instrument};

use crate::backend::{BrowsePage, BrowseQuery, SearchBackend, SearchOutcome};
use crate::browse::ResourceSummary;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Resource type selected when an explorer starts.
pub const DEFAULT_RESOURCE_TYPE: &str = "Patient";

/// Loads fetched for one ticket, not yet applied.
#[derive(Debug)]
pub struct ResourceLoad {
    ticket: FetchTicket,
    fields: ClientResult<ResourceFieldConfig>,
    samples: ClientResult<SampleValueSet>,
}

impl ResourceLoad {
    /// The ticket the loads were issued for.
    pub fn ticket(&self) -> &FetchTicket {
        &self.ticket
    }
}

/// A query-builder session bound to a backend.
pub struct Explorer<B> {
    backend: B,
    session: Session,
    search_path: String,
}

impl<B: SearchBackend> Explorer<B> {
    /// Creates an explorer with the default resource type selected and
    /// nothing loaded yet. Call [`Explorer::reload`] to load it.
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        let mut session = Session::new(DEFAULT_RESOURCE_TYPE, config.expander());
        session.set_mode(config.search_mode);
        Self {
            backend,
            session,
            search_path: config.search_path.clone(),
        }
    }

    /// The session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session state, for form edits and mode changes.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Selects a resource type and returns the ticket to load it with.
    pub fn begin_switch(&mut self, resource_type: &str) -> FetchTicket {
        self.session.select_resource(resource_type)
    }

    /// Fetches field configuration and sample values for a ticket.
    #[instrument(skip(self), fields(resource_type = %ticket.resource_type()))]
    pub async fn fetch(&self, ticket: FetchTicket) -> ResourceLoad {
        let resource_type = ticket.resource_type();
        let (fields, samples) = tokio::join!(
            self.backend.field_config(resource_type),
            self.backend.sample_values(resource_type),
        );
        ResourceLoad {
            ticket,
            fields,
            samples,
        }
    }

    /// Applies fetched loads. Returns false if they were superseded.
    pub fn apply(&mut self, load: ResourceLoad) -> bool {
        let ResourceLoad {
            ticket,
            fields,
            samples,
        } = load;
        let fields_applied = self
            .session
            .complete_fields(&ticket, fields.map_err(|e| e.to_string()));
        let samples_applied = self
            .session
            .complete_samples(&ticket, samples.map_err(|e| e.to_string()));
        fields_applied && samples_applied
    }

    /// Selects a resource type and loads it.
    pub async fn switch_resource(&mut self, resource_type: &str) -> bool {
        let ticket = self.begin_switch(resource_type);
        let load = self.fetch(ticket).await;
        self.apply(load)
    }

    /// Loads the currently selected resource type again.
    pub async fn reload(&mut self) -> bool {
        let resource_type = self.session.resource_type().to_string();
        self.switch_resource(&resource_type).await
    }

    /// Preview of the request the current form would send.
    pub fn url_preview(&self) -> String {
        self.session.url_preview(&self.search_path)
    }

    /// Executes the current form.
    ///
    /// A form with nothing to send searches the whole resource type. A
    /// failure leaves the form as it was.
    pub async fn run(&self) -> ClientResult<SearchOutcome> {
        let request = self.session.request();
        debug!(path = %request.path(&self.search_path), "running search");
        self.backend.execute(&request).await
    }

    /// Replaces the form with a preset and executes it.
    pub async fn run_preset(&mut self, preset: &PresetQuery) -> ClientResult<SearchOutcome> {
        self.session.apply_preset(preset);
        self.run().await
    }

    /// Runs the preset with the given label. Returns `Ok(None)` when the
    /// current resource type has no such preset.
    pub async fn run_preset_by_label(
        &mut self,
        label: &str,
    ) -> ClientResult<Option<SearchOutcome>> {
        if self.session.select_preset(label).is_none() {
            return Ok(None);
        }
        self.run().await.map(Some)
    }

    /// Lists stored resources of the current type.
    pub async fn browse(&self, q: Option<&str>, page: u32, limit: u32) -> ClientResult<BrowsePage> {
        let mut query = BrowseQuery::new(self.session.resource_type()).with_page(page, limit);
        if let Some(q) = q {
            query = query.with_query(q);
        }
        self.backend.browse(&query).await
    }

    /// Summaries of a browse page's items.
    pub fn summarize(&self, page: &BrowsePage) -> Vec<ResourceSummary> {
        page.items
            .iter()
            .map(|item| ResourceSummary::from_item(self.session.resource_type(), item))
            .collect()
    }
}
