//! Query-builder session state.
//!
//! A [`Session`] owns everything the builder needs: the selected resource
//! type and search mode, the current [`FormState`], loaded field
//! configuration and sample values. All operations are synchronous.
//!
//! Field configuration and sample values arrive asynchronously. Every
//! resource-type selection bumps a generation counter and hands out a
//! [`FetchTicket`]; a load result is applied only if its ticket still matches
//! the current selection, so a slow response for a superseded selection can
//! never overwrite newer state.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{SampleValueCache, effective_options};
use crate::codec;
use crate::error::CodecError;
use crate::expand::MultiValueExpander;
use crate::presets::{self, PresetCategory, PresetQuery};
use crate::query::{FormState, SearchMode, SearchRequest, assemble};
use crate::registry::FieldRegistry;
use crate::types::{FieldDefinition, ResourceFieldConfig, SampleValueSet, TypedValue};

/// Identifies the selection a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    resource_type: String,
    generation: u64,
}

impl FetchTicket {
    /// Resource type the fetch is for.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Selection counter at the time the fetch was issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Which load failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadSource {
    /// The field configuration document.
    FieldConfig,
    /// The sample value snapshot.
    SampleValues,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadSource::FieldConfig => write!(f, "field configuration"),
            LoadSource::SampleValues => write!(f, "sample values"),
        }
    }
}

/// A non-fatal load failure scoped to one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
    /// Resource type the load was for.
    pub resource_type: String,
    /// Which load failed.
    pub source: LoadSource,
    /// Error description.
    pub message: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not load {} for {}: {}",
            self.source, self.resource_type, self.message
        )
    }
}

/// State of one query-builder session.
#[derive(Debug, Clone)]
pub struct Session {
    resource_type: String,
    mode: SearchMode,
    generation: u64,
    form: FormState,
    registry: FieldRegistry,
    samples: SampleValueCache,
    issues: Vec<LoadIssue>,
    expander: MultiValueExpander,
}

impl Session {
    /// Creates a session with `resource_type` selected. Use
    /// [`Session::current_ticket`] to load its configuration.
    pub fn new(resource_type: impl Into<String>, expander: MultiValueExpander) -> Self {
        Self {
            resource_type: resource_type.into(),
            mode: SearchMode::default(),
            generation: 0,
            form: FormState::new(),
            registry: FieldRegistry::new(),
            samples: SampleValueCache::new(),
            issues: Vec::new(),
            expander,
        }
    }

    /// Selects a resource type.
    ///
    /// The form and load issues are reset and anything previously loaded for
    /// the type is dropped, so the form shows no fields until the returned
    /// ticket's loads complete.
    pub fn select_resource(&mut self, resource_type: impl Into<String>) -> FetchTicket {
        self.resource_type = resource_type.into();
        self.generation += 1;
        self.form = FormState::new();
        self.issues.clear();
        self.registry.remove(&self.resource_type);
        self.samples.remove(&self.resource_type);
        debug!(
            resource_type = %self.resource_type,
            generation = self.generation,
            "selected resource type"
        );
        self.current_ticket()
    }

    /// Ticket for the current selection.
    pub fn current_ticket(&self) -> FetchTicket {
        FetchTicket {
            resource_type: self.resource_type.clone(),
            generation: self.generation,
        }
    }

    /// Returns true if results for `ticket` may still be applied.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.resource_type == self.resource_type
    }

    /// Applies a field configuration load. Returns false if the ticket was
    /// superseded and the result discarded.
    pub fn complete_fields(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ResourceFieldConfig, String>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                resource_type = %ticket.resource_type,
                generation = ticket.generation,
                "discarding superseded field configuration"
            );
            return false;
        }

        let registered = result.and_then(|config| {
            self.registry
                .register(&ticket.resource_type, config)
                .map_err(|e| e.to_string())
        });
        if let Err(message) = registered {
            self.record_issue(LoadSource::FieldConfig, message);
        }
        true
    }

    /// Applies a sample value load. Returns false if the ticket was
    /// superseded and the result discarded.
    pub fn complete_samples(
        &mut self,
        ticket: &FetchTicket,
        result: Result<SampleValueSet, String>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                resource_type = %ticket.resource_type,
                generation = ticket.generation,
                "discarding superseded sample values"
            );
            return false;
        }

        match result {
            Ok(samples) => {
                self.samples.insert(&ticket.resource_type, samples);
            }
            Err(message) => self.record_issue(LoadSource::SampleValues, message),
        }
        true
    }

    fn record_issue(&mut self, source: LoadSource, message: String) {
        let issue = LoadIssue {
            resource_type: self.resource_type.clone(),
            source,
            message,
        };
        warn!(resource_type = %issue.resource_type, source = %issue.source, "{}", issue.message);
        self.issues.push(issue);
    }

    /// The selected resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The selected search mode.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Changes the search mode used by later requests.
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Load failures for the current selection.
    pub fn issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    /// Field definitions of the current resource type.
    pub fn fields(&self) -> &[FieldDefinition] {
        self.registry.fields(&self.resource_type)
    }

    /// Definition of one field, falling back to a string field.
    pub fn definition(&self, name: &str) -> FieldDefinition {
        self.registry.resolve(&self.resource_type, name).into_owned()
    }

    /// Choices to offer for a field.
    pub fn options(&self, name: &str) -> &[String] {
        match self.registry.definition_for(&self.resource_type, name) {
            Some(def) => effective_options(def, self.samples()),
            None => &[],
        }
    }

    /// Sample values of the current resource type.
    pub fn samples(&self) -> Option<&SampleValueSet> {
        self.samples.get(&self.resource_type)
    }

    /// Example queries for the current resource type. Empty until sample
    /// values have loaded.
    pub fn presets(&self) -> Vec<PresetCategory> {
        self.samples()
            .map(|samples| presets::synthesize(&self.resource_type, samples))
            .unwrap_or_default()
    }

    /// Total number of example queries.
    pub fn preset_count(&self) -> usize {
        presets::preset_count(&self.presets())
    }

    /// The current form.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Replaces the whole form.
    pub fn replace_form(&mut self, form: FormState) {
        self.form = form;
    }

    /// Sets a field to a canonical string.
    pub fn edit(&mut self, name: &str, canonical: impl Into<String>) {
        self.form = self.form.with(name, canonical);
    }

    /// Sets a field from a typed value.
    pub fn edit_typed(&mut self, name: &str, value: &TypedValue) -> Result<(), CodecError> {
        let canonical = codec::encode(&self.definition(name), value)?;
        self.edit(name, canonical);
        Ok(())
    }

    /// Sets a field from raw input.
    pub fn edit_input(
        &mut self,
        name: &str,
        operator: Option<&str>,
        payload: &str,
    ) -> Result<(), CodecError> {
        let canonical = codec::encode_input(&self.definition(name), operator, payload)?;
        self.edit(name, canonical);
        Ok(())
    }

    /// Changes the operator of a field, keeping its payload.
    pub fn set_operator(&mut self, name: &str, operator: &str) -> Result<(), CodecError> {
        let canonical = codec::set_operator(&self.definition(name), self.form.get(name), operator)?;
        self.edit(name, canonical);
        Ok(())
    }

    /// Changes the payload of a field, keeping its operator.
    pub fn set_payload(&mut self, name: &str, payload: &str) {
        let canonical = codec::set_payload(&self.definition(name), self.form.get(name), payload);
        self.edit(name, canonical);
    }

    /// Typed view of a field's current value.
    pub fn value(&self, name: &str) -> Option<TypedValue> {
        let canonical = self.form.get(name)?;
        Some(codec::decode(&self.definition(name), canonical))
    }

    /// Removes a field from the form.
    pub fn clear_field(&mut self, name: &str) {
        self.form = self.form.without(name);
    }

    /// Empties the form.
    pub fn clear_form(&mut self) {
        self.form = FormState::new();
    }

    /// Replaces the form with a preset's parameters and returns the request
    /// to execute.
    pub fn apply_preset(&mut self, preset: &PresetQuery) -> SearchRequest {
        debug!(label = %preset.label, "applying preset");
        self.form = preset.params.clone();
        self.request()
    }

    /// Looks up a preset of the current resource type by label and applies
    /// it.
    pub fn select_preset(&mut self, label: &str) -> Option<SearchRequest> {
        let categories = self.presets();
        let preset = presets::find_preset(&categories, label)?;
        Some(self.apply_preset(preset))
    }

    /// The request for the current form, resource type and mode.
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            resource_type: self.resource_type.clone(),
            pairs: assemble(&self.form, &self.registry, &self.resource_type, &self.expander),
            mode: self.mode,
        }
    }

    /// Preview of the request path under `search_path`.
    pub fn url_preview(&self, search_path: &str) -> String {
        self.request().path(search_path)
    }
}
