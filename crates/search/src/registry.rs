//! Field type registry.
//!
//! Holds the field definitions of every resource type whose configuration has
//! been loaded. Lookups are pure; a name that is not registered resolves to a
//! plain string field so partial configuration keeps the form usable.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;

use crate::error::RegistryError;
use crate::types::{FieldDefinition, ResourceFieldConfig};

/// Per-resource field definitions, keyed by resource type.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, Vec<FieldDefinition>>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the configuration of one resource type, replacing any
    /// previous configuration for it.
    ///
    /// Returns the number of registered fields. Nothing is stored if two
    /// definitions share a name.
    pub fn register(
        &mut self,
        resource_type: &str,
        config: ResourceFieldConfig,
    ) -> Result<usize, RegistryError> {
        let mut seen = HashSet::new();
        for def in &config.params {
            if !seen.insert(def.name.as_str()) {
                return Err(RegistryError::DuplicateField {
                    resource_type: resource_type.to_string(),
                    name: def.name.clone(),
                });
            }
        }

        let count = config.params.len();
        debug!(resource_type, count, "registered field configuration");
        self.fields.insert(resource_type.to_string(), config.params);
        Ok(count)
    }

    /// Field definitions for a resource type in display order. Empty when
    /// nothing is registered.
    pub fn fields(&self, resource_type: &str) -> &[FieldDefinition] {
        self.fields
            .get(resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up one definition.
    pub fn definition_for(&self, resource_type: &str, name: &str) -> Option<&FieldDefinition> {
        self.fields(resource_type).iter().find(|def| def.name == name)
    }

    /// Looks up one definition, falling back to a string field with no
    /// options when the name is unknown.
    pub fn resolve<'a>(&'a self, resource_type: &str, name: &str) -> Cow<'a, FieldDefinition> {
        match self.definition_for(resource_type, name) {
            Some(def) => Cow::Borrowed(def),
            None => Cow::Owned(FieldDefinition::fallback(name)),
        }
    }

    /// Returns true if configuration for the resource type is registered.
    pub fn contains(&self, resource_type: &str) -> bool {
        self.fields.contains_key(resource_type)
    }

    /// Drops the configuration of one resource type.
    pub fn remove(&mut self, resource_type: &str) {
        self.fields.remove(resource_type);
    }

    /// Drops all configuration.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Registered resource types, sorted.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}
