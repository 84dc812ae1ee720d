//! # sift-search - Search parameter codec and example query synthesizer
//!
//! The pure core of the Sift search explorer. It turns typed, per-field input
//! into FHIR search query strings, reverses that transform for editing, and
//! synthesizes example queries from values actually present in the store.
//!
//! ## Overview
//!
//! - [`types`]: field definitions, comparison operators, typed values and
//!   sample value snapshots
//! - [`registry`]: per-resource field definitions with a string fallback
//! - [`codec`]: encode and decode between [`types::TypedValue`] and canonical
//!   strings such as `gt2015-01-01`
//! - [`expand`]: comma-separated multi-value expansion for allow-listed fields
//! - [`query`]: [`FormState`] and query-string assembly
//! - [`cache`]: per-resource sample value cache
//! - [`presets`]: data-gated example query templates
//! - [`session`]: the builder session tying it together, including
//!   supersede tagging of asynchronous loads
//!
//! Nothing in this crate performs I/O; see `sift-client` for the HTTP side.
//!
//! ## Quick Start
//!
//! ```
//! use sift_search::{MultiValueExpander, Session};
//! use sift_search::types::{FieldDefinition, ResourceFieldConfig, ValueType};
//!
//! let mut session = Session::new("Patient", MultiValueExpander::default());
//! let ticket = session.current_ticket();
//! session.complete_fields(
//!     &ticket,
//!     Ok(ResourceFieldConfig {
//!         params: vec![FieldDefinition::new("birthdate", ValueType::Date)],
//!     }),
//! );
//!
//! session.edit_input("birthdate", Some("gt"), "2015-01-01").unwrap();
//! assert_eq!(session.url_preview("fhir"), "/fhir/Patient?birthdate=gt2015-01-01");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod codec;
pub mod error;
pub mod expand;
pub mod presets;
pub mod query;
pub mod registry;
pub mod session;
pub mod types;

pub use cache::{SampleValueCache, effective_options};
pub use error::{CodecError, RegistryError};
pub use expand::{DEFAULT_MULTI_VALUE_FIELDS, MultiValueExpander};
pub use presets::{PresetCategory, PresetQuery, find_preset, preset_count, synthesize};
pub use query::{FormState, QueryPairs, SearchMode, SearchRequest, assemble};
pub use registry::FieldRegistry;
pub use session::{FetchTicket, LoadIssue, LoadSource, Session};
