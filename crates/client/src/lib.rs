//! # sift-client - Search execution adapter for the Sift FHIR search explorer
//!
//! This crate connects the pure [`sift_search`] core to a search backend:
//!
//! - [`SearchBackend`]: the execution adapter contract
//! - [`HttpBackend`]: its HTTP implementation (reqwest)
//! - [`Explorer`]: a session bound to a backend, with supersede-safe resource
//!   switching
//! - [`ClientConfig`]: command line and environment configuration
//! - [`ResourceSummary`]: one-line summaries for the resource browser
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sift_client::{ClientConfig, Explorer, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env();
//!     let backend = HttpBackend::new(&config)?;
//!     let mut explorer = Explorer::new(backend, &config);
//!
//!     explorer.switch_resource("Encounter").await;
//!     if let Some(outcome) = explorer.run_preset_by_label("Finished Encounters").await? {
//!         println!("{} matches in {:?}", outcome.count, outcome.elapsed);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## HTTP Headers
//!
//! | Header | Value |
//! |--------|-------|
//! | `x-search-mode` | `accelerated` or `canonical` |
//! | `x-debug-filter` | `true` unless disabled in configuration |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
pub mod browse;
pub mod config;
pub mod error;
pub mod explorer;
pub mod http;

pub use backend::{BrowseItem, BrowsePage, BrowseQuery, SearchBackend, SearchOutcome};
pub use browse::ResourceSummary;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use explorer::{DEFAULT_RESOURCE_TYPE, Explorer, ResourceLoad};
pub use http::HttpBackend;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise both Sift crates log at `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("sift_client={},sift_search={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
