//! Sift - FHIR search explorer
//!
//! Builds FHIR search queries from typed field input, runs them against a
//! search backend and shows the result count, timing and the filter the
//! backend executed.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use sift_client::{ClientConfig, Explorer, HttpBackend, SearchOutcome, init_logging};
use sift_search::SearchMode;
use sift_search::codec;
use sift_search::types::TypedValue;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sift", version, about = "FHIR search explorer")]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the search fields of a resource type.
    Fields {
        /// Resource type (e.g., Patient).
        resource_type: String,
    },

    /// List the example queries for a resource type.
    Presets {
        /// Resource type (e.g., Encounter).
        resource_type: String,
    },

    /// Run a search built from field values.
    Run {
        /// Resource type to search.
        resource_type: String,

        /// Field value as name=canonical (e.g., birthdate=gt2015-01-01). Repeatable.
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Search mode for this run.
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Print the result bundle.
        #[arg(long)]
        bundle: bool,
    },

    /// Run an example query by its label.
    Preset {
        /// Resource type the preset belongs to.
        resource_type: String,

        /// Preset label, as listed by `presets`.
        label: String,

        /// Search mode for this run.
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Print the result bundle.
        #[arg(long)]
        bundle: bool,
    },

    /// Browse stored resources.
    Browse {
        /// Resource type to list.
        resource_type: String,

        /// Free-text filter.
        #[arg(short, long)]
        q: Option<String>,

        /// Page number, starting at 1.
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size.
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Encode a value into its canonical string.
    Encode {
        /// Resource type the field belongs to.
        resource_type: String,

        /// Field name.
        field: String,

        /// Raw value.
        value: String,

        /// Comparison operator (date and quantity fields).
        #[arg(long)]
        op: Option<String>,
    },

    /// Decode a canonical string.
    Decode {
        /// Resource type the field belongs to.
        resource_type: String,

        /// Field name.
        field: String,

        /// Canonical string (e.g., ge2023-05-01).
        canonical: String,
    },
}

fn parse_param(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(name, canonical)| (name.trim().to_string(), canonical.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", value))
}

/// Creates an explorer with `resource_type` loaded.
async fn open(config: &ClientConfig, resource_type: &str) -> anyhow::Result<Explorer<HttpBackend>> {
    let backend = HttpBackend::new(config).context("Failed to create HTTP backend")?;
    let mut explorer = Explorer::new(backend, config);
    explorer.switch_resource(resource_type).await;
    for issue in explorer.session().issues() {
        eprintln!("warning: {}", issue);
    }
    Ok(explorer)
}

fn print_outcome(outcome: &SearchOutcome, with_bundle: bool) -> anyhow::Result<()> {
    println!("GET {}", outcome.url);
    println!(
        "{} result(s) in {} ms",
        outcome.count,
        outcome.elapsed.as_millis()
    );
    println!("executed filter:");
    println!("{}", serde_json::to_string_pretty(&outcome.filter)?);
    if with_bundle {
        println!("bundle:");
        println!("{}", serde_json::to_string_pretty(&outcome.bundle)?);
    }
    Ok(())
}

fn describe(value: &TypedValue) -> Value {
    serde_json::json!({
        "type": value.value_type().to_string(),
        "operator": value.operator_code(),
        "payload": value.payload(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config;
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        backend = %config.backend_url,
        mode = %config.search_mode,
        "Starting Sift"
    );

    match cli.command {
        Command::Fields { resource_type } => {
            let explorer = open(&config, &resource_type).await?;
            let session = explorer.session();
            for field in session.fields() {
                let mut line = format!("{:<24} {}", field.name, field.value_type);
                let operators = field.value_type.operator_codes();
                if !operators.is_empty() {
                    line.push_str(&format!("  [{}]", operators.join(" ")));
                }
                let options = session.options(&field.name);
                if !options.is_empty() {
                    line.push_str(&format!("  options: {}", options.join(", ")));
                }
                if let Some(help) = &field.help {
                    line.push_str(&format!("  ({})", help));
                }
                println!("{}", line);
            }
        }

        Command::Presets { resource_type } => {
            let explorer = open(&config, &resource_type).await?;
            let session = explorer.session();
            let categories = session.presets();
            let mut preview = session.clone();
            println!("{} examples", sift_search::preset_count(&categories));
            for category in &categories {
                println!();
                println!("{}", category.name);
                for query in &category.queries {
                    let request = preview.apply_preset(query);
                    println!("  {:<40} {}", query.label, query.desc);
                    println!("  {:<40} {}", "", request.path(&config.search_path));
                }
            }
        }

        Command::Run {
            resource_type,
            params,
            mode,
            bundle,
        } => {
            let mut explorer = open(&config, &resource_type).await?;
            let session = explorer.session_mut();
            if let Some(mode) = mode {
                session.set_mode(mode);
            }
            for (name, canonical) in params {
                session.edit(&name, canonical);
            }
            let outcome = explorer.run().await?;
            print_outcome(&outcome, bundle)?;
        }

        Command::Preset {
            resource_type,
            label,
            mode,
            bundle,
        } => {
            let mut explorer = open(&config, &resource_type).await?;
            if let Some(mode) = mode {
                explorer.session_mut().set_mode(mode);
            }
            match explorer.run_preset_by_label(&label).await? {
                Some(outcome) => print_outcome(&outcome, bundle)?,
                None => anyhow::bail!("No preset labelled '{}' for {}", label, resource_type),
            }
        }

        Command::Browse {
            resource_type,
            q,
            page,
            limit,
        } => {
            let backend = HttpBackend::new(&config)?;
            let mut explorer = Explorer::new(backend, &config);
            explorer.begin_switch(&resource_type);
            let results = explorer.browse(q.as_deref(), page, limit).await?;
            for summary in explorer.summarize(&results) {
                println!("{:<40} {:<20} {}", summary.title, summary.detail, summary.extra);
            }
            println!("Showing {} of {}", results.items.len(), results.total);
        }

        Command::Encode {
            resource_type,
            field,
            value,
            op,
        } => {
            let explorer = open(&config, &resource_type).await?;
            let def = explorer.session().definition(&field);
            let canonical = codec::encode_input(&def, op.as_deref(), &value)?;
            println!("{}", canonical);
        }

        Command::Decode {
            resource_type,
            field,
            canonical,
        } => {
            let explorer = open(&config, &resource_type).await?;
            let def = explorer.session().definition(&field);
            let decoded = codec::decode(&def, &canonical);
            println!("{}", serde_json::to_string_pretty(&describe(&decoded))?);
        }
    }

    Ok(())
}
