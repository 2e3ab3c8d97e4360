//! Adapt command - Turn a module set into the typed cloud model.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::info;

use iacsec_adapters::{registry, AdaptOptions, Adapted, OrphanGrouping};
use iacsec_graph::ModuleSetLoader;
use iacsec_providers::{AzureState, Walk};

#[derive(Args)]
pub struct AdaptArgs {
    /// Module-set document, or a directory of documents
    input: PathBuf,

    /// Options file (YAML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resource family to adapt (repeatable; default: all)
    #[arg(short, long = "family")]
    families: Vec<String>,

    /// How satellites with a missing target are grouped
    #[arg(long, value_enum)]
    orphans: Option<OrphanArg>,

    /// Run families one after another
    #[arg(long)]
    sequential: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print entity and provenance counts instead of the model
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrphanArg {
    PerReference,
    Shared,
}

impl From<OrphanArg> for OrphanGrouping {
    fn from(arg: OrphanArg) -> Self {
        match arg {
            OrphanArg::PerReference => OrphanGrouping::PerReference,
            OrphanArg::Shared => OrphanGrouping::Shared,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// What `adapt` writes to stdout.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub families: Vec<String>,
    pub state: AzureState,
}

pub async fn execute(args: AdaptArgs) -> Result<()> {
    let options = build_options(&args)?;

    let modules = ModuleSetLoader::load(&args.input)
        .with_context(|| format!("Failed to load module set from {}", args.input.display()))?;

    let results = registry::run_concurrently(Arc::new(modules), options).await?;
    info!("Adapted {} families", results.len());

    if args.summary {
        print!("{}", render_summary(&results));
        return Ok(());
    }

    let envelope = Envelope {
        generated_at: Utc::now(),
        input: args.input.display().to_string(),
        families: results.iter().map(|r| r.family().to_string()).collect(),
        state: registry::into_state(results),
    };
    println!("{}", render(&envelope, args.format)?);

    Ok(())
}

/// Options from the config file (if any) with flags applied on top.
fn build_options(args: &AdaptArgs) -> Result<AdaptOptions> {
    let mut options = match &args.config {
        Some(path) => AdaptOptions::from_file(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?,
        None => AdaptOptions::default(),
    };

    if !args.families.is_empty() {
        options.families = args.families.clone();
    }
    if let Some(orphans) = args.orphans {
        options.orphan_grouping = orphans.into();
    }
    if args.sequential {
        options = options.sequential();
    }

    Ok(options)
}

fn render(envelope: &Envelope, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(envelope)?,
        OutputFormat::Yaml => serde_yaml::to_string(envelope)?,
    })
}

fn render_summary(results: &[Adapted]) -> String {
    let mut out = String::new();
    for result in results {
        let counts = result.summary();
        out.push_str(&format!(
            "{:<10} {:>4} entities ({} unmanaged)  explicit={} defaulted={} unmanaged={}\n",
            result.family(),
            result.entity_count(),
            result.unmanaged_count(),
            counts.explicit,
            counts.defaulted,
            counts.unmanaged
        ));
    }
    out
}
