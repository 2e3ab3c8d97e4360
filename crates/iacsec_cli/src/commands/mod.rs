//! CLI command definitions.
//!
//! Each subcommand lives in its own module with an `execute` entry point.

use clap::{Parser, Subcommand};

pub mod adapt;
pub mod check;
pub mod families;

/// iacsec - provenance-preserving adaptation of IaC module sets
#[derive(Parser)]
#[command(name = "iacsec")]
#[command(version, about = "iacsec - adapt parsed IaC module sets into a typed cloud model")]
#[command(long_about = r#"
iacsec turns parsed infrastructure-as-code module sets into a typed model of
cloud resources. Every field records whether it was set explicitly, left to
its default, or synthesized for a resource the module set never declared.

COMMANDS:
  adapt     → Adapt a module-set document into the typed model
  families  → List the registered resource families
  check     → Load and validate a module-set document

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Invalid input document
  4 - Configuration error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Adapt a module set into the typed cloud model
    Adapt(adapt::AdaptArgs),

    /// List registered resource families
    Families(families::FamiliesArgs),

    /// Validate a module-set document without adapting it
    Check(check::CheckArgs),
}
