//! Check command - Load and validate a module-set document.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use iacsec_graph::{ModuleSet, ModuleSetLoader};

#[derive(Args)]
pub struct CheckArgs {
    /// Module-set document, or a directory of documents
    input: PathBuf,
}

pub async fn execute(args: CheckArgs) -> Result<()> {
    info!("Checking module set: {}", args.input.display());

    let modules = ModuleSetLoader::load(&args.input)
        .with_context(|| format!("Invalid module set at {}", args.input.display()))?;

    print!("{}", report(&modules));
    println!("✅ Module set is valid");
    Ok(())
}

fn report(modules: &ModuleSet) -> String {
    let mut out = format!(
        "{} modules, {} blocks\n",
        modules.len(),
        modules.block_count()
    );

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for block in modules.blocks() {
        *by_type.entry(block.block.type_name.as_str()).or_default() += 1;
    }
    for (type_name, count) in by_type {
        out.push_str(&format!("   {:<40} {}\n", type_name, count));
    }
    out
}
