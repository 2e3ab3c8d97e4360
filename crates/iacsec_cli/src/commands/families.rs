//! Families command - List registered resource families.

use anyhow::Result;
use clap::Args;

use iacsec_adapters::registry::ADAPTERS;

#[derive(Args)]
pub struct FamiliesArgs {
    /// Print family names only
    #[arg(long)]
    names_only: bool,
}

pub async fn execute(args: FamiliesArgs) -> Result<()> {
    for adapter in ADAPTERS {
        if args.names_only {
            println!("{}", adapter.family());
            continue;
        }
        println!("{}", adapter.family());
        println!("   primary:    {}", adapter.primary_type());
        println!("   satellites: {}", adapter.satellite_types().join(", "));
    }
    Ok(())
}
