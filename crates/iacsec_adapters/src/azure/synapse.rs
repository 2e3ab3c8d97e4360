//! Synapse workspaces and their firewall rules.

use tracing::info;

use iacsec_graph::{Block, Link, Metadata, ModuleSet, Resolver};
use iacsec_providers::azure::synapse::{FirewallRule, Synapse, Workspace, DEFAULT_MANAGED_VIRTUAL_NETWORK};

use crate::adapter::{Adapted, Adapter};
use crate::options::AdaptOptions;
use crate::reconcile::Reconciler;

pub const WORKSPACE: &str = "azurerm_synapse_workspace";
pub const FIREWALL_RULE: &str = "azurerm_synapse_firewall_rule";

const WORKSPACE_LINK: Link = Link {
    attributes: &["synapse_workspace_id"],
    target_type: WORKSPACE,
    name_attribute: "name",
};

pub struct SynapseAdapter;

impl Adapter for SynapseAdapter {
    fn family(&self) -> &'static str {
        "synapse"
    }

    fn primary_type(&self) -> &'static str {
        WORKSPACE
    }

    fn satellite_types(&self) -> &'static [&'static str] {
        &[FIREWALL_RULE]
    }

    fn adapt(&self, modules: &ModuleSet, options: &AdaptOptions) -> Adapted {
        Adapted::Synapse(adapt_with(modules, options))
    }
}

pub fn adapt(modules: &ModuleSet) -> Synapse {
    adapt_with(modules, &AdaptOptions::default())
}

pub fn adapt_with(modules: &ModuleSet, options: &AdaptOptions) -> Synapse {
    Synapse {
        workspaces: adapt_workspaces(modules, options),
    }
}

fn adapt_workspaces(modules: &ModuleSet, options: &AdaptOptions) -> Vec<Workspace> {
    let mut reconciler = Reconciler::new(options.orphan_grouping, Workspace::unmanaged);
    for block in modules.blocks_of_type(WORKSPACE) {
        reconciler.add_primary(block.id, adapt_workspace(&block));
    }

    let mut resolver = Resolver::new(modules);
    for block in modules.blocks_of_type(FIREWALL_RULE) {
        let target = resolver.resolve(&block, &WORKSPACE_LINK);
        let rule = adapt_firewall_rule(&block);
        reconciler.attach(target, |workspace| workspace.firewall_rules.push(rule));
    }

    let stats = reconciler.stats();
    info!(
        "Adapted {} synapse workspaces ({} firewall rules merged, {} orphaned)",
        stats.managed, stats.merged, stats.orphaned
    );
    reconciler.finish()
}

pub fn adapt_workspace(block: &Block) -> Workspace {
    Workspace {
        metadata: Metadata::explicit(block.range.clone()),
        enable_managed_virtual_network: block
            .bool_value("managed_virtual_network_enabled", DEFAULT_MANAGED_VIRTUAL_NETWORK),
        firewall_rules: Vec::new(),
    }
}

pub fn adapt_firewall_rule(block: &Block) -> FirewallRule {
    FirewallRule {
        metadata: Metadata::explicit(block.range.clone()),
        name: block.string_value("name", ""),
        start_ip_address: block.string_value("start_ip_address", ""),
        end_ip_address: block.string_value("end_ip_address", ""),
    }
}
