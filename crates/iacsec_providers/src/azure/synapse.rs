//! Azure Synapse Analytics workspaces.

use serde::Serialize;

use iacsec_graph::{BoolValue, Metadata, StringValue};

use crate::walk::Walk;

pub const DEFAULT_MANAGED_VIRTUAL_NETWORK: bool = false;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Synapse {
    pub workspaces: Vec<Workspace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workspace {
    pub metadata: Metadata,
    pub enable_managed_virtual_network: BoolValue,
    pub firewall_rules: Vec<FirewallRule>,
}

impl Workspace {
    pub fn unmanaged() -> Self {
        Self {
            metadata: Metadata::unmanaged(),
            enable_managed_virtual_network: BoolValue::unmanaged(DEFAULT_MANAGED_VIRTUAL_NETWORK),
            firewall_rules: Vec::new(),
        }
    }
}

/// An `azurerm_synapse_firewall_rule` attached to a workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirewallRule {
    pub metadata: Metadata,
    pub name: StringValue,
    pub start_ip_address: StringValue,
    pub end_ip_address: StringValue,
}

impl FirewallRule {
    /// Whether the rule opens the workspace to every address.
    pub fn allows_all(&self) -> bool {
        self.start_ip_address.as_str() == "0.0.0.0"
            && self.end_ip_address.as_str() == "255.255.255.255"
    }
}

impl Walk for Synapse {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        self.workspaces.walk(visit);
    }
}

impl Walk for Workspace {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
        self.enable_managed_virtual_network.walk(visit);
        self.firewall_rules.walk(visit);
    }
}

impl Walk for FirewallRule {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
        self.name.walk(visit);
        self.start_ip_address.walk(visit);
        self.end_ip_address.walk(visit);
    }
}
