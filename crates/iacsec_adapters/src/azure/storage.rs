//! Storage accounts, with network rules and containers that may be declared
//! on separate resources.

use tracing::info;

use iacsec_graph::{Block, BoolValue, Link, Metadata, ModuleSet, Resolver};
use iacsec_providers::azure::storage::{
    Account, Container, NetworkRule, QueueProperties, Storage, DEFAULT_ENFORCE_HTTPS,
    DEFAULT_MINIMUM_TLS_VERSION, PUBLIC_ACCESS_BLOB, PUBLIC_ACCESS_CONTAINER, PUBLIC_ACCESS_OFF,
};

use crate::adapter::{Adapted, Adapter};
use crate::options::AdaptOptions;
use crate::reconcile::Reconciler;

pub const ACCOUNT: &str = "azurerm_storage_account";
pub const NETWORK_RULES: &str = "azurerm_storage_account_network_rules";
pub const CONTAINER: &str = "azurerm_storage_container";

const ACCOUNT_LINK: Link = Link {
    attributes: &["storage_account_id", "storage_account_name"],
    target_type: ACCOUNT,
    name_attribute: "name",
};

pub struct StorageAdapter;

impl Adapter for StorageAdapter {
    fn family(&self) -> &'static str {
        "storage"
    }

    fn primary_type(&self) -> &'static str {
        ACCOUNT
    }

    fn satellite_types(&self) -> &'static [&'static str] {
        &[NETWORK_RULES, CONTAINER]
    }

    fn adapt(&self, modules: &ModuleSet, options: &AdaptOptions) -> Adapted {
        Adapted::Storage(adapt_with(modules, options))
    }
}

/// Adapt with default options.
pub fn adapt(modules: &ModuleSet) -> Storage {
    adapt_with(modules, &AdaptOptions::default())
}

pub fn adapt_with(modules: &ModuleSet, options: &AdaptOptions) -> Storage {
    Storage {
        accounts: adapt_accounts(modules, options),
    }
}

fn adapt_accounts(modules: &ModuleSet, options: &AdaptOptions) -> Vec<Account> {
    let mut reconciler = Reconciler::new(options.orphan_grouping, Account::unmanaged);
    for block in modules.blocks_of_type(ACCOUNT) {
        reconciler.add_primary(block.id, adapt_account(&block));
    }

    let mut resolver = Resolver::new(modules);

    for block in modules.blocks_of_type(NETWORK_RULES) {
        let target = resolver.resolve(&block, &ACCOUNT_LINK);
        let rule = adapt_network_rule(&block);
        reconciler.attach(target, |account| account.network_rules.push(rule));
    }

    for block in modules.blocks_of_type(CONTAINER) {
        let target = resolver.resolve(&block, &ACCOUNT_LINK);
        let container = adapt_container(&block);
        reconciler.attach(target, |account| account.containers.push(container));
    }

    let stats = reconciler.stats();
    info!(
        "Adapted {} storage accounts ({} satellites merged, {} orphaned into {} unmanaged)",
        stats.managed, stats.merged, stats.orphaned, stats.unmanaged
    );
    reconciler.finish()
}

pub fn adapt_account(block: &Block) -> Account {
    Account {
        metadata: Metadata::explicit(block.range.clone()),
        network_rules: block
            .children_of_type("network_rules")
            .map(adapt_network_rule)
            .collect(),
        enforce_https: block.bool_value("enable_https_traffic_only", DEFAULT_ENFORCE_HTTPS),
        containers: Vec::new(),
        queue_properties: adapt_queue_properties(block),
        minimum_tls_version: block.string_value("min_tls_version", DEFAULT_MINIMUM_TLS_VERSION),
    }
}

fn adapt_queue_properties(account: &Block) -> QueueProperties {
    let queue = match account.child("queue_properties") {
        Some(queue) => queue,
        None => return QueueProperties::defaulted(),
    };

    let enable_logging = match queue.child("logging") {
        Some(logging) => BoolValue::explicit(true, logging.range.clone()),
        None => BoolValue::defaulted(false),
    };

    QueueProperties {
        metadata: Metadata::explicit(queue.range.clone()),
        enable_logging,
    }
}

/// Works for both the nested `network_rules` block and the
/// `azurerm_storage_account_network_rules` resource.
pub fn adapt_network_rule(block: &Block) -> NetworkRule {
    NetworkRule {
        metadata: Metadata::explicit(block.range.clone()),
        bypass: block.string_values("bypass"),
        allow_by_default: block.equals_ignore_case("default_action", "Allow", false),
    }
}

pub fn adapt_container(block: &Block) -> Container {
    let public_access = block.extract(
        "container_access_type",
        PUBLIC_ACCESS_OFF.to_string(),
        "string",
        |expr| {
            expr.as_string().map(|access| {
                match access.as_str() {
                    "blob" => PUBLIC_ACCESS_BLOB,
                    "container" => PUBLIC_ACCESS_CONTAINER,
                    _ => PUBLIC_ACCESS_OFF,
                }
                .to_string()
            })
        },
    );

    Container {
        metadata: Metadata::explicit(block.range.clone()),
        public_access,
    }
}
