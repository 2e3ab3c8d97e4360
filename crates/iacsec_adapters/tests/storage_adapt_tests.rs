//! Integration tests for the storage adapter.

use std::path::Path;

use iacsec_adapters::azure::storage::{self, ACCOUNT, CONTAINER, NETWORK_RULES};
use iacsec_adapters::{AdaptOptions, OrphanGrouping};
use iacsec_graph::{BlockBuilder, Metadata, Module, ModuleSet, ModuleSetLoader, Provenance, Range};
use iacsec_providers::azure::storage::{Account, PUBLIC_ACCESS_BLOB};
use iacsec_providers::Walk;

fn fixture(name: &str) -> ModuleSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    ModuleSetLoader::load_file(&path).unwrap()
}

fn single(blocks: Vec<BlockBuilder>) -> ModuleSet {
    let blocks = blocks.into_iter().map(|b| b.file("main.tf").build()).collect();
    ModuleSet::new(vec![Module::new("main.tf", blocks)])
}

fn lines(value_range: &Range) -> (usize, usize) {
    (value_range.start_line, value_range.end_line)
}

/// Account with every optional field set.
fn full_account(label: &str, name: &str) -> BlockBuilder {
    BlockBuilder::new(ACCOUNT, label)
        .lines(1, 20)
        .attr("name", name, 2)
        .attr("enable_https_traffic_only", true, 3)
        .attr("min_tls_version", "TLS1_2", 4)
        .child(
            BlockBuilder::new("queue_properties", "")
                .lines(5, 10)
                .child(BlockBuilder::new("logging", "").lines(6, 9).attr("version", "1.0", 7)),
        )
        .child(
            BlockBuilder::new("network_rules", "")
                .lines(11, 14)
                .attr("default_action", "Deny", 12)
                .list_attr("bypass", ["AzureServices"], 13),
        )
}

fn network_rules(label: &str, start: usize) -> BlockBuilder {
    BlockBuilder::new(NETWORK_RULES, label).lines(start, start + 4)
}

#[test]
fn test_source_lines_are_preserved() {
    let adapted = storage::adapt(&fixture("storage.yaml"));

    assert_eq!(adapted.accounts.len(), 1);
    let account = &adapted.accounts[0];

    assert_eq!(lines(account.metadata.range()), (7, 27));
    assert_eq!(lines(account.enforce_https.range()), (10, 10));
    assert_eq!(lines(account.minimum_tls_version.range()), (11, 11));

    assert_eq!(lines(account.queue_properties.metadata.range()), (13, 21));
    assert_eq!(lines(account.queue_properties.enable_logging.range()), (14, 20));

    assert_eq!(account.network_rules.len(), 2);
    assert_eq!(lines(account.network_rules[0].metadata.range()), (23, 26));
    assert_eq!(lines(account.network_rules[0].allow_by_default.range()), (24, 24));
    assert_eq!(lines(account.network_rules[0].bypass[0].range()), (25, 25));

    assert_eq!(lines(account.network_rules[1].metadata.range()), (29, 35));
    assert_eq!(lines(account.network_rules[1].allow_by_default.range()), (33, 33));
    assert_eq!(lines(account.network_rules[1].bypass[0].range()), (34, 34));

    assert_eq!(account.containers.len(), 1);
    assert_eq!(lines(account.containers[0].metadata.range()), (37, 41));
    assert_eq!(lines(account.containers[0].public_access.range()), (40, 40));
}

#[test]
fn test_defined_values() {
    let adapted = storage::adapt(&fixture("storage.yaml"));
    let account = &adapted.accounts[0];

    assert!(account.metadata.is_explicit());
    assert!(account.enforce_https.is_true());
    assert_eq!(account.minimum_tls_version.as_str(), "TLS1_2");
    assert!(account.queue_properties.enable_logging.is_true());

    let nested = &account.network_rules[0];
    assert!(nested.allow_by_default.is_false());
    let bypass: Vec<&str> = nested.bypass.iter().map(|b| b.as_str()).collect();
    assert_eq!(bypass, vec!["Metrics", "AzureServices"]);

    let satellite = &account.network_rules[1];
    assert!(satellite.allow_by_default.is_true());
    assert_eq!(satellite.bypass.len(), 1);
    assert_eq!(satellite.bypass[0].as_str(), "Metrics");

    assert_eq!(account.containers[0].public_access.as_str(), PUBLIC_ACCESS_BLOB);
}

#[test]
fn test_every_explicit_value_is_fully_attributed() {
    let modules = fixture("storage.yaml");
    let adapted = storage::adapt(&modules);

    adapted.walk(&mut |metadata: &Metadata| {
        let range = metadata.range();
        match metadata.provenance() {
            Provenance::Explicit => {
                assert_eq!(range.file, "main.tf");
                assert!(range.start_line >= 1);
                assert!(range.start_line <= range.end_line);
                assert!(range.end_line <= 41);
            }
            Provenance::Defaulted | Provenance::Unmanaged => assert!(range.is_empty()),
        }
    });
}

#[test]
fn test_full_account_is_entirely_explicit() {
    let adapted = storage::adapt(&single(vec![full_account("example", "acct")]));

    assert_eq!(adapted.accounts.len(), 1);
    let summary = adapted.summary();
    assert_eq!(summary.defaulted, 0);
    assert_eq!(summary.unmanaged, 0);
    assert!(summary.explicit > 0);
}

#[test]
fn test_missing_primary_becomes_unmanaged() {
    let modules = single(vec![network_rules("rules", 22)
        .attr("storage_account_name", "acct", 23)
        .attr("default_action", "Allow", 24)
        .list_attr("bypass", ["Metrics"], 25)]);
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 1);
    let account = &adapted.accounts[0];
    assert!(!account.metadata.is_managed());
    assert_eq!(account.enforce_https.provenance(), Provenance::Unmanaged);
    assert_eq!(account.minimum_tls_version.provenance(), Provenance::Unmanaged);
    assert_eq!(account.queue_properties.metadata.provenance(), Provenance::Unmanaged);
    assert_eq!(account.queue_properties.enable_logging.provenance(), Provenance::Unmanaged);

    let rule = &account.network_rules[0];
    assert_eq!(rule.metadata.range(), &Range::new("main.tf", 22, 26));
    assert_eq!(rule.allow_by_default.provenance(), Provenance::Explicit);
    assert_eq!(rule.allow_by_default.range(), &Range::line("main.tf", 24));
    assert_eq!(rule.bypass[0].range(), &Range::line("main.tf", 25));
}

#[test]
fn test_satellites_merge_in_declaration_order() {
    let modules = single(vec![
        network_rules("b_first", 30)
            .reference("storage_account_name", "azurerm_storage_account.example.name", 31)
            .attr("default_action", "Allow", 32),
        full_account("example", "acct"),
        network_rules("a_second", 40).attr("storage_account_name", "acct", 41),
    ]);
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 1);
    let rules = &adapted.accounts[0].network_rules;
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0].metadata.range().start_line, 11);
    assert_eq!(rules[1].metadata.range().start_line, 30);
    assert_eq!(rules[2].metadata.range().start_line, 40);

    assert!(rules[1].allow_by_default.is_true());
    assert_eq!(rules[1].allow_by_default.provenance(), Provenance::Explicit);
    assert!(rules[2].allow_by_default.is_false());
    assert_eq!(rules[2].allow_by_default.provenance(), Provenance::Defaulted);
}

#[test]
fn test_orphans_consolidate_by_reference() {
    let modules = single(vec![
        network_rules("one", 1).reference("storage_account_name", "azurerm_storage_account.missing.name", 2),
        network_rules("two", 10).attr("storage_account_name", "other", 11),
        network_rules("three", 20).reference("storage_account_id", "azurerm_storage_account.missing.id", 21),
        BlockBuilder::new(CONTAINER, "c")
            .lines(30, 33)
            .reference("storage_account_name", "azurerm_storage_account.missing.name", 31),
    ]);
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 2);
    assert!(adapted.accounts.iter().all(|a| !a.metadata.is_managed()));

    let missing = &adapted.accounts[0];
    assert_eq!(missing.network_rules.len(), 2);
    assert_eq!(missing.network_rules[0].metadata.range().start_line, 1);
    assert_eq!(missing.network_rules[1].metadata.range().start_line, 20);
    assert_eq!(missing.containers.len(), 1);

    let other = &adapted.accounts[1];
    assert_eq!(other.network_rules.len(), 1);
    assert_eq!(other.network_rules[0].metadata.range().start_line, 10);
}

#[test]
fn test_keyless_orphans_each_get_a_placeholder() {
    let modules = single(vec![
        network_rules("test", 1)
            .attr("default_action", "Allow", 2)
            .list_attr("bypass", ["Metrics"], 3),
        BlockBuilder::new(CONTAINER, "example")
            .lines(7, 9)
            .attr("container_access_type", "blob", 8),
    ]);

    let adapted = storage::adapt(&modules);
    assert_eq!(adapted.accounts.len(), 2);
    assert_eq!(adapted.accounts[0].network_rules.len(), 1);
    assert!(adapted.accounts[0].containers.is_empty());
    assert!(adapted.accounts[1].network_rules.is_empty());
    assert_eq!(adapted.accounts[1].containers.len(), 1);
}

#[test]
fn test_shared_grouping_collects_every_orphan() {
    let modules = single(vec![
        network_rules("test", 1)
            .attr("default_action", "Allow", 2)
            .list_attr("bypass", ["Metrics"], 3),
        BlockBuilder::new(CONTAINER, "example")
            .lines(7, 9)
            .reference("storage_account_name", "azurerm_storage_account.gone.name", 8),
    ]);
    let options = AdaptOptions::default().with_orphan_grouping(OrphanGrouping::Shared);

    let adapted = storage::adapt_with(&modules, &options);
    assert_eq!(adapted.accounts.len(), 1);

    let holder = &adapted.accounts[0];
    assert!(!holder.metadata.is_managed());
    assert_eq!(holder.network_rules.len(), 1);
    assert!(holder.network_rules[0].allow_by_default.is_true());
    assert_eq!(holder.containers.len(), 1);
}

#[test]
fn test_shared_grouping_without_orphans_adds_nothing() {
    let modules = fixture("storage.yaml");
    let options = AdaptOptions::default().with_orphan_grouping(OrphanGrouping::Shared);
    assert_eq!(storage::adapt_with(&modules, &options).accounts.len(), 1);
}

#[test]
fn test_wrong_type_reference_is_orphaned() {
    let modules = single(vec![
        BlockBuilder::new("azurerm_resource_group", "example").lines(1, 3).attr("name", "rg", 2),
        full_account("example", "acct").lines(5, 25),
        network_rules("rules", 30).reference("storage_account_name", "azurerm_resource_group.example.name", 31),
    ]);
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 2);
    assert_eq!(adapted.accounts[0].network_rules.len(), 1);
    assert!(!adapted.accounts[1].metadata.is_managed());
    assert_eq!(adapted.accounts[1].network_rules[0].metadata.range().start_line, 30);
}

#[test]
fn test_duplicate_names_resolve_to_first_declaration() {
    let modules = single(vec![
        full_account("first", "acct"),
        full_account("second", "acct").lines(21, 40),
        network_rules("rules", 50).attr("storage_account_name", "acct", 51),
    ]);
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 2);
    assert_eq!(adapted.accounts[0].network_rules.len(), 2);
    assert_eq!(adapted.accounts[1].network_rules.len(), 1);
}

#[test]
fn test_satellite_in_child_module_finds_root_account() {
    let root = Module::new("main.tf", vec![full_account("example", "acct").file("main.tf").build()]);
    let child = Module::new(
        "modules/net/main.tf",
        vec![BlockBuilder::new(CONTAINER, "c")
            .file("modules/net/main.tf")
            .lines(1, 4)
            .reference("storage_account_name", "azurerm_storage_account.example.name", 2)
            .attr("container_access_type", "container", 3)
            .build()],
    );
    let adapted = storage::adapt(&ModuleSet::new(vec![root, child]));

    assert_eq!(adapted.accounts.len(), 1);
    let container = &adapted.accounts[0].containers[0];
    assert_eq!(container.metadata.range(), &Range::new("modules/net/main.tf", 1, 4));
}

#[test]
fn test_malformed_fields_degrade_to_defaults() {
    let modules = single(vec![BlockBuilder::new(ACCOUNT, "odd")
        .lines(1, 5)
        .attr("enable_https_traffic_only", "maybe", 2)
        .list_attr("min_tls_version", ["TLS1_2"], 3)
        .unresolved("name", "var.account_name", 4)]);
    let account = &storage::adapt(&modules).accounts[0];

    assert!(account.metadata.is_explicit());
    assert_eq!(account.enforce_https.provenance(), Provenance::Defaulted);
    assert!(account.enforce_https.is_false());
    assert_eq!(account.minimum_tls_version.provenance(), Provenance::Defaulted);
}

#[test]
fn test_unknown_block_types_are_ignored() {
    let modules = single(vec![
        BlockBuilder::new("azurerm_key_vault", "kv").lines(1, 3),
        full_account("example", "acct").lines(5, 25),
    ]);
    let adapted = storage::adapt(&modules);
    assert_eq!(adapted.accounts.len(), 1);
}

#[test]
fn test_adaptation_is_deterministic() {
    let modules = single(vec![
        full_account("example", "acct"),
        network_rules("a", 30).attr("storage_account_name", "acct", 31),
        network_rules("b", 40).attr("storage_account_name", "ghost", 41),
        network_rules("c", 50),
        BlockBuilder::new(CONTAINER, "c").lines(60, 62).attr("storage_account_name", "ghost", 61),
    ]);

    let first = storage::adapt(&modules);
    let second = storage::adapt(&modules);
    assert_eq!(first, second);

    let unmanaged: Vec<&Account> = first.accounts.iter().filter(|a| !a.metadata.is_managed()).collect();
    assert_eq!(unmanaged.len(), 2);
    assert_eq!(unmanaged[0].network_rules[0].metadata.range().start_line, 40);
    assert_eq!(unmanaged[0].containers.len(), 1);
    assert_eq!(unmanaged[1].network_rules[0].metadata.range().start_line, 50);
}

#[test]
fn test_literal_account_id_defers_to_account_name() {
    let id = "/subscriptions/0000/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct";
    let modules = single(vec![
        full_account("example", "acct"),
        network_rules("rules", 30)
            .attr("storage_account_id", id, 31)
            .attr("storage_account_name", "acct", 32),
    ]);
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 1);
    assert_eq!(adapted.accounts[0].network_rules.len(), 2);
    assert_eq!(adapted.accounts[0].network_rules[1].metadata.range().start_line, 30);
}

#[test]
fn test_indexed_reference_elsewhere_does_not_block_adaptation() {
    let content = r#"
modules:
  - path: main.tf
    line_count: 12
    blocks:
      - type: azurerm_storage_account
        label: example
        lines: [1, 4]
        attributes:
          - { name: name, lines: [2, 2], value: acct }
          - { name: enable_https_traffic_only, lines: [3, 3], value: true }
      - type: azurerm_role_assignment
        label: reader
        lines: [6, 9]
        attributes:
          - { name: principal_id, lines: [7, 7], ref: "azurerm_storage_account.example.identity[0].principal_id" }
          - { name: scope, lines: [8, 8], ref: "format(\"%s/blobs\", var.scope)" }
      - type: azurerm_storage_container
        label: logs
        lines: [10, 12]
        attributes:
          - { name: storage_account_name, lines: [11, 11], ref: "azurerm_storage_account.example.name" }
"#;
    let modules = ModuleSetLoader::from_yaml_str(content).unwrap();
    let adapted = storage::adapt(&modules);

    assert_eq!(adapted.accounts.len(), 1);
    assert!(adapted.accounts[0].enforce_https.is_true());
    assert_eq!(adapted.accounts[0].containers.len(), 1);
}
