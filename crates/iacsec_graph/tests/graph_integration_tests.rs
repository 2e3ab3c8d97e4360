use std::fs;

use iacsec_graph::{GraphError, Link, Lookup, ModuleSetLoader, OrphanKey, Range, Resolver, Target};
use tempfile::tempdir;

const ROOT: &str = r#"
modules:
  - path: main.tf
    line_count: 20
    blocks:
      - type: azurerm_storage_account
        label: example
        lines: [1, 8]
        attributes:
          - { name: name, lines: [2, 2], value: acct }
          - { name: tags, lines: [3, 5], value: [a, b], elements: [[4, 4], [5, 5]] }
        blocks:
          - type: network_rules
            lines: [6, 7]
            attributes:
              - { name: default_action, lines: [7, 7], value: Deny }
      - type: azurerm_storage_account
        label: example
        lines: [10, 12]
        attributes:
          - { name: name, lines: [11, 11], value: shadowed }
"#;

const CHILD: &str = r#"
{
  "modules": [
    {
      "path": "modules/net/main.tf",
      "blocks": [
        {
          "type": "azurerm_storage_container",
          "label": "logs",
          "lines": [1, 5],
          "attributes": [
            { "name": "storage_account_name", "lines": [2, 2], "ref": "azurerm_storage_account.example.name" },
            { "name": "container_access_type", "lines": [3, 3], "value": "blob" }
          ]
        },
        {
          "type": "azurerm_storage_container",
          "label": "dynamic",
          "lines": [7, 9],
          "attributes": [
            { "name": "storage_account_name", "lines": [8, 8], "unresolved": "var.account" }
          ]
        }
      ]
    }
  ]
}
"#;

const LINK: Link = Link {
    attributes: &["storage_account_id", "storage_account_name"],
    target_type: "azurerm_storage_account",
    name_attribute: "name",
};

#[test]
fn test_load_directory_in_path_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a_root.yaml"), ROOT).unwrap();
    fs::create_dir(dir.path().join("b_modules")).unwrap();
    fs::write(dir.path().join("b_modules").join("net.json"), CHILD).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let modules = ModuleSetLoader::load(dir.path()).unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules.modules()[0].path, "main.tf");
    assert_eq!(modules.modules()[1].path, "modules/net/main.tf");
    assert_eq!(modules.block_count(), 4);
}

#[test]
fn test_cross_module_resolution() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a_root.yaml"), ROOT).unwrap();
    fs::write(dir.path().join("b_net.json"), CHILD).unwrap();
    let modules = ModuleSetLoader::load(dir.path()).unwrap();

    let containers = modules.blocks_of_type("azurerm_storage_container");
    assert_eq!(containers.len(), 2);

    let mut resolver = Resolver::new(&modules);
    match resolver.resolve(&containers[0], &LINK) {
        Target::Resolved(account) => {
            assert_eq!(account.range, Range::new("main.tf", 1, 8));
            assert_eq!(account.module.path, "main.tf");
        }
        other => panic!("expected a resolved target, got {:?}", other),
    }

    match resolver.resolve(&containers[1], &LINK) {
        Target::Orphan(Some(OrphanKey::Expression(text))) => assert_eq!(text, "var.account"),
        other => panic!("expected an expression orphan, got {:?}", other),
    }
}

#[test]
fn test_duplicate_keys_and_names_keep_first() {
    let modules = ModuleSetLoader::from_yaml_str(ROOT).unwrap();

    let first = modules.block("azurerm_storage_account", "example").unwrap();
    assert_eq!(first.range.start_line, 1);

    let mut resolver = Resolver::new(&modules);
    let shadowed = resolver.by_name("azurerm_storage_account", "name", "shadowed").unwrap();
    assert_eq!(shadowed.range.start_line, 10);
    assert!(resolver.by_name("azurerm_storage_account", "name", "missing").is_none());
}

#[test]
fn test_list_element_ranges() {
    let modules = ModuleSetLoader::from_yaml_str(ROOT).unwrap();
    let account = modules.block("azurerm_storage_account", "example").unwrap();

    let tags = account.string_values("tags");
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].range(), &Range::line("main.tf", 4));
    assert_eq!(tags[1].range(), &Range::line("main.tf", 5));

    match account.lookup_path("network_rules.default_action") {
        Lookup::Scalar(attr) => assert_eq!(attr.range(), &Range::line("main.tf", 7)),
        _ => panic!("expected a scalar"),
    }
}

#[test]
fn test_out_of_file_range_is_rejected() {
    let content = ROOT.replace("lines: [10, 12]", "lines: [10, 24]");
    let result = ModuleSetLoader::from_yaml_str(&content);
    assert!(matches!(result, Err(GraphError::InvalidRange { end: 24, .. })));
}

#[test]
fn test_empty_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let result = ModuleSetLoader::load(dir.path());
    assert!(matches!(result, Err(GraphError::EmptyModuleSet(_))));
}
