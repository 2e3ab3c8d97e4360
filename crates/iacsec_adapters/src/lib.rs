//! # iacsec_adapters
//!
//! Resource-family adapters that turn a [`ModuleSet`](iacsec_graph::ModuleSet)
//! into the typed provider model.
//!
//! Each adapter runs a primary pass over its primary block type, then folds
//! in satellite blocks (resources that configure another resource from a
//! separate declaration) through a [`Reconciler`]. Satellites whose target
//! is missing are attached to synthesized unmanaged entities so the policy
//! engine still has something to evaluate.
//!
//! ## Example
//!
//! ```rust
//! use iacsec_adapters::{registry, AdaptOptions};
//! use iacsec_graph::{BlockBuilder, Module, ModuleSet, Provenance};
//!
//! let rules = BlockBuilder::new("azurerm_storage_account_network_rules", "orphan")
//!     .file("main.tf")
//!     .lines(1, 4)
//!     .attr("storage_account_name", "missing", 2)
//!     .attr("default_action", "Allow", 3)
//!     .build();
//! let modules = ModuleSet::new(vec![Module::new("main.tf", vec![rules])]);
//!
//! let state = registry::adapt(&modules, &AdaptOptions::default()).unwrap();
//! let account = &state.storage.accounts[0];
//! assert_eq!(account.enforce_https.provenance(), Provenance::Unmanaged);
//! assert_eq!(account.network_rules[0].allow_by_default.provenance(), Provenance::Explicit);
//! ```

pub mod adapter;
pub mod azure;
pub mod error;
pub mod options;
pub mod reconcile;
pub mod registry;

pub use adapter::{Adapted, Adapter};
pub use error::{AdaptError, AdaptResult};
pub use options::{AdaptOptions, OrphanGrouping};
pub use reconcile::{ReconcileStats, Reconciler};
