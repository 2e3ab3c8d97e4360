//! # iacsec_graph
//!
//! The configuration graph that sits between a Terraform parser and the
//! resource-family adapters.
//!
//! This crate provides:
//! - **Provenance values**: every extracted scalar carries its source range
//!   and whether it was declared, defaulted, or synthesized
//! - **Block / Module / ModuleSet**: a read-only, indexed view over parsed blocks
//! - **Resolver**: structural and name-based resolution of satellite blocks
//! - **Loader**: module-set documents in YAML or JSON
//!
//! ## Example
//!
//! ```rust
//! use iacsec_graph::{BlockBuilder, Module, ModuleSet, Provenance};
//!
//! let account = BlockBuilder::new("azurerm_storage_account", "example")
//!     .file("main.tf")
//!     .lines(1, 4)
//!     .attr("enable_https_traffic_only", true, 2)
//!     .build();
//!
//! let modules = ModuleSet::new(vec![Module::new("main.tf", vec![account])]);
//! let block = modules.block("azurerm_storage_account", "example").unwrap();
//!
//! let https = block.bool_value("enable_https_traffic_only", false);
//! assert_eq!(https.provenance(), Provenance::Explicit);
//!
//! let tls = block.string_value("min_tls_version", "");
//! assert_eq!(tls.provenance(), Provenance::Defaulted);
//! ```

pub mod block;
pub mod builder;
pub mod error;
pub mod expr;
pub mod loader;
pub mod module;
pub mod range;
pub mod resolver;
pub mod value;

pub use block::{Block, Lookup};
pub use builder::BlockBuilder;
pub use error::{GraphError, GraphResult};
pub use expr::{Attribute, Expr, Node, Reference, ReferenceKey};
pub use loader::{AttributeDocument, BlockDocument, ModuleDocument, ModuleSetDocument, ModuleSetLoader};
pub use module::{BlockId, BlockRef, Module, ModuleSet};
pub use range::{Metadata, Provenance, Range};
pub use resolver::{Link, OrphanKey, Resolver, Target};
pub use value::{BoolValue, IntValue, StringValue, Value};
