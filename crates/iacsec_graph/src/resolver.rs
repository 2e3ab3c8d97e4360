//! Resolution of satellite blocks to the primary block they configure.
//!
//! Resolution is two-phase: a structural reference
//! (`azurerm_storage_account.example.name`) is followed first; a plain
//! string is matched against the name attribute of blocks of the target
//! type. The name index is built lazily, once per resolver, and the first
//! declaration wins when names collide.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::block::{Block, Lookup};
use crate::expr::{Expr, ReferenceKey};
use crate::module::{BlockId, BlockRef, ModuleSet};

/// How a satellite type points at its primary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Candidate attributes on the satellite, tried in order.
    pub attributes: &'static [&'static str],
    /// Type of the primary block.
    pub target_type: &'static str,
    /// Attribute on the primary holding its literal name.
    pub name_attribute: &'static str,
}

/// Key under which orphans targeting the same missing primary are grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OrphanKey {
    /// A structural reference whose target is missing or of the wrong type.
    Block(ReferenceKey),
    /// A name that matched no primary block.
    Name(String),
    /// A reference the parser could not evaluate, by source text.
    Expression(String),
}

impl std::fmt::Display for OrphanKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrphanKey::Block(key) => write!(f, "{}", key),
            OrphanKey::Name(name) => write!(f, "name \"{}\"", name),
            OrphanKey::Expression(text) => write!(f, "expression `{}`", text),
        }
    }
}

/// Outcome of resolving a satellite.
#[derive(Debug, Clone)]
pub enum Target<'a> {
    Resolved(BlockRef<'a>),
    /// No primary found; `None` when the satellite names no target at all.
    Orphan(Option<OrphanKey>),
}

impl<'a> Target<'a> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Target::Resolved(_))
    }
}

/// Per-pass resolver over an immutable module set.
pub struct Resolver<'a> {
    modules: &'a ModuleSet,
    names: HashMap<(String, String), HashMap<String, BlockId>>,
}

impl<'a> Resolver<'a> {
    pub fn new(modules: &'a ModuleSet) -> Self {
        Self {
            modules,
            names: HashMap::new(),
        }
    }

    pub fn modules(&self) -> &'a ModuleSet {
        self.modules
    }

    /// First block of `type_name` whose `name_attribute` is the literal `name`.
    pub fn by_name(&mut self, type_name: &str, name_attribute: &str, name: &str) -> Option<BlockRef<'a>> {
        let modules = self.modules;
        let index = self
            .names
            .entry((type_name.to_string(), name_attribute.to_string()))
            .or_insert_with(|| build_name_index(modules, type_name, name_attribute));
        index.get(name).and_then(|id| modules.get(*id))
    }

    /// Resolve the primary block a satellite attaches to.
    ///
    /// A literal in an `_id` attribute is a cloud resource id, not a name:
    /// it is never name-matched, and only keys the orphan when no later
    /// candidate resolves.
    pub fn resolve(&mut self, satellite: &Block, link: &Link) -> Target<'a> {
        let mut fallback = None;
        for attribute in link.attributes {
            match satellite.lookup(attribute) {
                Lookup::Reference(_, reference) => {
                    let key = reference.key();
                    if reference.type_name != link.target_type {
                        debug!(
                            "{} at {} references {} (expected {}); treating as orphan",
                            satellite.type_name, satellite.range, key, link.target_type
                        );
                        return Target::Orphan(Some(OrphanKey::Block(key)));
                    }
                    return match self.modules.resolve_reference(reference) {
                        Some(target) => Target::Resolved(target),
                        None => Target::Orphan(Some(OrphanKey::Block(key))),
                    };
                }
                Lookup::Scalar(attr) => {
                    if let Expr::String(name) = attr.expr() {
                        if attribute.ends_with("_id") {
                            fallback.get_or_insert_with(|| OrphanKey::Name(name.clone()));
                            continue;
                        }
                        return match self.by_name(link.target_type, link.name_attribute, name) {
                            Some(target) => Target::Resolved(target),
                            None => Target::Orphan(Some(OrphanKey::Name(name.clone()))),
                        };
                    }
                }
                Lookup::Unresolved(attr) => {
                    if let Expr::Unresolved(text) = attr.expr() {
                        return Target::Orphan(Some(OrphanKey::Expression(text.clone())));
                    }
                }
                Lookup::Absent | Lookup::List(_) | Lookup::Block(_) => {}
            }
        }
        Target::Orphan(fallback)
    }
}

fn build_name_index(modules: &ModuleSet, type_name: &str, name_attribute: &str) -> HashMap<String, BlockId> {
    let mut index = HashMap::new();
    for block in modules.blocks_of_type(type_name) {
        if let Some(Expr::String(name)) = block.attribute(name_attribute).map(|a| a.expr()) {
            index.entry(name.clone()).or_insert(block.id);
        }
    }
    debug!("Indexed {} {} names by '{}'", index.len(), type_name, name_attribute);
    index
}
