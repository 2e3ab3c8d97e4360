//! Merging satellite blocks into the entities they configure.
//!
//! A reconciler lives for one adaptation pass. It is seeded with the
//! managed entities built from primary blocks, then receives satellites
//! one at a time. Satellites whose target resolved are appended to that
//! entity; the rest go to unmanaged placeholders keyed by the missing
//! target, so several orphans naming the same absent resource end up on
//! one placeholder.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use iacsec_graph::{BlockId, OrphanKey, Target};

use crate::options::OrphanGrouping;

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub managed: usize,
    pub merged: usize,
    pub orphaned: usize,
    pub unmanaged: usize,
}

pub struct Reconciler<E> {
    managed: Vec<E>,
    by_block: HashMap<BlockId, usize>,
    unmanaged: Vec<E>,
    by_key: HashMap<OrphanKey, usize>,
    shared: Option<usize>,
    grouping: OrphanGrouping,
    placeholder: fn() -> E,
    stats: ReconcileStats,
}

impl<E> Reconciler<E> {
    /// `placeholder` builds the unmanaged entity for orphans.
    pub fn new(grouping: OrphanGrouping, placeholder: fn() -> E) -> Self {
        Self {
            managed: Vec::new(),
            by_block: HashMap::new(),
            unmanaged: Vec::new(),
            by_key: HashMap::new(),
            shared: None,
            grouping,
            placeholder,
            stats: ReconcileStats::default(),
        }
    }

    /// Register a managed entity built from a primary block.
    pub fn add_primary(&mut self, id: BlockId, entity: E) {
        self.by_block.entry(id).or_insert(self.managed.len());
        self.managed.push(entity);
        self.stats.managed += 1;
    }

    /// Attach a satellite's contribution to the entity its target names.
    pub fn attach(&mut self, target: Target<'_>, attach: impl FnOnce(&mut E)) {
        let key = match target {
            Target::Resolved(block) => match self.by_block.get(&block.id) {
                Some(&index) => {
                    self.stats.merged += 1;
                    attach(&mut self.managed[index]);
                    return;
                }
                None => {
                    debug!("{} resolved but was not adapted as a primary", block.key());
                    Some(OrphanKey::Block(block.key()))
                }
            },
            Target::Orphan(key) => key,
        };

        self.stats.orphaned += 1;
        let index = self.placeholder_for(key);
        attach(&mut self.unmanaged[index]);
    }

    fn placeholder_for(&mut self, key: Option<OrphanKey>) -> usize {
        match (self.grouping, key) {
            (OrphanGrouping::Shared, _) => match self.shared {
                Some(index) => index,
                None => {
                    let index = self.push_placeholder();
                    self.shared = Some(index);
                    index
                }
            },
            (OrphanGrouping::PerReference, Some(key)) => {
                if let Some(&index) = self.by_key.get(&key) {
                    return index;
                }
                debug!("Synthesizing unmanaged entity for {}", key);
                let index = self.push_placeholder();
                self.by_key.insert(key, index);
                index
            }
            (OrphanGrouping::PerReference, None) => {
                debug!("Synthesizing unmanaged entity for satellite without a target");
                self.push_placeholder()
            }
        }
    }

    fn push_placeholder(&mut self) -> usize {
        self.unmanaged.push((self.placeholder)());
        self.stats.unmanaged += 1;
        self.unmanaged.len() - 1
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Managed entities in primary declaration order, then placeholders in
    /// the order their first orphan was seen.
    pub fn finish(self) -> Vec<E> {
        let mut entities = self.managed;
        entities.extend(self.unmanaged);
        entities
    }
}
