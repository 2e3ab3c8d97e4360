//! The adapter protocol.

use serde::Serialize;

use iacsec_graph::{Metadata, ModuleSet};
use iacsec_providers::azure::storage::Storage;
use iacsec_providers::azure::synapse::Synapse;
use iacsec_providers::{AzureState, Walk};

use crate::options::AdaptOptions;

/// Converts a module set into the typed model of one resource family.
///
/// Implementations are pure: they read the module set, never mutate it,
/// and always return a complete model.
pub trait Adapter: Send + Sync {
    /// Name used to select the adapter (`storage`, `synapse`).
    fn family(&self) -> &'static str;

    /// Block type that yields one managed entity per declaration.
    fn primary_type(&self) -> &'static str;

    /// Block types that configure a primary entity from a separate declaration.
    fn satellite_types(&self) -> &'static [&'static str];

    fn adapt(&self, modules: &ModuleSet, options: &AdaptOptions) -> Adapted;
}

/// Output of one adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Adapted {
    Storage(Storage),
    Synapse(Synapse),
}

impl Adapted {
    pub fn family(&self) -> &'static str {
        match self {
            Adapted::Storage(_) => "storage",
            Adapted::Synapse(_) => "synapse",
        }
    }

    /// Number of top-level entities produced.
    pub fn entity_count(&self) -> usize {
        match self {
            Adapted::Storage(storage) => storage.accounts.len(),
            Adapted::Synapse(synapse) => synapse.workspaces.len(),
        }
    }

    /// Number of synthesized placeholder entities.
    pub fn unmanaged_count(&self) -> usize {
        match self {
            Adapted::Storage(storage) => storage
                .accounts
                .iter()
                .filter(|a| !a.metadata.is_managed())
                .count(),
            Adapted::Synapse(synapse) => synapse
                .workspaces
                .iter()
                .filter(|w| !w.metadata.is_managed())
                .count(),
        }
    }

    pub fn apply_to(self, state: &mut AzureState) {
        match self {
            Adapted::Storage(storage) => state.storage = storage,
            Adapted::Synapse(synapse) => state.synapse = synapse,
        }
    }
}

impl Walk for Adapted {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        match self {
            Adapted::Storage(storage) => storage.walk(visit),
            Adapted::Synapse(synapse) => synapse.walk(visit),
        }
    }
}
