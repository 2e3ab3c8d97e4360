//! Aggregate state handed to the policy engine.

use serde::Serialize;

use iacsec_graph::Metadata;

use crate::azure::storage::Storage;
use crate::azure::synapse::Synapse;
use crate::walk::Walk;

/// Everything adapted from one module set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AzureState {
    pub storage: Storage,
    pub synapse: Synapse,
}

impl Walk for AzureState {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        self.storage.walk(visit);
        self.synapse.walk(visit);
    }
}
