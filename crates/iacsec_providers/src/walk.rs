//! Traversal of every metadata node in the model.

use serde::Serialize;

use iacsec_graph::{Metadata, Provenance, Value};

/// Visit the metadata of an entity, its sub-entities, and its values.
pub trait Walk {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata));

    fn summary(&self) -> ProvenanceSummary {
        let mut summary = ProvenanceSummary::default();
        self.walk(&mut |metadata: &Metadata| summary.record(metadata));
        summary
    }
}

impl<T> Walk for Value<T> {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        visit(&self.metadata);
    }
}

impl<W: Walk> Walk for Vec<W> {
    fn walk(&self, visit: &mut dyn FnMut(&Metadata)) {
        for item in self {
            item.walk(visit);
        }
    }
}

/// Count of metadata nodes by provenance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProvenanceSummary {
    pub explicit: usize,
    pub defaulted: usize,
    pub unmanaged: usize,
}

impl ProvenanceSummary {
    pub fn record(&mut self, metadata: &Metadata) {
        match metadata.provenance() {
            Provenance::Explicit => self.explicit += 1,
            Provenance::Defaulted => self.defaulted += 1,
            Provenance::Unmanaged => self.unmanaged += 1,
        }
    }

    pub fn merge(&mut self, other: &ProvenanceSummary) {
        self.explicit += other.explicit;
        self.defaulted += other.defaulted;
        self.unmanaged += other.unmanaged;
    }

    pub fn total(&self) -> usize {
        self.explicit + self.defaulted + self.unmanaged
    }
}
