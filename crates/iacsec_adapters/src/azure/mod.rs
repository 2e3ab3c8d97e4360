//! Azure resource-family adapters.

pub mod storage;
pub mod synapse;

pub use storage::StorageAdapter;
pub use synapse::SynapseAdapter;
