//! Azure resource families.

pub mod storage;
pub mod synapse;
