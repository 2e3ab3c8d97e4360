//! # iacsec_providers
//!
//! The typed, provider-specific model that adapters produce and the policy
//! engine evaluates. Every leaf field is a provenance value from
//! `iacsec_graph`, so a finding can always be traced back to a source line,
//! or to the fact that nothing was declared at all.

pub mod azure;
pub mod state;
pub mod walk;

pub use state::AzureState;
pub use walk::{ProvenanceSummary, Walk};
