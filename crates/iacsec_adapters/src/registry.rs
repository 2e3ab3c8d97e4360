//! The static adapter table and the entry points that run it.

use std::sync::Arc;

use tracing::{debug, info};

use iacsec_graph::ModuleSet;
use iacsec_providers::AzureState;

use crate::adapter::{Adapted, Adapter};
use crate::azure::{StorageAdapter, SynapseAdapter};
use crate::error::{AdaptError, AdaptResult};
use crate::options::AdaptOptions;

/// Every registered adapter, in output order.
pub static ADAPTERS: &[&dyn Adapter] = &[&StorageAdapter, &SynapseAdapter];

pub fn find(family: &str) -> Option<&'static dyn Adapter> {
    ADAPTERS.iter().copied().find(|a| a.family() == family)
}

pub fn families() -> Vec<&'static str> {
    ADAPTERS.iter().map(|a| a.family()).collect()
}

/// Adapters selected by the options, in registry order.
pub fn select(options: &AdaptOptions) -> AdaptResult<Vec<&'static dyn Adapter>> {
    if let Some(unknown) = options.families.iter().find(|f| find(f).is_none()) {
        return Err(AdaptError::UnknownFamily(unknown.clone()));
    }
    Ok(ADAPTERS
        .iter()
        .copied()
        .filter(|a| options.includes(a.family()))
        .collect())
}

/// Run the selected adapters one after another.
pub fn run(modules: &ModuleSet, options: &AdaptOptions) -> AdaptResult<Vec<Adapted>> {
    let adapters = select(options)?;
    info!(
        "Adapting {} blocks across {} modules with {} adapters",
        modules.block_count(),
        modules.len(),
        adapters.len()
    );
    Ok(adapters
        .into_iter()
        .map(|adapter| {
            debug!("Running {} adapter", adapter.family());
            adapter.adapt(modules, options)
        })
        .collect())
}

/// Run the selected adapters on blocking tasks against a shared module set.
///
/// Results come back in registry order regardless of completion order.
/// Falls back to [`run`] when `options.parallel` is off.
pub async fn run_concurrently(modules: Arc<ModuleSet>, options: AdaptOptions) -> AdaptResult<Vec<Adapted>> {
    if !options.parallel {
        return run(&modules, &options);
    }

    let adapters = select(&options)?;
    info!(
        "Adapting {} blocks across {} modules with {} concurrent adapters",
        modules.block_count(),
        modules.len(),
        adapters.len()
    );

    let options = Arc::new(options);
    let handles: Vec<_> = adapters
        .into_iter()
        .map(|adapter| {
            let modules = Arc::clone(&modules);
            let options = Arc::clone(&options);
            tokio::task::spawn_blocking(move || adapter.adapt(&modules, &options))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}

/// Fold adapter outputs into one state.
pub fn into_state(results: Vec<Adapted>) -> AzureState {
    let mut state = AzureState::default();
    for result in results {
        result.apply_to(&mut state);
    }
    state
}

/// Adapt a module set into the full state, sequentially.
pub fn adapt(modules: &ModuleSet, options: &AdaptOptions) -> AdaptResult<AzureState> {
    run(modules, options).map(into_state)
}

/// Adapt a module set into the full state, one task per family.
pub async fn adapt_concurrently(modules: Arc<ModuleSet>, options: AdaptOptions) -> AdaptResult<AzureState> {
    run_concurrently(modules, options).await.map(into_state)
}
