use std::sync::Arc;

use registrar_filters::{
    DataSource, FetchOutcome, FilterError, FilterStore, FilterView, OptionProvider, StoreConfig,
};
use registrar_models::{FilterUpdate, Selection, SelectionError};
use serde::Serialize;

/// A pool as printed by the list commands.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub items: Vec<T>,
}

impl<T> From<FetchOutcome<T>> for Listing<T> {
    fn from(outcome: FetchOutcome<T>) -> Self {
        Self {
            source: outcome.source(),
            fallback_reason: outcome.fallback_reason().map(str::to_owned),
            items: outcome.into_data(),
        }
    }
}

/// Builds an update from command-line values. Absent flags leave a level
/// untouched; `"all"` clears it.
pub fn selection_update(
    school: Option<&str>,
    department: Option<&str>,
    program: Option<&str>,
    search: Option<&str>,
) -> Result<FilterUpdate, SelectionError> {
    let mut update = FilterUpdate::default();
    if let Some(school) = school {
        update = update.school(Selection::parse(school)?);
    }
    if let Some(department) = department {
        update = update.department(Selection::parse(department)?);
    }
    if let Some(program) = program {
        update = update.program(Selection::parse(program)?);
    }
    if let Some(search) = search {
        update = update.search(search);
    }
    Ok(update)
}

/// Loads a fresh store, applies `update` and waits for any scoped loads the
/// update triggered before returning the derived view.
pub async fn resolve<P: OptionProvider>(
    provider: Arc<P>,
    config: StoreConfig,
    update: FilterUpdate,
) -> Result<FilterView, FilterError> {
    let store = FilterStore::new(provider, config, &FilterUpdate::default());
    store.load_options().await;
    store.update_filters(update)?;

    let mut rx = store.subscribe();
    // The store outlives the receiver, so this only returns once settled.
    let _ = rx.wait_for(|snapshot| snapshot.pending_loads == 0).await;

    Ok(store.view())
}
