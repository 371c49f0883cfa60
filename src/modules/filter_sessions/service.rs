use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use registrar_core::AppError;
use registrar_filters::search::search;
use registrar_filters::{FilterStore, OptionProvider, StoreConfig, filter_records};
use registrar_models::{FilterUpdate, LoadMode};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::state::{AppState, FilterSession, evict_over_capacity};

use super::model::{
    CreateFilterSessionDto, DepartmentListResponse, FilterRecordsDto, FilterRecordsResponse,
    FilterSessionResponse, ProgramListResponse,
};

pub struct FilterSessionService;

impl FilterSessionService {
    #[instrument(skip(state, dto), fields(load_mode = ?dto.load_mode))]
    pub async fn create_session(
        state: &AppState,
        dto: CreateFilterSessionDto,
    ) -> Result<FilterSessionResponse, AppError> {
        let mut config = StoreConfig::from(&state.catalog_config);
        if let Some(load_mode) = dto.load_mode {
            config.load_mode = load_mode;
        }

        let store = FilterStore::new(
            Arc::clone(&state.provider),
            config,
            &FilterUpdate::default(),
        );
        store.load_options().await;
        if !dto.filters.is_empty() {
            store.update_filters(dto.filters)?;
            settle(state, &store).await;
        }

        let session = FilterSession::new(store);
        let id = Uuid::new_v4();

        let (active, evicted) = {
            let mut sessions = state.sessions.write().await;
            let evicted = evict_over_capacity(&mut sessions, state.session_config.max_sessions);
            sessions.insert(id, session.clone());
            (sessions.len(), evicted)
        };

        if !evicted.is_empty() {
            for _ in &evicted {
                registrar_observability::track_filter_session_closed();
            }
            info!(?evicted, "Evicted least recently used filter sessions");
        }
        registrar_observability::track_filter_session_created(load_mode_label(config.load_mode));
        registrar_observability::set_active_filter_sessions(active);
        info!(session.id = %id, active, "Filter session created");

        Ok(respond(id, &session))
    }

    pub async fn get_session(state: &AppState, id: Uuid) -> Result<FilterSession, AppError> {
        let session = state
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(anyhow!("Filter session not found")))?;
        session.touch();
        Ok(session)
    }

    pub async fn get_view(state: &AppState, id: Uuid) -> Result<FilterSessionResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        Ok(respond(id, &session))
    }

    #[instrument(skip(state))]
    pub async fn update_filters(
        state: &AppState,
        id: Uuid,
        update: FilterUpdate,
    ) -> Result<FilterSessionResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        let filters = session.store.update_filters(update)?;
        settle(state, &session.store).await;

        debug!(session.id = %id, ?filters, "Filters updated");
        Ok(respond(id, &session))
    }

    #[instrument(skip(state))]
    pub async fn reset_filters(state: &AppState, id: Uuid) -> Result<FilterSessionResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        session.store.reset_filters();
        Ok(respond(id, &session))
    }

    #[instrument(skip(state))]
    pub async fn reload(state: &AppState, id: Uuid) -> Result<FilterSessionResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        session.store.reload().await;
        settle(state, &session.store).await;
        Ok(respond(id, &session))
    }

    pub async fn list_departments(
        state: &AppState,
        id: Uuid,
        search_override: Option<String>,
    ) -> Result<DepartmentListResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        let snapshot = session.store.snapshot();
        let search_term = search_override.unwrap_or_else(|| snapshot.filters.search_term.clone());

        let items: Vec<_> = search(snapshot.filtered_departments(), &search_term)
            .into_iter()
            .cloned()
            .collect();

        Ok(DepartmentListResponse {
            source: snapshot.sources.departments,
            search_term,
            total: items.len(),
            items,
        })
    }

    pub async fn list_programs(
        state: &AppState,
        id: Uuid,
        search_override: Option<String>,
    ) -> Result<ProgramListResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        let snapshot = session.store.snapshot();
        let search_term = search_override.unwrap_or_else(|| snapshot.filters.search_term.clone());

        let items: Vec<_> = search(snapshot.filtered_programs(), &search_term)
            .into_iter()
            .cloned()
            .collect();

        Ok(ProgramListResponse {
            source: snapshot.sources.programs,
            search_term,
            total: items.len(),
            items,
        })
    }

    #[instrument(skip(state, dto), fields(records = dto.records.len()))]
    pub async fn filter_records(
        state: &AppState,
        id: Uuid,
        dto: FilterRecordsDto,
    ) -> Result<FilterRecordsResponse, AppError> {
        let session = Self::get_session(state, id).await?;
        let snapshot = session.store.snapshot();

        let records: Vec<_> = filter_records(&dto.records, &snapshot.filters, &snapshot.options)
            .into_iter()
            .cloned()
            .collect();

        Ok(FilterRecordsResponse {
            total: dto.records.len(),
            matched: records.len(),
            records,
        })
    }

    #[instrument(skip(state))]
    pub async fn delete_session(state: &AppState, id: Uuid) -> Result<(), AppError> {
        let active = {
            let mut sessions = state.sessions.write().await;
            sessions
                .remove(&id)
                .ok_or_else(|| AppError::not_found(anyhow!("Filter session not found")))?;
            sessions.len()
        };

        registrar_observability::track_filter_session_closed();
        registrar_observability::set_active_filter_sessions(active);
        info!(session.id = %id, active, "Filter session closed");
        Ok(())
    }
}

fn respond(id: Uuid, session: &FilterSession) -> FilterSessionResponse {
    FilterSessionResponse {
        id,
        created_at: session.created_at,
        view: session.store.view(),
    }
}

/// Waits for scoped loads triggered by the last update.
///
/// Each load is bounded by the fetch timeout, so the wait is too. Past that
/// the current view is returned with `pendingLoads` still set.
async fn settle<P: OptionProvider>(state: &AppState, store: &FilterStore<P>) {
    let limit = settle_limit(state.catalog_config.fetch_timeout);
    let mut rx = store.subscribe();
    let waited = tokio::time::timeout(limit, rx.wait_for(|snapshot| snapshot.pending_loads == 0)).await;
    if waited.is_err() {
        warn!(
            limit_ms = limit.as_millis() as u64,
            pending = store.snapshot().pending_loads,
            "Scoped loads did not settle in time"
        );
    }
}

fn settle_limit(fetch_timeout: Duration) -> Duration {
    fetch_timeout + Duration::from_secs(1)
}

fn load_mode_label(load_mode: LoadMode) -> &'static str {
    match load_mode {
        LoadMode::Eager => "eager",
        LoadMode::Lazy => "lazy",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_config::{CatalogConfig, CorsConfig};
    use registrar_filters::{FetchPolicy, OptionSource, ProviderError, StaticOptionProvider};
    use registrar_models::{Department, DepartmentId, Program, School, SchoolId, Selection};

    /// Serves schools but never answers a scoped department request.
    struct StalledProvider(StaticOptionProvider);

    impl OptionProvider for StalledProvider {
        async fn schools(&self) -> Result<Vec<School>, ProviderError> {
            self.0.schools().await
        }

        async fn departments(
            &self,
            school: Option<&SchoolId>,
        ) -> Result<Vec<Department>, ProviderError> {
            if school.is_some() {
                std::future::pending::<()>().await;
            }
            self.0.departments(school).await
        }

        async fn programs(
            &self,
            department: Option<&DepartmentId>,
        ) -> Result<Vec<Program>, ProviderError> {
            self.0.programs(department).await
        }
    }

    fn state(fetch_timeout: Duration) -> AppState {
        let config = CatalogConfig {
            fetch_timeout,
            ..CatalogConfig::default()
        };
        let provider = OptionSource::Static(StaticOptionProvider::builtin());
        AppState::new(provider, config, CorsConfig::default(), None)
    }

    #[test]
    fn test_settle_limit_exceeds_fetch_timeout() {
        assert_eq!(
            settle_limit(Duration::from_millis(500)),
            Duration::from_millis(1500)
        );
    }

    #[tokio::test]
    async fn test_settle_gives_up_when_a_load_never_finishes() {
        let state = state(Duration::from_millis(200));
        // The store's own fetch bound is far past the settle limit.
        let store = FilterStore::new(
            Arc::new(StalledProvider(StaticOptionProvider::builtin())),
            StoreConfig {
                load_mode: LoadMode::Lazy,
                policy: FetchPolicy {
                    timeout: Duration::from_secs(3600),
                    allow_mock_fallback: false,
                },
            },
            &FilterUpdate::default(),
        );
        store.load_options().await;

        let school = store.options().schools[0].id.clone();
        store
            .update_filters(FilterUpdate::default().school(Selection::One(school)))
            .unwrap();

        let started = tokio::time::Instant::now();
        settle(&state, &store).await;
        assert!(started.elapsed() >= settle_limit(Duration::from_millis(200)));
        assert_eq!(store.snapshot().pending_loads, 1);
    }
}
