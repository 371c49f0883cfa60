use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use registrar_config::{CatalogConfig, CorsConfig, SessionConfig};
use registrar_filters::{FilterStore, OptionSource};
use registrar_observability::PrometheusHandle;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// One consumer view's filter store.
#[derive(Clone, Debug)]
pub struct FilterSession {
    pub store: Arc<FilterStore<OptionSource>>,
    pub created_at: DateTime<Utc>,
    /// Unix millis of the last request that touched this session.
    last_seen: Arc<AtomicI64>,
}

impl FilterSession {
    pub fn new(store: Arc<FilterStore<OptionSource>>) -> Self {
        let created_at = Utc::now();
        Self {
            store,
            created_at,
            last_seen: Arc::new(AtomicI64::new(created_at.timestamp_millis())),
        }
    }

    pub fn touch(&self) {
        self.last_seen
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_seen(&self) -> i64 {
        self.last_seen.load(Ordering::Relaxed)
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        let idle = now.timestamp_millis().saturating_sub(self.last_seen());
        Duration::from_millis(u64::try_from(idle).unwrap_or(0))
    }
}

pub type SessionRegistry = Arc<RwLock<HashMap<Uuid, FilterSession>>>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub provider: Arc<OptionSource>,
    pub catalog_config: CatalogConfig,
    pub cors_config: CorsConfig,
    pub session_config: SessionConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        provider: OptionSource,
        catalog_config: CatalogConfig,
        cors_config: CorsConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            sessions: SessionRegistry::default(),
            provider: Arc::new(provider),
            catalog_config,
            cors_config,
            session_config: SessionConfig::default(),
            metrics,
        }
    }

    #[must_use]
    pub fn with_session_config(mut self, session_config: SessionConfig) -> Self {
        self.session_config = session_config;
        self
    }

    /// Drops every session idle for at least the configured TTL.
    /// Returns how many were evicted.
    pub async fn evict_idle_sessions(&self) -> usize {
        let now = Utc::now();
        let ttl = self.session_config.idle_ttl;

        let (evicted, active) = {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, session| session.idle_for(now) < ttl);
            (before - sessions.len(), sessions.len())
        };

        if evicted > 0 {
            for _ in 0..evicted {
                registrar_observability::track_filter_session_closed();
            }
            registrar_observability::set_active_filter_sessions(active);
            info!(evicted, active, "Evicted idle filter sessions");
        }
        evicted
    }

    /// Runs [`evict_idle_sessions`](Self::evict_idle_sessions) on the
    /// configured interval for the life of the process.
    pub fn spawn_session_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        let period = state.session_config.sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let evicted = state.evict_idle_sessions().await;
                debug!(evicted, "Session sweep finished");
            }
        })
    }
}

/// Makes room for one more session by evicting least recently used ones.
/// Returns the evicted ids.
pub fn evict_over_capacity(sessions: &mut HashMap<Uuid, FilterSession>, max_sessions: usize) -> Vec<Uuid> {
    let mut evicted = Vec::new();
    while !sessions.is_empty() && sessions.len() >= max_sessions {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, session)| session.last_seen())
            .map(|(id, _)| *id);
        let Some(id) = oldest else { break };
        sessions.remove(&id);
        evicted.push(id);
    }
    evicted
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let catalog_config = CatalogConfig::from_env();
    let provider = OptionSource::from_config(&catalog_config)?;
    let session_config = SessionConfig::from_env();

    tracing::info!(
        source = %provider.describe(),
        load_mode = %catalog_config.load_mode,
        fallback = catalog_config.allow_mock_fallback,
        idle_ttl_secs = session_config.idle_ttl.as_secs(),
        max_sessions = session_config.max_sessions,
        "Option source configured"
    );

    Ok(AppState::new(
        provider,
        catalog_config,
        CorsConfig::from_env(),
        registrar_observability::init_metrics(),
    )
    .with_session_config(session_config))
}
