//! The cascading filter store.
//!
//! A [`FilterStore`] owns one view's filter state and option pools. The
//! snapshot lives in a `tokio::sync::watch` channel: every mutation is a
//! single `send_modify`, so subscribers only ever observe complete states,
//! and consumers re-render by awaiting [`watch::Receiver::changed`].
//!
//! # Load modes
//!
//! - **Eager**: schools are fetched, then departments and programs are fetched
//!   concurrently once the school fetch settles.
//! - **Lazy**: only schools are fetched up front. Selecting a school loads its
//!   departments; selecting a department loads its programs. Those scoped
//!   loads run as spawned tasks and commit only if no newer selection has
//!   superseded them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use registrar_config::CatalogConfig;
use registrar_models::{
    Department, DepartmentId, FilterOptions, FilterState, FilterUpdate, LoadMode, Program, School,
    SchoolId, Selection,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::{FilterError, ProviderError};
use crate::fallback;
use crate::fetch::{DataSource, FetchOutcome, FetchPolicy, OptionKind};
use crate::provider::OptionProvider;
use crate::selectors;
use crate::sequence::{RequestSequencer, RequestToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreConfig {
    pub load_mode: LoadMode,
    pub policy: FetchPolicy,
}

impl From<&CatalogConfig> for StoreConfig {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            load_mode: config.load_mode,
            policy: FetchPolicy {
                timeout: config.fetch_timeout,
                allow_mock_fallback: config.allow_mock_fallback,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolSources {
    pub schools: DataSource,
    pub departments: DataSource,
    pub programs: DataSource,
}

/// Everything a consumer renders from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterSnapshot {
    pub filters: FilterState,
    pub options: FilterOptions,
    pub is_loading: bool,
    pub error: Option<String>,
    pub sources: PoolSources,
    /// Scoped loads issued but not yet finished.
    pub pending_loads: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl FilterSnapshot {
    pub fn filtered_departments(&self) -> Vec<&Department> {
        selectors::filtered_departments(&self.filters, &self.options)
    }

    pub fn filtered_programs(&self) -> Vec<&Program> {
        selectors::filtered_programs(&self.filters, &self.options)
    }

    pub fn current_school(&self) -> Option<&School> {
        selectors::current_school(&self.filters, &self.options)
    }

    pub fn current_department(&self) -> Option<&Department> {
        selectors::current_department(&self.filters, &self.options)
    }

    pub fn current_program(&self) -> Option<&Program> {
        selectors::current_program(&self.filters, &self.options)
    }
}

/// A snapshot with every selector already applied.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterView {
    pub filters: FilterState,
    pub load_mode: LoadMode,
    pub current_school: Option<School>,
    pub current_department: Option<Department>,
    pub current_program: Option<Program>,
    pub schools: Vec<School>,
    pub departments: Vec<Department>,
    pub programs: Vec<Program>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub sources: PoolSources,
    pub pending_loads: usize,
}

impl FilterView {
    pub fn derive(snapshot: &FilterSnapshot, load_mode: LoadMode) -> Self {
        Self {
            filters: snapshot.filters.clone(),
            load_mode,
            current_school: snapshot.current_school().cloned(),
            current_department: snapshot.current_department().cloned(),
            current_program: snapshot.current_program().cloned(),
            schools: snapshot.options.schools.clone(),
            departments: snapshot.filtered_departments().into_iter().cloned().collect(),
            programs: snapshot.filtered_programs().into_iter().cloned().collect(),
            is_loading: snapshot.is_loading,
            error: snapshot.error.clone(),
            sources: snapshot.sources,
            pending_loads: snapshot.pending_loads,
        }
    }
}

#[derive(Default)]
struct ScopedLoads {
    departments: Option<(SchoolId, RequestToken)>,
    programs: Option<(DepartmentId, RequestToken)>,
}

pub struct FilterStore<P> {
    provider: Arc<P>,
    config: StoreConfig,
    state: watch::Sender<FilterSnapshot>,
    departments_seq: RequestSequencer,
    programs_seq: RequestSequencer,
}

impl<P> fmt::Debug for FilterStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("config", &self.config)
            .field("filters", &self.state.borrow().filters)
            .finish_non_exhaustive()
    }
}

impl<P: OptionProvider> FilterStore<P> {
    /// Creates a store whose state starts from the defaults plus `initial`.
    ///
    /// Pools are empty until [`load_options`](Self::load_options) runs.
    pub fn new(provider: Arc<P>, config: StoreConfig, initial: &FilterUpdate) -> Arc<Self> {
        let snapshot = FilterSnapshot {
            filters: FilterState::with_overrides(initial),
            ..FilterSnapshot::default()
        };
        let (state, _) = watch::channel(snapshot);

        Arc::new(Self {
            provider,
            config,
            state,
            departments_seq: RequestSequencer::new(),
            programs_seq: RequestSequencer::new(),
        })
    }

    pub fn load_mode(&self) -> LoadMode {
        self.config.load_mode
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> FilterView {
        FilterView::derive(&self.state.borrow(), self.config.load_mode)
    }

    pub fn filters(&self) -> FilterState {
        self.state.borrow().filters.clone()
    }

    pub fn options(&self) -> FilterOptions {
        self.state.borrow().options.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn filtered_departments(&self) -> Vec<Department> {
        self.state
            .borrow()
            .filtered_departments()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn filtered_programs(&self) -> Vec<Program> {
        self.state
            .borrow()
            .filtered_programs()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn current_school(&self) -> Option<School> {
        self.state.borrow().current_school().cloned()
    }

    pub fn current_department(&self) -> Option<Department> {
        self.state.borrow().current_department().cloned()
    }

    pub fn current_program(&self) -> Option<Program> {
        self.state.borrow().current_program().cloned()
    }

    /// Populates the option pools.
    ///
    /// Failures never abort the load: they are collected into the shared
    /// `error` and the failing pool is left empty, or filled with tagged
    /// fallback data when the policy allows it. A selection the new pools
    /// contradict loses its offending levels.
    #[instrument(skip(self), fields(load_mode = %self.config.load_mode))]
    pub async fn load_options(&self) {
        self.state.send_modify(|snap| {
            snap.is_loading = true;
            snap.error = None;
        });
        // Scoped loads issued before this point would land on top of the
        // fresh pools.
        self.departments_seq.invalidate();
        self.programs_seq.invalidate();

        let policy = self.config.policy;
        let mut failures = Vec::new();

        let schools = policy
            .run(OptionKind::Schools, self.provider.schools(), fallback::schools)
            .await;
        let (schools, schools_source) = settle(OptionKind::Schools, schools, &mut failures);

        let (departments, programs) = match self.config.load_mode {
            LoadMode::Eager => {
                let (departments, programs) = tokio::join!(
                    policy.run(
                        OptionKind::Departments,
                        self.provider.departments(None),
                        || fallback::departments_of(None),
                    ),
                    policy.run(
                        OptionKind::Programs,
                        self.provider.programs(None),
                        || fallback::programs_of(None),
                    ),
                );
                (
                    settle(OptionKind::Departments, departments, &mut failures),
                    settle(OptionKind::Programs, programs, &mut failures),
                )
            }
            LoadMode::Lazy => (
                (Vec::new(), DataSource::NotLoaded),
                (Vec::new(), DataSource::NotLoaded),
            ),
        };

        let error = (!failures.is_empty()).then(|| failures.join("; "));
        let school_count = schools.len();
        let department_count = departments.0.len();
        let program_count = programs.0.len();

        self.state.send_modify(|snap| {
            snap.options = FilterOptions {
                schools,
                departments: departments.0,
                programs: programs.0,
            };
            snap.sources = PoolSources {
                schools: schools_source,
                departments: departments.1,
                programs: programs.1,
            };
            snap.is_loading = false;
            snap.error = error;
            snap.loaded_at = Some(Utc::now());
            self.repair_selection(snap);
        });

        info!(
            schools = school_count,
            departments = department_count,
            programs = program_count,
            failed = !failures.is_empty(),
            "Filter options loaded"
        );

        if self.config.load_mode == LoadMode::Lazy {
            self.load_selected_scopes().await;
        }
    }

    /// Re-runs the initial load. This is the consumer's retry action.
    pub async fn reload(&self) {
        info!("Reloading filter options");
        self.load_options().await;
    }

    /// Applies a partial update as one atomic state transition.
    ///
    /// A new school resets department and program; a new department resets
    /// program. A merged state that contradicts the loaded pools is rejected
    /// and the current state is kept. In lazy mode, a selection that needs a
    /// scoped load is refused with [`FilterError::NoRuntime`] when called
    /// outside a tokio runtime.
    #[instrument(skip(self))]
    pub fn update_filters(self: &Arc<Self>, update: FilterUpdate) -> Result<FilterState, FilterError> {
        let lazy = self.config.load_mode == LoadMode::Lazy;
        let runtime = if lazy {
            tokio::runtime::Handle::try_current().ok()
        } else {
            None
        };

        let mut outcome = Ok(FilterState::default());
        let mut scoped = ScopedLoads::default();

        self.state.send_if_modified(|snap| {
            let next = snap.filters.merged(&update);
            if let Err(e) = selectors::validate_selection(&next, &snap.options) {
                outcome = Err(e);
                return false;
            }
            if next == snap.filters {
                outcome = Ok(next);
                return false;
            }

            if lazy {
                let school_changed = next.school != snap.filters.school;
                let department_changed = next.department != snap.filters.department;

                // Committing without a runtime would leave the scoped pool
                // unloaded for this selection until the next reload.
                if runtime.is_none() {
                    let level = if school_changed && next.school.as_one().is_some() {
                        Some("a school")
                    } else if (school_changed || department_changed)
                        && next.department.as_one().is_some()
                    {
                        Some("a department")
                    } else {
                        None
                    };
                    if let Some(level) = level {
                        outcome = Err(FilterError::NoRuntime { level });
                        return false;
                    }
                }

                if school_changed {
                    match (&next.school, &runtime) {
                        (Selection::One(school), Some(_)) => {
                            scoped.departments =
                                Some((school.clone(), self.departments_seq.issue()));
                            snap.pending_loads += 1;
                        }
                        _ => self.departments_seq.invalidate(),
                    }
                }
                if school_changed || department_changed {
                    match (&next.department, &runtime) {
                        (Selection::One(department), Some(_)) => {
                            scoped.programs =
                                Some((department.clone(), self.programs_seq.issue()));
                            snap.pending_loads += 1;
                        }
                        _ => self.programs_seq.invalidate(),
                    }
                }
            }

            snap.filters = next.clone();
            outcome = Ok(next);
            true
        });

        let state = outcome?;
        metrics::counter!("registrar_filter_updates_total").increment(1);

        if let Some(runtime) = runtime {
            if let Some((school, token)) = scoped.departments {
                let store = Arc::clone(self);
                runtime.spawn(async move { store.load_departments(school, token).await });
            }
            if let Some((department, token)) = scoped.programs {
                let store = Arc::clone(self);
                runtime.spawn(async move { store.load_programs(department, token).await });
            }
        }

        Ok(state)
    }

    /// Clears every level and the search term. Idempotent.
    pub fn reset_filters(&self) -> FilterState {
        self.state.send_if_modified(|snap| {
            self.departments_seq.invalidate();
            self.programs_seq.invalidate();

            let reset = FilterState::default();
            if snap.filters == reset {
                return false;
            }
            snap.filters = reset;
            true
        });
        FilterState::default()
    }

    /// Resets the levels of `snap.filters` that the pools show to be
    /// inconsistent, keeping the parents. Runs inside a state commit.
    fn repair_selection(&self, snap: &mut FilterSnapshot) {
        while let Err(e) = selectors::validate_selection(&snap.filters, &snap.options) {
            warn!(error = %e, "Dropping selection contradicted by loaded options");
            match e {
                FilterError::DepartmentOutsideSchool { .. } => {
                    snap.filters.department = Selection::All;
                    snap.filters.program = Selection::All;
                    self.programs_seq.invalidate();
                }
                FilterError::ProgramOutsideDepartment { .. }
                | FilterError::ProgramOutsideSchool { .. } => {
                    snap.filters.program = Selection::All;
                }
                FilterError::NoRuntime { .. } => break,
            }
        }
    }

    /// Loads the scoped pools for whatever is selected right now.
    async fn load_selected_scopes(&self) {
        let filters = self.filters();

        if let Selection::One(school) = filters.school {
            let token = self.begin_scoped_load(&self.departments_seq);
            self.load_departments(school, token).await;
        }
        if let Selection::One(department) = filters.department {
            let token = self.begin_scoped_load(&self.programs_seq);
            self.load_programs(department, token).await;
        }
    }

    fn begin_scoped_load(&self, sequencer: &RequestSequencer) -> RequestToken {
        let token = sequencer.issue();
        self.state.send_modify(|snap| snap.pending_loads += 1);
        token
    }

    #[instrument(skip(self, token))]
    async fn load_departments(&self, school: SchoolId, token: RequestToken) {
        let result = self
            .config
            .policy
            .run(
                OptionKind::Departments,
                self.provider.departments(Some(&school)),
                || fallback::departments_of(Some(&school)),
            )
            .await;

        self.state.send_modify(|snap| {
            snap.pending_loads = snap.pending_loads.saturating_sub(1);
            if !self.departments_seq.is_current(token) {
                debug!(school = %school, "Discarding superseded department load");
                return;
            }
            match result {
                Ok(outcome) => {
                    snap.sources.departments = outcome.source();
                    snap.options.departments = outcome.into_data();
                    self.repair_selection(snap);
                }
                Err(e) => {
                    warn!(school = %school, error = %e, "Scoped department load failed, keeping previous pool");
                }
            }
        });
    }

    #[instrument(skip(self, token))]
    async fn load_programs(&self, department: DepartmentId, token: RequestToken) {
        let result = self
            .config
            .policy
            .run(
                OptionKind::Programs,
                self.provider.programs(Some(&department)),
                || fallback::programs_of(Some(&department)),
            )
            .await;

        self.state.send_modify(|snap| {
            snap.pending_loads = snap.pending_loads.saturating_sub(1);
            if !self.programs_seq.is_current(token) {
                debug!(department = %department, "Discarding superseded program load");
                return;
            }
            match result {
                Ok(outcome) => {
                    snap.sources.programs = outcome.source();
                    snap.options.programs = outcome.into_data();
                    self.repair_selection(snap);
                }
                Err(e) => {
                    warn!(department = %department, error = %e, "Scoped program load failed, keeping previous pool");
                }
            }
        });
    }
}

/// Turns a fetch result into pool contents, recording what went wrong.
fn settle<T>(
    kind: OptionKind,
    result: Result<FetchOutcome<T>, ProviderError>,
    failures: &mut Vec<String>,
) -> (Vec<T>, DataSource) {
    match result {
        Ok(outcome) => {
            if let Some(reason) = outcome.fallback_reason() {
                failures.push(format!(
                    "Failed to load {kind}: {reason} (showing fallback data)"
                ));
            }
            let source = outcome.source();
            (outcome.into_data(), source)
        }
        Err(e) => {
            failures.push(format!("Failed to load {kind}: {e}"));
            (Vec::new(), DataSource::NotLoaded)
        }
    }
}
