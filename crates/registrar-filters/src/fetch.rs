//! Fetch policy around provider calls.
//!
//! Every pool load goes through [`FetchPolicy::run`], which bounds the call
//! with a timeout and decides what a failure turns into: the error itself, or
//! the fallback catalogue tagged as [`FetchOutcome::Fallback`] so callers can
//! always tell real data from stand-in data.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::error::ProviderError;

/// Which pool a fetch is for. Used in logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Schools,
    Departments,
    Programs,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Schools => "schools",
            OptionKind::Departments => "departments",
            OptionKind::Programs => "programs",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a loaded pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    #[default]
    NotLoaded,
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Live(Vec<T>),
    Fallback { data: Vec<T>, reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn source(&self) -> DataSource {
        match self {
            FetchOutcome::Live(_) => DataSource::Live,
            FetchOutcome::Fallback { .. } => DataSource::Fallback,
        }
    }

    pub fn data(&self) -> &[T] {
        match self {
            FetchOutcome::Live(data) | FetchOutcome::Fallback { data, .. } => data,
        }
    }

    /// Why fallback data was served, if it was.
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Live(_) => None,
            FetchOutcome::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn into_data(self) -> Vec<T> {
        match self {
            FetchOutcome::Live(data) | FetchOutcome::Fallback { data, .. } => data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub allow_mock_fallback: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            allow_mock_fallback: false,
        }
    }
}

impl FetchPolicy {
    /// Runs a provider call under this policy.
    ///
    /// `fallback` is only invoked when the call fails (or times out) and
    /// fallback is allowed.
    pub async fn run<T, F, B>(
        &self,
        kind: OptionKind,
        fetch: F,
        fallback: B,
    ) -> Result<FetchOutcome<T>, ProviderError>
    where
        F: Future<Output = Result<Vec<T>, ProviderError>>,
        B: FnOnce() -> Vec<T>,
    {
        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                entity: kind.as_str(),
                timeout: self.timeout,
            }),
        };

        match result {
            Ok(data) => {
                record_fetch(kind, "live");
                Ok(FetchOutcome::Live(data))
            }
            Err(e) if self.allow_mock_fallback => {
                warn!(entity = %kind, error = %e, "Fetch failed, serving fallback catalogue");
                record_fetch(kind, "fallback");
                Ok(FetchOutcome::Fallback {
                    data: fallback(),
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                error!(entity = %kind, error = %e, "Fetch failed");
                record_fetch(kind, "error");
                Err(e)
            }
        }
    }
}

fn record_fetch(kind: OptionKind, outcome: &'static str) {
    metrics::counter!(
        "registrar_option_fetch_total",
        "entity" => kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
