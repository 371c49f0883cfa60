//! Option providers.
//!
//! A provider answers three questions: which schools exist, which departments
//! exist (optionally within one school), and which programs exist (optionally
//! within one department). Results keep the source's order.

mod fixed;
mod http;

use std::future::Future;

use registrar_config::{CatalogConfig, OptionSourceKind};
use registrar_models::{Department, DepartmentId, Program, School, SchoolId};

use crate::error::ProviderError;

pub use fixed::StaticOptionProvider;
pub use http::HttpOptionProvider;

pub trait OptionProvider: Send + Sync + 'static {
    fn schools(&self) -> impl Future<Output = Result<Vec<School>, ProviderError>> + Send;

    /// Departments of `school`, or every department when `None`.
    fn departments(
        &self,
        school: Option<&SchoolId>,
    ) -> impl Future<Output = Result<Vec<Department>, ProviderError>> + Send;

    /// Programs of `department`, or every program when `None`.
    fn programs(
        &self,
        department: Option<&DepartmentId>,
    ) -> impl Future<Output = Result<Vec<Program>, ProviderError>> + Send;
}

/// The provider selected by configuration.
#[derive(Debug, Clone)]
pub enum OptionSource {
    Http(HttpOptionProvider),
    Static(StaticOptionProvider),
}

impl OptionSource {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ProviderError> {
        match config.source {
            OptionSourceKind::Http => Ok(OptionSource::Http(HttpOptionProvider::new(
                &config.base_url,
                config.page_size,
                config.fetch_timeout,
            )?)),
            OptionSourceKind::Static => Ok(OptionSource::Static(StaticOptionProvider::builtin())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            OptionSource::Http(provider) => format!("http ({})", provider.base_url()),
            OptionSource::Static(_) => "static catalogue".to_string(),
        }
    }
}

impl OptionProvider for OptionSource {
    async fn schools(&self) -> Result<Vec<School>, ProviderError> {
        match self {
            OptionSource::Http(provider) => provider.schools().await,
            OptionSource::Static(provider) => provider.schools().await,
        }
    }

    async fn departments(&self, school: Option<&SchoolId>) -> Result<Vec<Department>, ProviderError> {
        match self {
            OptionSource::Http(provider) => provider.departments(school).await,
            OptionSource::Static(provider) => provider.departments(school).await,
        }
    }

    async fn programs(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<Vec<Program>, ProviderError> {
        match self {
            OptionSource::Http(provider) => provider.programs(department).await,
            OptionSource::Static(provider) => provider.programs(department).await,
        }
    }
}
