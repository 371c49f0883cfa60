//! In-memory option provider.

use std::sync::Arc;

use registrar_models::{Department, DepartmentId, FilterOptions, Program, School, SchoolId};

use super::OptionProvider;
use crate::error::ProviderError;
use crate::fallback;

/// Serves a fixed catalogue, scoping by parent id like the backend.
#[derive(Debug, Clone)]
pub struct StaticOptionProvider {
    catalog: Arc<FilterOptions>,
}

impl StaticOptionProvider {
    pub fn new(catalog: FilterOptions) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// The built-in fallback catalogue.
    pub fn builtin() -> Self {
        Self::new(fallback::catalog().clone())
    }

    pub fn catalog(&self) -> &FilterOptions {
        &self.catalog
    }
}

impl OptionProvider for StaticOptionProvider {
    async fn schools(&self) -> Result<Vec<School>, ProviderError> {
        Ok(self.catalog.schools.clone())
    }

    async fn departments(&self, school: Option<&SchoolId>) -> Result<Vec<Department>, ProviderError> {
        Ok(self
            .catalog
            .departments
            .iter()
            .filter(|d| school.is_none_or(|s| d.school_id == *s))
            .cloned()
            .collect())
    }

    async fn programs(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<Vec<Program>, ProviderError> {
        Ok(self
            .catalog
            .programs
            .iter()
            .filter(|p| department.is_none_or(|d| p.department_id == *d))
            .cloned()
            .collect())
    }
}
