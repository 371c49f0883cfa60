use std::time::Duration;

use registrar_core::{AppError, EnvelopeError};
use registrar_models::{DepartmentId, ProgramId, SchoolId};

/// Failure of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request to registrar backend failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Registrar backend responded with status {status} for {url}")]
    Status { status: u16, url: String },

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Fetching {entity} timed out after {timeout:?}")]
    Timeout {
        entity: &'static str,
        timeout: Duration,
    },

    #[error("Option source unavailable: {0}")]
    Unavailable(String),
}

/// A filter update the store refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error(
        "Department {department} belongs to school {actual}, not the selected school {selected}"
    )]
    DepartmentOutsideSchool {
        department: DepartmentId,
        selected: SchoolId,
        actual: SchoolId,
    },

    #[error(
        "Program {program} belongs to department {actual}, not the selected department {selected}"
    )]
    ProgramOutsideDepartment {
        program: ProgramId,
        selected: DepartmentId,
        actual: DepartmentId,
    },

    #[error("Program {program} belongs to school {actual}, not the selected school {selected}")]
    ProgramOutsideSchool {
        program: ProgramId,
        selected: SchoolId,
        actual: SchoolId,
    },

    #[error("Selecting {level} needs a scoped load, but no async runtime is running")]
    NoRuntime { level: &'static str },
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::NoRuntime { .. } => AppError::internal(err),
            _ => AppError::unprocessable(err),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::bad_gateway(err)
    }
}
