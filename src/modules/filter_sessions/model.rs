use chrono::{DateTime, Utc};
use registrar_filters::{DataSource, FilterView, ScopedRecord};
use registrar_models::{Department, FilterUpdate, LoadMode, Program};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFilterSessionDto {
    /// Overrides the configured load mode for this session.
    pub load_mode: Option<LoadMode>,
    /// Initial selection, applied after the options have loaded.
    #[serde(default)]
    #[validate(nested)]
    pub filters: FilterUpdate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterSessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub view: FilterView,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OptionSearchParams {
    /// Overrides the session's search term for this listing only.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentListResponse {
    pub source: DataSource,
    pub search_term: String,
    pub total: usize,
    pub items: Vec<Department>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramListResponse {
    pub source: DataSource,
    pub search_term: String,
    pub total: usize,
    pub items: Vec<Program>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecordsDto {
    #[validate(length(max = 10000, message = "At most 10000 records can be filtered at once"))]
    pub records: Vec<ScopedRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecordsResponse {
    pub total: usize,
    pub matched: usize,
    pub records: Vec<ScopedRecord>,
}
