use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use registrar_core::{AppError, ErrorResponse};
use registrar_models::FilterUpdate;
use uuid::Uuid;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateFilterSessionDto, DepartmentListResponse, FilterRecordsDto, FilterRecordsResponse,
    FilterSessionResponse, OptionSearchParams, ProgramListResponse,
};
use super::service::FilterSessionService;

#[utoipa::path(
    post,
    path = "/api/filter-sessions",
    request_body = CreateFilterSessionDto,
    responses(
        (status = 201, description = "Session created and options loaded", body = FilterSessionResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 422, description = "Initial selection contradicts the loaded options", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateFilterSessionDto>,
) -> Result<(StatusCode, Json<FilterSessionResponse>), AppError> {
    let session = FilterSessionService::create_session(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/filter-sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Filter session ID")
    ),
    responses(
        (status = 200, description = "Current filter view", body = FilterSessionResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FilterSessionResponse>, AppError> {
    let session = FilterSessionService::get_view(&state, id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    patch,
    path = "/api/filter-sessions/{id}/filters",
    params(
        ("id" = Uuid, Path, description = "Filter session ID")
    ),
    request_body = FilterUpdate,
    responses(
        (status = 200, description = "Filters updated", body = FilterSessionResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse),
        (status = 422, description = "Selection contradicts the loaded options", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn update_filters(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<FilterUpdate>,
) -> Result<Json<FilterSessionResponse>, AppError> {
    let session = FilterSessionService::update_filters(&state, id, update).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/filter-sessions/{id}/reset",
    params(
        ("id" = Uuid, Path, description = "Filter session ID")
    ),
    responses(
        (status = 200, description = "Filters reset to \"all\"", body = FilterSessionResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn reset_filters(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FilterSessionResponse>, AppError> {
    let session = FilterSessionService::reset_filters(&state, id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/filter-sessions/{id}/reload",
    params(
        ("id" = Uuid, Path, description = "Filter session ID")
    ),
    responses(
        (status = 200, description = "Options reloaded", body = FilterSessionResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn reload_options(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FilterSessionResponse>, AppError> {
    let session = FilterSessionService::reload(&state, id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/filter-sessions/{id}/departments",
    params(
        ("id" = Uuid, Path, description = "Filter session ID"),
        OptionSearchParams
    ),
    responses(
        (status = 200, description = "Departments under the current selection", body = DepartmentListResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    params: Result<Query<OptionSearchParams>, QueryRejection>,
) -> Result<Json<DepartmentListResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let departments = FilterSessionService::list_departments(&state, id, params.search).await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/api/filter-sessions/{id}/programs",
    params(
        ("id" = Uuid, Path, description = "Filter session ID"),
        OptionSearchParams
    ),
    responses(
        (status = 200, description = "Programs under the current selection", body = ProgramListResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn list_programs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    params: Result<Query<OptionSearchParams>, QueryRejection>,
) -> Result<Json<ProgramListResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let programs = FilterSessionService::list_programs(&state, id, params.search).await?;
    Ok(Json(programs))
}

#[utoipa::path(
    post,
    path = "/api/filter-sessions/{id}/records",
    params(
        ("id" = Uuid, Path, description = "Filter session ID")
    ),
    request_body = FilterRecordsDto,
    responses(
        (status = 200, description = "Records passing the selection and search term", body = FilterRecordsResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn filter_records(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<FilterRecordsDto>,
) -> Result<Json<FilterRecordsResponse>, AppError> {
    let records = FilterSessionService::filter_records(&state, id, dto).await?;
    Ok(Json(records))
}

#[utoipa::path(
    delete,
    path = "/api/filter-sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Filter session ID")
    ),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Filter session not found", body = ErrorResponse)
    ),
    tag = "Filter Sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FilterSessionService::delete_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
