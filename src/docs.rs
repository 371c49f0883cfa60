use utoipa::OpenApi;

use crate::modules::filter_sessions::model::{
    CreateFilterSessionDto, DepartmentListResponse, FilterRecordsDto, FilterRecordsResponse,
    FilterSessionResponse, ProgramListResponse,
};
use crate::router::HealthResponse;
use registrar_core::ErrorResponse;
use registrar_filters::{DataSource, FilterView, PoolSources, ScopedRecord};
use registrar_models::{
    Department, FilterOptions, FilterState, FilterUpdate, LoadMode, Program, School,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::filter_sessions::controller::create_session,
        crate::modules::filter_sessions::controller::get_session,
        crate::modules::filter_sessions::controller::update_filters,
        crate::modules::filter_sessions::controller::reset_filters,
        crate::modules::filter_sessions::controller::reload_options,
        crate::modules::filter_sessions::controller::list_departments,
        crate::modules::filter_sessions::controller::list_programs,
        crate::modules::filter_sessions::controller::filter_records,
        crate::modules::filter_sessions::controller::delete_session,
    ),
    components(
        schemas(
            School,
            Department,
            Program,
            FilterState,
            FilterUpdate,
            FilterOptions,
            LoadMode,
            DataSource,
            PoolSources,
            FilterView,
            ScopedRecord,
            CreateFilterSessionDto,
            FilterSessionResponse,
            DepartmentListResponse,
            ProgramListResponse,
            FilterRecordsDto,
            FilterRecordsResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Filter Sessions", description = "Cascading school, department and program filters"),
        (name = "Health", description = "Service liveness")
    ),
    info(
        title = "Registrar Filter API",
        version = "0.1.0",
        description = "Cascading school → department → program filter state for the registrar portal.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
