use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_session, delete_session, filter_records, get_session, list_departments, list_programs,
    reload_options, reset_filters, update_filters,
};

pub fn init_filter_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(delete_session))
        .route("/{id}/filters", patch(update_filters))
        .route("/{id}/reset", post(reset_filters))
        .route("/{id}/reload", post(reload_options))
        .route("/{id}/departments", get(list_departments))
        .route("/{id}/programs", get(list_programs))
        .route("/{id}/records", post(filter_records))
}
