mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    create_session, ids, send, setup_test_app, setup_test_state, setup_unreachable_app,
};
use registrar::registrar_config::SessionConfig;
use registrar::router::init_router;
use serde_json::json;

#[tokio::test]
async fn test_create_session_loads_every_pool() {
    let app = setup_test_app();

    let (status, body) = send(&app, "POST", "/api/filter-sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    assert!(body["id"].is_string());
    assert_eq!(body["loadMode"], "eager");
    assert_eq!(body["isLoading"], false);
    assert!(body["error"].is_null());
    assert_eq!(
        body["filters"],
        json!({ "school": "all", "department": "all", "program": "all", "searchTerm": "" })
    );
    assert_eq!(body["schools"].as_array().unwrap().len(), 4);
    assert_eq!(body["departments"].as_array().unwrap().len(), 9);
    assert_eq!(body["programs"].as_array().unwrap().len(), 10);
    assert_eq!(body["sources"]["schools"], "live");
    assert!(body["currentSchool"].is_null());
}

#[tokio::test]
async fn test_create_session_with_initial_filters() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/filter-sessions",
        Some(json!({ "filters": { "school": "1", "searchTerm": "comp" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(body["filters"]["school"], "1");
    assert_eq!(body["filters"]["searchTerm"], "comp");
    assert_eq!(body["currentSchool"]["code"], "ENG");
    assert_eq!(ids(&body["departments"]), vec!["10", "11", "12"]);
}

#[tokio::test]
async fn test_create_session_rejects_inconsistent_initial_filters() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/filter-sessions",
        Some(json!({ "filters": { "school": "1", "department": "20" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("20"));
}

#[tokio::test]
async fn test_cascade_through_patches() {
    let app = setup_test_app();
    let id = create_session(&app, json!({})).await;
    let uri = format!("/api/filter-sessions/{id}/filters");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "school": "1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["departments"]), vec!["10", "11", "12"]);
    assert_eq!(ids(&body["programs"]), vec!["100", "101", "110", "120"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "department": "10" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["programs"]), vec!["100", "101"]);
    assert_eq!(body["currentDepartment"]["name"], "Computer Science");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "program": "101" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filters"]["program"], "101");

    // A new school clears the levels below it
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "school": "2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filters"]["department"], "all");
    assert_eq!(body["filters"]["program"], "all");
    assert!(body["currentProgram"].is_null());
    assert_eq!(ids(&body["departments"]), vec!["20", "21"]);
}

#[tokio::test]
async fn test_numeric_ids_are_accepted() {
    let app = setup_test_app();
    let id = create_session(&app, json!({})).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/filter-sessions/{id}/filters"),
        Some(json!({ "school": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filters"]["school"], "3");
}

#[tokio::test]
async fn test_inconsistent_patch_keeps_state() {
    let app = setup_test_app();
    let id = create_session(&app, json!({ "filters": { "school": "1" } })).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/filter-sessions/{id}/filters"),
        Some(json!({ "department": "20" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, "GET", &format!("/api/filter-sessions/{id}"), None).await;
    assert_eq!(body["filters"]["school"], "1");
    assert_eq!(body["filters"]["department"], "all");
}

#[tokio::test]
async fn test_invalid_patch_bodies() {
    let app = setup_test_app();
    let id = create_session(&app, json!({})).await;
    let uri = format!("/api/filter-sessions/{id}/filters");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "school": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "searchTerm": "x".repeat(201) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let app = setup_test_app();
    let id = create_session(
        &app,
        json!({ "filters": { "school": "1", "department": "10", "searchTerm": "bach" } }),
    )
    .await;
    let uri = format!("/api/filter-sessions/{id}/reset");

    let (status, first) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first["filters"],
        json!({ "school": "all", "department": "all", "program": "all", "searchTerm": "" })
    );

    let (status, second) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["filters"], second["filters"]);
    assert_eq!(first["departments"], second["departments"]);
}

#[tokio::test]
async fn test_listings_apply_search_term() {
    let app = setup_test_app();
    let id = create_session(&app, json!({ "filters": { "school": "1", "searchTerm": "comp" } })).await;

    let (status, body) = send(&app, "GET", &format!("/api/filter-sessions/{id}/departments"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["searchTerm"], "comp");
    assert_eq!(body["source"], "live");
    assert_eq!(body["total"], 1);
    assert_eq!(ids(&body["items"]), vec!["10"]);

    let (status, body) = send(&app, "GET", &format!("/api/filter-sessions/{id}/programs"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["items"]), vec!["100", "101"]);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/filter-sessions/{id}/programs?search=civil"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["searchTerm"], "civil");
    assert_eq!(ids(&body["items"]), vec!["120"]);
}

#[tokio::test]
async fn test_filter_records_by_search_term() {
    let app = setup_test_app();
    let id = create_session(&app, json!({ "filters": { "searchTerm": "comp" } })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/filter-sessions/{id}/records"),
        Some(json!({
            "records": [
                { "id": 1, "name": "Ada Compton", "email": "ada@uni.edu" },
                { "id": 2, "name": "Grace Hopper", "email": "grace@computing.edu" },
                { "id": "COMP-3", "name": "Alan Turing" },
                { "id": 4, "name": "Edsger Dijkstra", "email": "ed@uni.edu" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["matched"], 3);
    assert_eq!(ids(&body["records"]), vec!["1", "2", "COMP-3"]);
}

#[tokio::test]
async fn test_filter_records_by_hierarchy() {
    let app = setup_test_app();
    let id = create_session(&app, json!({ "filters": { "school": "1" } })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/filter-sessions/{id}/records"),
        Some(json!({
            "records": [
                { "id": "s1", "name": "In CS", "departmentId": "10" },
                { "id": "s2", "name": "In Accounting", "departmentId": "20" },
                { "id": "s3", "name": "In BCE", "programId": 120 },
                { "id": "s4", "name": "Unplaced" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["records"]), vec!["s1", "s3"]);
}

#[tokio::test]
async fn test_lazy_session_loads_scoped_pools() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/filter-sessions",
        Some(json!({ "loadMode": "lazy" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["loadMode"], "lazy");
    assert!(body["departments"].as_array().unwrap().is_empty());
    assert_eq!(body["sources"]["departments"], "notLoaded");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/filter-sessions/{id}/filters"),
        Some(json!({ "school": "4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pendingLoads"], 0);
    assert_eq!(ids(&body["departments"]), vec!["40", "41"]);
    assert_eq!(body["sources"]["departments"], "live");
}

#[tokio::test]
async fn test_unreachable_backend_serves_tagged_fallback() {
    let app = setup_unreachable_app();

    let (status, body) = send(&app, "POST", "/api/filter-sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isLoading"], false);
    assert!(body["error"].as_str().unwrap().contains("schools"));
    assert_eq!(body["sources"]["schools"], "fallback");
    assert_eq!(body["schools"].as_array().unwrap().len(), 4);

    let id = body["id"].as_str().unwrap().to_string();
    let (status, body) = send(&app, "POST", &format!("/api/filter-sessions/{id}/reload"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = setup_test_app();
    let id = create_session(&app, json!({})).await;
    let uri = format!("/api/filter-sessions/{id}");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Filter session not found");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = setup_test_app();
    let uri = "/api/filter-sessions/00000000-0000-0000-0000-000000000000/filters";

    let (status, body) = send(&app, "PATCH", uri, Some(json!({ "school": "1" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let app = setup_test_app();
    create_session(&app, json!({})).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["activeSessions"], 1);
    assert_eq!(body["optionSource"], "static catalogue");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = setup_test_app();
    let (status, _) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let state = setup_test_state(SessionConfig {
        idle_ttl: Duration::from_millis(50),
        ..SessionConfig::default()
    });
    let app = init_router(state.clone());

    let id = create_session(&app, json!({})).await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(state.evict_idle_sessions().await, 1);
    let (status, _) = send(&app, "GET", &format!("/api/filter-sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_active_sessions_survive_sweep() {
    let state = setup_test_state(SessionConfig::default());
    let app = init_router(state.clone());

    let id = create_session(&app, json!({})).await;
    assert_eq!(state.evict_idle_sessions().await, 0);

    let (status, _) = send(&app, "GET", &format!("/api/filter-sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_cap_evicts_least_recently_used() {
    let state = setup_test_state(SessionConfig {
        max_sessions: 2,
        ..SessionConfig::default()
    });
    let app = init_router(state.clone());

    let first = create_session(&app, json!({})).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = create_session(&app, json!({})).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Touching the first makes the second the least recently used.
    let (status, _) = send(&app, "GET", &format!("/api/filter-sessions/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let third = create_session(&app, json!({})).await;
    assert_eq!(state.sessions.read().await.len(), 2);

    let (status, _) = send(&app, "GET", &format!("/api/filter-sessions/{second}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for id in [first, third] {
        let (status, _) = send(&app, "GET", &format!("/api/filter-sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
