// HTTP request handlers
use crate::application::dashboard_controller::DashboardError;
use crate::domain::action::{Collection, WindowAction};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::state_stream::{ndjson_response, state_lines};
use crate::presentation::app_state::AppState;
use crate::presentation::page::DashboardPage;
use askama::Template;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Response, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard page: mounts the layout, loads on first visit and renders.
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, StatusCode> {
    if !state.controller.is_mounted() {
        state.controller.mount(state.layout.clone());
    }

    let view = state.controller.activate().await;

    DashboardPage::from_state(&view)
        .render()
        .map(Html)
        .map_err(|e| {
            tracing::error!("Template error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Current view state as JSON
pub async fn dashboard_state(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, StatusCode> {
    let snapshot = state.controller.snapshot();
    json_response(&snapshot, StatusCode::OK, accepts_brotli(&headers)).await
}

/// Fetch a fresh snapshot from the backend
pub async fn reload_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, StatusCode> {
    let status = match state.controller.load().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::BAD_GATEWAY,
    };

    let snapshot = state.controller.snapshot();
    json_response(&snapshot, status, accepts_brotli(&headers)).await
}

/// Stream view state changes as newline-delimited JSON
pub async fn stream_dashboard(State(state): State<Arc<AppState>>) -> Result<Response<Body>, StatusCode> {
    ndjson_response(state_lines(state.controller.subscribe()))
}

/// Open a record list in the host web client
pub async fn open_collection(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let Ok(collection) = slug.parse::<Collection>() else {
        return (StatusCode::NOT_FOUND, format!("unknown collection: {}", slug)).into_response();
    };

    let controller = &state.controller;
    let opened = match collection {
        Collection::Patients => controller.open_patients().await,
        Collection::Appointments => controller.open_appointments().await,
        Collection::Billings => controller.open_billings().await,
        Collection::LabTests => controller.open_lab_tests().await,
    };

    match opened {
        Ok(target) => Redirect::to(&target.url).into_response(),
        Err(DashboardError::Dispatch(e)) => {
            tracing::error!("Navigation failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("Navigation failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The window action a shortcut would dispatch
pub async fn describe_action(Path(slug): Path<String>) -> Result<Json<WindowAction>, StatusCode> {
    slug.parse::<Collection>()
        .map(|collection| Json(WindowAction::list_then_form(collection)))
        .map_err(|_| StatusCode::NOT_FOUND)
}
