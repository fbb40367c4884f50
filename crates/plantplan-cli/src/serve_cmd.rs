use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use plantplan_core::{PlanStore, PlanStoreError};
use plantplan_db::models::PlantPlanFields;

type SharedStore = Arc<dyn PlanStore>;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
    fields: Vec<&'static str>,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }
}

impl From<PlanStoreError> for AppError {
    fn from(err: PlanStoreError) -> Self {
        let message = err.to_string();
        match err {
            PlanStoreError::Validation { fields } => Self {
                status: StatusCode::BAD_REQUEST,
                message,
                fields,
            },
            PlanStoreError::NotFound { .. } => Self::not_found(message),
            PlanStoreError::Storage(source) => {
                tracing::error!(error = %format!("{source:#}"), "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal storage error")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = if self.fields.is_empty() {
            serde_json::json!({ "error": self.message })
        } else {
            serde_json::json!({ "error": self.message, "fields": self.fields })
        };
        (self.status, Json(body)).into_response()
    }
}

/// Path ids are opaque to clients; one that is not a UUID names no record.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::from(PlanStoreError::not_found(raw)))
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordQuery {
    #[serde(default)]
    keyword: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the HTTP adapter over `store`.
pub fn build_router(store: SharedStore) -> Router {
    Router::new()
        .route("/api/plans", get(list_plans).post(create_plan))
        .route("/api/plans/search", get(search_by_name))
        .route("/api/plans/count/all", get(count_all))
        .route("/api/plans/count/season/{season}", get(count_by_season))
        .route("/api/plans/season/{season}", get(find_by_season))
        .route("/api/plans/sunlight/{sunlight}", get(find_by_sunlight))
        .route("/api/plans/watering/search", get(search_by_watering))
        .route(
            "/api/plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .layer(CorsLayer::permissive())
        .with_state(store)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(store: SharedStore, bind: &str, port: u16) -> Result<()> {
    let app = build_router(store);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("plantplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("plantplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_plans(State(store): State<SharedStore>) -> Result<Response, AppError> {
    Ok(Json(store.get_all().await?).into_response())
}

async fn create_plan(
    State(store): State<SharedStore>,
    payload: Result<Json<PlantPlanFields>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(fields) = payload?;
    let plan = store.create(fields).await?;
    Ok((StatusCode::CREATED, Json(plan)).into_response())
}

async fn get_plan(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(store.get_by_id(id).await?).into_response())
}

async fn update_plan(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    payload: Result<Json<PlantPlanFields>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(fields) = payload?;
    // Blank fields are reported ahead of an unknown id.
    plantplan_core::validate_fields(&fields)?;
    let id = parse_id(&id)?;
    Ok(Json(store.update(id, fields).await?).into_response())
}

async fn delete_plan(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn find_by_season(
    State(store): State<SharedStore>,
    Path(season): Path<String>,
) -> Result<Response, AppError> {
    Ok(Json(store.find_by_planting_season(&season).await?).into_response())
}

async fn find_by_sunlight(
    State(store): State<SharedStore>,
    Path(sunlight): Path<String>,
) -> Result<Response, AppError> {
    Ok(Json(store.find_by_sunlight_needs(&sunlight).await?).into_response())
}

async fn search_by_watering(
    State(store): State<SharedStore>,
    Query(query): Query<KeywordQuery>,
) -> Result<Response, AppError> {
    Ok(Json(store.search_by_watering_freq(&query.keyword).await?).into_response())
}

async fn count_by_season(
    State(store): State<SharedStore>,
    Path(season): Path<String>,
) -> Result<Response, AppError> {
    Ok(Json(store.count_by_planting_season(&season).await?).into_response())
}

async fn search_by_name(
    State(store): State<SharedStore>,
    Query(query): Query<KeywordQuery>,
) -> Result<Response, AppError> {
    Ok(Json(store.search_by_name(&query.keyword).await?).into_response())
}

async fn count_all(State(store): State<SharedStore>) -> Result<Response, AppError> {
    Ok(Json(store.count_all().await?).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
