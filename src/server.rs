use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::campaign::input::CampaignInput;
use crate::campaign::validate::{validate_input, ValidationError};
use crate::config::Config;
use crate::output::charts::{build_charts, ChartSet};
use crate::output::csv::results_to_csv;
use crate::roi::calculator::compute_report;
use crate::roi::RoiReport;

const EXPORT_FILENAME: &str = "kol_roi_results.csv";

#[derive(Clone)]
struct ApiState {
    config: Config,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    field: Option<String>,
}

impl ApiError {
    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
            field: None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            field: Some(error.field().to_string()),
            message: error.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        Self {
            status: StatusCode::BAD_REQUEST,
            field: rejected_field(&message),
            message,
        }
    }
}

/// Field path named by a body rejection, e.g. `influencers[0].cost` for a
/// row that is missing its cost.
fn rejected_field(message: &str) -> Option<String> {
    let (_, detail) = message.split_once("target type: ")?;
    let (path, reason) = match detail.split_once(": ") {
        Some((".", reason)) => (None, reason),
        Some((path, reason)) if !path.contains(' ') => (Some(path), reason),
        _ => (None, detail),
    };
    let missing = reason
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name);
    match (path, missing) {
        (Some(path), Some(name)) => Some(format!("{path}.{name}")),
        (Some(path), None) => Some(path.to_string()),
        (None, Some(name)) => Some(name.to_string()),
        (None, None) => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
            field: self.field,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ComputeResponse {
    computed_at: DateTime<Utc>,
    #[serde(flatten)]
    report: RoiReport,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/defaults", get(defaults))
        .route("/v1/compute", post(compute))
        .route("/v1/charts", post(charts))
        .route("/v1/export", post(export))
        .layer(cors)
        .with_state(ApiState { config });

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn defaults(State(state): State<ApiState>) -> Json<ApiResponse<CampaignInput>> {
    let mut sample = CampaignInput::sample();
    sample.campaign = Some(state.config.campaign.clone());
    ok(sample)
}

async fn compute(
    State(state): State<ApiState>,
    body: std::result::Result<Json<CampaignInput>, JsonRejection>,
) -> ApiResult<ComputeResponse> {
    let report = report_for(&state, body)?;
    Ok(ok(ComputeResponse {
        computed_at: Utc::now(),
        report,
    }))
}

async fn charts(
    State(state): State<ApiState>,
    body: std::result::Result<Json<CampaignInput>, JsonRejection>,
) -> ApiResult<ChartSet> {
    let report = report_for(&state, body)?;
    Ok(ok(build_charts(&report.results)))
}

async fn export(
    State(state): State<ApiState>,
    body: std::result::Result<Json<CampaignInput>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let report = report_for(&state, body)?;
    let body = results_to_csv(&report.results).map_err(ApiError::internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

// Each request validates and computes against its own copy of the input.
fn report_for(
    state: &ApiState,
    body: std::result::Result<Json<CampaignInput>, JsonRejection>,
) -> std::result::Result<RoiReport, ApiError> {
    let Json(input) = body.map_err(|rejection| {
        warn!("rejected request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;
    let (campaign, influencers) = input.resolve(&state.config.campaign);
    let (params, records) = validate_input(&campaign, &influencers).map_err(|err| {
        warn!("rejected campaign input: {err}");
        ApiError::from(err)
    })?;
    Ok(compute_report(&params, &records))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
