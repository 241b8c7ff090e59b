//! Dashboard API handlers
//!
//! Every handler runs one blocking scan to completion under
//! `spawn_blocking` and reports the elapsed wall time alongside the
//! result; there is no streaming or partial response.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::engine::{ScanError, VisitScanner};
use crate::models::{AggregationResult, QueryPredicate, ServiceSummary};

pub struct AppState {
    pub scanner: Arc<VisitScanner>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Answer to `/details` and `/all`: one merged aggregation result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    pub visits: AggregationResult,
    pub time_elapsed: u64,
}

/// Answer to the historical `/base` endpoints: per-service summaries.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCountsResponse {
    pub visits: BTreeMap<String, ServiceSummary>,
    pub time_elapsed: u64,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn health_check() -> &'static str {
    "OK"
}

/// Full pipeline with the operator's predicate set.
pub async fn post_details(
    State(state): State<Arc<AppState>>,
    Json(predicates): Json<Vec<QueryPredicate>>,
) -> Result<Json<DetailsResponse>, HandlerError> {
    run_details(state, predicates).await
}

/// Full pipeline, no predicates.
pub async fn get_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DetailsResponse>, HandlerError> {
    run_details(state, Vec::new()).await
}

/// Raw per-service visit counts.
pub async fn get_base(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServiceCountsResponse>, HandlerError> {
    run_counts(state, false).await
}

/// Raw per-service visit counts with message frequencies.
pub async fn post_base(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServiceCountsResponse>, HandlerError> {
    run_counts(state, true).await
}

async fn run_details(
    state: Arc<AppState>,
    predicates: Vec<QueryPredicate>,
) -> Result<Json<DetailsResponse>, HandlerError> {
    let scanner = Arc::clone(&state.scanner);
    let started = Instant::now();

    let visits = tokio::task::spawn_blocking(move || scanner.scan_all(&predicates, Utc::now()))
        .await
        .map_err(join_error_response)?
        .map_err(scan_error_response)?;

    Ok(Json(DetailsResponse {
        visits,
        time_elapsed: started.elapsed().as_millis() as u64,
    }))
}

async fn run_counts(
    state: Arc<AppState>,
    with_messages: bool,
) -> Result<Json<ServiceCountsResponse>, HandlerError> {
    let scanner = Arc::clone(&state.scanner);
    let started = Instant::now();

    let visits = tokio::task::spawn_blocking(move || {
        let now = Utc::now();
        let mut visits = BTreeMap::new();
        for service in scanner.services()? {
            let summary = scanner.count_service(&service, now, with_messages)?;
            visits.insert(service, summary);
        }
        Ok::<_, ScanError>(visits)
    })
    .await
    .map_err(join_error_response)?
    .map_err(scan_error_response)?;

    Ok(Json(ServiceCountsResponse {
        visits,
        time_elapsed: started.elapsed().as_millis() as u64,
    }))
}

fn scan_error_response(e: ScanError) -> HandlerError {
    error!("visit scan failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn join_error_response(e: tokio::task::JoinError) -> HandlerError {
    error!("scan task failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "scan task failed".to_string(),
        }),
    )
}
