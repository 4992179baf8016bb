// File: rds-ops/src/web/handlers.rs
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::scheduler::{ScheduleOutcome, ScheduleRequest};
use crate::services::SnapshotReportSummary;
use crate::web::{ApiKeyAuth, AppState, HolidayCalendar};

// Helper type for API responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub schedule_enabled: bool,
    pub snapshot_report_configured: bool,
}

/// Same contract as a trigger invocation: the action comes from the JSON
/// body or the `action` query parameter, and the outcome's `statusCode`
/// becomes the HTTP status.
pub async fn trigger_schedule(
    _auth: ApiKeyAuth,
    State(state): State<AppState>,
    Query(query): Query<ScheduleRequest>,
    body: Bytes,
) -> (StatusCode, Json<ScheduleOutcome>) {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        query
    } else {
        match serde_json::from_slice::<ScheduleRequest>(&body) {
            Ok(request) if request.action.is_some() => request,
            Ok(_) => query,
            Err(e) => {
                warn!("Ignoring malformed schedule request body: {}", e);
                query
            }
        }
    };

    let outcome = state.schedule_handler.handle(&request).await;
    let status =
        StatusCode::from_u16(outcome.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(outcome))
}

pub async fn trigger_snapshot_report(
    _auth: ApiKeyAuth,
    State(state): State<AppState>,
) -> ApiResult<SnapshotReportSummary> {
    let Some(job) = state.report_job.as_ref() else {
        let message = match state.config.snapshot_report.validate() {
            Err(e) => e.to_string(),
            Ok(_) => "Snapshot report is not configured".to_string(),
        };
        error!("Snapshot report requested but unavailable: {}", message);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(message)),
        ));
    };

    info!("Manual snapshot report requested");
    match job.run().await {
        Ok(summary) => Ok(Json(ApiResponse::success(summary))),
        Err(e) => {
            error!("Snapshot report failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("{:#}", e))),
            ))
        }
    }
}

pub async fn get_holiday_calendar(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<HolidayCalendar> {
    if !(1900..=2200).contains(&year) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Year {} is out of range", year))),
        ));
    }

    let holidays = state.resolver.resolve(year).await;
    let days = holidays.preview(year);
    let business_days = days.iter().filter(|d| d.kind.is_business_day()).count();

    Ok(Json(ApiResponse::success(HolidayCalendar {
        year,
        official: holidays.official,
        custom: holidays.custom,
        business_days,
        days,
    })))
}

pub async fn get_health(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    Ok(Json(ApiResponse::success(HealthStatus {
        status: "ok",
        schedule_enabled: state.config.schedule.enabled,
        snapshot_report_configured: state.report_job.is_some(),
    })))
}
