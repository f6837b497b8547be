//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::AppState;

/// Dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.dashboard(ctx.tenant_id).await?;
    Ok(Json(metrics))
}

/// Optional inclusive date range for the order export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Download the tenant's orders as CSV
pub async fn export_orders(
    State(state): State<AppState>,
    ctx: TenantContext,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let csv = service
        .export_orders_csv(ctx.tenant_id, query.start_date, query.end_date)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders.csv\"",
            ),
        ],
        csv,
    ))
}
