//! HTTP handlers for the service catalog and promo codes

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::TenantContext;
use crate::services::catalog::{
    CatalogService, CreatePromoCodeInput, CreateServiceInput, LaundryService, PromoCode,
};
use crate::AppState;

/// Create a catalog service
pub async fn create_service(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateServiceInput>,
) -> AppResult<Json<LaundryService>> {
    let service = CatalogService::new(state.db);
    let created = service.create_service(ctx.tenant_id, input).await?;
    Ok(Json(created))
}

/// List active catalog services
pub async fn list_services(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<LaundryService>>> {
    let service = CatalogService::new(state.db);
    let services = service.list_services(ctx.tenant_id).await?;
    Ok(Json(services))
}

/// Create a promo code
pub async fn create_promo_code(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreatePromoCodeInput>,
) -> AppResult<Json<PromoCode>> {
    let service = CatalogService::new(state.db);
    let promo = service.create_promo_code(ctx.tenant_id, input).await?;
    Ok(Json(promo))
}

/// List promo codes
pub async fn list_promo_codes(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<PromoCode>>> {
    let service = CatalogService::new(state.db);
    let codes = service.list_promo_codes(ctx.tenant_id).await?;
    Ok(Json(codes))
}

#[derive(Debug, Deserialize)]
pub struct ValidatePromoQuery {
    pub code: String,
}

/// Check a promo code at the counter before it goes on an order
pub async fn validate_promo(
    State(state): State<AppState>,
    ctx: TenantContext,
    Query(query): Query<ValidatePromoQuery>,
) -> AppResult<Json<PromoCode>> {
    let service = CatalogService::new(state.db);
    let promo = service
        .find_active_promo(ctx.tenant_id, &query.code)
        .await?
        .ok_or_else(|| AppError::NotFound("Promo code".to_string()))?;
    Ok(Json(promo))
}
