//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::supplier::{
    CreateSupplierInput, Supplier, SupplierService, UpdateSupplierInput,
};
use crate::AppState;

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.create(ctx.tenant_id, input).await?;
    Ok(Json(supplier))
}

/// List suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list(ctx.tenant_id).await?;
    Ok(Json(suppliers))
}

/// Get one supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get(ctx.tenant_id, supplier_id).await?;
    Ok(Json(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.update(ctx.tenant_id, supplier_id, input).await?;
    Ok(Json(supplier))
}
