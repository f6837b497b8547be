//! HTTP handlers for purchase order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::purchase_order::{
    CreatePurchaseOrderInput, PurchaseOrder, PurchaseOrderService, PurchaseOrderWithItems,
    ReceiveInput, UpdateStatusInput,
};
use crate::AppState;

/// List purchase orders
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let service = PurchaseOrderService::new(state.db);
    let orders = service.list(ctx.tenant_id).await?;
    Ok(Json(orders))
}

/// Create a manual purchase order
pub async fn create_purchase_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> AppResult<Json<PurchaseOrderWithItems>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service.create(ctx.tenant_id, input).await?;
    Ok(Json(order))
}

/// Get one purchase order with its lines
pub async fn get_purchase_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(po_id): Path<Uuid>,
) -> AppResult<Json<PurchaseOrderWithItems>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service.get(ctx.tenant_id, po_id).await?;
    Ok(Json(order))
}

/// Move a purchase order through its lifecycle
pub async fn update_purchase_order_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(po_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<PurchaseOrder>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service
        .update_status(ctx.tenant_id, po_id, input.status)
        .await?;
    Ok(Json(order))
}

/// Receive deliveries against a confirmed purchase order
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(po_id): Path<Uuid>,
    Json(input): Json<ReceiveInput>,
) -> AppResult<Json<PurchaseOrderWithItems>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service
        .receive(ctx.tenant_id, ctx.user_id, po_id, input)
        .await?;
    Ok(Json(order))
}
