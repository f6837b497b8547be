//! HTTP handlers for inventory and reordering endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::inventory::{
    CreateItemInput, InventoryItem, InventoryService, RecordMovementInput, StockMovement,
    UpdateItemInput,
};
use crate::services::purchase_order::PurchaseOrderWithItems;
use crate::services::reorder::ReorderService;
use crate::AppState;

/// Create an inventory item
pub async fn create_item(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service.create_item(ctx.tenant_id, input).await?;
    Ok(Json(item))
}

/// List inventory items
pub async fn list_items(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items(ctx.tenant_id).await?;
    Ok(Json(items))
}

/// Get one inventory item
pub async fn get_item(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(ctx.tenant_id, item_id).await?;
    Ok(Json(item))
}

/// Update an inventory item
pub async fn update_item(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service.update_item(ctx.tenant_id, item_id, input).await?;
    Ok(Json(item))
}

/// List stock movements for one item
pub async fn list_item_movements(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.list_item_movements(ctx.tenant_id, item_id).await?;
    Ok(Json(movements))
}

/// List all stock movements for the tenant
pub async fn list_movements(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.list_movements(ctx.tenant_id).await?;
    Ok(Json(movements))
}

/// Record a stock movement
pub async fn record_movement(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<Json<StockMovement>> {
    let service = InventoryService::new(state.db);
    let movement = service
        .record_movement(ctx.tenant_id, ctx.user_id, input)
        .await?;
    Ok(Json(movement))
}

/// Items at or below their reorder point
pub async fn reorder_alerts(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = ReorderService::new(state.db, &state.config);
    let items = service.reorder_alerts(ctx.tenant_id).await?;
    Ok(Json(items))
}

/// Generate draft purchase orders for current shortages
pub async fn auto_reorder(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<PurchaseOrderWithItems>>> {
    let service = ReorderService::new(state.db, &state.config);
    let orders = service.auto_reorder(ctx.tenant_id).await?;
    Ok(Json(orders))
}

/// Recompute 30-day average usage rates
pub async fn update_usage_rates(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Value>> {
    let service = InventoryService::new(state.db);
    let updated = service.update_usage_rates(ctx.tenant_id).await?;
    Ok(Json(json!({ "updated": updated })))
}
