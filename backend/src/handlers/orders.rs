//! HTTP handlers for order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::order::{
    CreateOrderInput, Order, OrderService, OrderWithItems, Receipt, UpdateOrderStatusInput,
};
use crate::AppState;

/// Create and price an order
pub async fn create_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderWithItems>> {
    let service = OrderService::new(state.db, state.events);
    let order = service.create(ctx.tenant_id, input).await?;
    Ok(Json(order))
}

/// List orders, newest first
pub async fn list_orders(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<Order>>> {
    let service = OrderService::new(state.db, state.events);
    let orders = service.list(ctx.tenant_id).await?;
    Ok(Json(orders))
}

/// Get one order with its lines
pub async fn get_order(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithItems>> {
    let service = OrderService::new(state.db, state.events);
    let order = service.get(ctx.tenant_id, order_id).await?;
    Ok(Json(order))
}

/// Move an order through its lifecycle
pub async fn update_order_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderStatusInput>,
) -> AppResult<Json<OrderWithItems>> {
    let service = OrderService::new(state.db, state.events);
    let order = service.update_status(ctx.tenant_id, order_id, input).await?;
    Ok(Json(order))
}

/// Render the receipt and WhatsApp share link for an order
pub async fn get_receipt(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Receipt>> {
    let service = OrderService::new(state.db, state.events);
    let receipt = service.receipt(ctx.tenant_id, order_id).await?;
    Ok(Json(receipt))
}
