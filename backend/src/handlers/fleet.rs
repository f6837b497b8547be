//! HTTP handlers for machines and delivery routes

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::fleet::{
    CreateMachineInput, CreateRouteInput, DeliveryRoute, FleetService, Machine, RouteStop,
    RouteWithStops, UpdateMachineStatusInput, UpdateRouteStatusInput, UpdateStopStatusInput,
};
use crate::AppState;

/// Register a machine
pub async fn create_machine(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateMachineInput>,
) -> AppResult<Json<Machine>> {
    let service = FleetService::new(state.db, state.events);
    let machine = service.create_machine(ctx.tenant_id, input).await?;
    Ok(Json(machine))
}

/// List machines
pub async fn list_machines(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<Machine>>> {
    let service = FleetService::new(state.db, state.events);
    let machines = service.list_machines(ctx.tenant_id).await?;
    Ok(Json(machines))
}

/// Change a machine's status
pub async fn update_machine_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(machine_id): Path<Uuid>,
    Json(input): Json<UpdateMachineStatusInput>,
) -> AppResult<Json<Machine>> {
    let service = FleetService::new(state.db, state.events);
    let machine = service
        .update_machine_status(ctx.tenant_id, machine_id, input)
        .await?;
    Ok(Json(machine))
}

/// Plan a route with its stops
pub async fn create_route(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateRouteInput>,
) -> AppResult<Json<RouteWithStops>> {
    let service = FleetService::new(state.db, state.events);
    let route = service.create_route(ctx.tenant_id, input).await?;
    Ok(Json(route))
}

/// List routes
pub async fn list_routes(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<DeliveryRoute>>> {
    let service = FleetService::new(state.db, state.events);
    let routes = service.list_routes(ctx.tenant_id).await?;
    Ok(Json(routes))
}

/// Get one route with its stops
pub async fn get_route(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(route_id): Path<Uuid>,
) -> AppResult<Json<RouteWithStops>> {
    let service = FleetService::new(state.db, state.events);
    let route = service.get_route(ctx.tenant_id, route_id).await?;
    Ok(Json(route))
}

/// Move a route through its lifecycle
pub async fn update_route_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(route_id): Path<Uuid>,
    Json(input): Json<UpdateRouteStatusInput>,
) -> AppResult<Json<RouteWithStops>> {
    let service = FleetService::new(state.db, state.events);
    let route = service
        .update_route_status(ctx.tenant_id, route_id, input)
        .await?;
    Ok(Json(route))
}

/// Change a stop's status
pub async fn update_stop_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path((route_id, stop_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateStopStatusInput>,
) -> AppResult<Json<RouteStop>> {
    let service = FleetService::new(state.db, state.events);
    let stop = service
        .update_stop_status(ctx.tenant_id, route_id, stop_id, input)
        .await?;
    Ok(Json(stop))
}
