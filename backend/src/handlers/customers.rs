//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::TenantContext;
use crate::services::customer::{CreateCustomerInput, Customer, CustomerService};
use crate::AppState;

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.create(ctx.tenant_id, input).await?;
    Ok(Json(customer))
}

/// List customers
pub async fn list_customers(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list(ctx.tenant_id).await?;
    Ok(Json(customers))
}

/// Get one customer
pub async fn get_customer(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.get(ctx.tenant_id, customer_id).await?;
    Ok(Json(customer))
}
