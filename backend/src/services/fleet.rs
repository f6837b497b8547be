//! Machines and delivery routes
//!
//! Machine status changes and route progress are broadcast to connected
//! dashboards so the floor view stays live without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::types::{MachineStatus, MachineType, RouteStatus, StopStatus};

use crate::error::{AppError, AppResult};
use crate::events::{EventBroadcaster, EventKind};

/// Fleet service covering machines, routes and stops
#[derive(Clone)]
pub struct FleetService {
    db: PgPool,
    events: EventBroadcaster,
}

/// A washer or dryer on the floor
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Machine {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub machine_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A pickup/delivery route for one driver
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeliveryRoute {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub driver_name: Option<String>,
    pub route_date: chrono::NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ordered stop on a route
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RouteStop {
    pub id: Uuid,
    pub route_id: Uuid,
    pub order_id: Option<Uuid>,
    pub address: String,
    pub position: i32,
    pub status: String,
}

/// A route with its ordered stops
#[derive(Debug, Serialize)]
pub struct RouteWithStops {
    #[serde(flatten)]
    pub route: DeliveryRoute,
    pub stops: Vec<RouteStop>,
}

/// Input for registering a machine
#[derive(Debug, Deserialize)]
pub struct CreateMachineInput {
    pub name: String,
    pub machine_type: MachineType,
}

/// Input for a machine status change
#[derive(Debug, Deserialize)]
pub struct UpdateMachineStatusInput {
    pub status: MachineStatus,
}

/// One stop in an incoming route plan
#[derive(Debug, Deserialize)]
pub struct CreateStopInput {
    pub order_id: Option<Uuid>,
    pub address: String,
}

/// Input for planning a route
#[derive(Debug, Deserialize)]
pub struct CreateRouteInput {
    pub name: String,
    pub driver_name: Option<String>,
    pub route_date: chrono::NaiveDate,
    pub stops: Vec<CreateStopInput>,
}

/// Input for a route status transition
#[derive(Debug, Deserialize)]
pub struct UpdateRouteStatusInput {
    pub status: RouteStatus,
}

/// Input for a stop status change
#[derive(Debug, Deserialize)]
pub struct UpdateStopStatusInput {
    pub status: StopStatus,
}

const MACHINE_COLUMNS: &str =
    "id, tenant_id, name, machine_type, status, created_at, updated_at";
const ROUTE_COLUMNS: &str =
    "id, tenant_id, name, driver_name, route_date, status, created_at, updated_at";
const STOP_COLUMNS: &str = "id, route_id, order_id, address, position, status";

impl FleetService {
    /// Create a new FleetService instance
    pub fn new(db: PgPool, events: EventBroadcaster) -> Self {
        Self { db, events }
    }

    /// Register a machine
    pub async fn create_machine(
        &self,
        tenant_id: Uuid,
        input: CreateMachineInput,
    ) -> AppResult<Machine> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Machine name is required".to_string(),
            });
        }

        let machine = sqlx::query_as::<_, Machine>(&format!(
            r#"
            INSERT INTO machines (tenant_id, name, machine_type, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {MACHINE_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.name)
        .bind(input.machine_type.as_str())
        .bind(MachineStatus::Available.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(machine)
    }

    /// List machines for a tenant
    pub async fn list_machines(&self, tenant_id: Uuid) -> AppResult<Vec<Machine>> {
        let machines = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE tenant_id = $1 ORDER BY name"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(machines)
    }

    /// Change a machine's status. Any state can move to any state; machines
    /// break and come back without a fixed lifecycle.
    pub async fn update_machine_status(
        &self,
        tenant_id: Uuid,
        machine_id: Uuid,
        input: UpdateMachineStatusInput,
    ) -> AppResult<Machine> {
        let machine = sqlx::query_as::<_, Machine>(&format!(
            r#"
            UPDATE machines SET status = $1, updated_at = NOW()
            WHERE id = $2 AND tenant_id = $3
            RETURNING {MACHINE_COLUMNS}
            "#
        ))
        .bind(input.status.as_str())
        .bind(machine_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Machine".to_string()))?;

        self.events.publish(EventKind::MachineUpdated, &machine);

        Ok(machine)
    }

    /// Plan a route with its stops in one transaction
    pub async fn create_route(
        &self,
        tenant_id: Uuid,
        input: CreateRouteInput,
    ) -> AppResult<RouteWithStops> {
        if input.stops.is_empty() {
            return Err(AppError::Validation {
                field: "stops".to_string(),
                message: "A route needs at least one stop".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let route = sqlx::query_as::<_, DeliveryRoute>(&format!(
            r#"
            INSERT INTO delivery_routes (tenant_id, name, driver_name, route_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ROUTE_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.driver_name)
        .bind(input.route_date)
        .bind(RouteStatus::Planned.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut stops = Vec::with_capacity(input.stops.len());
        for (position, stop) in input.stops.iter().enumerate() {
            let row = sqlx::query_as::<_, RouteStop>(&format!(
                r#"
                INSERT INTO route_stops (route_id, order_id, address, position, status)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {STOP_COLUMNS}
                "#
            ))
            .bind(route.id)
            .bind(stop.order_id)
            .bind(&stop.address)
            .bind(position as i32)
            .bind(StopStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;
            stops.push(row);
        }

        tx.commit().await?;

        let result = RouteWithStops { route, stops };
        self.events.publish(EventKind::RouteCreated, &result);

        Ok(result)
    }

    /// List routes for a tenant, newest date first
    pub async fn list_routes(&self, tenant_id: Uuid) -> AppResult<Vec<DeliveryRoute>> {
        let routes = sqlx::query_as::<_, DeliveryRoute>(&format!(
            "SELECT {ROUTE_COLUMNS} FROM delivery_routes WHERE tenant_id = $1 ORDER BY route_date DESC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(routes)
    }

    /// Get one route with its stops
    pub async fn get_route(&self, tenant_id: Uuid, route_id: Uuid) -> AppResult<RouteWithStops> {
        let route = sqlx::query_as::<_, DeliveryRoute>(&format!(
            "SELECT {ROUTE_COLUMNS} FROM delivery_routes WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(route_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route".to_string()))?;

        let stops = sqlx::query_as::<_, RouteStop>(&format!(
            "SELECT {STOP_COLUMNS} FROM route_stops WHERE route_id = $1 ORDER BY position"
        ))
        .bind(route.id)
        .fetch_all(&self.db)
        .await?;

        Ok(RouteWithStops { route, stops })
    }

    /// Move a route through its lifecycle
    pub async fn update_route_status(
        &self,
        tenant_id: Uuid,
        route_id: Uuid,
        input: UpdateRouteStatusInput,
    ) -> AppResult<RouteWithStops> {
        let current = self.get_route(tenant_id, route_id).await?;

        let current_status = RouteStatus::parse(&current.route.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown route status: {}", current.route.status))
        })?;

        if !current_status.can_transition_to(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move route from {} to {}",
                current_status.as_str(),
                input.status.as_str()
            )));
        }

        sqlx::query("UPDATE delivery_routes SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(input.status.as_str())
            .bind(route_id)
            .execute(&self.db)
            .await?;

        let updated = self.get_route(tenant_id, route_id).await?;
        self.events.publish(EventKind::RouteUpdated, &updated);

        Ok(updated)
    }

    /// Mark a stop completed, skipped or back to pending
    pub async fn update_stop_status(
        &self,
        tenant_id: Uuid,
        route_id: Uuid,
        stop_id: Uuid,
        input: UpdateStopStatusInput,
    ) -> AppResult<RouteStop> {
        // Ownership check before touching the stop
        self.get_route(tenant_id, route_id).await?;

        let stop = sqlx::query_as::<_, RouteStop>(&format!(
            r#"
            UPDATE route_stops SET status = $1
            WHERE id = $2 AND route_id = $3
            RETURNING {STOP_COLUMNS}
            "#
        ))
        .bind(input.status.as_str())
        .bind(stop_id)
        .bind(route_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route stop".to_string()))?;

        self.events.publish(EventKind::StopUpdated, &stop);

        Ok(stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_input_only_accepts_washer_or_dryer() {
        let ok: CreateMachineInput =
            serde_json::from_str(r#"{"name": "W1", "machine_type": "washer"}"#).unwrap();
        assert_eq!(ok.machine_type, MachineType::Washer);

        let press = serde_json::from_str::<CreateMachineInput>(
            r#"{"name": "P1", "machine_type": "press"}"#,
        );
        assert!(press.is_err());
    }
}
