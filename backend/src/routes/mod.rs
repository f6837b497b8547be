//! Route definitions for the Laundry Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - inventory and reordering
        .nest("/inventory", inventory_routes(&state))
        // Protected routes - suppliers
        .nest("/suppliers", supplier_routes(&state))
        // Protected routes - purchasing
        .nest("/purchase-orders", purchase_order_routes(&state))
        // Protected routes - customers
        .nest("/customers", customer_routes(&state))
        // Protected routes - service catalog and promo codes
        .nest("/services", service_routes(&state))
        .nest("/promo-codes", promo_code_routes(&state))
        // Protected routes - orders
        .nest("/orders", order_routes(&state))
        // Protected routes - machines and delivery routes
        .nest("/machines", machine_routes(&state))
        .nest("/routes", delivery_route_routes(&state))
        // Protected routes - reporting
        .nest("/reports", report_routes(&state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Inventory management routes (protected)
fn inventory_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Items
        .route("/items", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/items/:item_id",
            get(handlers::get_item).put(handlers::update_item),
        )
        .route(
            "/items/:item_id/transactions",
            get(handlers::list_item_movements),
        )
        // Stock movement log
        .route(
            "/transactions",
            get(handlers::list_movements).post(handlers::record_movement),
        )
        // Reordering
        .route("/reorder-alerts", get(handlers::reorder_alerts))
        .route("/auto-reorder", post(handlers::auto_reorder))
        .route("/update-usage-rates", post(handlers::update_usage_rates))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Supplier management routes (protected)
fn supplier_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier).put(handlers::update_supplier),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Purchase order routes (protected)
fn purchase_order_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_orders).post(handlers::create_purchase_order),
        )
        .route("/:po_id", get(handlers::get_purchase_order))
        .route("/:po_id/status", post(handlers::update_purchase_order_status))
        .route("/:po_id/receive", post(handlers::receive_purchase_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Customer management routes (protected)
fn customer_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/:customer_id", get(handlers::get_customer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Service catalog routes (protected)
fn service_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_services).post(handlers::create_service),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Promo code routes (protected)
fn promo_code_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_promo_codes).post(handlers::create_promo_code),
        )
        .route("/validate", get(handlers::validate_promo))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Order management routes (protected)
fn order_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", post(handlers::update_order_status))
        .route("/:order_id/receipt", get(handlers::get_receipt))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Machine routes (protected)
fn machine_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_machines).post(handlers::create_machine),
        )
        .route("/:machine_id/status", post(handlers::update_machine_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Delivery route routes (protected)
fn delivery_route_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_routes).post(handlers::create_route))
        .route("/:route_id", get(handlers::get_route))
        .route("/:route_id/status", post(handlers::update_route_status))
        .route(
            "/:route_id/stops/:stop_id/status",
            post(handlers::update_stop_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Reporting routes (protected)
fn report_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/orders/export", get(handlers::export_orders))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::{Config, DatabaseConfig, JwtConfig, ReorderConfig, ServerConfig};
    use crate::events::EventBroadcaster;
    use crate::AppState;

    use super::api_routes;

    // Lazy pool: no connection is made until a handler touches the
    // database, which none of these requests get far enough to do.
    fn test_state() -> AppState {
        let config = Config {
            environment: "test".to_string(),
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/unused".to_string(),
                max_connections: 1,
                min_connections: 0,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry: 3600,
                refresh_token_expiry: 604800,
            },
            reorder: ReorderConfig { cooldown_hours: 24 },
        };

        let db = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("lazy pool");

        AppState {
            db,
            config: Arc::new(config),
            events: EventBroadcaster::new(8),
        }
    }

    async fn status_of(path: &str) -> StatusCode {
        let state = test_state();
        let app = api_routes(state.clone()).with_state(state);
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn promo_validation_route_is_registered_and_protected() {
        // A registered route behind auth yields 401 without a token; an
        // unregistered one would fall through to 404.
        let status = status_of("/promo-codes/validate?code=WASH10").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_404() {
        let status = status_of("/promo-codes/definitely-not-a-route").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_route_is_public() {
        let status = status_of("/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
