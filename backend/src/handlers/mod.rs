//! HTTP handlers for the Laundry Platform API

pub mod auth;
pub mod catalog;
pub mod customers;
pub mod fleet;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod purchase_orders;
pub mod reports;
pub mod suppliers;
pub mod ws;

pub use auth::{login, refresh, register};
pub use catalog::{
    create_promo_code, create_service, list_promo_codes, list_services, validate_promo,
};
pub use customers::{create_customer, get_customer, list_customers};
pub use fleet::{
    create_machine, create_route, get_route, list_machines, list_routes, update_machine_status,
    update_route_status, update_stop_status,
};
pub use health::health_check;
pub use inventory::{
    auto_reorder, create_item, get_item, list_item_movements, list_items, list_movements,
    record_movement, reorder_alerts, update_item, update_usage_rates,
};
pub use orders::{create_order, get_order, get_receipt, list_orders, update_order_status};
pub use purchase_orders::{
    create_purchase_order, get_purchase_order, list_purchase_orders, receive_purchase_order,
    update_purchase_order_status,
};
pub use reports::{export_orders, get_dashboard};
pub use suppliers::{create_supplier, get_supplier, list_suppliers, update_supplier};
pub use ws::ws_handler;
