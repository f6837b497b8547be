//! Business logic services for the Laundry Platform

pub mod auth;
pub mod catalog;
pub mod customer;
pub mod fleet;
pub mod inventory;
pub mod order;
pub mod purchase_order;
pub mod reorder;
pub mod reporting;
pub mod supplier;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use customer::CustomerService;
pub use fleet::FleetService;
pub use inventory::InventoryService;
pub use order::OrderService;
pub use purchase_order::PurchaseOrderService;
pub use reorder::ReorderService;
pub use reporting::ReportingService;
pub use supplier::SupplierService;

/// Deserializer for `Option<Option<T>>` fields so an explicit JSON null
/// (`Some(None)`) is distinguishable from an omitted field (`None` via
/// `#[serde(default)]`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
