//! Core domain enums shared between modules
//!
//! Statuses are persisted as snake_case text columns; `as_str`/`parse`
//! round-trip through the same strings serde uses on the wire.

use serde::{Deserialize, Serialize};

/// User role within a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Manager,
    Staff,
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Driver => "driver",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Role::Owner),
            "manager" => Some(Role::Manager),
            "staff" => Some(Role::Staff),
            "driver" => Some(Role::Driver),
            _ => None,
        }
    }
}

/// Laundry service categories, each with a fixed price multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    WashFold,
    WashIron,
    DryClean,
    IronOnly,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::WashFold => "wash_fold",
            ServiceCategory::WashIron => "wash_iron",
            ServiceCategory::DryClean => "dry_clean",
            ServiceCategory::IronOnly => "iron_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wash_fold" => Some(ServiceCategory::WashFold),
            "wash_iron" => Some(ServiceCategory::WashIron),
            "dry_clean" => Some(ServiceCategory::DryClean),
            "iron_only" => Some(ServiceCategory::IronOnly),
            _ => None,
        }
    }
}

/// How the customer receives the finished order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentType {
    StorePickup,
    HomePickup,
    HomeDelivery,
}

impl FulfillmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentType::StorePickup => "store_pickup",
            FulfillmentType::HomePickup => "home_pickup",
            FulfillmentType::HomeDelivery => "home_delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "store_pickup" => Some(FulfillmentType::StorePickup),
            "home_pickup" => Some(FulfillmentType::HomePickup),
            "home_delivery" => Some(FulfillmentType::HomeDelivery),
            _ => None,
        }
    }
}

/// Order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "ready" => Some(OrderStatus::Ready),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Valid forward transitions; cancellation is only allowed before the
    /// garments are ready.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Ready)
                | (Ready, Completed)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Purchase order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Sent,
    Confirmed,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "draft",
            PurchaseOrderStatus::Sent => "sent",
            PurchaseOrderStatus::Confirmed => "confirmed",
            PurchaseOrderStatus::Received => "received",
            PurchaseOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PurchaseOrderStatus::Draft),
            "sent" => Some(PurchaseOrderStatus::Sent),
            "confirmed" => Some(PurchaseOrderStatus::Confirmed),
            "received" => Some(PurchaseOrderStatus::Received),
            "cancelled" => Some(PurchaseOrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Sent, Confirmed)
                | (Confirmed, Received)
                | (Draft, Cancelled)
                | (Sent, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Received | PurchaseOrderStatus::Cancelled
        )
    }
}

/// Stock movement direction/kind for the immutable inventory log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockMovementType {
    In,
    Out,
    Adjustment,
    Transfer,
}

impl StockMovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockMovementType::In => "in",
            StockMovementType::Out => "out",
            StockMovementType::Adjustment => "adjustment",
            StockMovementType::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(StockMovementType::In),
            "out" => Some(StockMovementType::Out),
            "adjustment" => Some(StockMovementType::Adjustment),
            "transfer" => Some(StockMovementType::Transfer),
            _ => None,
        }
    }

    /// Whether the movement increases stock. Adjustments carry a signed
    /// quantity and are handled by the caller.
    pub fn is_inbound(&self) -> bool {
        matches!(self, StockMovementType::In)
    }
}

/// Machine kind on the shop floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineType {
    Washer,
    Dryer,
}

impl MachineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Washer => "washer",
            MachineType::Dryer => "dryer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "washer" => Some(MachineType::Washer),
            "dryer" => Some(MachineType::Dryer),
            _ => None,
        }
    }
}

/// Machine availability on the shop floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Available,
    InUse,
    Maintenance,
    Offline,
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Available => "available",
            MachineStatus::InUse => "in_use",
            MachineStatus::Maintenance => "maintenance",
            MachineStatus::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(MachineStatus::Available),
            "in_use" => Some(MachineStatus::InUse),
            "maintenance" => Some(MachineStatus::Maintenance),
            "offline" => Some(MachineStatus::Offline),
            _ => None,
        }
    }
}

/// Delivery route lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Planned => "planned",
            RouteStatus::InProgress => "in_progress",
            RouteStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(RouteStatus::Planned),
            "in_progress" => Some(RouteStatus::InProgress),
            "completed" => Some(RouteStatus::Completed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: RouteStatus) -> bool {
        use RouteStatus::*;
        matches!((self, next), (Planned, InProgress) | (InProgress, Completed))
    }
}

/// Stop state within a delivery route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    Pending,
    Arrived,
    Completed,
    Failed,
}

impl StopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopStatus::Pending => "pending",
            StopStatus::Arrived => "arrived",
            StopStatus::Completed => "completed",
            StopStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(StopStatus::Pending),
            "arrived" => Some(StopStatus::Arrived),
            "completed" => Some(StopStatus::Completed),
            "failed" => Some(StopStatus::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trip() {
        for s in ["pending", "processing", "ready", "completed", "cancelled"] {
            assert_eq!(OrderStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(OrderStatus::parse("shipped").is_none());
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Completed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
            assert!(!PurchaseOrderStatus::Received
                .can_transition_to(PurchaseOrderStatus::Cancelled));
        }
    }

    #[test]
    fn cancellation_blocked_after_ready() {
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn machine_type_round_trip() {
        for s in ["washer", "dryer"] {
            assert_eq!(MachineType::parse(s).unwrap().as_str(), s);
        }
        assert!(MachineType::parse("press").is_none());
    }
}
