//! Status lifecycle tests
//!
//! Covers the order, purchase order and route state machines, plus the
//! snake_case persistence round trip every status shares.

use proptest::prelude::*;

use shared::types::{
    MachineStatus, OrderStatus, PurchaseOrderStatus, RouteStatus, StockMovementType, StopStatus,
};

const ORDER_STATUSES: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Ready,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

const PO_STATUSES: [PurchaseOrderStatus; 5] = [
    PurchaseOrderStatus::Draft,
    PurchaseOrderStatus::Sent,
    PurchaseOrderStatus::Confirmed,
    PurchaseOrderStatus::Received,
    PurchaseOrderStatus::Cancelled,
];

const ROUTE_STATUSES: [RouteStatus; 3] = [
    RouteStatus::Planned,
    RouteStatus::InProgress,
    RouteStatus::Completed,
];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The full forward order lifecycle is accepted
    #[test]
    fn test_order_happy_path() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Completed));
    }

    /// Cancellation is only allowed before the garments are ready
    #[test]
    fn test_order_cancellation_window() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    /// Orders cannot skip stages or move backward
    #[test]
    fn test_order_no_skipping_or_backtracking() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
    }

    /// The full forward purchase order lifecycle is accepted
    #[test]
    fn test_purchase_order_happy_path() {
        assert!(PurchaseOrderStatus::Draft.can_transition_to(PurchaseOrderStatus::Sent));
        assert!(PurchaseOrderStatus::Sent.can_transition_to(PurchaseOrderStatus::Confirmed));
        assert!(PurchaseOrderStatus::Confirmed.can_transition_to(PurchaseOrderStatus::Received));
    }

    /// Any non-terminal purchase order can be cancelled
    #[test]
    fn test_purchase_order_cancellation() {
        assert!(PurchaseOrderStatus::Draft.can_transition_to(PurchaseOrderStatus::Cancelled));
        assert!(PurchaseOrderStatus::Sent.can_transition_to(PurchaseOrderStatus::Cancelled));
        assert!(PurchaseOrderStatus::Confirmed.can_transition_to(PurchaseOrderStatus::Cancelled));
        assert!(!PurchaseOrderStatus::Received.can_transition_to(PurchaseOrderStatus::Cancelled));
        assert!(!PurchaseOrderStatus::Cancelled.can_transition_to(PurchaseOrderStatus::Draft));
    }

    /// Routes move planned -> in_progress -> completed only
    #[test]
    fn test_route_lifecycle() {
        assert!(RouteStatus::Planned.can_transition_to(RouteStatus::InProgress));
        assert!(RouteStatus::InProgress.can_transition_to(RouteStatus::Completed));
        assert!(!RouteStatus::Planned.can_transition_to(RouteStatus::Completed));
        assert!(!RouteStatus::Completed.can_transition_to(RouteStatus::Planned));
    }

    /// Only `in` movements are inbound; adjustments are signed
    #[test]
    fn test_movement_direction() {
        assert!(StockMovementType::In.is_inbound());
        assert!(!StockMovementType::Out.is_inbound());
        assert!(!StockMovementType::Adjustment.is_inbound());
        assert!(!StockMovementType::Transfer.is_inbound());
    }

    /// Every persisted string round-trips through parse/as_str
    #[test]
    fn test_string_round_trips() {
        for status in ORDER_STATUSES {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        for status in PO_STATUSES {
            assert_eq!(PurchaseOrderStatus::parse(status.as_str()), Some(status));
        }
        for status in ROUTE_STATUSES {
            assert_eq!(RouteStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            MachineStatus::Available,
            MachineStatus::InUse,
            MachineStatus::Maintenance,
            MachineStatus::Offline,
        ] {
            assert_eq!(MachineStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            StopStatus::Pending,
            StopStatus::Arrived,
            StopStatus::Completed,
            StopStatus::Failed,
        ] {
            assert_eq!(StopStatus::parse(status.as_str()), Some(status));
        }
    }

    /// Unknown strings never parse
    #[test]
    fn test_unknown_strings_rejected() {
        assert!(OrderStatus::parse("shipped").is_none());
        assert!(PurchaseOrderStatus::parse("ordered").is_none());
        assert!(RouteStatus::parse("paused").is_none());
        assert!(OrderStatus::parse("Pending").is_none());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn order_status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop::sample::select(ORDER_STATUSES.to_vec())
    }

    fn po_status_strategy() -> impl Strategy<Value = PurchaseOrderStatus> {
        prop::sample::select(PO_STATUSES.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Terminal statuses admit no outgoing transition
        #[test]
        fn prop_order_terminal_states_are_final(next in order_status_strategy()) {
            prop_assert!(!OrderStatus::Completed.can_transition_to(next));
            prop_assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }

        /// No status can transition to itself
        #[test]
        fn prop_no_self_transitions(
            order in order_status_strategy(),
            po in po_status_strategy()
        ) {
            prop_assert!(!order.can_transition_to(order));
            prop_assert!(!po.can_transition_to(po));
        }

        /// is_terminal agrees with the transition table
        #[test]
        fn prop_terminal_flag_matches_transitions(status in po_status_strategy()) {
            let has_exit = PO_STATUSES
                .iter()
                .any(|next| status.can_transition_to(*next));
            prop_assert_eq!(status.is_terminal(), !has_exit);
        }
    }
}
