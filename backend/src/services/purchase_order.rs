//! Purchase order service: manual creation, status transitions, receiving
//!
//! Receiving records per-line quantities and posts the matching `in` stock
//! movements in the same transaction, so stock and the movement log never
//! drift apart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::types::{PurchaseOrderStatus, StockMovementType};

use crate::error::{AppError, AppResult};

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: PgPool,
}

/// An order placed with one supplier (or the no-supplier group)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub total_amount: Decimal,
    pub is_auto_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item referencing one inventory item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub received_quantity: Decimal,
}

/// A purchase order together with its lines
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderWithItems {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}

/// Input for manually creating a purchase order
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderInput {
    pub supplier_id: Option<Uuid>,
    pub items: Vec<CreatePurchaseOrderLine>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderLine {
    pub item_id: Uuid,
    pub quantity: Decimal,
    /// Defaults to the item's unit cost
    pub unit_price: Option<Decimal>,
}

/// Input for the status transition endpoint
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: PurchaseOrderStatus,
}

/// Input for receiving deliveries against a purchase order
#[derive(Debug, Deserialize)]
pub struct ReceiveInput {
    pub lines: Vec<ReceiveLine>,
}

#[derive(Debug, Deserialize)]
pub struct ReceiveLine {
    pub purchase_order_item_id: Uuid,
    pub quantity: Decimal,
}

pub const PO_COLUMNS: &str =
    "id, tenant_id, supplier_id, status, total_amount, is_auto_generated, created_at, updated_at";

pub const PO_ITEM_COLUMNS: &str =
    "id, purchase_order_id, item_id, quantity, unit_price, total_price, received_quantity";

impl PurchaseOrderService {
    /// Create a new PurchaseOrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List purchase orders for a tenant
    pub async fn list(&self, tenant_id: Uuid) -> AppResult<Vec<PurchaseOrder>> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {PO_COLUMNS} FROM purchase_orders WHERE tenant_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Get one purchase order with its lines
    pub async fn get(&self, tenant_id: Uuid, po_id: Uuid) -> AppResult<PurchaseOrderWithItems> {
        let order = self.get_order(tenant_id, po_id).await?;
        let items = self.get_items(po_id).await?;
        Ok(PurchaseOrderWithItems { order, items })
    }

    /// Manually create a purchase order
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: CreatePurchaseOrderInput,
    ) -> AppResult<PurchaseOrderWithItems> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A purchase order needs at least one line".to_string(),
            });
        }

        if let Some(supplier_id) = input.supplier_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1 AND tenant_id = $2)",
            )
            .bind(supplier_id)
            .bind(tenant_id)
            .fetch_one(&self.db)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Supplier".to_string()));
            }
        }

        // Resolve prices up front so the whole order fails before any write
        let mut priced_lines = Vec::new();
        let mut missing_cost = Vec::new();
        for line in &input.items {
            if line.quantity <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Line quantity must be positive".to_string(),
                });
            }

            let row = sqlx::query_as::<_, (String, Option<Decimal>)>(
                "SELECT sku, unit_cost FROM inventory_items WHERE id = $1 AND tenant_id = $2",
            )
            .bind(line.item_id)
            .bind(tenant_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

            match line.unit_price.or(row.1) {
                Some(unit_price) => priced_lines.push((line.item_id, line.quantity, unit_price)),
                None => missing_cost.push(row.0),
            }
        }

        if !missing_cost.is_empty() {
            return Err(AppError::MissingUnitCost(missing_cost.join(", ")));
        }

        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            INSERT INTO purchase_orders (tenant_id, supplier_id, status, total_amount, is_auto_generated)
            VALUES ($1, $2, $3, 0, FALSE)
            RETURNING {PO_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(input.supplier_id)
        .bind(PurchaseOrderStatus::Draft.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut total = Decimal::ZERO;
        let mut items = Vec::new();
        for (item_id, quantity, unit_price) in priced_lines {
            let total_price = quantity * unit_price;
            let po_item = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
                r#"
                INSERT INTO purchase_order_items (purchase_order_id, item_id, quantity, unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {PO_ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(item_id)
            .bind(quantity)
            .bind(unit_price)
            .bind(total_price)
            .fetch_one(&mut *tx)
            .await?;

            total += total_price;
            items.push(po_item);
        }

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "UPDATE purchase_orders SET total_amount = $1, updated_at = NOW() WHERE id = $2 RETURNING {PO_COLUMNS}"
        ))
        .bind(total)
        .bind(order.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseOrderWithItems { order, items })
    }

    /// Move a purchase order along its lifecycle. `received` is reserved
    /// for the receive operation, which also moves stock.
    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        po_id: Uuid,
        next: PurchaseOrderStatus,
    ) -> AppResult<PurchaseOrder> {
        if next == PurchaseOrderStatus::Received {
            return Err(AppError::InvalidStateTransition(
                "Use the receive operation to mark a purchase order received".to_string(),
            ));
        }

        let order = self.get_order(tenant_id, po_id).await?;
        let current = PurchaseOrderStatus::parse(&order.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown status: {}", order.status)))?;

        if !current.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move purchase order from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "UPDATE purchase_orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {PO_COLUMNS}"
        ))
        .bind(next.as_str())
        .bind(po_id)
        .fetch_one(&self.db)
        .await?;

        Ok(order)
    }

    /// Record received quantities, post the matching stock-in movements,
    /// and close the order once every line is fully received.
    pub async fn receive(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        po_id: Uuid,
        input: ReceiveInput,
    ) -> AppResult<PurchaseOrderWithItems> {
        if input.lines.is_empty() {
            return Err(AppError::Validation {
                field: "lines".to_string(),
                message: "Nothing to receive".to_string(),
            });
        }

        let order = self.get_order(tenant_id, po_id).await?;
        let current = PurchaseOrderStatus::parse(&order.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown status: {}", order.status)))?;

        if current != PurchaseOrderStatus::Confirmed {
            return Err(AppError::InvalidStateTransition(format!(
                "Only confirmed purchase orders can be received (status: {})",
                current.as_str()
            )));
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        for line in &input.lines {
            if line.quantity <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Received quantity must be positive".to_string(),
                });
            }

            let po_item = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
                "SELECT {PO_ITEM_COLUMNS} FROM purchase_order_items WHERE id = $1 AND purchase_order_id = $2 FOR UPDATE"
            ))
            .bind(line.purchase_order_item_id)
            .bind(po_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase order line".to_string()))?;

            let received = po_item.received_quantity + line.quantity;
            if received > po_item.quantity {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: format!(
                        "Receiving {} would exceed the ordered quantity {}",
                        received, po_item.quantity
                    ),
                });
            }

            sqlx::query(
                "UPDATE purchase_order_items SET received_quantity = $1 WHERE id = $2",
            )
            .bind(received)
            .bind(po_item.id)
            .execute(&mut *tx)
            .await?;

            // Stock in, with the movement logged against the delivery
            sqlx::query(
                "UPDATE inventory_items SET current_stock = current_stock + $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(line.quantity)
            .bind(po_item.item_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO inventory_transactions (
                    tenant_id, item_id, movement_type, quantity, note, occurred_at, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(tenant_id)
            .bind(po_item.item_id)
            .bind(StockMovementType::In.as_str())
            .bind(line.quantity)
            .bind(format!("Purchase order {} received", po_id))
            .bind(now)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let outstanding = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchase_order_items WHERE purchase_order_id = $1 AND received_quantity < quantity",
        )
        .bind(po_id)
        .fetch_one(&mut *tx)
        .await?;

        if outstanding == 0 {
            sqlx::query(
                "UPDATE purchase_orders SET status = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(PurchaseOrderStatus::Received.as_str())
            .bind(po_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get(tenant_id, po_id).await
    }

    async fn get_order(&self, tenant_id: Uuid, po_id: Uuid) -> AppResult<PurchaseOrder> {
        sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {PO_COLUMNS} FROM purchase_orders WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(po_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))
    }

    async fn get_items(&self, po_id: Uuid) -> AppResult<Vec<PurchaseOrderItem>> {
        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            "SELECT {PO_ITEM_COLUMNS} FROM purchase_order_items WHERE purchase_order_id = $1 ORDER BY id"
        ))
        .bind(po_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }
}
