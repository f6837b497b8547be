//! Automatic replenishment: threshold scanner and purchase order generator
//!
//! The scanner is read-only. The generator creates one draft purchase order
//! per supplier group, each group written in a single database transaction,
//! and refuses to run for items without a unit cost. Items reordered within
//! the cooldown window are skipped, so repeated trigger calls cannot
//! duplicate the same shortage.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shared::reorder::{group_by_supplier, order_quantity, within_cooldown, ShortageLine};
use shared::types::PurchaseOrderStatus;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryItem;
use crate::services::purchase_order::{PurchaseOrder, PurchaseOrderItem, PurchaseOrderWithItems, PO_COLUMNS, PO_ITEM_COLUMNS};

/// Reorder service
#[derive(Clone)]
pub struct ReorderService {
    db: PgPool,
    cooldown_hours: i64,
}

impl ReorderService {
    /// Create a new ReorderService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            cooldown_hours: config.reorder.cooldown_hours,
        }
    }

    /// Items at or below their reorder point. Items with no reorder point
    /// never match.
    pub async fn reorder_alerts(&self, tenant_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, tenant_id, sku, name, unit, current_stock, minimum_stock,
                   maximum_stock, reorder_point, reorder_quantity, unit_cost,
                   average_usage_rate, lead_time_days, supplier_id, auto_reorder,
                   is_active, last_reorder_date, created_at, updated_at
            FROM inventory_items
            WHERE tenant_id = $1
              AND auto_reorder = TRUE
              AND is_active = TRUE
              AND reorder_point IS NOT NULL
              AND current_stock <= reorder_point
            ORDER BY sku
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Generate draft purchase orders for the current shortages
    pub async fn auto_reorder(&self, tenant_id: Uuid) -> AppResult<Vec<PurchaseOrderWithItems>> {
        let now = Utc::now();
        let candidates = self.reorder_alerts(tenant_id).await?;

        let due: Vec<InventoryItem> = candidates
            .into_iter()
            .filter(|item| !within_cooldown(item.last_reorder_date, now, self.cooldown_hours))
            .collect();

        let mut lines = Vec::new();
        let mut missing_cost = Vec::new();
        for item in &due {
            match item.unit_cost {
                Some(unit_cost) => lines.push(ShortageLine {
                    item_id: item.id,
                    supplier_id: item.supplier_id,
                    quantity: order_quantity(
                        item.reorder_quantity,
                        item.maximum_stock,
                        item.current_stock,
                    ),
                    unit_cost,
                }),
                None => missing_cost.push(item.sku.clone()),
            }
        }

        if !missing_cost.is_empty() {
            return Err(AppError::MissingUnitCost(missing_cost.join(", ")));
        }

        let mut created = Vec::new();
        for (supplier_id, group) in group_by_supplier(lines) {
            let order = self.create_group_order(tenant_id, supplier_id, &group).await?;
            created.push(order);
        }

        tracing::info!(
            tenant_id = %tenant_id,
            purchase_orders = created.len(),
            "Auto-reorder run completed"
        );

        Ok(created)
    }

    /// Write one supplier group as a draft purchase order, atomically
    async fn create_group_order(
        &self,
        tenant_id: Uuid,
        supplier_id: Option<Uuid>,
        group: &[ShortageLine],
    ) -> AppResult<PurchaseOrderWithItems> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            INSERT INTO purchase_orders (tenant_id, supplier_id, status, total_amount, is_auto_generated)
            VALUES ($1, $2, $3, 0, TRUE)
            RETURNING {PO_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(supplier_id)
        .bind(PurchaseOrderStatus::Draft.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut total = Decimal::ZERO;
        let mut items = Vec::new();
        for line in group {
            let po_item = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
                r#"
                INSERT INTO purchase_order_items (purchase_order_id, item_id, quantity, unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {PO_ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.unit_cost)
            .bind(line.line_total())
            .fetch_one(&mut *tx)
            .await?;

            total += line.line_total();
            items.push(po_item);

            sqlx::query(
                "UPDATE inventory_items SET last_reorder_date = $1, updated_at = $1 WHERE id = $2",
            )
            .bind(now)
            .bind(line.item_id)
            .execute(&mut *tx)
            .await?;
        }

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            UPDATE purchase_orders SET total_amount = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {PO_COLUMNS}
            "#
        ))
        .bind(total)
        .bind(order.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseOrderWithItems { order, items })
    }
}
