//! Inventory service: stocked consumables and their movement log
//!
//! Stock is only ever changed through movement postings, which insert an
//! immutable log row and update the item's `current_stock` inside one
//! database transaction.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::types::StockMovementType;
use shared::usage::{usage_rate, USAGE_WINDOW_DAYS};
use shared::validation::{validate_non_negative_stock, validate_stock_levels};

use crate::error::{AppError, AppResult};

/// Inventory service for managing items and stock movements
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// A stocked consumable
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub minimum_stock: Option<Decimal>,
    pub maximum_stock: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub reorder_quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub average_usage_rate: Option<Decimal>,
    pub lead_time_days: Option<i32>,
    pub supplier_id: Option<Uuid>,
    pub auto_reorder: bool,
    pub is_active: bool,
    pub last_reorder_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable stock movement log entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub item_id: Uuid,
    pub movement_type: String,
    pub quantity: Decimal,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Input for creating an inventory item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub sku: String,
    pub name: String,
    pub unit: Option<String>,
    pub initial_stock: Option<Decimal>,
    pub minimum_stock: Option<Decimal>,
    pub maximum_stock: Option<Decimal>,
    pub reorder_point: Option<Decimal>,
    pub reorder_quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub lead_time_days: Option<i32>,
    pub supplier_id: Option<Uuid>,
    pub auto_reorder: Option<bool>,
}

/// Input for updating an inventory item. Omitted fields keep their current
/// value; optional fields set to JSON null are cleared, so an item can for
/// example drop its reorder point and stop matching the reorder scanner.
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub minimum_stock: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub maximum_stock: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub reorder_point: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub reorder_quantity: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub unit_cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub lead_time_days: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub supplier_id: Option<Option<Uuid>>,
    pub auto_reorder: Option<bool>,
    pub is_active: Option<bool>,
}

/// Input for posting a stock movement
#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub item_id: Uuid,
    pub movement_type: StockMovementType,
    pub quantity: Decimal,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

const ITEM_COLUMNS: &str = "id, tenant_id, sku, name, unit, current_stock, minimum_stock, \
     maximum_stock, reorder_point, reorder_quantity, unit_cost, average_usage_rate, \
     lead_time_days, supplier_id, auto_reorder, is_active, last_reorder_date, \
     created_at, updated_at";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an inventory item
    pub async fn create_item(
        &self,
        tenant_id: Uuid,
        input: CreateItemInput,
    ) -> AppResult<InventoryItem> {
        let initial_stock = input.initial_stock.unwrap_or(Decimal::ZERO);
        validate_non_negative_stock(initial_stock).map_err(|msg| AppError::Validation {
            field: "initial_stock".to_string(),
            message: msg.to_string(),
        })?;
        validate_stock_levels(input.reorder_point, input.maximum_stock).map_err(|msg| {
            AppError::Validation {
                field: "reorder_point".to_string(),
                message: msg.to_string(),
            }
        })?;

        if let Some(supplier_id) = input.supplier_id {
            self.ensure_supplier(tenant_id, supplier_id).await?;
        }

        // SKU must be unique within the tenant
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE tenant_id = $1 AND sku = $2",
        )
        .bind(tenant_id)
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_items (
                tenant_id, sku, name, unit, current_stock, minimum_stock, maximum_stock,
                reorder_point, reorder_quantity, unit_cost, lead_time_days, supplier_id,
                auto_reorder
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.sku)
        .bind(&input.name)
        .bind(input.unit.unwrap_or_else(|| "unit".to_string()))
        .bind(initial_stock)
        .bind(input.minimum_stock)
        .bind(input.maximum_stock)
        .bind(input.reorder_point)
        .bind(input.reorder_quantity)
        .bind(input.unit_cost)
        .bind(input.lead_time_days)
        .bind(input.supplier_id)
        .bind(input.auto_reorder.unwrap_or(false))
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// List items for a tenant
    pub async fn list_items(&self, tenant_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE tenant_id = $1 ORDER BY sku"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Get one item
    pub async fn get_item(&self, tenant_id: Uuid, item_id: Uuid) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(item_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))
    }

    /// Update an item (stock itself is only changed via movements)
    pub async fn update_item(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<InventoryItem> {
        let existing = self.get_item(tenant_id, item_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let unit = input.unit.unwrap_or(existing.unit);
        let minimum_stock = input.minimum_stock.unwrap_or(existing.minimum_stock);
        let maximum_stock = input.maximum_stock.unwrap_or(existing.maximum_stock);
        let reorder_point = input.reorder_point.unwrap_or(existing.reorder_point);
        let reorder_quantity = input.reorder_quantity.unwrap_or(existing.reorder_quantity);
        let unit_cost = input.unit_cost.unwrap_or(existing.unit_cost);
        let lead_time_days = input.lead_time_days.unwrap_or(existing.lead_time_days);
        let supplier_id = input.supplier_id.unwrap_or(existing.supplier_id);
        let auto_reorder = input.auto_reorder.unwrap_or(existing.auto_reorder);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_stock_levels(reorder_point, maximum_stock).map_err(|msg| {
            AppError::Validation {
                field: "reorder_point".to_string(),
                message: msg.to_string(),
            }
        })?;

        if let Some(supplier_id) = supplier_id {
            self.ensure_supplier(tenant_id, supplier_id).await?;
        }

        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items
            SET name = $1, unit = $2, minimum_stock = $3, maximum_stock = $4,
                reorder_point = $5, reorder_quantity = $6, unit_cost = $7,
                lead_time_days = $8, supplier_id = $9, auto_reorder = $10,
                is_active = $11, updated_at = NOW()
            WHERE id = $12 AND tenant_id = $13
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&unit)
        .bind(minimum_stock)
        .bind(maximum_stock)
        .bind(reorder_point)
        .bind(reorder_quantity)
        .bind(unit_cost)
        .bind(lead_time_days)
        .bind(supplier_id)
        .bind(auto_reorder)
        .bind(is_active)
        .bind(item_id)
        .bind(tenant_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Post a stock movement: log row plus stock update, atomically
    pub async fn record_movement(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        input: RecordMovementInput,
    ) -> AppResult<StockMovement> {
        let delta = match input.movement_type {
            StockMovementType::In => {
                Self::require_positive(input.quantity)?;
                input.quantity
            }
            StockMovementType::Out | StockMovementType::Transfer => {
                Self::require_positive(input.quantity)?;
                -input.quantity
            }
            // Adjustments carry a signed quantity
            StockMovementType::Adjustment => {
                if input.quantity == Decimal::ZERO {
                    return Err(AppError::Validation {
                        field: "quantity".to_string(),
                        message: "Adjustment quantity cannot be zero".to_string(),
                    });
                }
                input.quantity
            }
        };

        let occurred_at = input.occurred_at.unwrap_or_else(Utc::now);

        let mut tx = self.db.begin().await?;

        let current_stock = sqlx::query_scalar::<_, Decimal>(
            "SELECT current_stock FROM inventory_items WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(input.item_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let new_stock = current_stock + delta;
        if new_stock < Decimal::ZERO {
            return Err(AppError::InsufficientStock(format!(
                "Movement would reduce stock to {}",
                new_stock
            )));
        }

        sqlx::query(
            "UPDATE inventory_items SET current_stock = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(new_stock)
        .bind(input.item_id)
        .execute(&mut *tx)
        .await?;

        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO inventory_transactions (
                tenant_id, item_id, movement_type, quantity, note, occurred_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tenant_id, item_id, movement_type, quantity, note, occurred_at, created_by
            "#,
        )
        .bind(tenant_id)
        .bind(input.item_id)
        .bind(input.movement_type.as_str())
        .bind(input.quantity)
        .bind(&input.note)
        .bind(occurred_at)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(movement)
    }

    /// List movements for one item
    pub async fn list_item_movements(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<Vec<StockMovement>> {
        // Validate item belongs to tenant
        self.get_item(tenant_id, item_id).await?;

        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, tenant_id, item_id, movement_type, quantity, note, occurred_at, created_by
            FROM inventory_transactions
            WHERE item_id = $1 AND tenant_id = $2
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(item_id)
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// List all movements for a tenant
    pub async fn list_movements(&self, tenant_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, tenant_id, item_id, movement_type, quantity, note, occurred_at, created_by
            FROM inventory_transactions
            WHERE tenant_id = $1
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Recompute average daily usage per item from the trailing window of
    /// `out` movements. Items without any consumption keep their stored
    /// rate. Returns the number of items updated.
    pub async fn update_usage_rates(&self, tenant_id: Uuid) -> AppResult<u64> {
        let window_start = Utc::now() - Duration::days(USAGE_WINDOW_DAYS);

        let rows = sqlx::query_as::<_, (Uuid, Decimal)>(
            r#"
            SELECT item_id, quantity
            FROM inventory_transactions
            WHERE tenant_id = $1 AND movement_type = 'out' AND occurred_at >= $2
            "#,
        )
        .bind(tenant_id)
        .bind(window_start)
        .fetch_all(&self.db)
        .await?;

        let mut per_item: HashMap<Uuid, Vec<Decimal>> = HashMap::new();
        for (item_id, quantity) in rows {
            per_item.entry(item_id).or_default().push(quantity);
        }

        let mut updated = 0;
        for (item_id, quantities) in per_item {
            if let Some(rate) = usage_rate(&quantities) {
                let result = sqlx::query(
                    r#"
                    UPDATE inventory_items
                    SET average_usage_rate = $1, updated_at = NOW()
                    WHERE id = $2 AND tenant_id = $3
                    "#,
                )
                .bind(rate)
                .bind(item_id)
                .bind(tenant_id)
                .execute(&self.db)
                .await?;
                updated += result.rows_affected();
            }
        }

        Ok(updated)
    }

    async fn ensure_supplier(&self, tenant_id: Uuid, supplier_id: Uuid) -> AppResult<()> {
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

        Ok(())
    }

    fn require_positive(quantity: Decimal) -> AppResult<()> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_input_null_clears_and_missing_keeps() {
        let input: UpdateItemInput =
            serde_json::from_str(r#"{"name": "Detergent", "reorder_point": null}"#).unwrap();

        assert_eq!(input.name.as_deref(), Some("Detergent"));
        assert!(matches!(input.reorder_point, Some(None)));
        assert!(input.unit_cost.is_none());
        assert!(input.supplier_id.is_none());
    }

    #[test]
    fn update_input_parses_explicit_values() {
        let input: UpdateItemInput =
            serde_json::from_str(r#"{"reorder_point": "12.500", "lead_time_days": 5}"#).unwrap();

        assert!(matches!(input.reorder_point, Some(Some(_))));
        assert!(matches!(input.lead_time_days, Some(Some(5))));
    }
}
