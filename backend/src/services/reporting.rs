//! Dashboard metrics and CSV export

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Headline numbers for the tenant dashboard
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub orders_today: i64,
    pub revenue_this_month: Decimal,
    pub active_orders: i64,
    pub low_stock_items: i64,
    pub open_purchase_orders: i64,
}

#[derive(Debug, FromRow)]
struct OrderExportRow {
    order_number: String,
    customer_name: String,
    status: String,
    fulfillment: String,
    total: Decimal,
    created_at: chrono::DateTime<Utc>,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the dashboard metrics for a tenant
    pub async fn dashboard(&self, tenant_id: Uuid) -> AppResult<DashboardMetrics> {
        let now = Utc::now();
        let today = now.date_naive();
        let month_start = today.with_day(1).unwrap_or(today);

        let orders_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE tenant_id = $1 AND created_at::date = $2",
        )
        .bind(tenant_id)
        .bind(today)
        .fetch_one(&self.db)
        .await?;

        let revenue_this_month = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(total) FROM orders
            WHERE tenant_id = $1 AND created_at::date >= $2 AND status != 'cancelled'
            "#,
        )
        .bind(tenant_id)
        .bind(month_start)
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        let active_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE tenant_id = $1 AND status IN ('pending', 'processing', 'ready')",
        )
        .bind(tenant_id)
        .fetch_one(&self.db)
        .await?;

        let low_stock_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM inventory_items
            WHERE tenant_id = $1 AND is_active = TRUE
              AND reorder_point IS NOT NULL AND current_stock <= reorder_point
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.db)
        .await?;

        let open_purchase_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchase_orders WHERE tenant_id = $1 AND status IN ('draft', 'sent', 'confirmed')",
        )
        .bind(tenant_id)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            orders_today,
            revenue_this_month,
            active_orders,
            low_stock_items,
            open_purchase_orders,
        })
    }

    /// Export the tenant's orders as CSV, newest first. The date range is
    /// inclusive; an open bound means no limit on that side.
    pub async fn export_orders_csv(
        &self,
        tenant_id: Uuid,
        start_date: Option<chrono::NaiveDate>,
        end_date: Option<chrono::NaiveDate>,
    ) -> AppResult<String> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::Validation {
                    field: "start_date".to_string(),
                    message: "Start date is after end date".to_string(),
                });
            }
        }

        let rows = sqlx::query_as::<_, OrderExportRow>(
            r#"
            SELECT o.order_number, c.name AS customer_name, o.status, o.fulfillment,
                   o.total, o.created_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.tenant_id = $1
              AND ($2::date IS NULL OR o.created_at::date >= $2)
              AND ($3::date IS NULL OR o.created_at::date <= $3)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "order_number",
                "customer",
                "status",
                "fulfillment",
                "total",
                "created_at",
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;

        for row in rows {
            writer
                .write_record([
                    row.order_number.as_str(),
                    row.customer_name.as_str(),
                    row.status.as_str(),
                    row.fulfillment.as_str(),
                    &row.total.to_string(),
                    &row.created_at.to_rfc3339(),
                ])
                .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;

        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {e}")))
    }
}
