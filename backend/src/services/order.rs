//! Orders and point-of-sale pricing
//!
//! Pricing is computed entirely in `shared::pricing` so the breakdown shown
//! at the counter, the one stored on the order, and the one printed on the
//! receipt are the same numbers. Unknown promo codes reject the order
//! instead of silently pricing without the discount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::pricing::{price_line, price_order};
use shared::types::{FulfillmentType, OrderStatus, ServiceCategory};

use crate::error::{AppError, AppResult};
use crate::events::{EventBroadcaster, EventKind};
use crate::services::catalog::CatalogService;
use crate::services::customer::CustomerService;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
    events: EventBroadcaster,
}

/// A customer order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub order_number: String,
    pub status: String,
    pub fulfillment: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub promo_code: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced line on an order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// An order with its lines
#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One line of an incoming cart
#[derive(Debug, Deserialize)]
pub struct CartLine {
    pub service_id: Uuid,
    pub quantity: u32,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: Uuid,
    pub fulfillment: FulfillmentType,
    pub promo_code: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<CartLine>,
}

/// Input for an order status transition
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusInput {
    pub status: OrderStatus,
}

/// Receipt rendering of a completed checkout
#[derive(Debug, Serialize)]
pub struct Receipt {
    pub order_number: String,
    pub customer_name: String,
    pub text: String,
    pub whatsapp_link: String,
}

pub(crate) const ORDER_COLUMNS: &str = "id, tenant_id, customer_id, order_number, status, \
     fulfillment, subtotal, discount, tax, delivery_fee, total, promo_code, notes, \
     created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, service_id, service_name, quantity, unit_price, line_total";

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool, events: EventBroadcaster) -> Self {
        Self { db, events }
    }

    /// Create and price an order
    pub async fn create(&self, tenant_id: Uuid, input: CreateOrderInput) -> AppResult<OrderWithItems> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Order must contain at least one item".to_string(),
            });
        }
        if input.items.iter().any(|line| line.quantity == 0) {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Item quantities must be positive".to_string(),
            });
        }

        let customers = CustomerService::new(self.db.clone());
        let customer = customers.get(tenant_id, input.customer_id).await?;

        let catalog = CatalogService::new(self.db.clone());

        let promo_pct = match &input.promo_code {
            Some(code) => {
                let promo = catalog
                    .find_active_promo(tenant_id, code)
                    .await?
                    .ok_or_else(|| {
                        AppError::ValidationError(format!("Unknown promo code: {code}"))
                    })?;
                Some(promo.percent_off)
            }
            None => None,
        };

        // Price every line before touching the database
        let mut priced = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let quantity = cart_quantity(line.quantity)?;
            let service = catalog.get_service(tenant_id, line.service_id).await?;
            let category = ServiceCategory::parse(&service.category).ok_or_else(|| {
                AppError::Internal(format!("Unknown service category: {}", service.category))
            })?;
            let priced_line = price_line(service.base_price, category, line.quantity);
            priced.push((service, quantity, priced_line));
        }

        let line_totals: Vec<Decimal> = priced.iter().map(|(_, _, p)| p.line_total).collect();
        let breakdown = price_order(&line_totals, input.fulfillment, promo_pct);

        let order_number = generate_order_number();
        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (tenant_id, customer_id, order_number, status, fulfillment,
                                subtotal, discount, tax, delivery_fee, total, promo_code, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(customer.id)
        .bind(&order_number)
        .bind(OrderStatus::Pending.as_str())
        .bind(input.fulfillment.as_str())
        .bind(breakdown.subtotal)
        .bind(breakdown.discount)
        .bind(breakdown.tax)
        .bind(breakdown.delivery_fee)
        .bind(breakdown.total)
        .bind(&input.promo_code)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (service, quantity, priced_line) in &priced {
            let item = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO order_items (order_id, service_id, service_name, quantity, unit_price, line_total)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {ORDER_ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(service.id)
            .bind(&service.name)
            .bind(*quantity)
            .bind(priced_line.unit_price)
            .bind(priced_line.line_total)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        tx.commit().await?;

        let result = OrderWithItems { order, items };
        self.events.publish(EventKind::OrderCreated, &result);

        Ok(result)
    }

    /// List orders for a tenant, newest first
    pub async fn list(&self, tenant_id: Uuid) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE tenant_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Get one order with its lines
    pub async fn get(&self, tenant_id: Uuid, order_id: Uuid) -> AppResult<OrderWithItems> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(order_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY service_name"
        ))
        .bind(order.id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderWithItems { order, items })
    }

    /// Move an order through its lifecycle
    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        order_id: Uuid,
        input: UpdateOrderStatusInput,
    ) -> AppResult<OrderWithItems> {
        let current = self.get(tenant_id, order_id).await?;

        let current_status = OrderStatus::parse(&current.order.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown order status: {}", current.order.status))
        })?;

        if !current_status.can_transition_to(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move order from {} to {}",
                current_status.as_str(),
                input.status.as_str()
            )));
        }

        sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(input.status.as_str())
            .bind(order_id)
            .execute(&self.db)
            .await?;

        let updated = self.get(tenant_id, order_id).await?;
        self.events.publish(EventKind::OrderUpdated, &updated);

        Ok(updated)
    }

    /// Render the plain-text receipt and WhatsApp share link for an order
    pub async fn receipt(&self, tenant_id: Uuid, order_id: Uuid) -> AppResult<Receipt> {
        let order = self.get(tenant_id, order_id).await?;

        let customers = CustomerService::new(self.db.clone());
        let customer = customers.get(tenant_id, order.order.customer_id).await?;

        let text = render_receipt(&order, &customer.name);
        let whatsapp_link = whatsapp_order_link(&customer.phone, &text);

        Ok(Receipt {
            order_number: order.order.order_number,
            customer_name: customer.name,
            text,
            whatsapp_link,
        })
    }
}

/// Cart quantities are stored in an INTEGER column; reject anything that
/// does not fit instead of letting the cast wrap negative.
fn cart_quantity(quantity: u32) -> AppResult<i32> {
    i32::try_from(quantity).map_err(|_| AppError::Validation {
        field: "items".to_string(),
        message: "Item quantity is too large".to_string(),
    })
}

/// Order numbers look like ORD-20260825-1A2B3C
fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("ORD-{date}-{suffix}")
}

/// Plain-text receipt body shared over WhatsApp
fn render_receipt(order: &OrderWithItems, customer_name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("Receipt {}\n", order.order.order_number));
    out.push_str(&format!("Customer: {customer_name}\n\n"));

    for item in &order.items {
        out.push_str(&format!(
            "{} x{} @ {} = {}\n",
            item.service_name, item.quantity, item.unit_price, item.line_total
        ));
    }

    out.push_str(&format!("\nSubtotal: {}\n", order.order.subtotal));
    if order.order.discount > Decimal::ZERO {
        out.push_str(&format!("Discount: -{}\n", order.order.discount));
    }
    out.push_str(&format!("Tax: {}\n", order.order.tax));
    if order.order.delivery_fee > Decimal::ZERO {
        out.push_str(&format!("Delivery: {}\n", order.order.delivery_fee));
    }
    out.push_str(&format!("Total: {} BHD\n", order.order.total));

    out
}

/// wa.me deep link with the receipt text pre-filled
fn whatsapp_order_link(phone: &str, text: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{digits}?text={}", percent_encode(text))
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_has_expected_shape() {
        let number = generate_order_number();
        assert!(number.starts_with("ORD-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn oversized_cart_quantities_are_rejected() {
        assert!(cart_quantity(3_000_000_000).is_err());
        assert_eq!(cart_quantity(5).unwrap(), 5);
        assert_eq!(cart_quantity(i32::MAX as u32).unwrap(), i32::MAX);
    }

    #[test]
    fn percent_encode_escapes_spaces_and_newlines() {
        assert_eq!(percent_encode("a b\nc"), "a%20b%0Ac");
        assert_eq!(percent_encode("total-1.500"), "total-1.500");
    }

    #[test]
    fn whatsapp_link_strips_phone_formatting() {
        let link = whatsapp_order_link("+973 1234-5678", "hi");
        assert!(link.starts_with("https://wa.me/97312345678?text="));
    }
}
