//! Service catalog and promo codes
//!
//! The catalog stores each tenant's priced laundry services; the category
//! determines the fixed multiplier applied at checkout. Promo codes are
//! exact-match percentage discounts with no stacking.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::types::ServiceCategory;
use shared::validation::{validate_percent, validate_promo_code};

use crate::error::{AppError, AppResult};

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// A priced laundry service offered by a tenant
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LaundryService {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub category: String,
    pub base_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A percentage discount code
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromoCode {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub percent_off: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a catalog service
#[derive(Debug, Deserialize)]
pub struct CreateServiceInput {
    pub name: String,
    pub category: ServiceCategory,
    pub base_price: Decimal,
}

/// Input for creating a promo code
#[derive(Debug, Deserialize)]
pub struct CreatePromoCodeInput {
    pub code: String,
    pub percent_off: Decimal,
}

const SERVICE_COLUMNS: &str = "id, tenant_id, name, category, base_price, is_active, created_at";
const PROMO_COLUMNS: &str = "id, tenant_id, code, percent_off, is_active, created_at";

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a catalog service
    pub async fn create_service(
        &self,
        tenant_id: Uuid,
        input: CreateServiceInput,
    ) -> AppResult<LaundryService> {
        if input.base_price <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "base_price".to_string(),
                message: "Base price must be positive".to_string(),
            });
        }

        let service = sqlx::query_as::<_, LaundryService>(&format!(
            r#"
            INSERT INTO laundry_services (tenant_id, name, category, base_price)
            VALUES ($1, $2, $3, $4)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.name)
        .bind(input.category.as_str())
        .bind(input.base_price)
        .fetch_one(&self.db)
        .await?;

        Ok(service)
    }

    /// List active catalog services for a tenant
    pub async fn list_services(&self, tenant_id: Uuid) -> AppResult<Vec<LaundryService>> {
        let services = sqlx::query_as::<_, LaundryService>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM laundry_services WHERE tenant_id = $1 AND is_active = TRUE ORDER BY name"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(services)
    }

    /// Get one active catalog service
    pub async fn get_service(
        &self,
        tenant_id: Uuid,
        service_id: Uuid,
    ) -> AppResult<LaundryService> {
        sqlx::query_as::<_, LaundryService>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM laundry_services WHERE id = $1 AND tenant_id = $2 AND is_active = TRUE"
        ))
        .bind(service_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service".to_string()))
    }

    /// Create a promo code
    pub async fn create_promo_code(
        &self,
        tenant_id: Uuid,
        input: CreatePromoCodeInput,
    ) -> AppResult<PromoCode> {
        validate_promo_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;
        validate_percent(input.percent_off).map_err(|msg| AppError::Validation {
            field: "percent_off".to_string(),
            message: msg.to_string(),
        })?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM promo_codes WHERE tenant_id = $1 AND code = $2",
        )
        .bind(tenant_id)
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("code".to_string()));
        }

        let promo = sqlx::query_as::<_, PromoCode>(&format!(
            r#"
            INSERT INTO promo_codes (tenant_id, code, percent_off)
            VALUES ($1, $2, $3)
            RETURNING {PROMO_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.code)
        .bind(input.percent_off)
        .fetch_one(&self.db)
        .await?;

        Ok(promo)
    }

    /// List promo codes for a tenant
    pub async fn list_promo_codes(&self, tenant_id: Uuid) -> AppResult<Vec<PromoCode>> {
        let codes = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes WHERE tenant_id = $1 ORDER BY code"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(codes)
    }

    /// Exact-match lookup of an active promo code
    pub async fn find_active_promo(
        &self,
        tenant_id: Uuid,
        code: &str,
    ) -> AppResult<Option<PromoCode>> {
        let promo = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes WHERE tenant_id = $1 AND code = $2 AND is_active = TRUE"
        ))
        .bind(tenant_id)
        .bind(code)
        .fetch_optional(&self.db)
        .await?;

        Ok(promo)
    }
}
