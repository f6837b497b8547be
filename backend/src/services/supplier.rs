//! Supplier service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_email;

use crate::error::{AppError, AppResult};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// A vendor that inventory items can be sourced from
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Input for updating a supplier. Omitted fields keep their current value;
/// optional fields set to JSON null are cleared.
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub email: Option<Option<String>>,
    pub is_active: Option<bool>,
}

const SUPPLIER_COLUMNS: &str =
    "id, tenant_id, name, contact_name, phone, email, is_active, created_at, updated_at";

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a supplier
    pub async fn create(&self, tenant_id: Uuid, input: CreateSupplierInput) -> AppResult<Supplier> {
        input.validate()?;

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (tenant_id, name, contact_name, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    /// List suppliers for a tenant
    pub async fn list(&self, tenant_id: Uuid) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE tenant_id = $1 ORDER BY name"
        ))
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Get one supplier
    pub async fn get(&self, tenant_id: Uuid, supplier_id: Uuid) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(supplier_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Update a supplier
    pub async fn update(
        &self,
        tenant_id: Uuid,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self.get(tenant_id, supplier_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let contact_name = input.contact_name.unwrap_or(existing.contact_name);
        let phone = input.phone.unwrap_or(existing.phone);
        let email = input.email.unwrap_or(existing.email);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        if let Some(email) = &email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers
            SET name = $1, contact_name = $2, phone = $3, email = $4, is_active = $5,
                updated_at = NOW()
            WHERE id = $6 AND tenant_id = $7
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&contact_name)
        .bind(&phone)
        .bind(&email)
        .bind(is_active)
        .bind(supplier_id)
        .bind(tenant_id)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_input_null_clears_and_missing_keeps() {
        let input: UpdateSupplierInput =
            serde_json::from_str(r#"{"name": "Acme Chemicals", "email": null}"#).unwrap();

        assert_eq!(input.name.as_deref(), Some("Acme Chemicals"));
        assert!(matches!(input.email, Some(None)));
        assert!(input.phone.is_none());
        assert!(input.contact_name.is_none());
    }

    #[test]
    fn update_input_parses_explicit_values() {
        let input: UpdateSupplierInput =
            serde_json::from_str(r#"{"contact_name": "Sara"}"#).unwrap();

        assert!(matches!(input.contact_name, Some(Some(ref name)) if name == "Sara"));
    }
}
