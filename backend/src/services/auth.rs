//! Authentication and tenant registration
//!
//! Registration creates the tenant and its owner account in one transaction.
//! Emails are globally unique so a login does not need a tenant discriminator.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::types::Role;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// JWT claims carried by both access and refresh tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub tenant_id: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
}

/// Input for registering a new tenant with its owner account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterTenantInput {
    pub tenant_name: String,
    #[validate(length(min = 1, message = "Owner name is required"))]
    pub owner_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub phone: Option<String>,
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Refresh token payload
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Token pair returned by register, login and refresh
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// The authenticated user as returned to clients
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Auth response envelope
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: AuthTokens,
}

const USER_COLUMNS: &str = "id, tenant_id, name, email, password_hash, role, is_active";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new tenant and its owner account
    pub async fn register(&self, input: RegisterTenantInput) -> AppResult<AuthResponse> {
        input.validate()?;

        if input.tenant_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "tenant_name".to_string(),
                message: "Business name is required".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&input.email)
            .fetch_one(&self.db)
            .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

        let mut tx = self.db.begin().await?;

        let tenant_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO tenants (name, phone) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.tenant_name)
        .bind(&input.phone)
        .fetch_one(&mut *tx)
        .await?;

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (tenant_id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&input.owner_name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(Role::Owner.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(tenant_id = %tenant_id, "Registered new tenant");

        self.issue_response(user)
    }

    /// Authenticate with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = bcrypt::verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        self.issue_response(user)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<AuthTokens> {
        let claims = self.decode_token(&input.refresh_token)?;

        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(claims.sub)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        self.issue_tokens(&user)
    }

    fn issue_response(&self, user: UserRow) -> AppResult<AuthResponse> {
        let tokens = self.issue_tokens(&user)?;
        Ok(AuthResponse {
            user: UserProfile {
                id: user.id,
                tenant_id: user.tenant_id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
            tokens,
        })
    }

    fn issue_tokens(&self, user: &UserRow) -> AppResult<AuthTokens> {
        let access_token = self.encode_token(user, self.access_token_expiry)?;
        let refresh_token = self.encode_token(user, self.refresh_token_expiry)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn encode_token(&self, user: &UserRow, expiry_seconds: i64) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            tenant_id: user.tenant_id,
            role: user.role.clone(),
            exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token encoding failed: {e}")))
    }

    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode_jwt(token, &self.jwt_secret)
    }
}

/// Decode and validate a JWT against the configured secret
pub fn decode_jwt(token: &str, secret: &str) -> AppResult<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, password: &str) -> RegisterTenantInput {
        RegisterTenantInput {
            tenant_name: "Sparkle Laundry".to_string(),
            owner_name: "Huda".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone: None,
        }
    }

    #[test]
    fn register_input_rejects_malformed_email() {
        let err = AppError::from(input("not-an-email", "longenough").validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "email"));
    }

    #[test]
    fn register_input_rejects_short_password() {
        let err = AppError::from(input("owner@example.com", "short").validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "password"));
    }

    #[test]
    fn register_input_accepts_valid_fields() {
        assert!(input("owner@example.com", "longenough").validate().is_ok());
    }
}
